//! Criteria matcher: combines dish filters on top of a [`DishStore`]

use crate::core::criteria::{Criterion, DishCriteria};
use crate::core::dish::Dish;
use crate::core::error::StoreError;
use crate::core::service::DishStore;
use std::sync::Arc;

/// How a combined query reaches the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Fetch the whole collection once and filter it in memory
    #[default]
    InMemory,

    /// Ask the store for a single compound native query
    ///
    /// Returns the same set as [`MatchStrategy::InMemory`] without
    /// transferring the whole collection, on backends that support it.
    Pushdown,
}

/// Combines zero or more criteria into one intersected result.
///
/// A single criterion goes straight to the store as a native predicate
/// ([`CriteriaMatcher::fetch`]). Several criteria at once go through
/// [`CriteriaMatcher::match_all`], which by default fetches the unfiltered
/// collection and applies each active criterion in turn.
///
/// # Example
///
/// ```rust,ignore
/// let matcher = CriteriaMatcher::new(Arc::new(store));
/// let cheap_mains = matcher
///     .match_all(&DishCriteria::new().max_price(dec!(10)).category_ids(["mains"]))
///     .await?;
/// ```
#[derive(Clone)]
pub struct CriteriaMatcher {
    store: Arc<dyn DishStore>,
    strategy: MatchStrategy,
}

impl CriteriaMatcher {
    pub fn new(store: Arc<dyn DishStore>) -> Self {
        Self {
            store,
            strategy: MatchStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Every dish, unfiltered
    pub async fn fetch_all(&self) -> Result<Vec<Dish>, StoreError> {
        self.store.fetch_all().await
    }

    /// A single dish by identifier
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<Dish>, StoreError> {
        self.store.fetch_by_id(id).await
    }

    /// Delegate one criterion to the store as a native predicate.
    ///
    /// No sentinel handling happens here: the criterion is applied as given.
    pub async fn fetch(&self, criterion: &Criterion) -> Result<Vec<Dish>, StoreError> {
        let dishes = self.store.fetch_criterion(criterion).await?;
        tracing::debug!(
            backend = self.store.backend(),
            criterion = %criterion,
            count = dishes.len(),
            "single-criterion query"
        );
        Ok(dishes)
    }

    /// Dishes satisfying every active criterion (logical AND).
    ///
    /// Inactive criteria (see [`DishCriteria`]) are skipped. A failure of the
    /// underlying fetch is returned unchanged.
    pub async fn match_all(&self, criteria: &DishCriteria) -> Result<Vec<Dish>, StoreError> {
        let dishes = match self.strategy {
            MatchStrategy::InMemory => {
                let all = self.store.fetch_all().await?;
                let total = all.len();
                let kept = criteria.apply(all);
                tracing::debug!(
                    backend = self.store.backend(),
                    total,
                    count = kept.len(),
                    ?criteria,
                    "combined query filtered in memory"
                );
                kept
            }
            MatchStrategy::Pushdown => {
                let kept = self.store.fetch_matching(criteria).await?;
                tracing::debug!(
                    backend = self.store.backend(),
                    count = kept.len(),
                    ?criteria,
                    "combined query pushed down"
                );
                kept
            }
        };

        Ok(dishes)
    }
}

impl std::fmt::Debug for CriteriaMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaMatcher")
            .field("backend", &self.store.backend())
            .field("strategy", &self.strategy)
            .finish()
    }
}
