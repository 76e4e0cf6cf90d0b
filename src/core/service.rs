//! Service trait for read access to the dish collection

use crate::core::criteria::{Criterion, DishCriteria};
use crate::core::dish::Dish;
use crate::core::error::StoreError;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read-only access to the dish collection
///
/// Implementations own the connection to the underlying collection and
/// evaluate each narrow query natively. Every method is a single, stateless
/// query; results come back in store order, which is not guaranteed to be
/// stable across calls.
#[async_trait]
pub trait DishStore: Send + Sync {
    /// Backend name used in logs and errors
    fn backend(&self) -> &'static str;

    /// Every dish in the collection
    async fn fetch_all(&self) -> Result<Vec<Dish>, StoreError>;

    /// A single dish by identifier, `None` if absent
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Dish>, StoreError>;

    /// Dishes with at least one category whose identifier is in `category_ids`
    ///
    /// An empty `category_ids` matches nothing.
    async fn fetch_by_category(&self, category_ids: &[String]) -> Result<Vec<Dish>, StoreError>;

    /// Dishes with `price <= max_price`
    async fn fetch_by_max_price(&self, max_price: Decimal) -> Result<Vec<Dish>, StoreError>;

    /// Dishes with `price >= min_likes`
    ///
    /// Dishes carry no likes counter; this compares the price field against
    /// the given floor. Callers rely on that contract, so it is kept as is.
    async fn fetch_by_min_popularity(&self, min_likes: i64) -> Result<Vec<Dish>, StoreError>;

    /// Dishes whose name matches `pattern` as a regular expression
    ///
    /// The pattern is not escaped. Fails with [`StoreError::InvalidPattern`]
    /// if it does not compile.
    async fn fetch_by_name_match(
        &self,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Vec<Dish>, StoreError>;

    /// Dishes matching every active criterion of `criteria`
    ///
    /// The default fetches the whole collection and filters it in memory.
    /// Backends able to express the combined query natively may override
    /// this, as long as the result set is the same.
    async fn fetch_matching(&self, criteria: &DishCriteria) -> Result<Vec<Dish>, StoreError> {
        let dishes = self.fetch_all().await?;
        Ok(criteria.apply(dishes))
    }

    /// Dispatch one criterion to its native query
    async fn fetch_criterion(&self, criterion: &Criterion) -> Result<Vec<Dish>, StoreError> {
        match criterion {
            Criterion::Category(ids) => self.fetch_by_category(ids).await,
            Criterion::MaxPrice(max) => self.fetch_by_max_price(*max).await,
            Criterion::MinPopularity(min) => self.fetch_by_min_popularity(*min).await,
            Criterion::NameMatch {
                pattern,
                case_insensitive,
            } => self.fetch_by_name_match(pattern, *case_insensitive).await,
        }
    }
}
