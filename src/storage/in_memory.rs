//! In-memory implementation of DishStore for testing and development

use crate::core::{Criterion, Dish, DishStore, StoreError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock};

const BACKEND: &str = "in-memory";

/// In-memory dish store
///
/// Holds a fixed set of dishes, seeded at construction, and evaluates every
/// query in process. Uses RwLock for thread-safe access; clones share the
/// same data.
#[derive(Clone, Default)]
pub struct InMemoryDishStore {
    dishes: Arc<RwLock<Vec<Dish>>>,
}

impl InMemoryDishStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `dishes`, in that order
    pub fn with_dishes(dishes: Vec<Dish>) -> Self {
        Self {
            dishes: Arc::new(RwLock::new(dishes)),
        }
    }

    /// Load dishes from a JSON array, e.g. an export of the collection
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dishes: Vec<Dish> =
            serde_json::from_str(json).context("Failed to parse dish fixture")?;
        Ok(Self::with_dishes(dishes))
    }

    /// Load dishes from a JSON file
    pub fn from_json_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dish fixture '{}'", path))?;
        Self::from_json_str(&content)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Dish>>, StoreError> {
        self.dishes
            .read()
            .map_err(|e| StoreError::unavailable(BACKEND, format!("Failed to acquire read lock: {}", e)))
    }

    fn select(&self, criterion: &Criterion) -> Result<Vec<Dish>, StoreError> {
        let matches = criterion.matcher()?;
        let dishes = self.read()?;
        Ok(dishes.iter().filter(|dish| matches(*dish)).cloned().collect())
    }
}

#[async_trait]
impl DishStore for InMemoryDishStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn fetch_all(&self) -> Result<Vec<Dish>, StoreError> {
        Ok(self.read()?.clone())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Dish>, StoreError> {
        Ok(self.read()?.iter().find(|dish| dish.id == id).cloned())
    }

    async fn fetch_by_category(&self, category_ids: &[String]) -> Result<Vec<Dish>, StoreError> {
        self.select(&Criterion::Category(category_ids.to_vec()))
    }

    async fn fetch_by_max_price(&self, max_price: Decimal) -> Result<Vec<Dish>, StoreError> {
        self.select(&Criterion::MaxPrice(max_price))
    }

    async fn fetch_by_min_popularity(&self, min_likes: i64) -> Result<Vec<Dish>, StoreError> {
        self.select(&Criterion::MinPopularity(min_likes))
    }

    async fn fetch_by_name_match(
        &self,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Vec<Dish>, StoreError> {
        self.select(&Criterion::NameMatch {
            pattern: pattern.to_string(),
            case_insensitive,
        })
    }
}
