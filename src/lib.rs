//! # Dishes
//!
//! A read-only query surface over a document collection of menu dishes.
//!
//! ## Features
//!
//! - **Narrow native queries**: by category, price ceiling, popularity floor
//!   and name pattern, each evaluated by the store
//! - **Combined criteria**: any mix of filters intersected (logical AND),
//!   with zero/empty values meaning "skip this filter"
//! - **Pluggable storage**: in-memory store for tests and fixtures, MongoDB
//!   behind the `mongodb_backend` feature
//! - **Startup configuration**: YAML file plus `DISHES_MONGO_*` overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dishes::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let store = InMemoryDishStore::with_dishes(vec![
//!     Dish::new("A", "Spring Rolls", dec!(5)).with_categories(["1"]),
//!     Dish::new("B", "Thai Curry", dec!(15)).with_categories(["2"]),
//!     Dish::new("C", "Fried Rice", dec!(8)).with_categories(["1", "2"]),
//! ]);
//! let matcher = CriteriaMatcher::new(Arc::new(store));
//!
//! // A and C: B is over budget and outside category 1
//! let dishes = matcher
//!     .match_all(&DishCriteria::new().max_price(dec!(10)).category_ids(["1"]))
//!     .await?;
//!
//! // Single criterion, evaluated natively
//! let curries = matcher.fetch(&Criterion::name_match("curry")).await?;
//! ```

pub mod config;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Category, ConfigError, Criterion, CriteriaMatcher, Dish, DishCriteria, DishStore,
        MatchStrategy, StoreError,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryDishStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDishStore;

    // === Config ===
    pub use crate::config::{DishesConfig, MongoSettings};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use rust_decimal::Decimal;
    pub use std::sync::Arc;
}
