//! Core module containing the dish model, criteria and the store seam

pub mod criteria;
pub mod dish;
pub mod error;
pub mod matcher;
pub mod service;

pub use criteria::{Criterion, DishCriteria, compile_name_pattern};
pub use dish::{Category, Dish};
pub use error::{ConfigError, StoreError};
pub use matcher::{CriteriaMatcher, MatchStrategy};
pub use service::DishStore;
