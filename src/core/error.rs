//! Typed errors for dish queries and configuration
//!
//! # Error Categories
//!
//! - [`StoreError`]: the store could not answer a query, or the query itself
//!   was malformed
//! - [`ConfigError`]: connection settings could not be loaded
//!
//! Both are terminal for the call that raised them. Nothing in this crate
//! retries or returns partial results.
//!
//! # Example
//!
//! ```rust,ignore
//! match store.fetch_by_name_match("(curry", true).await {
//!     Ok(dishes) => println!("{} dishes", dishes.len()),
//!     Err(StoreError::InvalidPattern { pattern, .. }) => {
//!         eprintln!("bad search expression: {pattern}");
//!     }
//!     Err(e) => eprintln!("store error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Errors raised by a [`DishStore`](crate::core::DishStore) or the matcher
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection could not be established or the query could not execute
    #[error("Dish store unavailable ({backend}): {message}")]
    Unavailable { backend: String, message: String },

    /// A name search expression does not compile as a regular expression
    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },
}

impl StoreError {
    pub fn unavailable(backend: impl Into<String>, message: impl ToString) -> Self {
        StoreError::Unavailable {
            backend: backend.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-readable code for callers that map errors onto a wire format
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
            StoreError::InvalidPattern { .. } => "INVALID_PATTERN",
        }
    }
}

/// Errors raised while loading connection settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid number '{value}' in {origin}")]
    InvalidNumber { value: String, origin: String },
}
