//! Filter criteria and the in-memory matching pipeline
//!
//! [`DishCriteria`] carries every criterion of a combined query at once. Each
//! criterion has a sentinel value meaning "inactive":
//!
//! | criterion      | inactive when               |
//! |----------------|-----------------------------|
//! | `category_ids` | empty                       |
//! | `search_by`    | empty or only whitespace    |
//! | `max_price`    | `<= 0`                      |
//! | `min_likes`    | `<= 0`                      |
//!
//! An inactive criterion is skipped, it never filters out everything.
//!
//! [`Criterion`] is a single criterion, used when a query is delegated to the
//! store as one native predicate.

use crate::core::dish::Dish;
use crate::core::error::StoreError;
use fancy_regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All criteria of a combined dish query
///
/// Every field defaults to its sentinel, so a partially specified request
/// (e.g. only `maxPrice`) deserializes into a query with the other criteria
/// inactive.
///
/// # Example
/// ```rust,ignore
/// let criteria: DishCriteria = serde_json::from_str(r#"{"maxPrice": 10, "categoryIds": ["1"]}"#)?;
/// assert!(criteria.price_ceiling().is_some());
/// assert!(criteria.search_term().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DishCriteria {
    /// Price ceiling (inclusive)
    pub max_price: Decimal,

    /// Popularity floor; accepted but never applied by the combined query
    pub min_likes: i64,

    /// Literal, case-insensitive substring of the dish name
    pub search_by: String,

    /// Category identifiers, any of which admits a dish
    #[serde(alias = "categoryIdList")]
    pub category_ids: Vec<String>,
}

impl DishCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_price(mut self, max_price: Decimal) -> Self {
        self.max_price = max_price;
        self
    }

    pub fn min_likes(mut self, min_likes: i64) -> Self {
        self.min_likes = min_likes;
        self
    }

    pub fn search_by(mut self, search_by: impl Into<String>) -> Self {
        self.search_by = search_by.into();
        self
    }

    pub fn category_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Requested categories, or `None` when unrestricted
    pub fn category_filter(&self) -> Option<&[String]> {
        (!self.category_ids.is_empty()).then_some(self.category_ids.as_slice())
    }

    /// Search term, or `None` when blank
    ///
    /// The term is returned untrimmed: surrounding whitespace is part of the
    /// substring being searched for.
    pub fn search_term(&self) -> Option<&str> {
        (!self.search_by.trim().is_empty()).then_some(self.search_by.as_str())
    }

    /// Price ceiling, or `None` when `max_price <= 0`
    pub fn price_ceiling(&self) -> Option<Decimal> {
        (self.max_price > Decimal::ZERO).then_some(self.max_price)
    }

    /// Popularity floor, or `None` when `min_likes <= 0`
    pub fn popularity_floor(&self) -> Option<i64> {
        (self.min_likes > 0).then_some(self.min_likes)
    }

    /// True when no criterion is active
    pub fn is_empty(&self) -> bool {
        self.category_filter().is_none()
            && self.search_term().is_none()
            && self.price_ceiling().is_none()
            && self.popularity_floor().is_none()
    }

    /// Apply every active criterion to `dishes`, in order, as a logical AND.
    ///
    /// Stages: category membership, name substring, price ceiling, popularity
    /// floor. The popularity stage removes nothing: dishes carry no likes
    /// counter to compare against.
    pub fn apply(&self, mut dishes: Vec<Dish>) -> Vec<Dish> {
        if let Some(ids) = self.category_filter() {
            dishes.retain(|dish| dish.in_any_category(ids));
            tracing::trace!(remaining = dishes.len(), "category stage applied");
        }

        if let Some(term) = self.search_term() {
            let needle = term.to_lowercase();
            dishes.retain(|dish| dish.name.to_lowercase().contains(&needle));
            tracing::trace!(remaining = dishes.len(), "name stage applied");
        }

        if let Some(ceiling) = self.price_ceiling() {
            dishes.retain(|dish| dish.price <= ceiling);
            tracing::trace!(remaining = dishes.len(), "price stage applied");
        }

        if let Some(floor) = self.popularity_floor() {
            tracing::trace!(min_likes = floor, "popularity stage skipped");
        }

        dishes
    }
}

/// A single criterion delegated to the store as a native predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Dishes in any of these categories
    Category(Vec<String>),
    /// Dishes with `price <= value`
    MaxPrice(Decimal),
    /// Dishes with `price >= value` (see [`DishStore::fetch_by_min_popularity`](crate::core::DishStore::fetch_by_min_popularity))
    MinPopularity(i64),
    /// Dishes whose name matches a regular expression
    NameMatch {
        pattern: String,
        case_insensitive: bool,
    },
}

impl Criterion {
    /// Case-insensitive name match, the usual form of a name search
    pub fn name_match(pattern: impl Into<String>) -> Self {
        Criterion::NameMatch {
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    /// Whether a dish satisfies this criterion, evaluated in process.
    ///
    /// Fails only for a name pattern that does not compile.
    pub fn matcher(&self) -> Result<impl Fn(&Dish) -> bool + '_, StoreError> {
        let regex = match self {
            Criterion::NameMatch {
                pattern,
                case_insensitive,
            } => Some(compile_name_pattern(pattern, *case_insensitive)?),
            _ => None,
        };

        Ok(move |dish: &Dish| match self {
            Criterion::Category(ids) => dish.in_any_category(ids),
            Criterion::MaxPrice(max) => dish.price <= *max,
            Criterion::MinPopularity(min) => dish.price >= Decimal::from(*min),
            // A match that exhausts the backtracking limit counts as no match
            Criterion::NameMatch { .. } => regex
                .as_ref()
                .is_some_and(|r| r.is_match(&dish.name).unwrap_or(false)),
        })
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Category(ids) => write!(f, "category in [{}]", ids.join(", ")),
            Criterion::MaxPrice(max) => write!(f, "price <= {}", max),
            Criterion::MinPopularity(min) => write!(f, "price >= {}", min),
            Criterion::NameMatch {
                pattern,
                case_insensitive,
            } => {
                let flags = if *case_insensitive { "i" } else { "" };
                write!(f, "name =~ /{}/{}", pattern, flags)
            }
        }
    }
}

/// Compile a name search expression.
///
/// The pattern is used as regular-expression syntax, unescaped. Look-around
/// and backreferences are accepted, as the document store's own regex
/// engine accepts them.
pub fn compile_name_pattern(pattern: &str, case_insensitive: bool) -> Result<Regex, StoreError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| StoreError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
