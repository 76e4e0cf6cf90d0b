//! Dish and category records as stored in the dish collection

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A category reference embedded in a dish.
///
/// Dishes reference categories by identifier; the optional name is carried
/// along for display but never participates in filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier (`_id` in the stored document)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// A single menu item.
///
/// Field names follow the camelCase document convention, and the identifier
/// maps to `_id`. The record is read-only from the point of view of this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Store-assigned identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    pub name: String,

    /// Price, never negative
    ///
    /// Read from any numeric representation (integer, double, decimal
    /// string) and written as a JSON/BSON number.
    pub price: Decimal,

    /// Categories this dish belongs to (possibly none)
    #[serde(default)]
    pub category: Vec<Category>,
}

impl Dish {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: Vec::new(),
        }
    }

    /// Builder-style helper attaching categories by identifier
    pub fn with_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.category = ids.into_iter().map(Category::new).collect();
        self
    }

    /// Iterate over the identifiers of this dish's categories
    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.category.iter().map(|c| c.id.as_str())
    }

    /// True if any of this dish's categories is in `ids`
    pub fn in_any_category<S: AsRef<str>>(&self, ids: &[S]) -> bool {
        self.category_ids()
            .any(|own| ids.iter().any(|wanted| wanted.as_ref() == own))
    }
}
