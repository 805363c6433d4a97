//! Product resource shapes exchanged with the Catalog API.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as returned by the Catalog API.
///
/// Fields other than `id`, `name` and `price` are optional on the wire and
/// default to empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Categories joined for display (e.g., "tools, garden").
    #[must_use]
    pub fn categories_label(&self) -> String {
        self.categories.join(", ")
    }
}

/// Body sent on create (`POST`) and update (`PUT`).
///
/// Built only from a validated draft, so `price` is always a number and
/// `categories` always a list of trimmed, non-empty labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub categories: Vec<String>,
    pub image_url: String,
}

/// Optional list filters.
///
/// Only non-blank filters are sent, and they are sent trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pub name: Option<String>,
    pub category: Option<String>,
}

impl ProductFilters {
    /// Build filters from raw search-box text.
    #[must_use]
    pub fn from_search(name: &str, category: &str) -> Self {
        Self {
            name: non_blank(name),
            category: non_blank(category),
        }
    }

    /// Query parameters for the list request, in a stable order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(name) = &self.name {
            pairs.push(("name", name.as_str()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.as_str()));
        }
        pairs
    }

    /// Returns `true` if no filter is active.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
