//! The editable product draft.
//!
//! A [`ProductDraft`] is what the editor form holds between loading and
//! submitting: every field as the user sees it, with the price still as raw
//! text. Updates consume the draft and return the new value.
//!
//! Converting a draft into a [`ProductPayload`] is the only way to produce a
//! write body, and it is where the submission rules live:
//!
//! - `name` and `description` must not be blank
//! - `price` must parse to a finite, non-negative number
//! - at least one category is required

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{Price, PriceError, Product, ProductId, ProductPayload};

/// Draft fields that are edited as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Name,
    Description,
    Price,
}

impl DraftField {
    /// Form field name used by the editor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "price" => Ok(Self::Price),
            other => Err(DraftError::UnknownField(other.to_string())),
        }
    }
}

/// Reasons a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(DraftField),
    #[error(transparent)]
    InvalidPrice(#[from] PriceError),
    #[error("at least one category is required")]
    NoCategories,
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// A product being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    /// Identifier carried over from a hydrated product.
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Raw price text as typed.
    pub price: String,
    pub categories: Vec<String>,
    pub image_url: String,
}

impl ProductDraft {
    /// An all-empty draft for create mode.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace one text field, leaving the others untouched.
    #[must_use]
    pub fn with_field(mut self, field: DraftField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            DraftField::Name => self.name = value,
            DraftField::Description => self.description = value,
            DraftField::Price => self.price = value,
        }
        self
    }

    /// Replace the categories from comma-separated text.
    #[must_use]
    pub fn with_categories(mut self, raw: &str) -> Self {
        self.categories = split_categories(raw);
        self
    }

    /// Point the image reference at a locally chosen file.
    #[must_use]
    pub fn with_image(mut self, file_name: impl Into<String>) -> Self {
        self.image_url = file_name.into();
        self
    }

    /// Categories as they appear in the text input.
    #[must_use]
    pub fn categories_text(&self) -> String {
        self.categories.join(", ")
    }

    /// Validate the draft and build the write body.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] if a required field is blank, the price is not a
    /// valid non-negative number, or no category is set.
    pub fn to_payload(&self) -> Result<ProductPayload, DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingField(DraftField::Name));
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::MissingField(DraftField::Description));
        }
        let price = Price::parse(&self.price)?;
        if self.categories.is_empty() {
            return Err(DraftError::NoCategories);
        }

        Ok(ProductPayload {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            price,
            categories: self.categories.clone(),
            image_url: self.image_url.clone(),
        })
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            description: product.description,
            price: product.price.to_string(),
            categories: product.categories,
            image_url: product.image_url,
        }
    }
}

/// Split comma-separated text into trimmed, non-empty labels, keeping order.
#[must_use]
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(String::from)
        .collect()
}
