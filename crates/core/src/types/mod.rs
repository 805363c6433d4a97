//! Core types for the product catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use price::{Price, PriceError};
pub use product::{Product, ProductFilters, ProductPayload};
