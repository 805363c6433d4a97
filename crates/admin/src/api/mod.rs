//! Catalog API client.
//!
//! The Catalog API is the external REST service that owns the product
//! collection. Controllers talk to it through the [`CatalogApi`] trait so they
//! can be exercised against an in-memory fake; [`CatalogClient`] is the
//! `reqwest` implementation used by the server.
//!
//! # API Reference
//!
//! | Operation | Request |
//! |---|---|
//! | List | `GET /api/v1/products?name=&category=` |
//! | Get one | `GET /api/v1/products/{id}` |
//! | Create | `POST /api/v1/products` |
//! | Update | `PUT /api/v1/products/{id}` |
//! | Bulk delete | `DELETE /api/v1/products?ids=1&ids=2` |

mod client;
mod error;

pub use client::CatalogClient;
pub use error::CatalogError;

use std::future::Future;

use catalog_core::{Product, ProductFilters, ProductId, ProductPayload};

/// Path segments of the product resource, relative to the API base address.
pub const PRODUCTS_PATH: [&str; 3] = ["api", "v1", "products"];

/// Operations the admin panel needs from the Catalog API.
pub trait CatalogApi: Send + Sync {
    /// List products matching the given filters.
    fn list_products(
        &self,
        filters: &ProductFilters,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch a single product.
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Create a product. The response body is not used.
    fn create_product(
        &self,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Replace the product identified by `id`. The response body is not used.
    fn update_product(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    /// Delete all listed products in a single request.
    fn delete_products(
        &self,
        ids: &[ProductId],
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;
}
