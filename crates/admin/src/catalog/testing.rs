//! In-memory [`CatalogApi`] fake that records every call.

use std::sync::Mutex;

use catalog_core::{Product, ProductFilters, ProductId, ProductPayload};

use crate::api::{CatalogApi, CatalogError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ProductFilters),
    Get(ProductId),
    Create(ProductPayload),
    Update(ProductId, ProductPayload),
    Delete(Vec<ProductId>),
}

#[derive(Debug, Default)]
pub struct FakeCatalog {
    products: Vec<Product>,
    failing: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    /// Every request fails with a 500.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: Call) -> Result<(), CatalogError> {
        self.calls.lock().expect("calls lock").push(call);
        if self.failing {
            return Err(CatalogError::Api {
                status: 500,
                message: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl CatalogApi for FakeCatalog {
    async fn list_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, CatalogError> {
        self.record(Call::List(filters.clone()))?;
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.record(Call::Get(id.clone()))?;
        self.products
            .iter()
            .find(|product| &product.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<(), CatalogError> {
        self.record(Call::Create(payload.clone()))
    }

    async fn update_product(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<(), CatalogError> {
        self.record(Call::Update(id.clone(), payload.clone()))
    }

    async fn delete_products(&self, ids: &[ProductId]) -> Result<(), CatalogError> {
        self.record(Call::Delete(ids.to_vec()))
    }
}

/// Build a product from JSON the way the Catalog API would send it.
pub fn product(value: serde_json::Value) -> Product {
    serde_json::from_value(value).expect("valid product json")
}
