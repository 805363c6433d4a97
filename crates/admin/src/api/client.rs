//! `reqwest` implementation of [`CatalogApi`].

use std::sync::Arc;

use catalog_core::{Product, ProductFilters, ProductId, ProductPayload};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogApi, CatalogError, PRODUCTS_PATH};

/// HTTP client for the Catalog API.
///
/// Cheap to clone; clones share one connection pool. No request timeout is
/// configured, so requests rely on the transport defaults.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new Catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the base address
    /// cannot carry a path (e.g. `mailto:` URLs).
    pub fn new(base_url: Url) -> Result<Self, CatalogError> {
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner { client, base_url }),
        })
    }

    /// Get the configured base address.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// URL of the product collection.
    fn products_url(&self) -> Result<Url, CatalogError> {
        self.resource_url(None)
    }

    /// URL of a single product.
    fn product_url(&self, id: &ProductId) -> Result<Url, CatalogError> {
        self.resource_url(Some(id))
    }

    fn resource_url(&self, id: Option<&ProductId>) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| CatalogError::InvalidUrl(self.inner.base_url.to_string()))?;
            segments.pop_if_empty().extend(PRODUCTS_PATH);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| CatalogError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Check the status of a response whose body is not used.
    async fn expect_success(response: reqwest::Response) -> Result<(), CatalogError> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse error response from the Catalog API.
    async fn parse_error(response: reqwest::Response) -> CatalogError {
        let status = response.status().as_u16();
        let path = response.url().path().to_string();

        if status == 404 {
            return CatalogError::NotFound(path);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        CatalogError::Api { status, message }
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn list_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.products_url()?;
        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters.query_pairs());
        }

        let response = self.inner.client.get(url).send().await?;
        let products: Vec<Product> = Self::handle_response(response).await?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let url = self.product_url(id)?;
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_product(&self, payload: &ProductPayload) -> Result<(), CatalogError> {
        let url = self.products_url()?;
        let response = self.inner.client.post(url).json(payload).send().await?;
        Self::expect_success(response).await?;

        debug!("Product created");
        Ok(())
    }

    #[instrument(skip(self, payload), fields(id = %id))]
    async fn update_product(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<(), CatalogError> {
        let url = self.product_url(id)?;
        let response = self.inner.client.put(url).json(payload).send().await?;
        Self::expect_success(response).await?;

        debug!("Product updated");
        Ok(())
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn delete_products(&self, ids: &[ProductId]) -> Result<(), CatalogError> {
        let mut url = self.products_url()?;
        url.query_pairs_mut()
            .extend_pairs(ids.iter().map(|id| ("ids", id.to_string())));

        let response = self.inner.client.delete(url).send().await?;
        Self::expect_success(response).await?;

        debug!("Products deleted");
        Ok(())
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
