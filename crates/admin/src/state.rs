//! Application state shared across handlers.

use std::sync::Arc;

use crate::{
    api::{CatalogClient, CatalogError},
    config::AdminConfig,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    catalog: CatalogClient,
}

impl AppState {
    /// Build the state, including the Catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the Catalog API client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(config.catalog_api_url.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Catalog API client. Clones share the connection pool.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("catalog", &self.inner.catalog)
            .finish_non_exhaustive()
    }
}
