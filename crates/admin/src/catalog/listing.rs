//! Catalog listing controller.
//!
//! Holds the fetched products, the two search boxes, the set of checked rows,
//! and the loading/error flags that decide what the listing shows.
//!
//! Refreshes are numbered. Only the response to the most recently issued
//! refresh is applied; a slower, older response arriving afterwards is
//! dropped instead of overwriting newer results.

use catalog_core::{Product, ProductFilters, ProductId};
use tracing::{debug, error, info, instrument, warn};

use super::Navigation;
use crate::api::{CatalogApi, CatalogError};

/// Message shown when the product list cannot be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading products. Please try again later.";

/// One-shot notification shown after a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Deleted,
    DeleteFailed,
}

impl Notice {
    /// User-facing text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Deleted => "Products deleted successfully.",
            Self::DeleteFailed => "Error deleting products.",
        }
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::DeleteFailed)
    }
}

/// Handle for an in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    sequence: u64,
    filters: ProductFilters,
}

impl RefreshTicket {
    /// Filters the refresh was issued with.
    #[must_use]
    pub const fn filters(&self) -> &ProductFilters {
        &self.filters
    }
}

/// What the listing should show, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingDisplay<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Table(&'a [Product]),
}

/// Listing view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    pub products: Vec<Product>,
    pub search_name: String,
    pub search_category: String,
    /// Checked rows, in the order they were checked.
    pub selected_ids: Vec<ProductId>,
    pub loading: bool,
    pub error: Option<String>,
    latest_refresh: u64,
}

impl ListingState {
    #[must_use]
    pub fn with_search_name(mut self, value: impl Into<String>) -> Self {
        self.search_name = value.into();
        self
    }

    #[must_use]
    pub fn with_search_category(mut self, value: impl Into<String>) -> Self {
        self.search_category = value.into();
        self
    }

    /// Filters derived from the search boxes.
    #[must_use]
    pub fn filters(&self) -> ProductFilters {
        ProductFilters::from_search(&self.search_name, &self.search_category)
    }

    #[must_use]
    pub fn is_selected(&self, id: &ProductId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Check the row if unchecked, uncheck it otherwise.
    #[must_use]
    pub fn toggle_select(mut self, id: ProductId) -> Self {
        if let Some(position) = self.selected_ids.iter().position(|selected| *selected == id) {
            self.selected_ids.remove(position);
        } else {
            self.selected_ids.push(id);
        }
        self
    }

    #[must_use]
    pub fn clear_selection(mut self) -> Self {
        self.selected_ids.clear();
        self
    }

    /// Mark a refresh as started and hand out its ticket.
    #[must_use]
    pub fn begin_refresh(mut self) -> (Self, RefreshTicket) {
        self.latest_refresh += 1;
        self.loading = true;
        self.error = None;

        let ticket = RefreshTicket {
            sequence: self.latest_refresh,
            filters: self.filters(),
        };
        (self, ticket)
    }

    /// Apply the outcome of a refresh.
    ///
    /// Outcomes of superseded refreshes are ignored and leave the state as is.
    #[must_use]
    pub fn finish_refresh(
        mut self,
        ticket: &RefreshTicket,
        outcome: Result<Vec<Product>, CatalogError>,
    ) -> Self {
        if ticket.sequence != self.latest_refresh {
            debug!(
                sequence = ticket.sequence,
                latest = self.latest_refresh,
                "Dropping stale product list response"
            );
            return self;
        }

        match outcome {
            Ok(products) => self.products = products,
            Err(e) => {
                error!(error = %e, "Failed to fetch products");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        self.loading = false;
        self
    }

    /// Pick the one thing the listing shows.
    #[must_use]
    pub fn display(&self) -> ListingDisplay<'_> {
        if self.loading {
            ListingDisplay::Loading
        } else if let Some(message) = &self.error {
            ListingDisplay::Error(message)
        } else if self.products.is_empty() {
            ListingDisplay::Empty
        } else {
            ListingDisplay::Table(&self.products)
        }
    }
}

/// Listing controller.
#[derive(Debug)]
pub struct CatalogListing<A> {
    api: A,
    state: ListingState,
}

impl<A: CatalogApi> CatalogListing<A> {
    /// A listing with empty search boxes and nothing loaded yet.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ListingState::default(),
        }
    }

    /// A listing with the search boxes pre-filled.
    #[must_use]
    pub fn with_search(mut self, name: impl Into<String>, category: impl Into<String>) -> Self {
        self.state = self.state.with_search_name(name).with_search_category(category);
        self
    }

    pub const fn state(&self) -> &ListingState {
        &self.state
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    fn update(&mut self, transition: impl FnOnce(ListingState) -> ListingState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    /// Change the name search box. Callers refresh afterwards.
    pub fn set_search_name(&mut self, value: impl Into<String>) {
        self.update(|state| state.with_search_name(value));
    }

    /// Change the category search box. Callers refresh afterwards.
    pub fn set_search_category(&mut self, value: impl Into<String>) {
        self.update(|state| state.with_search_category(value));
    }

    /// Fetch the products matching the current search boxes.
    #[instrument(skip(self), fields(name = %self.state.search_name, category = %self.state.search_category))]
    pub async fn refresh(&mut self) {
        let (state, ticket) = std::mem::take(&mut self.state).begin_refresh();
        self.state = state;

        let outcome = self.api.list_products(ticket.filters()).await;
        self.update(|state| state.finish_refresh(&ticket, outcome));
    }

    pub fn toggle_select(&mut self, id: ProductId) {
        self.update(|state| state.toggle_select(id));
    }

    /// Delete every checked product in one request.
    ///
    /// Returns `None` without touching anything when nothing is checked.
    /// On success the selection is cleared and the list refreshed.
    #[instrument(skip(self), fields(count = self.state.selected_ids.len()))]
    pub async fn delete_selected(&mut self) -> Option<Notice> {
        if self.state.selected_ids.is_empty() {
            return None;
        }

        match self.api.delete_products(&self.state.selected_ids).await {
            Ok(()) => {
                info!(count = self.state.selected_ids.len(), "Bulk delete completed");
                self.update(ListingState::clear_selection);
                self.refresh().await;
                Some(Notice::Deleted)
            }
            Err(e) => {
                warn!(error = %e, "Bulk delete failed");
                Some(Notice::DeleteFailed)
            }
        }
    }

    #[must_use]
    pub const fn go_to_create(&self) -> Navigation {
        Navigation::Create
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{Call, FakeCatalog, product};
    use serde_json::json;

    fn sample_products() -> Vec<Product> {
        vec![
            product(json!({"id": 1, "name": "Widget", "price": 5, "categories": ["tools"]})),
            product(json!({"id": 2, "name": "Hose", "price": 12.5, "categories": ["garden"]})),
        ]
    }

    #[tokio::test]
    async fn test_refresh_sends_trimmed_non_blank_filters() {
        let cases = [
            ("", "", ProductFilters::default()),
            (
                " widget ",
                "",
                ProductFilters {
                    name: Some("widget".to_string()),
                    category: None,
                },
            ),
            (
                "  ",
                "garden ",
                ProductFilters {
                    name: None,
                    category: Some("garden".to_string()),
                },
            ),
            (
                "a",
                "b",
                ProductFilters {
                    name: Some("a".to_string()),
                    category: Some("b".to_string()),
                },
            ),
        ];

        for (name, category, expected) in cases {
            let mut listing = CatalogListing::new(FakeCatalog::default()).with_search(name, category);
            listing.refresh().await;
            assert_eq!(listing.api().calls(), vec![Call::List(expected)]);
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_products() {
        let mut listing = CatalogListing::new(FakeCatalog::with_products(sample_products()));
        listing.refresh().await;

        let state = listing.state();
        assert_eq!(state.products, sample_products());
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert!(matches!(state.display(), ListingDisplay::Table(rows) if rows.len() == 2));
    }

    #[tokio::test]
    async fn test_refresh_failure_sets_message_and_clears_loading() {
        let mut listing = CatalogListing::new(FakeCatalog::failing());
        listing.refresh().await;

        let state = listing.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        assert_eq!(state.display(), ListingDisplay::Error(LOAD_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_search_change_then_refresh_uses_new_filters() {
        let mut listing = CatalogListing::new(FakeCatalog::default());
        listing.refresh().await;
        listing.set_search_name("rake");
        listing.refresh().await;
        listing.set_search_category("garden");
        listing.refresh().await;

        assert_eq!(
            listing.api().calls(),
            vec![
                Call::List(ProductFilters::default()),
                Call::List(ProductFilters::from_search("rake", "")),
                Call::List(ProductFilters::from_search("rake", "garden")),
            ]
        );
    }

    #[test]
    fn test_stale_refresh_is_dropped() {
        let old = sample_products();
        let new = vec![product(json!({"id": 9, "name": "Rake", "price": 3}))];

        let (state, first) = ListingState::default().begin_refresh();
        let (state, second) = state.with_search_name("rake").begin_refresh();

        // The older response lands first while the newer one is in flight.
        let state = state.finish_refresh(&first, Ok(old.clone()));
        assert!(state.loading);
        assert!(state.products.is_empty());

        let state = state.finish_refresh(&second, Ok(new.clone()));
        assert!(!state.loading);
        assert_eq!(state.products, new);

        // And an even later arrival of the old one changes nothing.
        let state = state.finish_refresh(&first, Ok(old));
        assert_eq!(state.products, new);
    }

    #[test]
    fn test_begin_refresh_clears_error() {
        let (state, ticket) = ListingState::default().begin_refresh();
        let state = state.finish_refresh(
            &ticket,
            Err(CatalogError::NotFound("/api/v1/products".to_string())),
        );
        assert!(state.error.is_some());

        let (state, _) = state.begin_refresh();
        assert_eq!(state.error, None);
        assert_eq!(state.display(), ListingDisplay::Loading);
    }

    #[test]
    fn test_toggle_select_is_symmetric() {
        let state = ListingState::default();
        let id = ProductId::Numeric(1);

        let once = state.clone().toggle_select(id.clone());
        assert!(once.is_selected(&id));

        let twice = once.toggle_select(id.clone());
        assert!(!twice.is_selected(&id));
        assert_eq!(twice, state);
    }

    #[test]
    fn test_toggle_select_keeps_other_ids() {
        let state = ListingState::default()
            .toggle_select(ProductId::Numeric(1))
            .toggle_select(ProductId::Numeric(2))
            .toggle_select(ProductId::Numeric(3))
            .toggle_select(ProductId::Numeric(2));

        assert_eq!(
            state.selected_ids,
            vec![ProductId::Numeric(1), ProductId::Numeric(3)]
        );
    }

    #[tokio::test]
    async fn test_delete_with_empty_selection_is_noop() {
        let mut listing = CatalogListing::new(FakeCatalog::default());
        let before = listing.state().clone();

        assert_eq!(listing.delete_selected().await, None);
        assert!(listing.api().calls().is_empty());
        assert_eq!(listing.state(), &before);
    }

    #[tokio::test]
    async fn test_delete_selected_clears_selection_and_refreshes() {
        let mut listing = CatalogListing::new(FakeCatalog::with_products(sample_products()))
            .with_search("wid", "");
        listing.toggle_select(ProductId::Numeric(2));
        listing.toggle_select(ProductId::Numeric(1));

        assert_eq!(listing.delete_selected().await, Some(Notice::Deleted));
        assert!(listing.state().selected_ids.is_empty());
        assert_eq!(
            listing.api().calls(),
            vec![
                Call::Delete(vec![ProductId::Numeric(2), ProductId::Numeric(1)]),
                Call::List(ProductFilters::from_search("wid", "")),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_selection() {
        let mut listing = CatalogListing::new(FakeCatalog::failing());
        listing.toggle_select(ProductId::Numeric(4));

        assert_eq!(listing.delete_selected().await, Some(Notice::DeleteFailed));
        assert_eq!(listing.state().selected_ids, vec![ProductId::Numeric(4)]);
        assert_eq!(
            listing.api().calls(),
            vec![Call::Delete(vec![ProductId::Numeric(4)])]
        );
    }

    #[test]
    fn test_display_priority() {
        let loaded = ListingState {
            products: sample_products(),
            ..ListingState::default()
        };
        assert!(matches!(loaded.display(), ListingDisplay::Table(_)));

        let errored = ListingState {
            error: Some("boom".to_string()),
            ..loaded.clone()
        };
        assert_eq!(errored.display(), ListingDisplay::Error("boom"));

        let loading = ListingState {
            loading: true,
            ..errored
        };
        assert_eq!(loading.display(), ListingDisplay::Loading);

        assert_eq!(ListingState::default().display(), ListingDisplay::Empty);
    }

    #[test]
    fn test_go_to_create() {
        let listing = CatalogListing::new(FakeCatalog::default());
        assert_eq!(listing.go_to_create(), Navigation::Create);
        assert_eq!(listing.go_to_create().path(), "/product/new");
    }
}
