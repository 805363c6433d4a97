//! Product listing route handlers.

use askama::Template;
use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    response::Html,
    routing::{get, post},
};
use catalog_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    api::CatalogApi,
    catalog::{CatalogListing, ListingDisplay, Navigation, Notice},
    error::AppError,
    state::AppState,
};

/// Build the listing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/products/delete", post(delete_selected))
}

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// Bulk delete form: repeated `ids` plus the current search boxes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeleteForm {
    pub ids: Vec<ProductId>,
    pub name: String,
    pub category: String,
}

impl DeleteForm {
    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Repeated and blank ids are dropped.
    #[must_use]
    pub fn parse(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "ids" => {
                    let id = ProductId::from(value.as_ref());
                    if !id.is_blank() && !form.ids.contains(&id) {
                        form.ids.push(id);
                    }
                }
                "name" => form.name = value.into_owned(),
                "category" => form.category = value.into_owned(),
                _ => {}
            }
        }
        form
    }
}

/// Product row for templates.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub categories: String,
    pub price: String,
    pub selected: bool,
    pub edit_path: String,
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub search_name: String,
    pub search_category: String,
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<ProductRow>,
    pub notice: Option<Notice>,
    pub create_path: String,
}

impl ProductsIndexTemplate {
    /// Build the page from a listing controller.
    #[must_use]
    pub fn new<A: CatalogApi>(listing: &CatalogListing<A>, notice: Option<Notice>) -> Self {
        let state = listing.state();
        let mut template = Self {
            search_name: state.search_name.clone(),
            search_category: state.search_category.clone(),
            loading: false,
            error: None,
            rows: Vec::new(),
            notice,
            create_path: listing.go_to_create().path(),
        };

        match state.display() {
            ListingDisplay::Loading => template.loading = true,
            ListingDisplay::Error(message) => template.error = Some(message.to_string()),
            ListingDisplay::Empty => {}
            ListingDisplay::Table(products) => {
                template.rows = products
                    .iter()
                    .map(|product| ProductRow {
                        id: product.id.to_string(),
                        name: product.name.clone(),
                        categories: product.categories_label(),
                        price: product.price.display(),
                        selected: state.is_selected(&product.id),
                        edit_path: Navigation::Edit(product.id.clone()).path(),
                    })
                    .collect();
            }
        }

        template
    }
}

/// Products list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>, AppError> {
    let mut listing =
        CatalogListing::new(state.catalog().clone()).with_search(query.name, query.category);
    listing.refresh().await;

    super::render(&ProductsIndexTemplate::new(&listing, None))
}

/// Bulk delete handler.
///
/// Renders the listing directly so the notice shows above the refreshed
/// table. After a failed delete the rows stay checked.
#[instrument(skip(state, body))]
pub async fn delete_selected(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Html<String>, AppError> {
    let form = DeleteForm::parse(&body);
    let mut listing =
        CatalogListing::new(state.catalog().clone()).with_search(form.name, form.category);
    for id in form.ids {
        listing.toggle_select(id);
    }

    let notice = listing.delete_selected().await;
    if notice != Some(Notice::Deleted) {
        // A successful delete already refreshed the list.
        listing.refresh().await;
    }

    super::render(&ProductsIndexTemplate::new(&listing, notice))
}
