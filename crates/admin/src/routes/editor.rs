//! Product editor route handlers.

use askama::Template;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use catalog_core::{DraftField, ProductId};
use tracing::{debug, instrument};

use crate::{
    api::CatalogApi,
    catalog::{EditorState, ImagePreview, Navigation, ProductEditor, SelectedFile, SubmitError},
    error::AppError,
    state::AppState,
};

/// Build the editor router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/product/new", get(new_product).post(create_product))
        .route("/product/edit/{id}", get(edit_product).post(update_product))
}

/// Product form template, shared by create and edit mode.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub cancel_path: String,
    /// JSON encoding of the hydrated id, echoed back on submit.
    pub id_json: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub categories: String,
    pub image_url: String,
    pub preview_url: Option<String>,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    /// Build the form from editor state.
    #[must_use]
    pub fn new(state: &EditorState, error: Option<String>) -> Self {
        let (heading, submit_label, action) = match &state.id {
            Some(id) => ("Edit Product", "Update", Navigation::Edit(id.clone())),
            None => ("New Product", "Create", Navigation::Create),
        };
        let draft = &state.draft;

        Self {
            heading,
            submit_label,
            action: action.path(),
            cancel_path: Navigation::Listing.path(),
            id_json: draft
                .id
                .as_ref()
                .and_then(|id| serde_json::to_string(id).ok()),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price.clone(),
            categories: draft.categories_text(),
            image_url: draft.image_url.clone(),
            preview_url: state.preview.as_ref().map(ImagePreview::data_url),
            error,
        }
    }
}

/// Fields read from a posted product form.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub id: Option<ProductId>,
    pub fields: Vec<(DraftField, String)>,
    pub categories: String,
    pub image_url: String,
    pub image: Option<SelectedFile>,
}

impl EditorForm {
    /// Drain a multipart body.
    ///
    /// An image input left empty arrives as a part with a blank file name and
    /// is skipped. Unknown parts are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the body is not valid multipart data.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            match name.as_str() {
                "id" => {
                    let raw = field.text().await?;
                    match serde_json::from_str::<ProductId>(&raw) {
                        Ok(id) => form.id = Some(id),
                        Err(e) => debug!(error = %e, "Ignoring malformed echoed id"),
                    }
                }
                "categories" => form.categories = field.text().await?,
                "image_url" => form.image_url = field.text().await?,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(ToString::to_string);
                    let bytes = field.bytes().await?;
                    if !file_name.is_empty() {
                        form.image = Some(SelectedFile {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                other => match other.parse::<DraftField>() {
                    Ok(draft_field) => form.fields.push((draft_field, field.text().await?)),
                    Err(_) => debug!(field = other, "Ignoring unknown form field"),
                },
            }
        }

        Ok(form)
    }

    /// Replay the posted values onto an editor.
    pub fn apply<A: CatalogApi>(self, editor: &mut ProductEditor<A>) {
        if let Some(id) = self.id {
            editor.set_echoed_id(id);
        }
        for (field, value) in self.fields {
            editor.set_field(field, value);
        }
        editor.set_categories(&self.categories);
        editor.set_image_url(self.image_url);
        if let Some(file) = self.image {
            editor.set_image(file);
        }
    }
}

fn parse_route_id(id: &str) -> Result<ProductId, AppError> {
    let id = ProductId::from(id);
    if id.is_blank() {
        return Err(AppError::BadRequest("missing product id".to_string()));
    }
    Ok(id)
}

/// New product form handler.
#[instrument(skip(state))]
pub async fn new_product(State(state): State<AppState>) -> Result<Response, AppError> {
    let editor = ProductEditor::load(state.catalog().clone(), None).await;
    Ok(super::render(&ProductFormTemplate::new(editor.state(), None))?.into_response())
}

/// Edit product form handler.
///
/// A failed fetch still renders the (empty) form.
#[instrument(skip(state))]
pub async fn edit_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_route_id(&id)?;
    let editor = ProductEditor::load(state.catalog().clone(), Some(id)).await;
    Ok(super::render(&ProductFormTemplate::new(editor.state(), None))?.into_response())
}

/// Create product handler.
#[instrument(skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = EditorForm::read(multipart).await?;
    submit(state, None, form).await
}

/// Update product handler.
#[instrument(skip(state, multipart))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let id = parse_route_id(&id)?;
    let form = EditorForm::read(multipart).await?;
    submit(state, Some(id), form).await
}

/// Run a posted form through the editor.
///
/// Success redirects to the listing. A draft that fails validation comes
/// back with its message and a 422. A Catalog API failure re-renders the
/// form with the draft intact and no message.
async fn submit(
    state: AppState,
    id: Option<ProductId>,
    form: EditorForm,
) -> Result<Response, AppError> {
    let mut editor = ProductEditor::new(state.catalog().clone(), EditorState::for_route(id));
    form.apply(&mut editor);

    match editor.submit().await {
        Ok(next) => Ok(Redirect::to(&next.path()).into_response()),
        Err(SubmitError::Invalid(e)) => {
            let page = super::render(&ProductFormTemplate::new(
                editor.state(),
                Some(e.to_string()),
            ))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(SubmitError::Api(_)) => {
            Ok(super::render(&ProductFormTemplate::new(editor.state(), None))?.into_response())
        }
    }
}
