//! Product editor controller.
//!
//! Create mode starts from an empty draft; edit mode hydrates the draft from
//! the Catalog API. Submitting validates the draft locally first and only
//! talks to the API when the draft is valid.
//!
//! Choosing an image only records the file name in `image_url` and keeps the
//! bytes around for an on-page preview. Nothing is uploaded.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use catalog_core::{DraftError, DraftField, ProductDraft, ProductId};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::Navigation;
use crate::api::{CatalogApi, CatalogError};

/// Errors returned by [`ProductEditor::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The draft failed local validation; no request was made.
    #[error("invalid product: {0}")]
    Invalid(#[from] DraftError),

    /// The Catalog API rejected or failed the write.
    #[error("failed to save product: {0}")]
    Api(#[from] CatalogError),
}

/// A file picked in the image input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Local, display-only handle for a chosen image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    content_type: String,
    bytes: Vec<u8>,
}

impl ImagePreview {
    const FALLBACK_CONTENT_TYPE: &'static str = "application/octet-stream";

    /// `data:` URL suitable for an `<img src>`.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

impl From<SelectedFile> for ImagePreview {
    fn from(file: SelectedFile) -> Self {
        Self {
            content_type: file
                .content_type
                .unwrap_or_else(|| Self::FALLBACK_CONTENT_TYPE.to_string()),
            bytes: file.bytes,
        }
    }
}

/// Editor view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    /// Route-level identifier; decides between create and update.
    pub id: Option<ProductId>,
    pub draft: ProductDraft,
    pub preview: Option<ImagePreview>,
}

impl EditorState {
    /// Empty state for `id` (or create mode when `None`), before any load.
    ///
    /// In edit mode the draft carries the route id so it is echoed back in
    /// the update body.
    #[must_use]
    pub fn for_route(id: Option<ProductId>) -> Self {
        let draft = ProductDraft {
            id: id.clone(),
            ..ProductDraft::empty()
        };
        Self {
            id,
            draft,
            preview: None,
        }
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    #[must_use]
    pub fn with_field(mut self, field: DraftField, value: impl Into<String>) -> Self {
        self.draft = self.draft.with_field(field, value);
        self
    }

    #[must_use]
    pub fn with_categories(mut self, raw: &str) -> Self {
        self.draft = self.draft.with_categories(raw);
        self
    }

    /// Adopt the id encoding echoed back by a posted form.
    ///
    /// Ignored unless it names the route's product. The route only carries
    /// text, so this is how a string id like `"42"` stays a string.
    #[must_use]
    pub fn with_echoed_id(mut self, id: ProductId) -> Self {
        if self.id.as_ref() == Some(&id) {
            self.draft.id = Some(id);
        }
        self
    }

    /// Keep a previously chosen image reference (e.g. after a re-render).
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.draft = self.draft.with_image(image_url);
        self
    }

    /// Use a newly chosen file: its name becomes `image_url` and its bytes
    /// become the preview.
    #[must_use]
    pub fn with_image(mut self, file: SelectedFile) -> Self {
        self.draft = self.draft.with_image(file.file_name.clone());
        self.preview = Some(ImagePreview::from(file));
        self
    }

    /// Drop the preview handle; the draft keeps its `image_url`.
    #[must_use]
    pub fn revoke_preview(mut self) -> Self {
        self.preview = None;
        self
    }
}

/// Editor controller.
#[derive(Debug)]
pub struct ProductEditor<A> {
    api: A,
    state: EditorState,
}

impl<A: CatalogApi> ProductEditor<A> {
    /// Resume an editor from an existing state (e.g. a posted form).
    pub const fn new(api: A, state: EditorState) -> Self {
        Self { api, state }
    }

    /// Open the editor: hydrate from the API in edit mode, empty otherwise.
    ///
    /// A failed fetch is logged and leaves the empty draft in place.
    #[instrument(skip(api))]
    pub async fn load(api: A, id: Option<ProductId>) -> Self {
        let mut state = EditorState::for_route(id);

        if let Some(id) = &state.id {
            match api.get_product(id).await {
                Ok(product) => state.draft = ProductDraft::from(product),
                Err(e) => error!(error = %e, id = %id, "Failed to fetch product"),
            }
        }

        Self { api, state }
    }

    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    fn update(&mut self, transition: impl FnOnce(EditorState) -> EditorState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.update(|state| state.with_field(field, value));
    }

    pub fn set_categories(&mut self, raw: &str) {
        self.update(|state| state.with_categories(raw));
    }

    pub fn set_echoed_id(&mut self, id: ProductId) {
        self.update(|state| state.with_echoed_id(id));
    }

    pub fn set_image_url(&mut self, image_url: impl Into<String>) {
        self.update(|state| state.with_image_url(image_url));
    }

    pub fn set_image(&mut self, file: SelectedFile) {
        self.update(|state| state.with_image(file));
    }

    /// Validate the draft and write it to the Catalog API.
    ///
    /// Creates when the editor has no route id, updates that id otherwise.
    /// Returns where to go next on success.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] without making a request when the
    /// draft fails validation, and [`SubmitError::Api`] when the write fails.
    /// Both are logged here.
    #[instrument(skip(self), fields(id = ?self.state.id))]
    pub async fn submit(&mut self) -> Result<Navigation, SubmitError> {
        let payload = self.state.draft.to_payload().map_err(|e| {
            warn!(error = %e, "Product draft rejected");
            SubmitError::Invalid(e)
        })?;

        let result = match &self.state.id {
            Some(id) => self.api.update_product(id, &payload).await,
            None => self.api.create_product(&payload).await,
        };

        match result {
            Ok(()) => {
                info!(name = %payload.name, "Product saved");
                self.update(EditorState::revoke_preview);
                Ok(Navigation::Listing)
            }
            Err(e) => {
                error!(error = %e, "Failed to save product");
                Err(SubmitError::Api(e))
            }
        }
    }

    /// Discard the draft and go back to the listing.
    #[must_use]
    pub fn cancel(self) -> Navigation {
        Navigation::Listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{Call, FakeCatalog, product};
    use catalog_core::{Price, PriceError};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn filled(editor: &mut ProductEditor<FakeCatalog>, price: &str) {
        editor.set_field(DraftField::Name, "Widget");
        editor.set_field(DraftField::Description, "A useful widget");
        editor.set_field(DraftField::Price, price);
        editor.set_categories("tools, hardware");
    }

    fn png(name: &str) -> SelectedFile {
        SelectedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[tokio::test]
    async fn test_load_without_id_starts_empty() {
        let editor = ProductEditor::load(FakeCatalog::default(), None).await;

        assert_eq!(editor.state().draft, ProductDraft::empty());
        assert!(!editor.state().is_edit());
        assert!(editor.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_hydrates_draft() {
        let api = FakeCatalog::with_products(vec![product(json!({
            "id": 7,
            "name": "Widget",
            "price": 5,
            "categories": ["x"],
            "image_url": "u"
        }))]);

        let editor = ProductEditor::load(api, Some(ProductId::from("7"))).await;
        let draft = &editor.state().draft;

        assert_eq!(draft.id, Some(ProductId::Numeric(7)));
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.price, "5");
        assert_eq!(draft.categories, vec!["x"]);
        assert_eq!(draft.image_url, "u");
        assert_eq!(
            editor.api().calls(),
            vec![Call::Get(ProductId::Numeric(7))]
        );
    }

    #[tokio::test]
    async fn test_load_failure_keeps_empty_draft() {
        let editor = ProductEditor::load(FakeCatalog::failing(), Some(ProductId::Numeric(3))).await;

        assert!(editor.state().is_edit());
        assert!(editor.state().draft.name.is_empty());
        assert_eq!(editor.state().draft.id, Some(ProductId::Numeric(3)));
    }

    #[tokio::test]
    async fn test_set_categories_trims() {
        let mut editor = ProductEditor::load(FakeCatalog::default(), None).await;
        editor.set_categories("a, b ,c");
        assert_eq!(editor.state().draft.categories, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_set_image_uses_file_name_and_builds_preview() {
        let mut editor = ProductEditor::load(FakeCatalog::default(), None).await;
        editor.set_image(png("widget.png"));

        assert_eq!(editor.state().draft.image_url, "widget.png");
        let preview = editor.state().preview.as_ref().expect("preview");
        assert_eq!(preview.data_url(), "data:image/png;base64,iVBORw==");

        let state = editor.state().clone().revoke_preview();
        assert_eq!(state.preview, None);
        assert_eq!(state.draft.image_url, "widget.png");
    }

    #[tokio::test]
    async fn test_submit_invalid_price_makes_no_call() {
        let mut editor = ProductEditor::load(FakeCatalog::default(), None).await;
        filled(&mut editor, "abc");
        let before = editor.state().clone();

        let err = editor.submit().await.expect_err("should reject");

        assert!(matches!(
            err,
            SubmitError::Invalid(DraftError::InvalidPrice(PriceError::NotANumber(_)))
        ));
        assert!(editor.api().calls().is_empty());
        assert_eq!(editor.state(), &before);
    }

    #[tokio::test]
    async fn test_submit_creates_with_numeric_price() {
        let mut editor = ProductEditor::load(FakeCatalog::default(), None).await;
        filled(&mut editor, "19.99");
        editor.set_image(png("widget.png"));

        let next = editor.submit().await.expect("submit");

        assert_eq!(next, Navigation::Listing);
        let calls = editor.api().calls();
        assert_eq!(calls.len(), 1);
        let Some(Call::Create(payload)) = calls.first() else {
            panic!("expected a create call, got {calls:?}");
        };
        assert_eq!(payload.price, Price::new(Decimal::new(1999, 2)));
        assert_eq!(payload.categories, vec!["tools", "hardware"]);
        assert_eq!(payload.image_url, "widget.png");
        assert_eq!(editor.state().preview, None);
        assert_eq!(
            serde_json::to_value(payload).expect("serialize")["price"],
            json!(19.99)
        );
    }

    #[tokio::test]
    async fn test_submit_with_id_updates() {
        let mut editor = ProductEditor::new(
            FakeCatalog::default(),
            EditorState::for_route(Some(ProductId::from("42"))),
        );
        filled(&mut editor, "3");

        editor.submit().await.expect("submit");

        let calls = editor.api().calls();
        assert!(
            matches!(calls.as_slice(), [Call::Update(id, payload)] if *id == ProductId::Numeric(42) && payload.id == Some(ProductId::Numeric(42)))
        );
    }

    #[tokio::test]
    async fn test_echoed_text_id_is_sent_as_text() {
        // The route guesses a number; the form echoes the API's string id.
        let mut editor = ProductEditor::new(
            FakeCatalog::default(),
            EditorState::for_route(Some(ProductId::from("42"))),
        );
        filled(&mut editor, "3");
        editor.set_echoed_id(ProductId::Text("42".to_string()));

        editor.submit().await.expect("submit");

        let calls = editor.api().calls();
        let [Call::Update(_, payload)] = calls.as_slice() else {
            panic!("expected one update, got {calls:?}");
        };
        assert_eq!(
            serde_json::to_value(payload).expect("serialize")["id"],
            json!("42")
        );
    }

    #[test]
    fn test_echoed_id_for_another_product_is_ignored() {
        let state = EditorState::for_route(Some(ProductId::Numeric(42)))
            .with_echoed_id(ProductId::Text("43".to_string()));
        assert!(matches!(state.draft.id, Some(ProductId::Numeric(42))));

        let create = EditorState::for_route(None).with_echoed_id(ProductId::Numeric(1));
        assert_eq!(create.draft.id, None);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_draft() {
        let mut editor = ProductEditor::load(FakeCatalog::failing(), None).await;
        filled(&mut editor, "1");
        let before = editor.state().clone();

        let err = editor.submit().await.expect_err("should fail");

        assert!(matches!(err, SubmitError::Api(_)));
        assert_eq!(editor.state(), &before);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_listing() {
        let mut editor = ProductEditor::load(FakeCatalog::default(), None).await;
        editor.set_field(DraftField::Name, "Unsaved");

        assert_eq!(editor.cancel(), Navigation::Listing);
    }
}
