//! View controllers for the catalog admin.
//!
//! Each controller owns an explicit state value and a [`CatalogApi`]
//! implementation. State transitions are pure methods on the state types that
//! consume the old value and return the new one; the controllers sequence
//! those transitions around API calls.
//!
//! - [`listing`] - product listing with search filters and bulk delete
//! - [`editor`] - create/edit form for a single product
//!
//! [`CatalogApi`]: crate::api::CatalogApi

pub mod editor;
pub mod listing;

#[cfg(test)]
pub(crate) mod testing;

pub use editor::{EditorState, ImagePreview, ProductEditor, SelectedFile, SubmitError};
pub use listing::{CatalogListing, ListingDisplay, ListingState, Notice, RefreshTicket};

use catalog_core::ProductId;

/// The view a controller operation hands control to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Catalog listing (`/`).
    Listing,
    /// Editor in create mode (`/product/new`).
    Create,
    /// Editor in edit mode (`/product/edit/{id}`).
    Edit(ProductId),
}

impl Navigation {
    /// Path of the target view. Ids are percent-encoded as one segment.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Listing => "/".to_string(),
            Self::Create => "/product/new".to_string(),
            Self::Edit(id) => {
                let segment: String =
                    url::form_urlencoded::byte_serialize(id.key().as_bytes()).collect();
                // byte_serialize writes spaces as `+`, which is literal in a path.
                format!("/product/edit/{}", segment.replace('+', "%20"))
            }
        }
    }
}
