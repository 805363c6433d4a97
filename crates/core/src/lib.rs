//! Catalog Core - Shared types library.
//!
//! This crate provides the types shared by the catalog admin components:
//! - `admin` - Server-rendered admin panel and Catalog API client
//! - `integration-tests` - End-to-end tests against a fake Catalog API
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! HTTP clients. Everything here can be exercised without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, wire payloads and list filters
//! - [`draft`] - The editable product draft and its submission rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod draft;
pub mod types;

pub use draft::{DraftError, DraftField, ProductDraft};
pub use types::*;
