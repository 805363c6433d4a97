//! Catalog Admin library.
//!
//! Server-rendered admin panel for a product catalog held by a remote
//! Catalog API. The crate is split into:
//!
//! - [`api`] - Catalog API client and the [`api::CatalogApi`] seam
//! - [`catalog`] - listing and editor controllers
//! - [`routes`] - axum handlers and askama templates on top of the controllers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
