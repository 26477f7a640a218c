//! Remote data source for word groups.
//!
//! This module provides `CloudClient`, an HTTP client for the object-storage
//! bucket that publishes group documents, the `index.json` manifest and
//! mind-map images. `WordSource` abstracts it for discovery and loading.

pub mod client;
pub mod error;
pub mod listing;
pub mod source;

pub use client::{CloudClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use source::WordSource;

#[cfg(test)]
pub(crate) mod fake;
