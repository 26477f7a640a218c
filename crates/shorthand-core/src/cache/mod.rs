//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving word
//! group documents locally. Each group is stored as `<group>.json` in the
//! cache directory and read back when the remote fetch fails.

pub mod manager;

pub use manager::{format_age, CacheManager};
