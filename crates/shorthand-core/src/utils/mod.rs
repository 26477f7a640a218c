//! Utility functions for string formatting and comparison.

pub mod format;

pub use format::{eq_ignore_case, truncate_string};
