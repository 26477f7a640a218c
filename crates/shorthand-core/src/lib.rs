//! Core library for shorthand words.
//!
//! This crate provides everything needed to get vocabulary groups onto a
//! screen, online or offline:
//!
//! - `api`: `CloudClient` for the object-storage bucket, behind `WordSource`
//! - `cache`: `CacheManager`, a flat JSON store with one file per group
//! - `discovery`: `GroupDiscovery`, manifest -> bucket listing -> probing
//! - `loader`: `WordGroupLoader`, remote fetch with cache fallback
//! - `board`: `GroupBoard`, paginated concurrent loading of many groups
//! - `models`: word group documents and the views derived from them
//! - `config`: persisted application configuration

pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod loader;
pub mod models;
pub mod utils;

pub use api::{ApiError, CloudClient, WordSource};
pub use board::{BoardStatus, GroupBoard};
pub use cache::CacheManager;
pub use config::Config;
pub use discovery::{Discovery, DiscoveryStrategy, GroupDiscovery, ProbeCandidates};
pub use loader::{LoadPhase, LoadState, WordGroupLoader};
pub use models::{GroupId, GroupIndex, WordGroupDocument};
