//! Per-group loading with offline fallback.
//!
//! A `WordGroupLoader` moves through `Idle -> Loading -> {Online, OfflineCached, Failed}`:
//! - remote fetch succeeds: `Online`, and the document is written through to the cache
//! - remote fetch fails, cache entry readable: `OfflineCached` with an advisory
//! - remote fetch fails, no usable cache entry: `Failed` with a retry message
//!
//! `load` and `refresh` borrow the loader mutably, so a second call cannot
//! overlap an in-flight one. Dropping an in-flight `load` future cancels the
//! request and leaves the loader in `Loading`; the next `refresh` starts over.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiError, WordSource};
use crate::cache::CacheManager;
use crate::models::{GroupId, MindMap, WordCard, WordEntry, WordGroupDocument};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Online(WordGroupDocument),
    OfflineCached {
        document: WordGroupDocument,
        advisory: String,
    },
    Failed {
        message: String,
    },
}

/// Document-free view of a `LoadState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Online,
    OfflineCached,
    Failed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPhase::Idle => write!(f, "idle"),
            LoadPhase::Loading => write!(f, "loading"),
            LoadPhase::Online => write!(f, "online"),
            LoadPhase::OfflineCached => write!(f, "offline (cached)"),
            LoadPhase::Failed => write!(f, "failed"),
        }
    }
}

impl LoadState {
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadState::Idle => LoadPhase::Idle,
            LoadState::Loading => LoadPhase::Loading,
            LoadState::Online(_) => LoadPhase::Online,
            LoadState::OfflineCached { .. } => LoadPhase::OfflineCached,
            LoadState::Failed { .. } => LoadPhase::Failed,
        }
    }

    pub fn document(&self) -> Option<&WordGroupDocument> {
        match self {
            LoadState::Online(document) | LoadState::OfflineCached { document, .. } => {
                Some(document)
            }
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Whether the loader reached one of its terminal states.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            LoadState::Online(_) | LoadState::OfflineCached { .. } | LoadState::Failed { .. }
        )
    }

    /// Non-blocking notice shown while serving cached data.
    pub fn advisory(&self) -> Option<&str> {
        match self {
            LoadState::OfflineCached { advisory, .. } => Some(advisory),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

pub struct WordGroupLoader {
    group: GroupId,
    source: Arc<dyn WordSource>,
    cache: Arc<CacheManager>,
    state: LoadState,
    pending_write: Option<JoinHandle<()>>,
}

impl WordGroupLoader {
    pub fn new(group: GroupId, source: Arc<dyn WordSource>, cache: Arc<CacheManager>) -> Self {
        Self {
            group,
            source,
            cache,
            state: LoadState::Idle,
            pending_write: None,
        }
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn document(&self) -> Option<&WordGroupDocument> {
        self.state.document()
    }

    pub async fn load(&mut self) -> &LoadState {
        self.state = LoadState::Loading;
        self.state = self.resolve().await;
        &self.state
    }

    /// Reload from any state. The previous document is discarded while loading.
    pub async fn refresh(&mut self) -> &LoadState {
        debug!(group = %self.group, phase = %self.state.phase(), "Refreshing group");
        self.load().await
    }

    async fn resolve(&mut self) -> LoadState {
        let error = match self.source.fetch_group_document(&self.group).await {
            Ok(document) => {
                info!(group = %self.group, words = document.word_count(), "Group loaded online");
                self.write_through(&document);
                return LoadState::Online(document);
            }
            Err(e) => e,
        };

        if !error.is_recoverable() {
            warn!(group = %self.group, error = %error, "Group request is invalid");
            return Self::failed(&self.group, &error);
        }

        match self.read_cache().await {
            Some(document) => {
                info!(
                    group = %self.group,
                    error = %error,
                    "Remote fetch failed, using cached copy"
                );
                LoadState::OfflineCached {
                    document,
                    advisory: format!(
                        "Offline mode: showing cached data for {} ({})",
                        self.group, error
                    ),
                }
            }
            None => {
                warn!(
                    group = %self.group,
                    error = %error,
                    "Remote fetch failed and nothing cached"
                );
                Self::failed(&self.group, &error)
            }
        }
    }

    fn failed(group: &GroupId, error: &ApiError) -> LoadState {
        LoadState::Failed {
            message: format!("Could not load {}: {}. Retry to try again.", group, error),
        }
    }

    /// Persist `document` in the background. Nothing waits on the result.
    fn write_through(&mut self, document: &WordGroupDocument) {
        let cache = Arc::clone(&self.cache);
        let group = self.group.clone();
        let document = document.clone();
        self.pending_write = Some(tokio::task::spawn_blocking(move || {
            cache.put(&group, &document);
        }));
    }

    async fn read_cache(&self) -> Option<WordGroupDocument> {
        let cache = Arc::clone(&self.cache);
        let group = self.group.clone();
        match tokio::task::spawn_blocking(move || cache.get(&group)).await {
            Ok(document) => document,
            Err(e) => {
                warn!(group = %self.group, error = %e, "Cache read task failed");
                None
            }
        }
    }

    /// Wait for the most recent write-through to finish, if one is pending.
    pub async fn wait_for_cache_write(&mut self) {
        if let Some(handle) = self.pending_write.take() {
            if let Err(e) = handle.await {
                warn!(group = %self.group, error = %e, "Cache write task failed");
            }
        }
    }

    pub fn image_url(&self) -> String {
        self.source.image_url(&self.group)
    }

    // ===== Accessors over the current document =====

    pub fn word_count(&self) -> usize {
        self.document().map(WordGroupDocument::word_count).unwrap_or(0)
    }

    pub fn core_entry(&self) -> Option<&WordEntry> {
        self.document().and_then(WordGroupDocument::core_entry)
    }

    pub fn entry(&self, english: &str) -> Option<&WordEntry> {
        self.document().and_then(|d| d.entry(english))
    }

    pub fn home_page_entries(&self) -> Vec<&WordEntry> {
        self.document()
            .map(WordGroupDocument::home_page_entries)
            .unwrap_or_default()
    }

    pub fn cards(&self) -> Vec<WordCard> {
        self.document()
            .map(WordGroupDocument::cards)
            .unwrap_or_default()
    }

    pub fn mind_map(&self) -> Option<MindMap> {
        self.document().map(WordGroupDocument::mind_map)
    }
}
