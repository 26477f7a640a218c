//! Paginated loading of many groups at once.
//!
//! The board discovers the available groups, then keeps one `WordGroupLoader`
//! per displayed group. Each page of loaders is loaded concurrently and the
//! board reports once every displayed loader has settled.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::api::WordSource;
use crate::cache::CacheManager;
use crate::discovery::{DiscoveryStrategy, GroupDiscovery};
use crate::loader::{LoadPhase, WordGroupLoader};
use crate::models::GroupId;

/// Number of groups shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Summary of the displayed loaders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardStatus {
    pub total_groups: usize,
    pub displayed: usize,
    pub loading: usize,
    pub online: usize,
    pub offline_groups: Vec<GroupId>,
    pub errors: Vec<String>,
}

impl BoardStatus {
    pub fn is_settled(&self) -> bool {
        self.loading == 0
    }

    /// One message covering every failed group, if any failed.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(format!(
                "some groups failed to load:\n{}",
                self.errors.join("\n")
            ))
        }
    }
}

pub struct GroupBoard {
    source: Arc<dyn WordSource>,
    cache: Arc<CacheManager>,
    discovery: GroupDiscovery,
    page_size: usize,
    groups: Vec<GroupId>,
    loaders: Vec<WordGroupLoader>,
    strategy: Option<DiscoveryStrategy>,
}

impl GroupBoard {
    pub fn new(source: Arc<dyn WordSource>, cache: Arc<CacheManager>) -> Self {
        let discovery = GroupDiscovery::new(Arc::clone(&source));
        Self::with_discovery(source, cache, discovery)
    }

    pub fn with_discovery(
        source: Arc<dyn WordSource>,
        cache: Arc<CacheManager>,
        discovery: GroupDiscovery,
    ) -> Self {
        Self {
            source,
            cache,
            discovery,
            page_size: DEFAULT_PAGE_SIZE,
            groups: Vec::new(),
            loaders: Vec::new(),
            strategy: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Discover groups and load the first page. Replaces any previous state.
    pub async fn start(&mut self) -> BoardStatus {
        let discovery = self.discovery.discover_with_strategy().await;
        self.groups = discovery.groups;
        self.strategy = Some(discovery.strategy);
        self.loaders.clear();

        if self.groups.is_empty() {
            info!("No groups available to display");
            return self.status();
        }
        self.load_more().await
    }

    pub fn has_more(&self) -> bool {
        self.loaders.len() < self.groups.len()
    }

    /// Append and load the next page of groups.
    pub async fn load_more(&mut self) -> BoardStatus {
        if !self.has_more() {
            return self.status();
        }

        let start = self.loaders.len();
        let end = (start + self.page_size).min(self.groups.len());
        debug!(start = start, end = end, "Loading page of groups");

        for group in &self.groups[start..end] {
            self.loaders.push(WordGroupLoader::new(
                group.clone(),
                Arc::clone(&self.source),
                Arc::clone(&self.cache),
            ));
        }
        join_all(self.loaders[start..].iter_mut().map(|l| l.load())).await;

        self.status()
    }

    /// Reload every displayed group concurrently.
    pub async fn refresh_all(&mut self) -> BoardStatus {
        info!(count = self.loaders.len(), "Refreshing displayed groups");
        join_all(self.loaders.iter_mut().map(|l| l.refresh())).await;
        self.status()
    }

    pub async fn wait_for_cache_writes(&mut self) {
        join_all(self.loaders.iter_mut().map(|l| l.wait_for_cache_write())).await;
    }

    pub fn status(&self) -> BoardStatus {
        let mut status = BoardStatus {
            total_groups: self.groups.len(),
            displayed: self.loaders.len(),
            ..BoardStatus::default()
        };

        for loader in &self.loaders {
            let state = loader.state();
            if !state.is_settled() {
                status.loading += 1;
                continue;
            }
            match state.phase() {
                LoadPhase::Online => status.online += 1,
                LoadPhase::OfflineCached => status.offline_groups.push(loader.group().clone()),
                LoadPhase::Failed => {
                    if let Some(message) = state.error_message() {
                        status.errors.push(message.to_string());
                    }
                }
                LoadPhase::Idle | LoadPhase::Loading => {}
            }
        }
        status
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn loaders(&self) -> &[WordGroupLoader] {
        &self.loaders
    }

    pub fn loader(&self, group: &GroupId) -> Option<&WordGroupLoader> {
        self.loaders.iter().find(|l| l.group() == group)
    }

    pub fn strategy(&self) -> Option<DiscoveryStrategy> {
        self.strategy
    }
}
