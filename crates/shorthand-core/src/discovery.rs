//! Resolution of the list of available word groups.
//!
//! Strategies are tried in order and the first non-empty answer wins:
//! 1. the `index.json` manifest (order preserved)
//! 2. a bucket listing of `words/` (sorted)
//! 3. concurrent existence probes over a fixed candidate set (sorted)
//!
//! When all three come back empty the result is an empty list, which callers
//! must present as "no groups" rather than as an error.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api::WordSource;
use crate::models::GroupId;

/// Candidate ids tried when neither the manifest nor the listing is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCandidates {
    pub numbered_prefix: String,
    pub numbered_range: RangeInclusive<u32>,
    pub number_width: usize,
    pub named: Vec<String>,
}

impl Default for ProbeCandidates {
    fn default() -> Self {
        Self {
            numbered_prefix: "out_".to_string(),
            numbered_range: 1..=20,
            number_width: 3,
            named: ["core", "basic", "intermediate", "advanced"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ProbeCandidates {
    /// Explicit candidate list, without numbered patterns.
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numbered_prefix: String::new(),
            numbered_range: 1..=0,
            number_width: 0,
            named: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> Vec<GroupId> {
        let numbered = self.numbered_range.clone().map(|n| {
            GroupId::new(format!(
                "{}{:0width$}",
                self.numbered_prefix,
                n,
                width = self.number_width
            ))
        });
        let named = self.named.iter().map(|name| GroupId::new(name.as_str()));

        let mut ids: Vec<GroupId> = numbered.chain(named).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Which strategy produced a discovery result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    Manifest,
    BucketListing,
    Probing,
    Nothing,
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryStrategy::Manifest => write!(f, "manifest"),
            DiscoveryStrategy::BucketListing => write!(f, "bucket listing"),
            DiscoveryStrategy::Probing => write!(f, "probing"),
            DiscoveryStrategy::Nothing => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub groups: Vec<GroupId>,
    pub strategy: DiscoveryStrategy,
}

pub struct GroupDiscovery {
    source: Arc<dyn WordSource>,
    candidates: ProbeCandidates,
}

impl GroupDiscovery {
    pub fn new(source: Arc<dyn WordSource>) -> Self {
        Self::with_candidates(source, ProbeCandidates::default())
    }

    pub fn with_candidates(source: Arc<dyn WordSource>, candidates: ProbeCandidates) -> Self {
        Self { source, candidates }
    }

    /// Resolve the available groups. Never fails; may be empty.
    pub async fn discover(&self) -> Vec<GroupId> {
        self.discover_with_strategy().await.groups
    }

    /// Like `discover`, also reporting which strategy answered.
    pub async fn discover_with_strategy(&self) -> Discovery {
        if let Some(groups) = self.from_manifest().await {
            return Self::found(groups, DiscoveryStrategy::Manifest);
        }
        if let Some(groups) = self.from_bucket_listing().await {
            return Self::found(groups, DiscoveryStrategy::BucketListing);
        }
        if let Some(groups) = self.from_probing().await {
            return Self::found(groups, DiscoveryStrategy::Probing);
        }

        warn!("No word groups found by any discovery strategy");
        Discovery {
            groups: Vec::new(),
            strategy: DiscoveryStrategy::Nothing,
        }
    }

    fn found(groups: Vec<GroupId>, strategy: DiscoveryStrategy) -> Discovery {
        info!(count = groups.len(), strategy = %strategy, "Discovered word groups");
        Discovery { groups, strategy }
    }

    async fn from_manifest(&self) -> Option<Vec<GroupId>> {
        match self.source.fetch_group_index().await {
            Ok(index) if !index.groups.is_empty() => Some(index.groups),
            Ok(_) => {
                debug!("Group index is empty");
                None
            }
            Err(e) => {
                debug!(error = %e, "Group index unavailable");
                None
            }
        }
    }

    async fn from_bucket_listing(&self) -> Option<Vec<GroupId>> {
        let mut groups = self.source.list_groups_via_bucket_listing().await;
        if groups.is_empty() {
            debug!("Bucket listing returned no groups");
            return None;
        }
        groups.sort();
        Some(groups)
    }

    async fn from_probing(&self) -> Option<Vec<GroupId>> {
        let candidates = self.candidates.ids();
        debug!(candidates = candidates.len(), "Probing candidate groups");

        let probes = candidates.into_iter().map(|group| {
            let source = Arc::clone(&self.source);
            async move {
                let exists = source.probe_group(&group).await;
                exists.then_some(group)
            }
        });

        let mut groups: Vec<GroupId> = join_all(probes).await.into_iter().flatten().collect();
        if groups.is_empty() {
            return None;
        }
        groups.sort();
        Some(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use crate::models::GroupIndex;
    use std::sync::atomic::Ordering;

    fn ids(items: &[&str]) -> Vec<GroupId> {
        items.iter().map(|s| GroupId::from(*s)).collect()
    }

    async fn set_index(source: &FakeSource, groups: &[&str]) {
        *source.index.lock().await = Some(GroupIndex {
            groups: ids(groups),
            last_updated: None,
            description: None,
        });
    }

    fn discovery(source: &Arc<FakeSource>, candidates: ProbeCandidates) -> GroupDiscovery {
        let source: Arc<dyn WordSource> = source.clone();
        GroupDiscovery::with_candidates(source, candidates)
    }

    #[test]
    fn test_default_candidates() {
        let ids = ProbeCandidates::default().ids();
        assert_eq!(ids.len(), 24);
        assert!(ids.contains(&GroupId::from("out_001")));
        assert!(ids.contains(&GroupId::from("out_020")));
        assert!(!ids.contains(&GroupId::from("out_021")));
        assert!(ids.contains(&GroupId::from("basic")));
    }

    #[test]
    fn test_named_candidates_only() {
        let ids = ProbeCandidates::named(["b", "a", "b"]).ids();
        assert_eq!(ids, vec![GroupId::from("a"), GroupId::from("b")]);
    }

    #[tokio::test]
    async fn test_manifest_short_circuits() {
        let source = Arc::new(FakeSource::default());
        set_index(&source, &["b", "a"]).await;
        *source.listing.lock().await = ids(&["x", "y"]);
        source.existing.lock().await.insert(GroupId::from("out_001"));

        let result = discovery(&source, ProbeCandidates::default())
            .discover_with_strategy()
            .await;
        // Manifest order is kept verbatim
        assert_eq!(result.groups, ids(&["b", "a"]));
        assert_eq!(result.strategy, DiscoveryStrategy::Manifest);
        assert_eq!(source.listing_calls.load(Ordering::SeqCst), 0);
        assert_eq!(source.probe_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bucket_listing_when_manifest_missing() {
        let source = Arc::new(FakeSource::default());
        *source.listing.lock().await = ids(&["y", "x"]);
        source.existing.lock().await.insert(GroupId::from("out_001"));

        let result = discovery(&source, ProbeCandidates::default())
            .discover_with_strategy()
            .await;
        assert_eq!(result.groups, ids(&["x", "y"]));
        assert_eq!(result.strategy, DiscoveryStrategy::BucketListing);
        assert_eq!(source.probe_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_manifest_falls_through() {
        let source = Arc::new(FakeSource::default());
        set_index(&source, &[]).await;
        *source.listing.lock().await = ids(&["x"]);

        let groups = discovery(&source, ProbeCandidates::default()).discover().await;
        assert_eq!(groups, ids(&["x"]));
    }

    #[tokio::test]
    async fn test_probing_keeps_responding_candidates_sorted() {
        let source = Arc::new(FakeSource::default());
        {
            let mut existing = source.existing.lock().await;
            existing.insert(GroupId::from("out_003"));
            existing.insert(GroupId::from("out_001"));
        }

        let candidates = ProbeCandidates::named(["out_001", "out_002", "out_003"]);
        let result = discovery(&source, candidates).discover_with_strategy().await;
        assert_eq!(result.groups, ids(&["out_001", "out_003"]));
        assert_eq!(result.strategy, DiscoveryStrategy::Probing);
        assert_eq!(source.probe_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let source = Arc::new(FakeSource::default());
        source.existing.lock().await.insert(GroupId::from("out_020"));

        let groups = discovery(&source, ProbeCandidates::default()).discover().await;
        assert_eq!(groups, ids(&["out_020"]));
        assert_eq!(source.probe_calls.load(Ordering::SeqCst), 24);
        assert_eq!(source.max_probes_in_flight.load(Ordering::SeqCst), 24);
    }

    #[tokio::test]
    async fn test_nothing_found_is_empty_not_error() {
        let source = Arc::new(FakeSource::default());
        source.set_offline(true);

        let result = discovery(&source, ProbeCandidates::default())
            .discover_with_strategy()
            .await;
        assert!(result.groups.is_empty());
        assert_eq!(result.strategy, DiscoveryStrategy::Nothing);
    }
}
