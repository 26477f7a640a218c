use async_trait::async_trait;

use super::ApiError;
use crate::models::{GroupId, GroupIndex, WordGroupDocument};

/// Remote backing store for word groups.
///
/// `CloudClient` talks to the object store over HTTP; tests substitute an
/// in-memory implementation. Implementations hold no per-group state.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Fetch and decode one group's document.
    async fn fetch_group_document(&self, group: &GroupId) -> Result<WordGroupDocument, ApiError>;

    /// Fetch and decode the `index.json` manifest.
    async fn fetch_group_index(&self) -> Result<GroupIndex, ApiError>;

    /// Group ids found by listing the bucket, sorted. Empty on any failure.
    async fn list_groups_via_bucket_listing(&self) -> Vec<GroupId>;

    /// Lightweight existence check for a group document.
    async fn probe_group(&self, group: &GroupId) -> bool;

    /// URL of the group's mind-map image. Pure, no I/O.
    fn image_url(&self, group: &GroupId) -> String;
}
