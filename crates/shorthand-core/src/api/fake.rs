use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ApiError, WordSource};
use crate::models::{GroupId, GroupIndex, WordGroupDocument};

/// In-memory `WordSource` with call counters.
pub struct FakeSource {
    pub documents: Mutex<HashMap<GroupId, WordGroupDocument>>,
    pub index: Mutex<Option<GroupIndex>>,
    pub listing: Mutex<Vec<GroupId>>,
    pub existing: Mutex<HashSet<GroupId>>,
    pub offline: AtomicBool,
    pub malformed: AtomicBool,
    pub fetch_delay_ms: AtomicU64,
    pub probe_delay: Duration,
    pub document_calls: AtomicUsize,
    pub listing_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
    probes_in_flight: AtomicUsize,
    pub max_probes_in_flight: AtomicUsize,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            index: Mutex::new(None),
            listing: Mutex::new(Vec::new()),
            existing: Mutex::new(HashSet::new()),
            offline: AtomicBool::new(false),
            malformed: AtomicBool::new(false),
            fetch_delay_ms: AtomicU64::new(0),
            probe_delay: Duration::from_millis(5),
            document_calls: AtomicUsize::new(0),
            listing_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
            probes_in_flight: AtomicUsize::new(0),
            max_probes_in_flight: AtomicUsize::new(0),
        }
    }
}

impl FakeSource {
    pub async fn publish(&self, group: &str, document: WordGroupDocument) {
        self.documents
            .lock()
            .await
            .insert(GroupId::from(group), document);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Serve documents that fail to decode, as a half-published upload would.
    pub fn set_malformed(&self, malformed: bool) {
        self.malformed.store(malformed, Ordering::SeqCst);
    }
}

#[async_trait]
impl WordSource for FakeSource {
    async fn fetch_group_document(&self, group: &GroupId) -> Result<WordGroupDocument, ApiError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if !group.is_path_safe() {
            return Err(ApiError::InvalidRequest(group.to_string()));
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::BadStatus(503));
        }
        if self.malformed.load(Ordering::SeqCst) {
            return Err(ApiError::Decode("missing field `all_words`".to_string()));
        }
        self.documents
            .lock()
            .await
            .get(group)
            .cloned()
            .ok_or(ApiError::BadStatus(404))
    }

    async fn fetch_group_index(&self) -> Result<GroupIndex, ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::BadStatus(503));
        }
        self.index
            .lock()
            .await
            .clone()
            .ok_or(ApiError::BadStatus(404))
    }

    async fn list_groups_via_bucket_listing(&self) -> Vec<GroupId> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Vec::new();
        }
        self.listing.lock().await.clone()
    }

    async fn probe_group(&self, group: &GroupId) -> bool {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.probes_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_probes_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        tokio::time::sleep(self.probe_delay).await;
        self.probes_in_flight.fetch_sub(1, Ordering::SeqCst);

        !self.offline.load(Ordering::SeqCst) && self.existing.lock().await.contains(group)
    }

    fn image_url(&self, group: &GroupId) -> String {
        format!("memory://image/{}.png", group)
    }
}
