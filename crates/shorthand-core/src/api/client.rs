//! HTTP client for the object-storage bucket that hosts the word groups.
//!
//! Bucket layout:
//! - `index.json`: manifest of published groups
//! - `words/<group>.json`: one document per group
//! - `image/<group>.png`: mind-map image per group
//! - `?list-type=2&prefix=words/&delimiter=/`: bucket listing (XML, paged by
//!   `continuation-token`)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::listing::{parse_listing_page, WORDS_PREFIX, WORDS_SUFFIX};
use super::{ApiError, WordSource};
use crate::models::{GroupId, GroupIndex, WordGroupDocument};

// ============================================================================
// Constants
// ============================================================================

/// Public endpoint of the bucket that publishes the word groups.
pub const DEFAULT_BASE_URL: &str = "https://shorthand-words-data.oss-cn-hangzhou.aliyuncs.com";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 500;

/// Upper bound on listing pages followed through continuation tokens.
const MAX_LISTING_PAGES: usize = 50;

const INDEX_FILE: &str = "index.json";
const IMAGE_DIR: &str = "image";
const IMAGE_SUFFIX: &str = ".png";

/// Client for the word-group bucket.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct CloudClient {
    client: Client,
    base_url: String,
}

impl CloudClient {
    /// Create a client for `base_url` with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse_url(raw: &str) -> Result<Url, ApiError> {
        Url::parse(raw).map_err(|e| ApiError::InvalidRequest(format!("{}: {}", raw, e)))
    }

    fn document_url(&self, group: &GroupId) -> Result<Url, ApiError> {
        if !group.is_path_safe() {
            return Err(ApiError::InvalidRequest(format!(
                "group id {:?} cannot be used in an object path",
                group.as_str()
            )));
        }
        Self::parse_url(&format!(
            "{}/{}{}{}",
            self.base_url, WORDS_PREFIX, group, WORDS_SUFFIX
        ))
    }

    fn index_url(&self) -> Result<Url, ApiError> {
        Self::parse_url(&format!("{}/{}", self.base_url, INDEX_FILE))
    }

    fn listing_url(&self, continuation_token: Option<&str>) -> Result<Url, ApiError> {
        let mut url = Self::parse_url(&format!(
            "{}?list-type=2&prefix={}&delimiter=/",
            self.base_url, WORDS_PREFIX
        ))?;
        if let Some(token) = continuation_token {
            url.query_pairs_mut().append_pair("continuation-token", token);
        }
        Ok(url)
    }

    /// Body of one listing page, or `None` if it could not be fetched.
    async fn fetch_listing_page(&self, continuation_token: Option<&str>) -> Option<String> {
        let url = match self.listing_url(continuation_token) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Cannot build bucket listing URL");
                return None;
            }
        };
        match self.send_get(&url).await {
            Ok(response) => match response.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    debug!(error = %e, "Failed to read bucket listing body");
                    None
                }
            },
            Err(e) => {
                debug!(error = %e, "Bucket listing unavailable");
                None
            }
        }
    }

    /// GET `url`, retrying on 429. Anything other than 200 is an error.
    async fn send_get(&self, url: &Url) -> Result<Response, ApiError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == StatusCode::OK {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RATE_LIMIT_RETRIES {
                retries += 1;
                warn!(
                    url = %url,
                    retry = retries,
                    backoff_ms = backoff_ms,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            debug!(
                url = %url,
                status = status.as_u16(),
                body = %ApiError::truncate_body(&body),
                "Unexpected response status"
            );
            return Err(ApiError::from_status(status));
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        let response = self.send_get(url).await?;
        let bytes = response.bytes().await?;
        debug!(url = %url, bytes = bytes.len(), "Response received");

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Whether the manifest endpoint currently answers 200.
    pub async fn check_connection(&self) -> bool {
        let url = match self.index_url() {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.client.get(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "Connectivity check failed");
                false
            }
        }
    }
}

#[async_trait]
impl WordSource for CloudClient {
    async fn fetch_group_document(&self, group: &GroupId) -> Result<WordGroupDocument, ApiError> {
        let url = self.document_url(group)?;
        info!(group = %group, url = %url, "Fetching group document");

        let document: WordGroupDocument = self.get_json(&url).await?;
        debug!(group = %group, words = document.all_words.len(), "Group document decoded");
        Ok(document)
    }

    async fn fetch_group_index(&self) -> Result<GroupIndex, ApiError> {
        let url = self.index_url()?;
        debug!(url = %url, "Fetching group index");
        self.get_json(&url).await
    }

    async fn list_groups_via_bucket_listing(&self) -> Vec<GroupId> {
        let mut groups = Vec::new();
        let mut token: Option<String> = None;

        for page in 1..=MAX_LISTING_PAGES {
            let Some(body) = self.fetch_listing_page(token.as_deref()).await else {
                if page > 1 {
                    warn!(page = page, "Bucket listing page failed, keeping earlier pages");
                }
                break;
            };
            let listing = parse_listing_page(&body);
            debug!(page = page, count = listing.groups.len(), "Parsed bucket listing page");
            groups.extend(listing.groups);

            token = listing.next_token;
            if token.is_none() {
                break;
            }
            if page == MAX_LISTING_PAGES {
                warn!(pages = page, "Bucket listing still truncated, stopping");
            }
        }

        groups.sort();
        groups.dedup();
        groups
    }

    async fn probe_group(&self, group: &GroupId) -> bool {
        let url = match self.document_url(group) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.client.head(url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                debug!(group = %group, error = %e, "Probe failed");
                false
            }
        }
    }

    fn image_url(&self, group: &GroupId) -> String {
        format!("{}/{}/{}{}", self.base_url, IMAGE_DIR, group, IMAGE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CloudClient {
        CloudClient::new("https://bucket.example.com/").expect("client")
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "https://bucket.example.com");
    }

    #[test]
    fn test_document_url() {
        let url = client()
            .document_url(&GroupId::from("out_001"))
            .expect("document url");
        assert_eq!(url.as_str(), "https://bucket.example.com/words/out_001.json");
    }

    #[test]
    fn test_document_url_rejects_unsafe_group() {
        let err = client()
            .document_url(&GroupId::from("../secret"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_invalid_base_url_is_invalid_request() {
        let client = CloudClient::new("not a url").expect("client");
        assert!(matches!(client.index_url(), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_listing_url() {
        let url = client().listing_url(None).expect("listing url");
        assert_eq!(url.path(), "/");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("list-type".to_string(), "2".to_string())));
        assert!(query.contains(&("prefix".to_string(), "words/".to_string())));
        assert!(query.contains(&("delimiter".to_string(), "/".to_string())));
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            client().image_url(&GroupId::from("out_007")),
            "https://bucket.example.com/image/out_007.png"
        );
    }
}
