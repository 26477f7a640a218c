use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    BadStatus(u16),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError::BadStatus(status.as_u16())
    }

    /// Whether a cached copy should be tried instead.
    ///
    /// Only malformed requests are not recoverable; the same request would fail
    /// for any source.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ApiError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");
        let long = "x".repeat(600);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "词".repeat(200);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated, 600 total bytes"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ApiError::BadStatus(404).to_string(), "HTTP error: 404");
        assert_eq!(
            ApiError::Decode("missing field `metadata`".to_string()).to_string(),
            "Failed to decode response: missing field `metadata`"
        );
        assert!(!ApiError::InvalidRequest("bad".to_string()).is_recoverable());
        assert!(ApiError::BadStatus(500).is_recoverable());
    }
}
