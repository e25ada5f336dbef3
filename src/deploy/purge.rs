//! Cloudflare cache purge.
//!
//! A single "purge everything" call against the zone's `purge_cache`
//! endpoint, authenticated with the legacy `X-Auth-Email`/`X-Auth-Key`
//! header pair. The orchestrator treats every error here as a warning.

use super::config::CdnCredentials;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Error, Debug)]
pub enum PurgeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// The part of Cloudflare's response envelope we look at.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PurgeResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl PurgeResponse {
    /// Parse a raw response body. Anything without a boolean `success`
    /// field is a decode error.
    pub fn parse(body: &str) -> Result<Self, PurgeError> {
        serde_json::from_str(body).map_err(|e| PurgeError::Decode(format!("{e}: {body}")))
    }
}

/// Something that can invalidate a CDN zone.
pub trait CachePurger {
    fn purge_everything(&self, credentials: &CdnCredentials) -> Result<PurgeResponse, PurgeError>;
}

/// Blocking HTTP client for the Cloudflare API. The underlying client is
/// only built when a purge actually runs.
pub struct CloudflarePurger {
    api_base: String,
}

impl CloudflarePurger {
    pub fn new() -> Self {
        Self::with_api_base(CLOUDFLARE_API_BASE)
    }

    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    pub fn endpoint(&self, zone_id: &str) -> String {
        format!(
            "{}/zones/{}/purge_cache",
            self.api_base.trim_end_matches('/'),
            zone_id
        )
    }
}

impl Default for CloudflarePurger {
    fn default() -> Self {
        Self::new()
    }
}

impl CachePurger for CloudflarePurger {
    fn purge_everything(&self, credentials: &CdnCredentials) -> Result<PurgeResponse, PurgeError> {
        let url = self.endpoint(&credentials.zone_id);
        tracing::debug!(%url, "purging CDN cache");
        // Cloudflare reports failures in the JSON envelope, often with a
        // non-2xx status, so the body is decoded regardless of status.
        let body = reqwest::blocking::Client::builder()
            .build()?
            .post(&url)
            .header("X-Auth-Email", &credentials.email)
            .header("X-Auth-Key", &credentials.api_key)
            .json(&json!({ "purge_everything": true }))
            .send()?
            .text()?;
        PurgeResponse::parse(&body)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Purger returning a canned result and counting calls.
    pub struct MockPurger {
        pub calls: Mutex<Vec<String>>,
        result: fn() -> Result<PurgeResponse, PurgeError>,
    }

    impl MockPurger {
        pub fn succeeding() -> Self {
            Self::with_result(|| {
                Ok(PurgeResponse {
                    success: true,
                    errors: vec![],
                })
            })
        }

        pub fn rejecting() -> Self {
            Self::with_result(|| PurgeResponse::parse(r#"{"success":false,"errors":[{"code":10000,"message":"Authentication error"}]}"#))
        }

        pub fn broken() -> Self {
            Self::with_result(|| PurgeResponse::parse("<html>502 Bad Gateway</html>"))
        }

        fn with_result(result: fn() -> Result<PurgeResponse, PurgeError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                result,
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CachePurger for MockPurger {
        fn purge_everything(
            &self,
            credentials: &CdnCredentials,
        ) -> Result<PurgeResponse, PurgeError> {
            self.calls
                .lock()
                .unwrap()
                .push(credentials.zone_id.clone());
            (self.result)()
        }
    }

    #[test]
    fn endpoint_is_zone_scoped() {
        let purger = CloudflarePurger::with_api_base("https://api.example.test/v4/");
        assert_eq!(
            purger.endpoint("abc123"),
            "https://api.example.test/v4/zones/abc123/purge_cache"
        );
        assert_eq!(
            CloudflarePurger::new().endpoint("z"),
            "https://api.cloudflare.com/client/v4/zones/z/purge_cache"
        );
    }

    #[test]
    fn parse_success_envelope() {
        let response =
            PurgeResponse::parse(r#"{"success":true,"errors":[],"messages":[],"result":{"id":"z"}}"#)
                .unwrap();
        assert!(response.success);
    }

    #[test]
    fn parse_failure_envelope_keeps_errors() {
        let response = PurgeResponse::parse(
            r#"{"success":false,"errors":[{"code":9109,"message":"Invalid access token"}]}"#,
        )
        .unwrap();
        assert!(!response.success);
        assert_eq!(response.errors.len(), 1);
    }

    #[test]
    fn parse_non_json_is_decode_error() {
        let err = PurgeResponse::parse("Bad Gateway").unwrap_err();
        assert!(matches!(err, PurgeError::Decode(_)));
        assert!(err.to_string().contains("Bad Gateway"));
    }
}
