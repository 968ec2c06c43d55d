//! HTTP transport seam.
//!
//! Providers never talk to `reqwest` directly; they go through [`Transport`]
//! so that status handling stays per-endpoint and tests can script replies.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// Query parameters in send order. Keys may repeat (`class[]`).
pub type Query = Vec<(String, String)>;

/// A completed HTTP exchange. Non-2xx statuses are replies, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl Reply {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is empty or only whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Opaque request/response function used by every provider.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when no reply could be obtained.
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: &[(&str, &str)],
    ) -> Result<Reply>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_timeout(config.http_timeout(), &config.http.user_agent)
    }

    /// Build a client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::transport("<client>", e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        headers: &[(&str, &str)],
    ) -> Result<Reply> {
        debug!(url, params = query.len(), "GET");

        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url, error = %e, "Request failed");
            Error::transport(url, e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(url, format!("reading body: {e}")))?;

        debug!(url, status, bytes = body.len(), "Response received");
        Ok(Reply {
            status,
            body: body.to_vec(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedTransport;
    use super::*;

    #[test]
    fn test_reply_status_classes() {
        let ok = Reply {
            status: 200,
            body: b"{}".to_vec(),
        };
        assert!(ok.is_success());
        assert!(!ok.is_empty());

        let missing = Reply {
            status: 404,
            body: Vec::new(),
        };
        assert!(!missing.is_success());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_whitespace_body_is_empty() {
        let reply = Reply {
            status: 200,
            body: b" \n".to_vec(),
        };
        assert!(reply.is_empty());
    }

    #[test]
    fn test_reply_json() {
        let reply = Reply {
            status: 200,
            body: br#"{"a": 1}"#.to_vec(),
        };
        assert_eq!(reply.json().unwrap()["a"], 1);

        let bad = Reply {
            status: 200,
            body: b"<html>".to_vec(),
        };
        assert!(bad.json().unwrap_err().is_decode());
    }

    #[test]
    fn test_http_transport_builds_from_config() {
        assert!(HttpTransport::new(&Config::default()).is_ok());

        let mut config = Config::default();
        config.http.timeout_secs = 5;
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_scripted_transport_records_and_replies() {
        let transport = ScriptedTransport::new()
            .reply_json("http://feed/live", 200, &serde_json::json!([{}]))
            .fail("http://feed/down");

        let query = vec![("fn".to_string(), "DL933".to_string())];
        let reply = transport
            .get("http://feed/live", &query, &[("Origin", "x")])
            .await
            .unwrap();
        assert_eq!(reply.status, 200);

        let err = transport.get("http://feed/down", &[], &[]).await.unwrap_err();
        assert!(err.is_transport());

        let unscripted = transport.get("http://feed/other", &[], &[]).await.unwrap();
        assert_eq!(unscripted.status, 404);

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].param("fn"), Some("DL933"));
        assert_eq!(calls[0].headers[0].0, "Origin");
    }
}
