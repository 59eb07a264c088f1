//! HTTP data source for a Lightning HPO app server.
//!
//! Each endpoint is a plain `GET {base}/api/{path}` returning a JSON array
//! of configuration objects.  The response body is parsed by the pure
//! [`HttpSource::parse_body`] so tests can exercise it without a server.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{DataSource, EndpointKey, Item};

/// Fetches endpoint collections from the app server's REST API.
///
/// Cloning is cheap; the underlying [`reqwest::Client`] shares its
/// connection pool between clones.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source rooted at `base_url` (e.g. `http://127.0.0.1:7501`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint.
    pub fn endpoint_url(&self, key: EndpointKey) -> String {
        format!("{}/api/{}", self.base_url, key.path())
    }

    /// Parse a response body into items.
    ///
    /// The body must be a JSON array; anything else is an error so that a
    /// misrouted request (an HTML error page, a single object) never
    /// replaces a good snapshot.
    pub fn parse_body(body: &[u8]) -> Result<Vec<Item>> {
        let value: Value = serde_json::from_slice(body).context("response is not valid JSON")?;
        if !value.is_array() {
            bail!("expected a JSON array, got {}", kind_of(&value));
        }
        Ok(serde_json::from_value::<Vec<Item>>(value)?)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, key: EndpointKey) -> Result<Vec<Item>> {
        let url = self.endpoint_url(key);
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .bytes()
            .await?;
        Self::parse_body(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(base: &str) -> HttpSource {
        HttpSource::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_url_joins_path() {
        let src = source("http://127.0.0.1:7501");
        assert_eq!(
            src.endpoint_url(EndpointKey::Sweeps),
            "http://127.0.0.1:7501/api/sweeps"
        );
        assert_eq!(
            src.endpoint_url(EndpointKey::Data),
            "http://127.0.0.1:7501/api/data"
        );
    }

    #[test]
    fn endpoint_url_trims_trailing_slash() {
        let src = source("http://app.local/");
        assert_eq!(
            src.endpoint_url(EndpointKey::Tensorboards),
            "http://app.local/api/tensorboards"
        );
    }

    #[test]
    fn parse_body_keeps_order() {
        let body = br#"[
            {"sweep_id": "a", "stage": "running"},
            {"sweep_id": "b", "stage": "succeeded"}
        ]"#;

        let items = HttpSource::parse_body(body).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].value(), &json!({"sweep_id": "a", "stage": "running"}));
        assert_eq!(items[1].id().as_deref(), Some("b"));
    }

    #[test]
    fn parse_body_keeps_non_object_elements() {
        let items = HttpSource::parse_body(br#"[1, "two", null]"#).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[1].value(), &json!("two"));
        assert_eq!(items[2].id(), None);
    }

    #[test]
    fn parse_body_accepts_empty_array() {
        assert!(HttpSource::parse_body(b"[]").unwrap().is_empty());
    }

    #[test]
    fn parse_body_rejects_object() {
        let err = HttpSource::parse_body(br#"{"detail": "Not Found"}"#).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn parse_body_rejects_html() {
        assert!(HttpSource::parse_body(b"<html>502 Bad Gateway</html>").is_err());
    }
}
