// Control-plane HTTP client
//
// Wraps `reqwest::Client` with base-URL joining and a single response
// normalizer: every non-2xx answer becomes `Error::Request` carrying the
// body text. Endpoint groups (config, lists, telemetry, proxy) live in
// sibling modules as inherent methods so this file stays about transport.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Async client for the proxy engine's REST control plane.
///
/// One request per call. No retries, no caching.
#[derive(Debug, Clone)]
pub struct ControlClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ControlClient {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:9797`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // Joining relative paths requires a trailing slash on the base.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `api/{path}` relative to the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    /// `api/{prefix}/{segment}[/{suffix}]` with `segment` percent-encoded.
    pub(crate) fn api_url_with_segment(
        &self,
        prefix: &str,
        segment: &str,
        suffix: Option<&str>,
    ) -> Result<Url, Error> {
        let mut url = self.api_url(prefix)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty().push(segment);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");
        let resp = self.http.get(url).query(params).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");
        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        handle_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        trace!(status = status.as_u16(), body = %body, "request rejected");
        return Err(Error::Request {
            status: status.as_u16(),
            body: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ControlClient {
        ControlClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_joins_under_base() {
        let c = client("http://127.0.0.1:9797");
        assert_eq!(
            c.api_url("config").unwrap().as_str(),
            "http://127.0.0.1:9797/api/config"
        );
    }

    #[test]
    fn api_url_keeps_base_prefix() {
        let c = client("http://localhost:9797/console");
        assert_eq!(
            c.api_url("lists").unwrap().as_str(),
            "http://localhost:9797/console/api/lists"
        );
    }

    #[test]
    fn segment_is_percent_encoded() {
        let c = client("http://127.0.0.1:9797/");
        let url = c
            .api_url_with_segment("lists", "my list", Some("toggle"))
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9797/api/lists/my%20list/toggle");
    }
}
