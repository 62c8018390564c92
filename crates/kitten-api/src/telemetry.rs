// Status, stats, diagnostics and log endpoints
//
// Read-only views of the running engine. `GET /api/stats` answers `{}`
// until the engine has written its first snapshot.

use tracing::debug;

use crate::client::ControlClient;
use crate::error::Error;
use crate::models::{Diagnostics, LogKind, LogLines, ProxyStatus, Stats};

/// Line count the server uses when no `limit` is given.
pub const DEFAULT_LOG_LIMIT: usize = 200;

impl ControlClient {
    /// `GET /api/status`
    pub async fn get_status(&self) -> Result<ProxyStatus, Error> {
        let url = self.api_url("status")?;
        self.get(url).await
    }

    /// Latest stats snapshot, or `None` while the engine has none yet.
    ///
    /// `GET /api/stats`
    pub async fn get_stats(&self) -> Result<Option<Stats>, Error> {
        let url = self.api_url("stats")?;
        let value: serde_json::Value = self.get(url).await?;

        if value.as_object().is_some_and(serde_json::Map::is_empty) {
            debug!("stats not yet available");
            return Ok(None);
        }

        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: value.to_string(),
            })
    }

    /// `GET /api/diagnostics`
    pub async fn get_diagnostics(&self) -> Result<Diagnostics, Error> {
        let url = self.api_url("diagnostics")?;
        self.get(url).await
    }

    /// Tail of the access or error log.
    ///
    /// `GET /api/logs/{kind}?limit=N`. The server answers `403 Forbidden`
    /// to non-local callers; see [`Error::is_forbidden`].
    pub async fn get_logs(&self, kind: LogKind, limit: usize) -> Result<LogLines, Error> {
        let url = self.api_url_with_segment("logs", kind.as_ref(), None)?;
        self.get_with_params(url, &[("limit", limit.to_string())])
            .await
    }
}
