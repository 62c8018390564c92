// Domain unlock list endpoints
//
// Domains travel as newline-separated text; the server splits, normalizes
// and expands them, then reports the derived `count` on the next GET.

use serde_json::json;
use tracing::debug;

use crate::client::ControlClient;
use crate::error::Error;
use crate::models::{Ack, DomainList};

impl ControlClient {
    /// `GET /api/lists`
    pub async fn list_lists(&self) -> Result<Vec<DomainList>, Error> {
        let url = self.api_url("lists")?;
        self.get(url).await
    }

    /// `POST /api/lists` with `{"name": ..., "domains": "a.com\nb.com"}`
    pub async fn create_list(&self, name: &str, domains: &str) -> Result<Ack, Error> {
        let url = self.api_url("lists")?;
        debug!(name, "creating list");
        self.post(url, &json!({ "name": name, "domains": domains }))
            .await
    }

    /// Replace a list's domains.
    ///
    /// `POST /api/lists/{name}` with `{"domains": "..."}`
    pub async fn edit_list(&self, name: &str, domains: &str) -> Result<Ack, Error> {
        let url = self.api_url_with_segment("lists", name, None)?;
        debug!(name, "editing list");
        self.post(url, &json!({ "domains": domains })).await
    }

    /// `POST /api/lists/{name}/toggle` with `{"enabled": bool}`
    pub async fn toggle_list(&self, name: &str, enabled: bool) -> Result<Ack, Error> {
        let url = self.api_url_with_segment("lists", name, Some("toggle"))?;
        debug!(name, enabled, "toggling list");
        self.post(url, &json!({ "enabled": enabled })).await
    }

    /// `DELETE /api/lists/{name}`
    pub async fn delete_list(&self, name: &str) -> Result<Ack, Error> {
        let url = self.api_url_with_segment("lists", name, None)?;
        debug!(name, "deleting list");
        self.delete(url).await
    }
}
