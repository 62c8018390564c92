// Config and rule-set endpoints
//
// The rule set lives inside the config aggregate. `POST /api/rules`
// replaces it wholesale and the server normalizes each entry.

use serde_json::json;
use tracing::debug;

use crate::client::ControlClient;
use crate::error::Error;
use crate::models::{ConfigUpdate, ProxyConfig, Rule, RulesReply};

impl ControlClient {
    /// `GET /api/config`
    pub async fn get_config(&self) -> Result<ProxyConfig, Error> {
        let url = self.api_url("config")?;
        self.get(url).await
    }

    /// Apply a partial update. Returns the config the server stored.
    ///
    /// `POST /api/config`
    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<ProxyConfig, Error> {
        let url = self.api_url("config")?;
        debug!(?update, "updating config");
        self.post(url, update).await
    }

    /// `GET /api/rules`
    pub async fn get_rules(&self) -> Result<Vec<Rule>, Error> {
        let url = self.api_url("rules")?;
        self.get(url).await
    }

    /// Replace the whole rule set.
    ///
    /// `POST /api/rules` with `{"rules": [...]}`
    pub async fn replace_rules(&self, rules: &[Rule]) -> Result<RulesReply, Error> {
        let url = self.api_url("rules")?;
        debug!(count = rules.len(), "replacing rule set");
        self.post(url, &json!({ "rules": rules })).await
    }
}
