// Proxy lifecycle and host file-manager endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ControlClient;
use crate::error::Error;
use crate::models::{Ack, ProxyStatus};

impl ControlClient {
    /// `POST /api/proxy/start`
    pub async fn start_proxy(&self) -> Result<ProxyStatus, Error> {
        let url = self.api_url("proxy/start")?;
        debug!("starting proxy engine");
        self.post(url, &json!({})).await
    }

    /// `POST /api/proxy/stop`
    pub async fn stop_proxy(&self) -> Result<ProxyStatus, Error> {
        let url = self.api_url("proxy/stop")?;
        debug!("stopping proxy engine");
        self.post(url, &json!({})).await
    }

    /// Reveal the unlock-list folder in the host file manager.
    ///
    /// `POST /api/open/unlocked`
    pub async fn open_unlocked(&self) -> Result<Ack, Error> {
        let url = self.api_url("open/unlocked")?;
        self.post(url, &json!({})).await
    }

    /// Reveal the generated blacklist in the host file manager.
    ///
    /// `POST /api/open/blacklist`
    pub async fn open_blacklist(&self) -> Result<Ack, Error> {
        let url = self.api_url("open/blacklist")?;
        self.post(url, &json!({})).await
    }
}
