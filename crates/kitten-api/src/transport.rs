// Transport configuration for building the control-plane reqwest::Client.
//
// The control plane is a loopback service, so there is no TLS or cookie
// handling here. Requests carry no timeout unless one is configured.

use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("kitten/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. `None` lets a request wait for the server.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeout() {
        let cfg = TransportConfig::default();
        assert!(cfg.timeout.is_none());
        assert!(cfg.user_agent.starts_with("kitten/"));
    }

    #[test]
    fn builds_with_and_without_timeout() {
        assert!(TransportConfig::default().build_client().is_ok());
        let cfg = TransportConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert!(cfg.build_client().is_ok());
    }
}
