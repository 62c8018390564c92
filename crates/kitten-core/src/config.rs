// ── Runtime console configuration ──
//
// Describes which control plane to talk to and how the synchronizer paces
// itself. Never touches disk; `kitten-config` builds one from the config
// file and hands it in.

use std::time::Duration;

use url::Url;

use crate::telemetry::DEFAULT_HISTORY_CAPACITY;

/// Address of the control plane when nothing else is configured.
pub const DEFAULT_CONTROL_URL: &str = "http://127.0.0.1:9797";

/// Stats poll period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the control plane.
    pub control_url: Url,
    /// Period of the background stats/status poll.
    pub poll_interval: Duration,
    /// Samples kept for the traffic graph.
    pub history_capacity: usize,
    /// Lines requested from the log endpoints.
    pub log_limit: usize,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ConsoleConfig {
    pub fn new(control_url: Url) -> Self {
        Self {
            control_url,
            poll_interval: DEFAULT_POLL_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            log_limit: kitten_api::DEFAULT_LOG_LIMIT,
            timeout: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults() {
        let cfg = ConsoleConfig::new(Url::parse(DEFAULT_CONTROL_URL).unwrap());
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.history_capacity, 60);
        assert_eq!(cfg.log_limit, 200);
        assert!(cfg.timeout.is_none());
    }
}
