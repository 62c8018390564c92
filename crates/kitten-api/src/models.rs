// Wire types for the control-plane REST API.
//
// Field names follow the JSON the proxy engine emits. Everything the server
// may omit carries `#[serde(default)]` so an older engine still decodes.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Enums ────────────────────────────────────────────────────────────

/// How outgoing TLS records are split.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
    Display, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FragmentMethod {
    #[default]
    Random,
    Sni,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
    Display, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DomainMatching {
    #[default]
    Strict,
    Loose,
}

/// What the engine does with a connection whose host matches a rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
    Display, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleAction {
    /// Fragment only when the host is on the blacklist.
    #[default]
    Auto,
    /// Always fragment.
    Force,
    /// Never fragment.
    Bypass,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogKind {
    Access,
    Error,
}

// ── Config ───────────────────────────────────────────────────────────

/// Full proxy configuration as returned by `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// `"auto"` or a locale code such as `"en"`.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub selected_lists: Vec<String>,
    #[serde(default)]
    pub custom_domains: Vec<String>,
    #[serde(default)]
    pub fragment_method: FragmentMethod,
    #[serde(default)]
    pub domain_matching: DomainMatching,
    /// Engine operating mode. Opaque to the console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub auto_blacklist: bool,
    #[serde(default)]
    pub no_blacklist: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

fn default_language() -> String {
    "en".into()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8881,
            language: default_language(),
            selected_lists: Vec::new(),
            custom_domains: Vec::new(),
            fragment_method: FragmentMethod::default(),
            domain_matching: DomainMatching::default(),
            mode: None,
            auto_blacklist: false,
            no_blacklist: false,
            rules: Vec::new(),
        }
    }
}

/// Partial update body for `POST /api/config`. Unset fields are left alone
/// by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment_method: Option<FragmentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_matching: Option<DomainMatching>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_blacklist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_blacklist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
}

// ── Rules ────────────────────────────────────────────────────────────

/// Per-domain fragmentation rule. Order matters to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: String,
    #[serde(default)]
    pub action: RuleAction,
    /// `None` means "use the configured default".
    #[serde(default)]
    pub fragment_method: Option<FragmentMethod>,
}

/// Reply to `POST /api/rules`.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesReply {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

// ── Lists ────────────────────────────────────────────────────────────

/// A named domain unlock list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainList {
    pub name: String,
    #[serde(default)]
    pub domains: Vec<String>,
    /// Server-derived domain count.
    pub count: usize,
    pub enabled: bool,
}

/// `{ "ok": true }` acknowledgement returned by fire-and-confirm endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

// ── Status / telemetry ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyStatus {
    pub running: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub pid: Option<u32>,
}

/// One `GET /api/stats` snapshot. Counters are totals, not deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub fragment_method: Option<String>,
    #[serde(default)]
    pub total_connections: u64,
    #[serde(default)]
    pub allowed_connections: u64,
    #[serde(default)]
    pub blocked_connections: u64,
    #[serde(default)]
    pub error_connections: u64,
    /// Percentage, 0-100.
    #[serde(default)]
    pub efficiency: f64,
    /// Download, bits per second.
    #[serde(default)]
    pub speed_in_bps: f64,
    /// Upload, bits per second.
    #[serde(default)]
    pub speed_out_bps: f64,
    #[serde(default)]
    pub traffic_in: u64,
    #[serde(default)]
    pub traffic_out: u64,
    #[serde(default)]
    pub avg_speed_in_bps: f64,
    #[serde(default)]
    pub avg_speed_out_bps: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub config_valid: bool,
    #[serde(default)]
    pub port_available: bool,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub port_open: bool,
    #[serde(default)]
    pub stats_age_sec: Option<f64>,
    #[serde(default)]
    pub blacklist_entries: u64,
    #[serde(default)]
    pub list_files: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogLines {
    #[serde(default)]
    pub lines: Vec<String>,
}
