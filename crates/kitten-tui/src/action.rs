//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::sync::Arc;

use kitten_core::{
    BootstrapReport, Command, Diagnostics, DomainList, LogKind, LogView, ProxyConfig,
    ProxyStatus, Rule, Stats, TelemetryRing,
};

use crate::host::HostAction;
use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Outcome of the startup fetch sequence, reduced to what the UI shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapSummary {
    /// One line per aggregate that could not be fetched.
    pub failures: Vec<String>,
    pub stats_available: bool,
}

impl From<&BootstrapReport> for BootstrapSummary {
    fn from(report: &BootstrapReport) -> Self {
        Self {
            failures: report
                .failures
                .iter()
                .map(|(aggregate, err)| format!("{aggregate}: {err}"))
                .collect(),
            stats_available: report.stats_available,
        }
    }
}

/// Pending confirmation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    RemoveList { name: String },
    /// `index` is where the rule was shown when the operator chose it.
    RemoveRule { index: usize, rule: Rule },
    StopProxy,
}

impl ConfirmAction {
    /// Command to run once the operator confirms.
    pub fn into_command(self) -> Command {
        match self {
            Self::RemoveList { name } => Command::RemoveList { name },
            Self::RemoveRule { index, rule } => Command::RemoveRule { index, rule },
            Self::StopProxy => Command::StopProxy,
        }
    }
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoveList { name } => write!(f, "Delete list {name}?"),
            Self::RemoveRule { rule, .. } => write!(f, "Delete rule {}?", rule.pattern),
            Self::StopProxy => write!(f, "Stop the proxy engine?"),
        }
    }
}

/// Screen whose panel shows the result of a command.
pub fn origin_screen(cmd: &Command) -> ScreenId {
    match cmd {
        Command::ToggleList { .. }
        | Command::CreateList { .. }
        | Command::EditList { .. }
        | Command::RemoveList { .. }
        | Command::OpenUnlocked => ScreenId::Lists,
        Command::AddRule(_) | Command::RemoveRule { .. } => ScreenId::Rules,
        Command::SaveSettings(_)
        | Command::SaveConnection { .. }
        | Command::SaveLanguage(_)
        | Command::SaveCustomDomains(_)
        | Command::OpenBlacklist => ScreenId::Settings,
        Command::StartProxy | Command::StopProxy => ScreenId::Dashboard,
    }
}

/// Toast text after a command succeeds.
pub fn success_message(cmd: &Command) -> String {
    match cmd {
        Command::ToggleList { name, enabled: true } => format!("Enabled {name}"),
        Command::ToggleList { name, enabled: false } => format!("Disabled {name}"),
        Command::CreateList { name, .. } => format!("Created list {name}"),
        Command::EditList { name, .. } => format!("Saved list {name}"),
        Command::RemoveList { name } => format!("Deleted list {name}"),
        Command::SaveSettings(_) => "Advanced settings saved".into(),
        Command::SaveConnection { host, port } => format!("Listening on {host}:{port}"),
        Command::SaveLanguage(lang) => format!("Language set to {lang}"),
        Command::SaveCustomDomains(_) => "Custom domains saved".into(),
        Command::AddRule(rule) => format!("Added rule {}", rule.pattern),
        Command::RemoveRule { rule, .. } => format!("Removed rule {}", rule.pattern),
        Command::StartProxy => "Proxy started".into(),
        Command::StopProxy => "Proxy stopped".into(),
        Command::OpenUnlocked => "Opened unlocked lists folder".into(),
        Command::OpenBlacklist => "Opened blacklist".into(),
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    BootstrapFinished(BootstrapSummary),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data Events (from kitten-core slots) ──────────────────────
    ConfigUpdated(Arc<ProxyConfig>),
    ListsUpdated(Arc<Vec<DomainList>>),
    StatusUpdated(Arc<ProxyStatus>),
    StatsUpdated(Arc<Stats>),
    TelemetryUpdated(Arc<TelemetryRing>),
    DiagnosticsUpdated(Arc<Diagnostics>),
    LogsUpdated(Arc<LogView>),

    // ── Commands & one-shot fetches ───────────────────────────────
    Execute(Command),
    RequestDiagnostics,
    RequestLogs(LogKind),
    /// Error hint for one panel; `None` clears it.
    PanelError {
        screen: ScreenId,
        message: Option<String>,
    },

    // ── Confirm Dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),

    // ── Host shell ────────────────────────────────────────────────
    Host(HostAction),
}
