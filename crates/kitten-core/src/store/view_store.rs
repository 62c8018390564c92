// ── Console view state ──
//
// In-memory mirror of server-owned state. Every slot is replaced wholesale;
// readers get immutable snapshots and may subscribe for changes. Only the
// `Console` writes (see `apply.rs`).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kitten_api::{Diagnostics, DomainList, LogKind, ProxyConfig, ProxyStatus, Rule, Stats};
use tokio::sync::watch;

use super::Slot;
use crate::stream::SlotStream;
use crate::telemetry::TelemetryRing;

/// What the logs panel shows for one log kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogView {
    Lines { kind: LogKind, lines: Vec<String> },
    /// The control plane refused to serve logs (non-local access).
    Unavailable { kind: LogKind, reason: String },
}

impl LogView {
    pub fn kind(&self) -> LogKind {
        match self {
            Self::Lines { kind, .. } | Self::Unavailable { kind, .. } => *kind,
        }
    }
}

/// Single source of truth for everything the console renders.
pub struct ViewStore {
    pub(crate) config: Slot<ProxyConfig>,
    pub(crate) lists: Slot<Vec<DomainList>>,
    pub(crate) status: Slot<ProxyStatus>,
    pub(crate) stats: Slot<Stats>,
    pub(crate) telemetry: Slot<TelemetryRing>,
    pub(crate) diagnostics: Slot<Diagnostics>,
    pub(crate) logs: Slot<LogView>,
    pub(crate) loading: watch::Sender<bool>,
    pub(crate) last_poll: watch::Sender<Option<DateTime<Utc>>>,
}

impl ViewStore {
    /// Empty store, in the loading state, with a telemetry window of
    /// `history_capacity` samples.
    pub fn new(history_capacity: usize) -> Self {
        let (loading, _) = watch::channel(true);
        let (last_poll, _) = watch::channel(None);

        Self {
            config: Slot::empty(),
            lists: Slot::empty(),
            status: Slot::empty(),
            stats: Slot::empty(),
            telemetry: Slot::with_value(TelemetryRing::with_capacity(history_capacity)),
            diagnostics: Slot::empty(),
            logs: Slot::empty(),
            loading,
            last_poll,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn config_snapshot(&self) -> Option<Arc<ProxyConfig>> {
        self.config.snapshot()
    }

    pub fn lists_snapshot(&self) -> Option<Arc<Vec<DomainList>>> {
        self.lists.snapshot()
    }

    pub fn status_snapshot(&self) -> Option<Arc<ProxyStatus>> {
        self.status.snapshot()
    }

    pub fn stats_snapshot(&self) -> Option<Arc<Stats>> {
        self.stats.snapshot()
    }

    pub fn telemetry_snapshot(&self) -> Arc<TelemetryRing> {
        self.telemetry.snapshot().unwrap_or_default()
    }

    pub fn diagnostics_snapshot(&self) -> Option<Arc<Diagnostics>> {
        self.diagnostics.snapshot()
    }

    pub fn logs_snapshot(&self) -> Option<Arc<LogView>> {
        self.logs.snapshot()
    }

    /// Rules live inside the config aggregate.
    pub fn rules_snapshot(&self) -> Vec<Rule> {
        self.config
            .snapshot()
            .map(|cfg| cfg.rules.clone())
            .unwrap_or_default()
    }

    // ── Derived readers ──────────────────────────────────────────────

    pub fn list_by_name(&self, name: &str) -> Option<DomainList> {
        self.lists
            .snapshot()
            .and_then(|lists| lists.iter().find(|l| l.name == name).cloned())
    }

    pub fn list_count(&self) -> usize {
        self.lists.snapshot().map_or(0, |lists| lists.len())
    }

    pub fn enabled_list_count(&self) -> usize {
        self.lists
            .snapshot()
            .map_or(0, |lists| lists.iter().filter(|l| l.enabled).count())
    }

    pub fn is_running(&self) -> bool {
        self.status.snapshot().is_some_and(|s| s.running)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_config(&self) -> SlotStream<ProxyConfig> {
        self.config.subscribe()
    }

    pub fn subscribe_lists(&self) -> SlotStream<Vec<DomainList>> {
        self.lists.subscribe()
    }

    pub fn subscribe_status(&self) -> SlotStream<ProxyStatus> {
        self.status.subscribe()
    }

    pub fn subscribe_stats(&self) -> SlotStream<Stats> {
        self.stats.subscribe()
    }

    pub fn subscribe_telemetry(&self) -> SlotStream<TelemetryRing> {
        self.telemetry.subscribe()
    }

    pub fn subscribe_diagnostics(&self) -> SlotStream<Diagnostics> {
        self.diagnostics.subscribe()
    }

    pub fn subscribe_logs(&self) -> SlotStream<LogView> {
        self.logs.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Time the last non-empty stats snapshot was applied.
    pub fn last_poll(&self) -> Option<DateTime<Utc>> {
        *self.last_poll.borrow()
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(crate::telemetry::DEFAULT_HISTORY_CAPACITY)
    }
}
