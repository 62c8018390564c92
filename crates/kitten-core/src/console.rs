// ── Console synchronizer ──
//
// Keeps the ViewStore in step with the control plane: a best-effort
// bootstrap, a fixed-interval stats poll, re-fetch after every mutation,
// and one-shot fetches for the diagnostics and logs sections.

use std::sync::Arc;
use std::time::Duration;

use kitten_api::{ControlClient, LogKind, Rule, TransportConfig};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{Aggregate, Command, CommandOutcome, split_lines};
use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::store::{LogView, ViewStore};

// ── Outcomes ─────────────────────────────────────────────────────────

/// Result of one stats poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A snapshot was applied and a telemetry sample pushed.
    Applied,
    /// The engine has no stats yet; nothing changed.
    Empty,
    /// The request failed; the previous display stays.
    Failed,
}

/// What went wrong during bootstrap. The console is usable either way.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub failures: Vec<(Aggregate, CoreError)>,
    pub stats_available: bool,
}

impl BootstrapReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ── Console ──────────────────────────────────────────────────────────

/// Entry point for front ends.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Owns the control-plane client
/// and the only write access to the [`ViewStore`].
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: ControlClient,
    store: Arc<ViewStore>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console {
    /// Build a console for `config.control_url`. Makes no requests; call
    /// [`bootstrap()`](Self::bootstrap) and [`start()`](Self::start).
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let mut transport = TransportConfig::default();
        if let Some(timeout) = config.timeout {
            transport = transport.with_timeout(timeout);
        }
        let client = ControlClient::new(config.control_url.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: ConsoleConfig, client: ControlClient) -> Self {
        let store = Arc::new(ViewStore::new(config.history_capacity));
        Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                store,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<ViewStore> {
        &self.inner.store
    }

    pub fn client(&self) -> &ControlClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Warm start: config, lists, status, then stats, one after another.
    ///
    /// A failed fetch is recorded and the rest still run. The loading flag
    /// is cleared at the end no matter what happened.
    pub async fn bootstrap(&self) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        for aggregate in [Aggregate::Config, Aggregate::Lists, Aggregate::Status] {
            if let Err(e) = self.refresh(aggregate).await {
                warn!(%aggregate, error = %e, "bootstrap fetch failed");
                report.failures.push((aggregate, e));
            }
        }

        match self.poll_stats().await {
            Ok(outcome) => report.stats_available = outcome == PollOutcome::Applied,
            Err(e) => {
                warn!(error = %e, "bootstrap stats fetch failed");
                report.failures.push((Aggregate::Stats, e));
            }
        }

        self.inner.store.set_loading(false);
        info!(failures = report.failures.len(), "bootstrap finished");
        report
    }

    /// Spawn the background poll. Does nothing if the interval is zero.
    pub async fn start(&self) {
        let interval = self.inner.config.poll_interval;
        if interval.is_zero() {
            return;
        }

        let console = self.clone();
        let cancel = self.inner.cancel.clone();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(poll_task(console, interval, cancel)));
        debug!(?interval, "poll task started");
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("console shut down");
    }

    // ── Polling ──────────────────────────────────────────────────────

    /// Fetch stats once. An empty snapshot leaves the store untouched.
    pub async fn poll_stats(&self) -> Result<PollOutcome, CoreError> {
        match self.inner.client.get_stats().await? {
            Some(stats) => {
                self.inner.store.apply_stats(stats);
                Ok(PollOutcome::Applied)
            }
            None => Ok(PollOutcome::Empty),
        }
    }

    /// One background cycle: stats, then status. Errors are logged and
    /// otherwise ignored; the next tick tries again.
    pub async fn poll_once(&self) -> PollOutcome {
        let outcome = match self.poll_stats().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "stats poll failed");
                PollOutcome::Failed
            }
        };

        if let Err(e) = self.refresh_status().await {
            warn!(error = %e, "status poll failed");
        }

        outcome
    }

    // ── Aggregate refresh ────────────────────────────────────────────

    /// Re-fetch one aggregate and replace it in the store.
    pub async fn refresh(&self, aggregate: Aggregate) -> Result<(), CoreError> {
        match aggregate {
            Aggregate::Config => self.refresh_config().await,
            Aggregate::Lists => self.refresh_lists().await,
            Aggregate::Status => self.refresh_status().await,
            Aggregate::Stats => self.poll_stats().await.map(|_| ()),
            Aggregate::None => Ok(()),
        }
    }

    pub async fn refresh_config(&self) -> Result<(), CoreError> {
        let config = self.inner.client.get_config().await?;
        self.inner.store.apply_config(config);
        Ok(())
    }

    pub async fn refresh_lists(&self) -> Result<(), CoreError> {
        let lists = self.inner.client.list_lists().await?;
        debug!(count = lists.len(), "lists refreshed");
        self.inner.store.apply_lists(lists);
        Ok(())
    }

    pub async fn refresh_status(&self) -> Result<(), CoreError> {
        let status = self.inner.client.get_status().await?;
        self.inner.store.apply_status(status);
        Ok(())
    }

    pub async fn refresh_diagnostics(&self) -> Result<(), CoreError> {
        let diagnostics = self.inner.client.get_diagnostics().await?;
        self.inner.store.apply_diagnostics(diagnostics);
        Ok(())
    }

    /// Fetch the tail of one log. A `403` from the server becomes
    /// [`LogView::Unavailable`] rather than an error.
    pub async fn refresh_logs(&self, kind: LogKind) -> Result<LogView, CoreError> {
        let view = match self
            .inner
            .client
            .get_logs(kind, self.inner.config.log_limit)
            .await
        {
            Ok(logs) => LogView::Lines {
                kind,
                lines: logs.lines,
            },
            Err(e) if e.is_forbidden() => {
                debug!(%kind, "logs unavailable to this client");
                LogView::Unavailable {
                    kind,
                    reason: e.body().unwrap_or("Forbidden").to_owned(),
                }
            }
            Err(e) => return Err(e.into()),
        };

        self.inner.store.apply_logs(view.clone());
        Ok(view)
    }

    // ── Command execution ────────────────────────────────────────────

    /// Run a mutation, then re-fetch every aggregate it changed.
    ///
    /// The store is never patched locally: it changes only through the
    /// re-fetch, so it always mirrors what the server last reported. A
    /// rejected mutation leaves the store as it was.
    pub async fn execute(&self, cmd: Command) -> Result<CommandOutcome, CoreError> {
        cmd.validate()?;
        let owner = cmd.owner();
        let refetch = cmd.refetch();
        debug!(?cmd, %owner, "executing command");

        let outcome = self.send(cmd).await?;
        for aggregate in refetch {
            self.refresh(*aggregate).await?;
        }
        Ok(outcome)
    }

    async fn send(&self, cmd: Command) -> Result<CommandOutcome, CoreError> {
        let client = &self.inner.client;

        match cmd {
            Command::ToggleList { name, enabled } => {
                client.toggle_list(&name, enabled).await?;
            }
            Command::CreateList { name, domains } => {
                client.create_list(&name, &domains).await?;
            }
            Command::EditList { name, domains } => {
                client.edit_list(&name, &domains).await?;
            }
            Command::RemoveList { name } => {
                client.delete_list(&name).await?;
            }
            Command::SaveSettings(draft) => {
                client.update_config(&draft.into_update()).await?;
            }
            Command::SaveConnection { host, port } => {
                let update = kitten_api::ConfigUpdate {
                    host: Some(host.trim().to_owned()),
                    port: Some(port),
                    ..Default::default()
                };
                client.update_config(&update).await?;
            }
            Command::SaveLanguage(language) => {
                let update = kitten_api::ConfigUpdate {
                    language: Some(language),
                    ..Default::default()
                };
                client.update_config(&update).await?;
            }
            Command::SaveCustomDomains(text) => {
                let update = kitten_api::ConfigUpdate {
                    custom_domains: Some(split_lines(&text)),
                    ..Default::default()
                };
                client.update_config(&update).await?;
            }
            Command::AddRule(rule) => {
                let mut rules = self.current_rules().await?;
                rules.push(rule);
                client.replace_rules(&rules).await?;
            }
            Command::RemoveRule { index, rule } => {
                let mut rules = self.current_rules().await?;
                let position = if rules.get(index) == Some(&rule) {
                    index
                } else {
                    rules.iter().position(|r| *r == rule).ok_or_else(|| {
                        CoreError::validation(
                            "rule",
                            format!("{} is no longer in the rule set", rule.pattern),
                        )
                    })?
                };
                rules.remove(position);
                client.replace_rules(&rules).await?;
            }
            Command::StartProxy => {
                let status = client.start_proxy().await?;
                return Ok(CommandOutcome::Status(status));
            }
            Command::StopProxy => {
                let status = client.stop_proxy().await?;
                return Ok(CommandOutcome::Status(status));
            }
            Command::OpenUnlocked => {
                client.open_unlocked().await?;
            }
            Command::OpenBlacklist => {
                client.open_blacklist().await?;
            }
        }

        Ok(CommandOutcome::Ok)
    }

    /// Rules as last fetched. Loads the config first if the store has none.
    async fn current_rules(&self) -> Result<Vec<Rule>, CoreError> {
        if self.inner.store.config_snapshot().is_none() {
            self.refresh_config().await?;
        }
        Ok(self.inner.store.rules_snapshot())
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn poll_task(console: Console, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // bootstrap already fetched once

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                console.poll_once().await;
            }
        }
    }
}
