//! Data bridge: connects [`Console`] store slots to TUI actions.
//!
//! Runs as a background task. Bootstraps the console, pushes the warm-start
//! snapshots, starts the poll loop, then forwards every slot replacement as
//! an [`Action`] until cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use kitten_core::Console;

use crate::action::{Action, BootstrapSummary};

pub async fn spawn_data_bridge(
    console: Console,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let report = console.bootstrap().await;

    // Subscribing after bootstrap: `current()` holds the warm-start data and
    // `changed()` only fires for later writes.
    let store = Arc::clone(console.store());
    let mut config = store.subscribe_config();
    let mut lists = store.subscribe_lists();
    let mut status = store.subscribe_status();
    let mut stats = store.subscribe_stats();
    let mut telemetry = store.subscribe_telemetry();
    let mut diagnostics = store.subscribe_diagnostics();
    let mut logs = store.subscribe_logs();

    if let Some(snap) = config.current() {
        let _ = action_tx.send(Action::ConfigUpdated(Arc::clone(snap)));
    }
    if let Some(snap) = lists.current() {
        let _ = action_tx.send(Action::ListsUpdated(Arc::clone(snap)));
    }
    if let Some(snap) = status.current() {
        let _ = action_tx.send(Action::StatusUpdated(Arc::clone(snap)));
    }
    if let Some(snap) = stats.current() {
        let _ = action_tx.send(Action::StatsUpdated(Arc::clone(snap)));
    }
    if let Some(snap) = telemetry.current() {
        let _ = action_tx.send(Action::TelemetryUpdated(Arc::clone(snap)));
    }

    let _ = action_tx.send(Action::BootstrapFinished(BootstrapSummary::from(&report)));

    console.start().await;
    info!("data bridge running");

    loop {
        let action = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snap) = config.changed() => Action::ConfigUpdated(snap),
            Some(snap) = lists.changed() => Action::ListsUpdated(snap),
            Some(snap) = status.changed() => Action::StatusUpdated(snap),
            Some(snap) = stats.changed() => Action::StatsUpdated(snap),
            Some(snap) = telemetry.changed() => Action::TelemetryUpdated(snap),
            Some(snap) = diagnostics.changed() => Action::DiagnosticsUpdated(snap),
            Some(snap) = logs.changed() => Action::LogsUpdated(snap),
        };

        if action_tx.send(action).is_err() {
            debug!("action channel closed");
            break;
        }
    }

    console.shutdown().await;
    info!("data bridge stopped");
}
