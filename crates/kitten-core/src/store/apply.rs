// ── Store writes ──
//
// The only code paths that change the ViewStore. Each replaces one
// aggregate with what the server just returned.

use chrono::Utc;
use kitten_api::{Diagnostics, DomainList, ProxyConfig, ProxyStatus, Stats};

use super::{LogView, ViewStore};
use crate::telemetry::TelemetrySample;

impl ViewStore {
    pub(crate) fn apply_config(&self, config: ProxyConfig) {
        self.config.replace(config);
    }

    pub(crate) fn apply_lists(&self, lists: Vec<DomainList>) {
        self.lists.replace(lists);
    }

    pub(crate) fn apply_status(&self, status: ProxyStatus) {
        self.status.replace(status);
    }

    /// Replace the stats snapshot and append one sample to the telemetry
    /// window. Callers filter out empty snapshots beforehand.
    pub(crate) fn apply_stats(&self, stats: Stats) {
        let sample = TelemetrySample::new(stats.speed_in_bps, stats.speed_out_bps);
        self.stats.replace(stats);
        self.telemetry.modify(|ring| ring.push(sample));
        self.last_poll.send_replace(Some(Utc::now()));
    }

    pub(crate) fn apply_diagnostics(&self, diagnostics: Diagnostics) {
        self.diagnostics.replace(diagnostics);
    }

    pub(crate) fn apply_logs(&self, logs: LogView) {
        self.logs.replace(logs);
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.loading.send_replace(loading);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kitten_api::{LogKind, Rule, RuleAction};
    use pretty_assertions::assert_eq;

    use super::*;

    fn list(name: &str, enabled: bool) -> DomainList {
        DomainList {
            name: name.into(),
            domains: vec!["a.com".into()],
            count: 1,
            enabled,
        }
    }

    #[test]
    fn new_store_is_loading_and_empty() {
        let store = ViewStore::new(60);
        assert!(store.is_loading());
        assert!(store.config_snapshot().is_none());
        assert!(store.stats_snapshot().is_none());
        assert!(store.telemetry_snapshot().is_empty());
        assert_eq!(store.telemetry_snapshot().capacity(), 60);
        assert!(store.last_poll().is_none());
    }

    #[test]
    fn apply_stats_pushes_one_sample() {
        let store = ViewStore::new(3);
        for i in 1..=5_u32 {
            store.apply_stats(Stats {
                speed_in_bps: f64::from(i),
                speed_out_bps: f64::from(i * 10),
                ..Stats::default()
            });
        }

        let ring = store.telemetry_snapshot();
        let downloads: Vec<f64> = ring.samples().map(|s| s.download_bps).collect();
        assert_eq!(downloads, vec![3.0, 4.0, 5.0]);
        assert!((store.stats_snapshot().unwrap().speed_out_bps - 50.0).abs() < f64::EPSILON);
        assert!(store.last_poll().is_some());
    }

    #[test]
    fn list_replacement_is_wholesale() {
        let store = ViewStore::default();
        store.apply_lists(vec![list("one", true), list("two", false)]);
        assert_eq!(store.enabled_list_count(), 1);
        assert_eq!(store.list_count(), 2);

        store.apply_lists(vec![list("three", true)]);
        assert_eq!(store.list_count(), 1);
        assert!(store.list_by_name("one").is_none());
        assert_eq!(store.list_by_name("three").unwrap().count, 1);
    }

    #[test]
    fn rules_come_from_config() {
        let store = ViewStore::default();
        assert!(store.rules_snapshot().is_empty());

        store.apply_config(ProxyConfig {
            rules: vec![Rule {
                pattern: "*.example.com".into(),
                action: RuleAction::Force,
                fragment_method: None,
            }],
            ..ProxyConfig::default()
        });
        assert_eq!(store.rules_snapshot().len(), 1);
    }

    #[test]
    fn log_view_reports_kind() {
        let view = LogView::Unavailable {
            kind: LogKind::Error,
            reason: "Forbidden".into(),
        };
        assert_eq!(view.kind(), LogKind::Error);
    }

    #[test]
    fn loading_flag_toggles() {
        let store = ViewStore::default();
        let rx = store.subscribe_loading();
        store.set_loading(false);
        assert!(!*rx.borrow());
        assert!(!store.is_loading());
    }
}
