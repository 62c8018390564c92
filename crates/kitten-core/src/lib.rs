// kitten-core: state synchronization and live telemetry for the BlackKitten console
//
// The `Console` owns a `ViewStore` mirroring server state and keeps it
// current; front ends read snapshots and subscribe to changes.

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod plot;
pub mod store;
pub mod stream;
pub mod telemetry;

pub use command::{Aggregate, Command, CommandOutcome, SettingsDraft};
pub use config::ConsoleConfig;
pub use console::{BootstrapReport, Console, PollOutcome};
pub use error::CoreError;
pub use format::{format_size, format_speed};
pub use plot::Plot;
pub use store::{LogView, ViewStore};
pub use stream::SlotStream;
pub use telemetry::{TelemetryRing, TelemetrySample};

// Wire types front ends need to read store snapshots.
pub use kitten_api::{
    Diagnostics, DomainList, DomainMatching, FragmentMethod, LogKind, ProxyConfig, ProxyStatus,
    Rule, RuleAction, Stats,
};
