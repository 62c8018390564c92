// kitten-api: Async Rust client for the BlackKitten proxy control plane

pub mod client;
mod config;
pub mod error;
mod lists;
pub mod models;
mod proxy;
pub mod telemetry;
pub mod transport;

pub use client::ControlClient;
pub use error::Error;
pub use models::{
    Ack, ConfigUpdate, Diagnostics, DomainList, DomainMatching, FragmentMethod, LogKind,
    LogLines, ProxyConfig, ProxyStatus, Rule, RuleAction, RulesReply, Stats,
};
pub use telemetry::DEFAULT_LOG_LIMIT;
pub use transport::TransportConfig;
