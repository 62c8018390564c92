//! Reusable widgets shared by screens.

pub mod status_pill;
pub mod traffic_graph;
