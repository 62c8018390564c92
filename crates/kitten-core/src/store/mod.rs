// ── View state store ──

mod apply;
mod slot;
mod view_store;

pub(crate) use slot::Slot;
pub use view_store::{LogView, ViewStore};
