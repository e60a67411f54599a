// ── Entity storage ──

mod list;

pub use list::{EntityList, EntitySnapshot};
