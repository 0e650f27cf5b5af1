//! Client side of TaskPulse board sync.
//!
//! [`RemoteConnector`] talks to the board server and owns the offline
//! fallback policy, [`SyncScheduler`] debounces edits into saves, and
//! [`EditSession`] ties both to an in-memory board.

pub mod cache;
pub mod client;
pub mod connector;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use cache::{FileLocalCache, LocalCache, MemoryLocalCache, CACHE_SLOT_FILE};
pub use client::BoardSyncClient;
pub use connector::{BoardApi, GraphSaver, RemoteConnector};
pub use error::{BoardSyncError, Result};
pub use scheduler::{SyncScheduler, DEFAULT_DEBOUNCE};
pub use session::EditSession;
pub use taskpulse_core::sync::DEFAULT_SERVER_URL;
