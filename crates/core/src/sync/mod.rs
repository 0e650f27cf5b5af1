//! Board sync domain models and scheduler constants.

mod board_sync_model;
mod board_sync_scheduler;

pub use board_sync_model::*;
pub use board_sync_scheduler::*;
