//! Domain core for the TaskPulse board: entity graph, edit rules, store
//! configuration and sync status.

pub mod advisory;
pub mod board;
pub mod config;
pub mod errors;
pub mod sync;

pub use errors::{Error, Result};
