//! SQLite storage for the TaskPulse board.

pub mod board;
pub mod db;
pub mod errors;
pub mod schema;
mod store;

pub use board::BoardRepository;
pub use store::{BoardStore, BoardStoreProvider};
