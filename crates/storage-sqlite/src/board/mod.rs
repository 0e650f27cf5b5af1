//! SQLite persistence for the board graph.

pub mod mapper;
mod model;
mod repository;

pub use model::{BoardRows, DailyLogDB, GroupDB, MemberDB, MilestoneDB, TaskDB};
pub use repository::BoardRepository;
