//! Board domain: groups, members, tasks and the entity graph that owns them.

mod board_edits;
mod board_model;
mod board_traits;
mod seed;

pub use board_model::*;
pub use board_traits::*;
pub use seed::default_graph;

/// Generate an identifier for a newly created entity.
pub fn new_entity_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
