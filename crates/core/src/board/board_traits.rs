use async_trait::async_trait;

use super::board_model::EntityGraph;
use crate::errors::Result;

/// Store for the whole board.
///
/// There is no per-entity API: the board is always read and written as one
/// graph, and a write replaces everything the store held before.
#[async_trait]
pub trait BoardRepositoryTrait: Send + Sync {
    fn load_graph(&self) -> Result<EntityGraph>;

    /// Replace the stored board with `graph` in a single transaction.
    /// On failure the previously stored board is left intact.
    async fn replace_graph(&self, graph: EntityGraph) -> Result<()>;
}
