//! Repositioning handlers: column moves and within-column reorders
//!
//! All three delegate to the `PositionSequencer`; this layer only parses
//! parameters and translates domain errors into tool responses.

use crate::BoardServerHandler;
use crate::error::BoardError;
use crate::model::{BoardColumn, RankTarget};
use mcp_attr::{Result as McpResult, bail, bail_public};

impl BoardServerHandler {
    /// Move a task to the top of another column
    pub async fn handle_move_task(
        &self,
        list_id: String,
        task_id: String,
        target_column: String,
    ) -> McpResult<String> {
        let target: BoardColumn = match target_column.parse() {
            Ok(c) => c,
            Err(message) => bail_public!(_, "{}", message),
        };

        match self.sequencer.move_to_column(&list_id, &task_id, target).await {
            Ok(()) => Ok(format!("Task {} moved to column {}", task_id, target)),
            Err(e @ (BoardError::TaskNotFound { .. } | BoardError::WrongList { .. })) => {
                bail_public!(_, "{}", e)
            }
            Err(e) => bail!("Failed to move task: {}", e),
        }
    }

    /// Swap the positions of two tasks in the same column
    pub async fn handle_reorder_tasks(
        &self,
        task_id: String,
        target_task_id: String,
    ) -> McpResult<String> {
        match self.sequencer.swap(&task_id, &target_task_id).await {
            Ok(()) => Ok(format!(
                "Tasks {} and {} swapped positions",
                task_id, target_task_id
            )),
            Err(
                e @ (BoardError::TaskNotFound { .. } | BoardError::DifferentPartition { .. }),
            ) => bail_public!(_, "{}", e),
            Err(e) => bail!("Failed to reorder tasks: {}", e),
        }
    }

    /// Move a task to a named rank within its column
    pub async fn handle_move_task_to_rank(
        &self,
        task_id: String,
        target: String,
    ) -> McpResult<String> {
        let target: RankTarget = match target.parse() {
            Ok(t) => t,
            Err(message) => bail_public!(_, "{}", message),
        };

        match self.sequencer.move_to_rank(&task_id, target).await {
            Ok(()) => Ok(format!("Task {} moved ({})", task_id, target)),
            Err(e @ BoardError::TaskNotFound { .. }) => bail_public!(_, "{}", e),
            Err(e) => bail!("Failed to move task: {}", e),
        }
    }
}
