//! Board view handler

use crate::BoardServerHandler;
use crate::error::BoardError;
use crate::formatting;
use mcp_attr::{Result as McpResult, bail, bail_public};

impl BoardServerHandler {
    /// Render a full board: every column with its tasks in rank order
    ///
    /// Assembles the board value from two sources: list metadata from the
    /// `lists` table, the task set from a scan of the `tasks` table.
    pub async fn handle_show_board(&self, list_id: String) -> McpResult<String> {
        let list = match self.lists.get_list(&list_id).await {
            Ok(list) => list,
            Err(BoardError::ListNotFound { .. }) => {
                bail_public!(_, "List '{}' does not exist", list_id)
            }
            Err(e) => bail!("Failed to load list: {}", e),
        };

        let tasks = match self.tasks.tasks_for_list(&list_id).await {
            Ok(tasks) => tasks,
            Err(e) => bail!("Failed to load tasks: {}", e),
        };
        let labels = match self.labels.all_labels().await {
            Ok(labels) => labels,
            Err(e) => bail!("Failed to load labels: {}", e),
        };

        Ok(formatting::format_board(&list, &tasks, &labels))
    }
}
