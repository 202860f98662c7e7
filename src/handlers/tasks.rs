//! Task creation, deletion and content-edit handlers

use crate::BoardServerHandler;
use crate::error::BoardError;
use crate::model::{BoardColumn, Task, now};
use mcp_attr::{Result as McpResult, bail, bail_public};

impl BoardServerHandler {
    /// Create a task at the top of the given column
    ///
    /// The new task takes position 0 and every existing task of the
    /// (list, column) partition is pushed down by one.
    pub async fn handle_add_task(
        &self,
        list_id: String,
        column: String,
        title: String,
        details: Option<String>,
    ) -> McpResult<String> {
        let column: BoardColumn = match column.parse() {
            Ok(c) => c,
            Err(message) => bail_public!(_, "{}", message),
        };
        if title.trim().is_empty() {
            bail_public!(_, "Task title must not be empty");
        }

        // The list must exist before tasks can be attached to it
        if let Err(e) = self.lists.get_list(&list_id).await {
            match e {
                BoardError::ListNotFound { .. } => {
                    bail_public!(_, "List '{}' does not exist", list_id)
                }
                other => bail!("Failed to load list: {}", other),
            }
        }

        let details = details.filter(|d| !d.trim().is_empty());
        let task = Task::new(&list_id, column, title.trim(), details);
        let task_id = task.id.clone();

        if let Err(e) = self.sequencer.insert_at_top(task).await {
            bail!("Failed to add task: {}", e);
        }

        Ok(format!(
            "Task created with ID: {} (list: {}, column: {})",
            task_id, list_id, column
        ))
    }

    /// Delete a task and compact the column it vacated
    pub async fn handle_delete_task(&self, list_id: String, task_id: String) -> McpResult<String> {
        match self.sequencer.remove_task(&list_id, &task_id).await {
            Ok(task) => Ok(format!(
                "Task {} deleted (was position {} of column {})",
                task.id, task.position, task.column
            )),
            Err(e @ (BoardError::TaskNotFound { .. } | BoardError::WrongList { .. })) => {
                bail_public!(_, "{}", e)
            }
            Err(e) => bail!("Failed to delete task: {}", e),
        }
    }

    /// Edit task content (title, details, labels); no ordering relevance
    ///
    /// **Tip**: Use empty string "" to clear the details field.
    pub async fn handle_update_task(
        &self,
        task_id: String,
        title: Option<String>,
        details: Option<String>,
        label_ids: Option<Vec<String>>,
    ) -> McpResult<String> {
        let mut task = match self.tasks.get_task(&task_id).await {
            Ok(task) => task,
            Err(BoardError::TaskNotFound { .. }) => {
                bail_public!(_, "Task '{}' not found", task_id)
            }
            Err(e) => bail!("Failed to load task: {}", e),
        };

        if let Some(new_title) = title {
            if new_title.trim().is_empty() {
                bail_public!(_, "Task title must not be empty");
            }
            task.title = new_title.trim().to_string();
        }

        if let Some(new_details) = details {
            task.details = if new_details.is_empty() {
                None
            } else {
                Some(new_details)
            };
        }

        if let Some(ids) = label_ids {
            // Every referenced label must exist; dangling IDs would render
            // as "(missing label)" forever
            for label_id in &ids {
                if let Err(e) = self.labels.get_label(label_id).await {
                    match e {
                        BoardError::LabelNotFound { .. } => {
                            bail_public!(_, "Label '{}' does not exist", label_id)
                        }
                        other => bail!("Failed to load label: {}", other),
                    }
                }
            }
            task.label_ids = ids;
        }

        task.updated_at = now();
        if let Err(e) = self.tasks.create_or_update(&task).await {
            bail!("Failed to save task: {}", e);
        }

        Ok(format!("Task {} updated", task.id))
    }
}
