//! List metadata handlers

use crate::BoardServerHandler;
use crate::error::BoardError;
use crate::formatting;
use crate::model::{TaskList, now};
use mcp_attr::{Result as McpResult, bail, bail_public};

impl BoardServerHandler {
    /// Create a new task list
    pub async fn handle_add_list(
        &self,
        name: String,
        color: Option<String>,
    ) -> McpResult<String> {
        if name.trim().is_empty() {
            bail_public!(_, "List name must not be empty");
        }

        let list = TaskList::new(name.trim(), color.filter(|c| !c.is_empty()));
        let list_id = list.id.clone();
        if let Err(e) = self.lists.create_or_update(&list).await {
            bail!("Failed to save list: {}", e);
        }

        Ok(format!("List created with ID: {}", list_id))
    }

    /// Show all lists
    pub async fn handle_list_lists(&self) -> McpResult<String> {
        match self.lists.all_lists().await {
            Ok(lists) => Ok(formatting::format_lists(&lists)),
            Err(e) => bail!("Failed to load lists: {}", e),
        }
    }

    /// Rename or recolor a list
    ///
    /// **Tip**: Use empty string "" to clear the color.
    pub async fn handle_update_list(
        &self,
        list_id: String,
        name: Option<String>,
        color: Option<String>,
    ) -> McpResult<String> {
        let mut list = match self.lists.get_list(&list_id).await {
            Ok(list) => list,
            Err(BoardError::ListNotFound { .. }) => {
                bail_public!(_, "List '{}' does not exist", list_id)
            }
            Err(e) => bail!("Failed to load list: {}", e),
        };

        if let Some(new_name) = name {
            if new_name.trim().is_empty() {
                bail_public!(_, "List name must not be empty");
            }
            list.name = new_name.trim().to_string();
        }
        if let Some(new_color) = color {
            list.color = if new_color.is_empty() {
                None
            } else {
                Some(new_color)
            };
        }

        list.updated_at = now();
        if let Err(e) = self.lists.create_or_update(&list).await {
            bail!("Failed to save list: {}", e);
        }

        Ok(format!("List {} updated", list.id))
    }

    /// Delete a list
    ///
    /// Refused while the list still has tasks; delete or move them first.
    /// The check is advisory (a concurrent add_task can race it), which is
    /// acceptable for an interactive tool.
    pub async fn handle_delete_list(&self, list_id: String) -> McpResult<String> {
        let task_count = match self.tasks.tasks_for_list(&list_id).await {
            Ok(tasks) => tasks.len(),
            Err(e) => bail!("Failed to load tasks: {}", e),
        };
        if task_count > 0 {
            bail_public!(
                _,
                "List '{}' still has {} task(s) and cannot be deleted",
                list_id,
                task_count
            );
        }

        match self.lists.delete_list(&list_id).await {
            Ok(()) => Ok(format!("List {} deleted", list_id)),
            Err(BoardError::ListNotFound { .. }) => {
                bail_public!(_, "List '{}' does not exist", list_id)
            }
            Err(e) => bail!("Failed to delete list: {}", e),
        }
    }
}
