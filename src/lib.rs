//! Kanban MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for multi-list
//! Kanban task management: tasks live on lists, each list is split into the
//! columns backlog / at_work / finished, and within every (list, column)
//! partition the tasks carry a dense 0..K-1 ordering.
//!
//! # Architecture
//!
//! The library follows a layered architecture:
//! - **MCP Layer**: `BoardServerHandler` - MCP tools, parameter parsing,
//!   response formatting
//! - **Ordering Layer**: `sequencer` module - the position sequencer that
//!   maintains the dense per-column ordering under insert/delete/move/reorder
//! - **Repository Layer**: `repo` module - task/list/label records on top of
//!   the store gateway
//! - **Persistence Layer**: `store` module - per-document get/put/update/
//!   delete/scan against TOML documents (in memory or on disk)
//!
//! The store offers no multi-document transactions, so every repositioning
//! operation is a sequence of single-document writes guarded by a
//! per-partition lock and followed by a density post-check.
//!
//! # Example
//!
//! ```no_run
//! use kanban_mcp::BoardServerHandler;
//! use kanban_mcp::store::MemoryStore;
//! use std::sync::Arc;
//!
//! let handler = BoardServerHandler::new(Arc::new(MemoryStore::new()));
//! // Use handler with an MCP server...
//! ```

pub mod error;
pub mod formatting;
mod handlers;
pub mod locks;
pub mod model;
pub mod repo;
pub mod sequencer;
pub mod store;

use std::sync::Arc;

use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};

use crate::repo::{LabelRepository, ListRepository, TaskRepository};
use crate::sequencer::PositionSequencer;
use crate::store::StoreGateway;

// Re-export commonly used types
pub use crate::error::{BoardError, Result};
pub use crate::model::{BoardColumn, Label, RankTarget, Task, TaskList};

/// MCP server handler for Kanban board management
///
/// Owns the repositories and the position sequencer; all of them share one
/// injected store gateway, so tests can substitute an in-memory store for
/// the file-backed one.
pub struct BoardServerHandler {
    pub(crate) tasks: TaskRepository,
    pub(crate) lists: ListRepository,
    pub(crate) labels: LabelRepository,
    pub(crate) sequencer: PositionSequencer,
}

impl BoardServerHandler {
    /// Create a handler over the given store gateway
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        let tasks = TaskRepository::new(store.clone());
        Self {
            sequencer: PositionSequencer::new(tasks.clone()),
            lists: ListRepository::new(store.clone()),
            labels: LabelRepository::new(store),
            tasks,
        }
    }
}

/// Kanban board server: multi-list task management with strict per-column
/// ordering.
///
/// Tasks are organized on lists; each list has three columns (backlog,
/// at_work, finished). Within a column every task has a dense position
/// 0..K-1 - position 0 is the top of the column. New tasks enter at the top,
/// moves between columns also land at the top, and reorder tools move tasks
/// within their column.
///
/// Typical workflow:
/// 1. add_list to create a board, add_task to fill its backlog
/// 2. show_board to review
/// 3. move_task / reorder_tasks / move_task_to_rank to organize
/// 4. add_label + update_task to tag tasks
#[mcp_server]
impl McpServer for BoardServerHandler {
    /// **Capture**: Create a task at the top of a column. The rest of the
    /// column shifts down by one.
    #[tool]
    async fn add_task(
        &self,
        /// List the task belongs to
        list_id: String,
        /// Column: backlog/at_work/finished
        column: String,
        /// Title: brief description
        title: String,
        /// Details: Markdown details (optional)
        details: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_task(list_id, column, title, details).await
    }

    /// **Discard**: Delete a task permanently. The column it vacated is
    /// compacted so positions stay dense.
    #[tool]
    async fn delete_task(
        &self,
        /// List the task belongs to
        list_id: String,
        /// ID of the task to delete
        task_id: String,
    ) -> McpResult<String> {
        self.handle_delete_task(list_id, task_id).await
    }

    /// **Organize**: Move a task to the top of another column (e.g. backlog
    /// to at_work when starting work, at_work to finished when done).
    #[tool]
    async fn move_task(
        &self,
        /// List the task belongs to
        list_id: String,
        /// ID of the task to move
        task_id: String,
        /// Target column: backlog/at_work/finished
        target_column: String,
    ) -> McpResult<String> {
        self.handle_move_task(list_id, task_id, target_column).await
    }

    /// **Reorder**: Swap the positions of two tasks in the same column.
    #[tool]
    async fn reorder_tasks(
        &self,
        /// ID of the first task
        task_id: String,
        /// ID of the task to swap with
        target_task_id: String,
    ) -> McpResult<String> {
        self.handle_reorder_tasks(task_id, target_task_id).await
    }

    /// **Reorder**: Move a task to a named rank within its column.
    #[tool]
    async fn move_task_to_rank(
        &self,
        /// ID of the task to move
        task_id: String,
        /// Target rank: top/bottom/one_up/one_down
        target: String,
    ) -> McpResult<String> {
        self.handle_move_task_to_rank(task_id, target).await
    }

    /// **Clarify**: Edit task content - title, details, labels. Does not
    /// change the task's position.
    /// **Tip**: Use empty string "" to clear the details field.
    #[tool]
    async fn update_task(
        &self,
        /// ID of the task to update
        task_id: String,
        /// New title (optional)
        title: Option<String>,
        /// New details in Markdown, ""=clear (optional)
        details: Option<String>,
        /// Label IDs to attach, replaces the current set (optional)
        label_ids: Option<Vec<String>>,
    ) -> McpResult<String> {
        self.handle_update_task(task_id, title, details, label_ids)
            .await
    }

    /// **Review**: Show a board - every column of a list with its tasks in
    /// order. Start here.
    #[tool]
    async fn show_board(
        &self,
        /// ID of the list to show
        list_id: String,
    ) -> McpResult<String> {
        self.handle_show_board(list_id).await
    }

    /// Create a new task list.
    #[tool]
    async fn add_list(
        &self,
        /// Display name
        name: String,
        /// Display color, e.g. "#1e90ff" (optional)
        color: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_list(name, color).await
    }

    /// Show all task lists.
    #[tool]
    async fn list_lists(&self) -> McpResult<String> {
        self.handle_list_lists().await
    }

    /// Rename or recolor a task list.
    /// **Tip**: Use empty string "" to clear the color.
    #[tool]
    async fn update_list(
        &self,
        /// ID of the list to update
        list_id: String,
        /// New display name (optional)
        name: Option<String>,
        /// New color, ""=clear (optional)
        color: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_list(list_id, name, color).await
    }

    /// Delete a task list. Refused while the list still has tasks.
    #[tool]
    async fn delete_list(
        &self,
        /// ID of the list to delete
        list_id: String,
    ) -> McpResult<String> {
        self.handle_delete_list(list_id).await
    }

    /// Create a label that can be attached to tasks via update_task.
    #[tool]
    async fn add_label(
        &self,
        /// Display name
        name: String,
        /// Language code of the name, defaults to "en" (optional)
        language: Option<String>,
        /// Display color, e.g. "#ff0000" (optional)
        color: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_label(name, language, color).await
    }

    /// Show all labels with their task reference counts.
    #[tool]
    async fn list_labels(&self) -> McpResult<String> {
        self.handle_list_labels().await
    }

    /// Add or change a label's display name for a language, or its color.
    /// **Tip**: Use empty string "" to clear the color.
    #[tool]
    async fn update_label(
        &self,
        /// ID of the label to update
        label_id: String,
        /// Language code for the name, defaults to "en" (optional)
        language: Option<String>,
        /// New display name (optional)
        name: Option<String>,
        /// New color, ""=clear (optional)
        color: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_label(label_id, language, name, color)
            .await
    }

    /// Delete a label. Refused while any task still references it.
    #[tool]
    async fn delete_label(
        &self,
        /// ID of the label to delete
        label_id: String,
    ) -> McpResult<String> {
        self.handle_delete_label(label_id).await
    }
}
