//! Task repository
//!
//! Read/write access to individual task records plus bulk retrieval of all
//! tasks of a list. Retrieval is a paginated full-table scan filtered in
//! memory: the store has no secondary indexes and none are emulated here.

use tracing::debug;

use super::{decode, encode};
use crate::error::{BoardError, Result};
use crate::model::{BoardColumn, Task, now};
use crate::store::{Document, StoreGateway, TASKS_TABLE, scan_all};
use std::sync::Arc;

/// Repository for task records in the `tasks` table
///
/// Tasks are keyed by task ID alone; `list_id` is a document field, and
/// list-scoped callers verify it after loading.
#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn StoreGateway>,
}

impl TaskRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    /// Load a single task
    ///
    /// # Errors
    /// `TaskNotFound` if the ID does not resolve to a stored record.
    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let doc = self
            .store
            .get(TASKS_TABLE, task_id)
            .await?
            .ok_or_else(|| BoardError::TaskNotFound {
                id: task_id.to_string(),
            })?;
        Ok(decode(doc)?)
    }

    /// All tasks belonging to a list, in no particular order
    pub async fn tasks_for_list(&self, list_id: &str) -> Result<Vec<Task>> {
        let docs = scan_all(self.store.as_ref(), TASKS_TABLE).await?;
        let mut tasks = Vec::new();
        for doc in docs {
            let task: Task = decode(doc)?;
            if task.list_id == list_id {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    /// All tasks of one (list, column) partition, sorted by position
    pub async fn partition(&self, list_id: &str, column: BoardColumn) -> Result<Vec<Task>> {
        let mut tasks = self.tasks_for_list(list_id).await?;
        tasks.retain(|task| task.column == column);
        tasks.sort_by_key(|task| task.position);
        Ok(tasks)
    }

    /// Insert a task, or overwrite the mutable fields of an existing one
    ///
    /// This is read-then-write (get, branch, put-or-update), not an atomic
    /// upsert: a second writer inserting the same ID between the get and the
    /// put wins silently. Known limitation of the store contract.
    pub async fn create_or_update(&self, task: &Task) -> Result<()> {
        let existing = self.store.get(TASKS_TABLE, &task.id).await?;
        if existing.is_some() {
            self.store
                .update(TASKS_TABLE, &task.id, mutable_fields(task)?)
                .await?;
        } else {
            self.store
                .put(TASKS_TABLE, &task.id, encode(task)?)
                .await?;
        }
        Ok(())
    }

    /// Rewrite only the position of a task
    ///
    /// Used by the sequencer for the neighbor shifts of a repositioning
    /// operation; neighbors keep their `updated_at`.
    pub async fn set_position(&self, task_id: &str, position: u32) -> Result<()> {
        debug!(task_id, position, "set position");
        let mut fields = Document::new();
        fields.insert(
            "position".to_string(),
            toml::Value::Integer(i64::from(position)),
        );
        self.store.update(TASKS_TABLE, task_id, fields).await?;
        Ok(())
    }

    /// Rewrite the position of a task and bump `updated_at`
    ///
    /// Used by the sequencer for the task the user acted on in a
    /// within-column reorder; neighbor shifts go through `set_position` and
    /// keep their timestamps.
    pub async fn set_position_and_touch(&self, task_id: &str, position: u32) -> Result<()> {
        debug!(task_id, position, "set position and touch");
        let mut fields = Document::new();
        fields.insert(
            "position".to_string(),
            toml::Value::Integer(i64::from(position)),
        );
        fields.insert(
            "updated_at".to_string(),
            toml::Value::try_from(now()).map_err(crate::store::StoreError::Serialize)?,
        );
        self.store.update(TASKS_TABLE, task_id, fields).await?;
        Ok(())
    }

    /// Re-point a task to a new column and position
    ///
    /// Used by the sequencer for the moved task of a cross-column move; this
    /// one does bump `updated_at`.
    pub async fn set_column_and_position(
        &self,
        task_id: &str,
        column: BoardColumn,
        position: u32,
    ) -> Result<()> {
        debug!(task_id, %column, position, "set column and position");
        let mut fields = Document::new();
        fields.insert(
            "column".to_string(),
            toml::Value::try_from(column).map_err(crate::store::StoreError::Serialize)?,
        );
        fields.insert(
            "position".to_string(),
            toml::Value::Integer(i64::from(position)),
        );
        fields.insert(
            "updated_at".to_string(),
            toml::Value::try_from(now()).map_err(crate::store::StoreError::Serialize)?,
        );
        self.store.update(TASKS_TABLE, task_id, fields).await?;
        Ok(())
    }

    /// Delete a task record
    ///
    /// # Errors
    /// `TaskNotFound` if the task does not exist at call time; the store's
    /// own delete is idempotent, so the existence check happens here.
    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        if self.store.get(TASKS_TABLE, task_id).await?.is_none() {
            return Err(BoardError::TaskNotFound {
                id: task_id.to_string(),
            });
        }
        self.store.delete(TASKS_TABLE, task_id).await?;
        Ok(())
    }
}

/// The fields overwritten when an existing task is saved
///
/// `id`, `list_id` and `created_at` are immutable and never part of an
/// update. TOML has no null, so a cleared `details` is written as an empty
/// string rather than by removing the key.
fn mutable_fields(task: &Task) -> Result<Document> {
    let mut fields = encode(task)?;
    fields.remove("id");
    fields.remove("list_id");
    fields.remove("created_at");
    fields
        .entry("details".to_string())
        .or_insert_with(|| toml::Value::String(String::new()));
    Ok(fields)
}
