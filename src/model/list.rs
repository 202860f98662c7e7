use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{new_entity_id, now};

/// Metadata of a task list
///
/// A list is the top-level grouping of tasks; each of its columns is an
/// independent ordering partition. Only the metadata lives in the `lists`
/// table; the task set of a list is assembled by scanning the `tasks` table
/// and filtering on `list_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional display color (e.g. "#1e90ff")
    pub color: Option<String>,
    /// Timestamp when the list was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the list was last updated
    pub updated_at: DateTime<Utc>,
}

impl TaskList {
    /// Create a new list with a generated ID
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        let timestamp = now();
        Self {
            id: new_entity_id(),
            name: name.into(),
            color,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}
