use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Get the current timestamp
///
/// Timestamps are serialized in RFC 3339 (UTC), which sorts lexicographically
/// in the same order as chronologically.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a new globally unique entity ID
///
/// ULIDs are used for all entities (tasks, lists, labels): they are sortable
/// by creation time and safe to use as document keys and file names.
pub fn new_entity_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Board column a task lives in
///
/// The columns form a fixed ordered set. A task belongs to exactly one column
/// at a time; its `position` is only meaningful within its (list, column)
/// partition. Uses snake_case naming to match TOML serialization format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardColumn {
    /// Collected but not started
    backlog,
    /// Currently being worked on
    at_work,
    /// Completed
    finished,
}

impl BoardColumn {
    /// All columns in display order
    pub const ALL: [BoardColumn; 3] = [
        BoardColumn::backlog,
        BoardColumn::at_work,
        BoardColumn::finished,
    ];
}

impl FromStr for BoardColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(BoardColumn::backlog),
            "at_work" => Ok(BoardColumn::at_work),
            "finished" => Ok(BoardColumn::finished),
            _ => Err(format!(
                "Invalid column '{}'. Valid options are: backlog, at_work, finished",
                s
            )),
        }
    }
}

impl fmt::Display for BoardColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoardColumn::backlog => "backlog",
            BoardColumn::at_work => "at_work",
            BoardColumn::finished => "finished",
        };
        f.write_str(name)
    }
}

/// Target rank for a within-column move
///
/// `top` and `bottom` are resolved against the partition size at execution
/// time; `one_up` and `one_down` are single-step moves relative to the task's
/// current position.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTarget {
    /// Move to position 0
    top,
    /// Move to the last position in the column
    bottom,
    /// Move one position towards the top
    one_up,
    /// Move one position towards the bottom
    one_down,
}

impl FromStr for RankTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(RankTarget::top),
            "bottom" => Ok(RankTarget::bottom),
            "one_up" => Ok(RankTarget::one_up),
            "one_down" => Ok(RankTarget::one_down),
            _ => Err(format!(
                "Invalid rank target '{}'. Valid options are: top, bottom, one_up, one_down",
                s
            )),
        }
    }
}

impl fmt::Display for RankTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankTarget::top => "top",
            RankTarget::bottom => "bottom",
            RankTarget::one_up => "one_up",
            RankTarget::one_down => "one_down",
        };
        f.write_str(name)
    }
}

/// A task on a Kanban board
///
/// A task is owned by exactly one list (via `list_id`, immutable after
/// creation) and sits in exactly one column at a time. Within its
/// (list, column) partition the `position` values of all tasks form the dense
/// set `{0..K-1}` with no gaps or duplicates; every repositioning operation
/// goes through the `PositionSequencer` to preserve that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, globally unique across all lists
    pub id: String,
    /// Owning list ID (immutable after creation)
    pub list_id: String,
    /// Board column this task currently lives in
    pub column: BoardColumn,
    /// Dense rank within the (list, column) partition, starting at 0
    pub position: u32,
    /// Short task description
    pub title: String,
    /// Optional additional details in Markdown format
    pub details: Option<String>,
    /// IDs of labels attached to this task
    #[serde(default)]
    pub label_ids: Vec<String>,
    /// Timestamp when the task was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task at position 0 of the given column
    ///
    /// The caller is expected to persist it through
    /// `PositionSequencer::insert_at_top` so the rest of the partition is
    /// shifted down to make room.
    pub fn new(
        list_id: impl Into<String>,
        column: BoardColumn,
        title: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        let timestamp = now();
        Self {
            id: new_entity_id(),
            list_id: list_id.into(),
            column,
            position: 0,
            title: title.into(),
            details,
            label_ids: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_str() {
        assert_eq!("backlog".parse::<BoardColumn>(), Ok(BoardColumn::backlog));
        assert_eq!("at_work".parse::<BoardColumn>(), Ok(BoardColumn::at_work));
        assert_eq!("finished".parse::<BoardColumn>(), Ok(BoardColumn::finished));
        assert!("doing".parse::<BoardColumn>().is_err());
    }

    #[test]
    fn test_column_display_round_trip() {
        for column in BoardColumn::ALL {
            let parsed: BoardColumn = column.to_string().parse().unwrap();
            assert_eq!(parsed, column);
        }
    }

    #[test]
    fn test_rank_target_display_round_trip() {
        for target in [
            RankTarget::top,
            RankTarget::bottom,
            RankTarget::one_up,
            RankTarget::one_down,
        ] {
            let parsed: RankTarget = target.to_string().parse().unwrap();
            assert_eq!(parsed, target);
        }
    }

    #[test]
    fn test_rank_target_from_str() {
        assert_eq!("top".parse::<RankTarget>(), Ok(RankTarget::top));
        assert_eq!("bottom".parse::<RankTarget>(), Ok(RankTarget::bottom));
        assert_eq!("one_up".parse::<RankTarget>(), Ok(RankTarget::one_up));
        assert_eq!("one_down".parse::<RankTarget>(), Ok(RankTarget::one_down));
        assert!("middle".parse::<RankTarget>().is_err());
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("list-1", BoardColumn::backlog, "Write report", None);
        assert_eq!(task.list_id, "list-1");
        assert_eq!(task.column, BoardColumn::backlog);
        assert_eq!(task.position, 0);
        assert!(task.label_ids.is_empty());
        assert!(!task.id.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_task_serialization() {
        let mut task = Task::new(
            "list-1",
            BoardColumn::at_work,
            "Test Task",
            Some("Some details".to_string()),
        );
        task.label_ids = vec!["label-1".to_string()];

        let serialized = toml::to_string(&task).unwrap();
        let deserialized: Task = toml::from_str(&serialized).unwrap();

        assert_eq!(task.id, deserialized.id);
        assert_eq!(task.list_id, deserialized.list_id);
        assert_eq!(task.column, deserialized.column);
        assert_eq!(task.position, deserialized.position);
        assert_eq!(task.title, deserialized.title);
        assert_eq!(task.details, deserialized.details);
        assert_eq!(task.label_ids, deserialized.label_ids);
        assert_eq!(task.created_at, deserialized.created_at);
    }

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let earlier = now();
        let later = earlier + chrono::Duration::seconds(90);
        assert!(earlier.to_rfc3339() < later.to_rfc3339());
    }
}
