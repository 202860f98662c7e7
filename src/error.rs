//! Error types for the board engine

use thiserror::Error;

use crate::model::BoardColumn;
use crate::store::StoreError;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
///
/// All variants bubble unchanged to the MCP layer; there is no local
/// recovery and no compensating transaction. A store failure in the middle
/// of a repositioning operation leaves the completed prefix of writes in
/// place.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// List not found
    #[error("list not found: {id}")]
    ListNotFound { id: String },

    /// Label not found
    #[error("label not found: {id}")]
    LabelNotFound { id: String },

    /// Task exists but belongs to a different list
    #[error("task '{id}' does not belong to list '{list_id}'")]
    WrongList { id: String, list_id: String },

    /// A pairwise reorder named two tasks from different partitions
    #[error("tasks '{a}' and '{b}' are not in the same list and column")]
    DifferentPartition { a: String, b: String },

    /// Post-condition check found a gap or duplicate in a partition
    ///
    /// Raised after a repositioning operation when the re-read position set
    /// of `(list_id, column)` is no longer `{0..K-1}`, which means a
    /// concurrent writer bypassed the partition lock or a previous partial
    /// failure was never repaired.
    #[error("positions of {list_id}/{column} are not dense after {operation}")]
    OrderingConflict {
        list_id: String,
        column: BoardColumn,
        operation: &'static str,
    },

    /// Store gateway failure, propagated unchanged
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::TaskNotFound {
            id: "abc123".to_string(),
        };
        assert_eq!(err.to_string(), "task not found: abc123");
    }

    #[test]
    fn test_ordering_conflict_display() {
        let err = BoardError::OrderingConflict {
            list_id: "list-1".to_string(),
            column: BoardColumn::at_work,
            operation: "insert_at_top",
        };
        assert_eq!(
            err.to_string(),
            "positions of list-1/at_work are not dense after insert_at_top"
        );
    }

    #[test]
    fn test_store_error_wraps() {
        let err = BoardError::from(StoreError::MissingDocument {
            table: "tasks".to_string(),
            key: "x".to_string(),
        });
        assert!(err.to_string().contains("tasks/x"));
    }
}
