//! Per-partition mutual exclusion
//!
//! The document store offers no multi-item transactions, so every
//! repositioning operation is a read-compute-write sequence with await
//! points between the individual writes. Two such sequences interleaving on
//! the same (list, column) partition can silently corrupt its ordering: both
//! read the same snapshot and both write position 0, for example. The lock
//! registry here serializes operations per partition; guards are RAII and
//! release on every exit path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::model::BoardColumn;

/// Guard holding one partition, released on drop
pub type PartitionGuard = OwnedMutexGuard<()>;

/// Registry of advisory locks keyed by (list, column)
///
/// Lock slots are created on first use and never removed; the number of
/// partitions ever touched by one server process stays small.
#[derive(Default)]
pub struct PartitionLocks {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl PartitionLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap();
        slots.entry(key.to_string()).or_default().clone()
    }

    fn key(list_id: &str, column: BoardColumn) -> String {
        format!("{list_id}/{column}")
    }

    /// Acquire the lock of a single partition
    pub async fn acquire(&self, list_id: &str, column: BoardColumn) -> PartitionGuard {
        self.slot(&Self::key(list_id, column)).lock_owned().await
    }

    /// Acquire the locks of two partitions of the same list
    ///
    /// Locks are taken in key order regardless of argument order, so two
    /// concurrent cross-column moves in opposite directions cannot deadlock.
    /// When both arguments name the same partition only one lock is taken.
    pub async fn acquire_pair(
        &self,
        list_id: &str,
        first: BoardColumn,
        second: BoardColumn,
    ) -> (PartitionGuard, Option<PartitionGuard>) {
        let key_a = Self::key(list_id, first);
        let key_b = Self::key(list_id, second);
        if key_a == key_b {
            return (self.slot(&key_a).lock_owned().await, None);
        }

        let (lo, hi) = if key_a < key_b {
            (key_a, key_b)
        } else {
            (key_b, key_a)
        };
        let lo_guard = self.slot(&lo).lock_owned().await;
        let hi_guard = self.slot(&hi).lock_owned().await;
        (lo_guard, Some(hi_guard))
    }
}
