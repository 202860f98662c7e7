//! Position sequencer
//!
//! The one component that maintains the density invariant: within every
//! (list, column) partition the task positions form exactly `{0..K-1}`, no
//! gaps, no duplicates. The store writes one document at a time, so every
//! operation here is read-full-partition, recompute-affected-subrange,
//! write-each-changed-task-individually.
//!
//! Two hardening measures wrap each operation:
//! - the partition lock (`PartitionLocks`) serializes operations that touch
//!   the same partition, closing the interleaving races of concurrent
//!   read-compute-write sequences; the lock key comes from an unlocked peek
//!   of the task, so the task's column is re-validated after acquisition and
//!   the lock retaken if a concurrent move re-pointed it in between;
//! - a post-condition check re-reads the partition and surfaces
//!   `OrderingConflict` if the position set is no longer dense.
//!
//! A store failure between individual writes still leaves the partition
//! partially updated. There is no rollback; the error propagates and the
//! completed prefix of writes stays in place.

use tracing::{debug, info, warn};

use crate::error::{BoardError, Result};
use crate::locks::{PartitionGuard, PartitionLocks};
use crate::model::{BoardColumn, RankTarget, Task};
use crate::repo::TaskRepository;

/// Repositioning operations over (list, column) partitions
pub struct PositionSequencer {
    tasks: TaskRepository,
    locks: PartitionLocks,
}

impl PositionSequencer {
    /// Create a sequencer over the given task repository
    pub fn new(tasks: TaskRepository) -> Self {
        Self {
            tasks,
            locks: PartitionLocks::new(),
        }
    }

    /// Insert a new task at position 0 of its partition
    ///
    /// Every existing task of the partition is pushed down by one, then the
    /// new task is persisted at position 0. The snapshot is taken before any
    /// write; the write order of the shifts does not matter since each write
    /// is independent.
    pub async fn insert_at_top(&self, task: Task) -> Result<()> {
        let _guard = self.locks.acquire(&task.list_id, task.column).await;

        let snapshot = self.tasks.partition(&task.list_id, task.column).await?;
        debug!(
            list_id = %task.list_id,
            column = %task.column,
            shifted = snapshot.len(),
            "insert at top"
        );
        for existing in &snapshot {
            self.tasks
                .set_position(&existing.id, existing.position + 1)
                .await?;
        }

        let mut task = task;
        task.position = 0;
        let list_id = task.list_id.clone();
        let column = task.column;
        self.tasks.create_or_update(&task).await?;

        self.verify_density(&list_id, column, "insert_at_top").await
    }

    /// Delete a task and close the gap it leaves behind
    ///
    /// The task's (column, position) is captured under the partition lock,
    /// the record is deleted, then every remaining task with a higher
    /// position is pulled up by one. Compaction runs only after the delete
    /// committed, so the captured position is never stale.
    ///
    /// Returns the deleted task.
    pub async fn remove_task(&self, list_id: &str, task_id: &str) -> Result<Task> {
        let (_guard, task) = self.lock_task(task_id).await?;
        if task.list_id != list_id {
            return Err(BoardError::WrongList {
                id: task_id.to_string(),
                list_id: list_id.to_string(),
            });
        }
        info!(
            task_id,
            list_id,
            column = %task.column,
            position = task.position,
            "delete task"
        );
        self.tasks.delete_task(task_id).await?;
        self.compact(list_id, task.column, task.position).await?;

        self.verify_density(list_id, task.column, "remove_task")
            .await?;
        Ok(task)
    }

    /// Move a task to position 0 of another column
    ///
    /// Equivalent to delete-and-compact in the source plus insert-at-top in
    /// the destination. The write order is deliberate:
    /// (a) snapshot the source position, (b) push the destination partition
    /// down, (c) re-point the moved task, (d) compact the source using the
    /// position captured in (a). The destination push-down happens before
    /// the moved task is written so the task never collides with an existing
    /// position 0; the source compaction comes last, so a concurrent reader
    /// between (c) and (d) sees a duplicate-free source with one transient
    /// gap.
    ///
    /// Moving a task to the column it is already in is a no-op.
    pub async fn move_to_column(
        &self,
        list_id: &str,
        task_id: &str,
        target: BoardColumn,
    ) -> Result<()> {
        // (a) snapshot the task and its source position under the locks. The
        // locks were chosen from a peek taken before they existed, so the
        // re-read column must still match; a concurrent move re-pointing the
        // task in that window means the locks guard the wrong partition and
        // are retaken.
        let (_guards, task) = loop {
            let peek = self.checked_task(list_id, task_id).await?;
            if peek.column == target {
                return Ok(());
            }
            let guards = self.locks.acquire_pair(list_id, peek.column, target).await;
            let task = self.tasks.get_task(task_id).await?;
            if task.column == peek.column {
                break (guards, task);
            }
        };
        let source_column = task.column;
        let source_position = task.position;
        info!(
            task_id,
            list_id,
            from = %source_column,
            to = %target,
            "move task across columns"
        );

        // (b) make room at the top of the destination
        let destination = self.tasks.partition(list_id, target).await?;
        for existing in &destination {
            self.tasks
                .set_position(&existing.id, existing.position + 1)
                .await?;
        }

        // (c) re-point the moved task
        self.tasks
            .set_column_and_position(task_id, target, 0)
            .await?;

        // (d) close the gap in the source with the position from (a)
        self.compact(list_id, source_column, source_position).await?;

        self.verify_density(list_id, source_column, "move_to_column")
            .await?;
        self.verify_density(list_id, target, "move_to_column").await
    }

    /// Exchange the positions of two tasks in the same partition
    ///
    /// Exactly two writes; no other task is touched. Swapping the same pair
    /// twice restores the original order.
    pub async fn swap(&self, task_id: &str, target_task_id: &str) -> Result<()> {
        if task_id == target_task_id {
            return Ok(());
        }

        let (_guard, a) = self.lock_task(task_id).await?;
        let b = self.tasks.get_task(target_task_id).await?;
        if a.list_id != b.list_id || a.column != b.column {
            return Err(BoardError::DifferentPartition {
                a: a.id,
                b: b.id,
            });
        }

        debug!(
            task_id,
            target_task_id,
            list_id = %a.list_id,
            column = %a.column,
            "swap positions"
        );
        self.tasks.set_position_and_touch(&a.id, b.position).await?;
        self.tasks.set_position_and_touch(&b.id, a.position).await?;

        self.verify_density(&a.list_id, a.column, "swap").await
    }

    /// Move a task to a named rank within its column
    ///
    /// `top` resolves to 0, `bottom` to K-1, `one_up`/`one_down` to one step
    /// from the current position, clamped at the partition edges.
    pub async fn move_to_rank(&self, task_id: &str, target: RankTarget) -> Result<()> {
        let (_guard, task) = self.lock_task(task_id).await?;

        let partition = self.tasks.partition(&task.list_id, task.column).await?;
        let last = (partition.len() as u32).saturating_sub(1);
        let target_rank = match target {
            RankTarget::top => 0,
            RankTarget::bottom => last,
            RankTarget::one_up => task.position.saturating_sub(1),
            RankTarget::one_down => (task.position + 1).min(last),
        };

        self.shift_within(&partition, &task, target_rank).await
    }

    /// Move a task to an arbitrary rank within its column
    ///
    /// Ranks beyond the end of the partition are clamped to K-1.
    pub async fn move_to_index(&self, task_id: &str, index: u32) -> Result<()> {
        let (_guard, task) = self.lock_task(task_id).await?;

        let partition = self.tasks.partition(&task.list_id, task.column).await?;
        let last = (partition.len() as u32).saturating_sub(1);

        self.shift_within(&partition, &task, index.min(last)).await
    }

    /// Range shift: move `task` from its current rank `c` to rank `p`
    ///
    /// For `p < c` every task in `[p, c-1]` shifts down by one; for `p > c`
    /// every task in `[c+1, p]` shifts up by one; `p == c` writes nothing.
    /// Exactly `|c - p| + 1` tasks are written. Caller holds the partition
    /// lock and passes the partition snapshot it read under it.
    async fn shift_within(&self, partition: &[Task], task: &Task, target_rank: u32) -> Result<()> {
        let current = task.position;
        if target_rank == current {
            return Ok(());
        }
        debug!(
            task_id = %task.id,
            list_id = %task.list_id,
            column = %task.column,
            from = current,
            to = target_rank,
            "shift within column"
        );

        if target_rank < current {
            // Everything from the target up to just above the vacated slot
            // moves one rank down the list
            for neighbor in partition
                .iter()
                .filter(|t| t.position >= target_rank && t.position < current)
            {
                self.tasks
                    .set_position(&neighbor.id, neighbor.position + 1)
                    .await?;
            }
        } else {
            for neighbor in partition
                .iter()
                .filter(|t| t.position > current && t.position <= target_rank)
            {
                self.tasks
                    .set_position(&neighbor.id, neighbor.position - 1)
                    .await?;
            }
        }
        self.tasks
            .set_position_and_touch(&task.id, target_rank)
            .await?;

        self.verify_density(&task.list_id, task.column, "shift_within")
            .await
    }

    /// Resolve a task and lock the partition it currently lives in
    ///
    /// The lock key comes from a peek taken before the lock is held, so the
    /// task is re-read after acquisition. If a concurrent move re-pointed it
    /// to another column in that window, the guard covers the wrong
    /// partition; it is dropped and the lookup starts over.
    async fn lock_task(&self, task_id: &str) -> Result<(PartitionGuard, Task)> {
        loop {
            let peek = self.tasks.get_task(task_id).await?;
            let guard = self.locks.acquire(&peek.list_id, peek.column).await;
            let task = self.tasks.get_task(task_id).await?;
            if task.column == peek.column {
                return Ok((guard, task));
            }
        }
    }

    /// Shared load-and-ownership check for list-scoped operations
    async fn checked_task(&self, list_id: &str, task_id: &str) -> Result<Task> {
        let task = self.tasks.get_task(task_id).await?;
        if task.list_id != list_id {
            return Err(BoardError::WrongList {
                id: task_id.to_string(),
                list_id: list_id.to_string(),
            });
        }
        Ok(task)
    }

    /// Close the gap left at `vacated` after a task left the partition
    async fn compact(&self, list_id: &str, column: BoardColumn, vacated: u32) -> Result<()> {
        let partition = self.tasks.partition(list_id, column).await?;
        for task in partition.iter().filter(|t| t.position > vacated) {
            self.tasks.set_position(&task.id, task.position - 1).await?;
        }
        Ok(())
    }

    /// Post-condition: the partition's position set equals `{0..K-1}`
    async fn verify_density(
        &self,
        list_id: &str,
        column: BoardColumn,
        operation: &'static str,
    ) -> Result<()> {
        let partition = self.tasks.partition(list_id, column).await?;
        let dense = partition
            .iter()
            .enumerate()
            .all(|(rank, task)| task.position as usize == rank);
        if dense {
            return Ok(());
        }

        warn!(
            list_id,
            %column,
            operation,
            positions = ?partition.iter().map(|t| t.position).collect::<Vec<_>>(),
            "partition ordering is no longer dense"
        );
        Err(BoardError::OrderingConflict {
            list_id: list_id.to_string(),
            column,
            operation,
        })
    }
}
