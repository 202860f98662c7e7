//! Label repository
//!
//! Label CRUD plus the reference count used to guard deletions. The count is
//! computed by a full scan of the task table with an in-memory tally, not an
//! indexed join; it is eventually consistent with respect to concurrent task
//! edits, which is acceptable for an advisory check.

use super::{decode, encode};
use crate::error::{BoardError, Result};
use crate::model::{Label, Task};
use crate::store::{LABELS_TABLE, StoreGateway, TASKS_TABLE, scan_all};
use std::sync::Arc;

/// Repository for label records in the `labels` table
#[derive(Clone)]
pub struct LabelRepository {
    store: Arc<dyn StoreGateway>,
}

impl LabelRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    /// Load a single label
    ///
    /// # Errors
    /// `LabelNotFound` if the ID does not resolve to a stored record.
    pub async fn get_label(&self, label_id: &str) -> Result<Label> {
        let doc = self
            .store
            .get(LABELS_TABLE, label_id)
            .await?
            .ok_or_else(|| BoardError::LabelNotFound {
                id: label_id.to_string(),
            })?;
        Ok(decode(doc)?)
    }

    /// All labels, in key order
    pub async fn all_labels(&self) -> Result<Vec<Label>> {
        let docs = scan_all(self.store.as_ref(), LABELS_TABLE).await?;
        let mut labels = Vec::new();
        for doc in docs {
            labels.push(decode::<Label>(doc)?);
        }
        Ok(labels)
    }

    /// Insert a label, or overwrite an existing one
    pub async fn create_or_update(&self, label: &Label) -> Result<()> {
        let existing = self.store.get(LABELS_TABLE, &label.id).await?;
        if existing.is_some() {
            let mut fields = encode(label)?;
            fields.remove("id");
            // TOML has no null; a cleared color is written as ""
            fields
                .entry("color".to_string())
                .or_insert_with(|| toml::Value::String(String::new()));
            self.store.update(LABELS_TABLE, &label.id, fields).await?;
        } else {
            self.store
                .put(LABELS_TABLE, &label.id, encode(label)?)
                .await?;
        }
        Ok(())
    }

    /// Number of tasks currently referencing a label
    ///
    /// Full scan of the task table. Callers must check this is zero before
    /// deleting a label; the repository itself does not enforce it.
    pub async fn reference_count(&self, label_id: &str) -> Result<usize> {
        let docs = scan_all(self.store.as_ref(), TASKS_TABLE).await?;
        let mut count = 0;
        for doc in docs {
            let task: Task = decode(doc)?;
            if task.label_ids.iter().any(|id| id == label_id) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Delete a label record
    ///
    /// Does not check the reference count; that check is advisory and lives
    /// with the caller.
    ///
    /// # Errors
    /// `LabelNotFound` if the label does not exist at call time.
    pub async fn delete_label(&self, label_id: &str) -> Result<()> {
        if self.store.get(LABELS_TABLE, label_id).await?.is_none() {
            return Err(BoardError::LabelNotFound {
                id: label_id.to_string(),
            });
        }
        self.store.delete(LABELS_TABLE, label_id).await?;
        Ok(())
    }
}
