//! List repository
//!
//! List metadata (name, color) lives in its own table, separate from tasks.
//! Assembling a full board view is the caller's job: load the metadata here,
//! load the task set through `TaskRepository::tasks_for_list`.

use super::{decode, encode};
use crate::error::{BoardError, Result};
use crate::model::TaskList;
use crate::store::{LISTS_TABLE, StoreGateway, scan_all};
use std::sync::Arc;

/// Repository for list metadata in the `lists` table
#[derive(Clone)]
pub struct ListRepository {
    store: Arc<dyn StoreGateway>,
}

impl ListRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn StoreGateway>) -> Self {
        Self { store }
    }

    /// Load a single list
    ///
    /// # Errors
    /// `ListNotFound` if the ID does not resolve to a stored record.
    pub async fn get_list(&self, list_id: &str) -> Result<TaskList> {
        let doc = self
            .store
            .get(LISTS_TABLE, list_id)
            .await?
            .ok_or_else(|| BoardError::ListNotFound {
                id: list_id.to_string(),
            })?;
        Ok(decode(doc)?)
    }

    /// All lists, sorted by name
    pub async fn all_lists(&self) -> Result<Vec<TaskList>> {
        let docs = scan_all(self.store.as_ref(), LISTS_TABLE).await?;
        let mut lists = Vec::new();
        for doc in docs {
            lists.push(decode::<TaskList>(doc)?);
        }
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    /// Insert a list, or overwrite the mutable fields of an existing one
    ///
    /// Read-then-write like the task repository; the same duplicate-key race
    /// between the get and the put applies.
    pub async fn create_or_update(&self, list: &TaskList) -> Result<()> {
        let existing = self.store.get(LISTS_TABLE, &list.id).await?;
        if existing.is_some() {
            let mut fields = encode(list)?;
            fields.remove("id");
            fields.remove("created_at");
            // TOML has no null; a cleared color is written as ""
            fields
                .entry("color".to_string())
                .or_insert_with(|| toml::Value::String(String::new()));
            self.store.update(LISTS_TABLE, &list.id, fields).await?;
        } else {
            self.store.put(LISTS_TABLE, &list.id, encode(list)?).await?;
        }
        Ok(())
    }

    /// Delete a list record
    ///
    /// Only the metadata is removed. The caller is responsible for refusing
    /// the deletion while the list still has tasks.
    ///
    /// # Errors
    /// `ListNotFound` if the list does not exist at call time.
    pub async fn delete_list(&self, list_id: &str) -> Result<()> {
        if self.store.get(LISTS_TABLE, list_id).await?.is_none() {
            return Err(BoardError::ListNotFound {
                id: list_id.to_string(),
            });
        }
        self.store.delete(LISTS_TABLE, list_id).await?;
        Ok(())
    }
}
