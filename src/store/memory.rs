//! In-memory store gateway
//!
//! Backs tests and `--in-memory` runs. Tables are BTreeMaps so scans return
//! documents in stable ascending key order, matching the file-backed store.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Mutex;

use super::{Document, SCAN_PAGE_SIZE, ScanPage, StoreError, StoreGateway};

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreGateway for MemoryStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    async fn put(&self, table: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), doc);
        Ok(())
    }

    async fn update(&self, table: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let doc = tables
            .get_mut(table)
            .and_then(|t| t.get_mut(key))
            .ok_or_else(|| StoreError::MissingDocument {
                table: table.to_string(),
                key: key.to_string(),
            })?;
        for (field, value) in fields {
            doc.insert(field, value);
        }
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(t) = tables.get_mut(table) {
            t.remove(key);
        }
        Ok(())
    }

    async fn scan(&self, table: &str, page_token: Option<&str>) -> Result<ScanPage, StoreError> {
        let tables = self.tables.lock().unwrap();
        let Some(t) = tables.get(table) else {
            return Ok(ScanPage::default());
        };

        let start = match page_token {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };

        let mut items = Vec::new();
        let mut last_key = None;
        for (key, doc) in t.range((start, Bound::Unbounded)).take(SCAN_PAGE_SIZE) {
            items.push(doc.clone());
            last_key = Some(key.clone());
        }

        // Another page only exists when this one filled up
        let next_token = if items.len() == SCAN_PAGE_SIZE {
            last_key
        } else {
            None
        };
        Ok(ScanPage { items, next_token })
    }
}
