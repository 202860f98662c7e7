//! Document store gateway
//!
//! The repositories talk to the store exclusively through the `StoreGateway`
//! trait: per-document get/put/update/delete plus a paginated full-table
//! scan. There are deliberately no multi-document transactions and no
//! server-side ordering; everything the ordering subsystem needs is built on
//! top of these per-item primitives.
//!
//! Two implementations are provided:
//! - `MemoryStore`: in-memory tables, used by tests and `--in-memory` runs
//! - `FileStore`: one TOML document per key on disk

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// A stored document: a flat TOML table keyed by field name
pub type Document = toml::Table;

/// Table holding task records
pub const TASKS_TABLE: &str = "tasks";
/// Table holding list metadata
pub const LISTS_TABLE: &str = "lists";
/// Table holding label records
pub const LABELS_TABLE: &str = "labels";

/// Maximum number of documents returned per scan page
pub const SCAN_PAGE_SIZE: usize = 100;

/// Errors surfaced by store gateway implementations
///
/// Gateway errors propagate unchanged through the repositories and the
/// sequencer: there is no retry and no rollback of writes that already
/// completed before the failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conditional update targeted a document that does not exist
    #[error("document not found: {table}/{key}")]
    MissingDocument { table: String, key: String },

    /// IO error from the underlying storage
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be serialized
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Document could not be deserialized
    #[error("deserialize error: {0}")]
    Deserialize(#[from] toml::de::Error),
}

/// One page of a table scan
#[derive(Debug, Default)]
pub struct ScanPage {
    /// Documents in this page, in ascending key order
    pub items: Vec<Document>,
    /// Token to pass to the next `scan` call; `None` when the scan is done
    pub next_token: Option<String>,
}

/// Per-document access to a key-value document store
///
/// Every call is an async suspension point; between any two calls another
/// request may interleave and observe or mutate the same documents. Callers
/// that need isolation over a group of documents must bring their own
/// mutual exclusion (see `PartitionLocks`).
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Fetch a single document, `None` if the key does not exist
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Insert or overwrite a full document
    async fn put(&self, table: &str, key: &str, doc: Document) -> Result<(), StoreError>;

    /// Merge the given fields into an existing document
    ///
    /// Fails with `MissingDocument` if the key does not exist; fields not
    /// present in `fields` keep their stored values.
    async fn update(&self, table: &str, key: &str, fields: Document) -> Result<(), StoreError>;

    /// Delete a document; deleting a missing key is not an error
    ///
    /// Existence checks belong to the repository layer, which reads before
    /// deleting and reports `NotFound` to its caller.
    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError>;

    /// Fetch one page of a full-table scan
    ///
    /// Pass `page_token` from the previous page to continue; `None` starts
    /// from the beginning.
    async fn scan(&self, table: &str, page_token: Option<&str>) -> Result<ScanPage, StoreError>;
}

/// Drain a paginated scan into a single vector
pub async fn scan_all(store: &dyn StoreGateway, table: &str) -> Result<Vec<Document>, StoreError> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    loop {
        let page = store.scan(table, token.as_deref()).await?;
        items.extend(page.items);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(items)
}
