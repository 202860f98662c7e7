//! Common test utilities for integration tests

use async_trait::async_trait;
use kanban_mcp::BoardServerHandler;
use kanban_mcp::model::BoardColumn;
use kanban_mcp::repo::TaskRepository;
use kanban_mcp::store::{Document, MemoryStore, ScanPage, StoreError, StoreGateway};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Create a test handler over a fresh in-memory store
///
/// The store is returned alongside so tests can build repositories over the
/// same documents the handler sees.
pub fn test_handler() -> (BoardServerHandler, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (BoardServerHandler::new(store.clone()), store)
}

/// Create a handler plus one list, returning the list ID
pub async fn test_board() -> (BoardServerHandler, Arc<MemoryStore>, String) {
    let (handler, store) = test_handler();
    let response = handler
        .handle_add_list("Test Board".to_string(), None)
        .await
        .unwrap();
    let list_id = extract_id_from_response(&response);
    (handler, store, list_id)
}

/// Extract an entity ID from a creation response message
///
/// Response format: "Task created with ID: <id> (list: ..., column: ...)"
/// or "List created with ID: <id>"
pub fn extract_id_from_response(response: &str) -> String {
    if let Some(start) = response.find("ID: ") {
        let id_part = &response[start + 4..];
        if let Some(end) = id_part.find(" (") {
            return id_part[..end].trim().to_string();
        }
        return id_part.trim().to_string();
    }
    // Fallback: last whitespace-separated token
    response
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_end_matches(')')
        .to_string()
}

/// Titles of a partition in rank order, with their positions
pub async fn partition_titles(
    tasks: &TaskRepository,
    list_id: &str,
    column: BoardColumn,
) -> Vec<(String, u32)> {
    tasks
        .partition(list_id, column)
        .await
        .unwrap()
        .into_iter()
        .map(|t| (t.title, t.position))
        .collect()
}

/// Assert the positions of a partition are exactly {0..K-1}
pub async fn assert_dense(tasks: &TaskRepository, list_id: &str, column: BoardColumn) {
    let partition = tasks.partition(list_id, column).await.unwrap();
    let positions: Vec<u32> = partition.iter().map(|t| t.position).collect();
    let expected: Vec<u32> = (0..partition.len() as u32).collect();
    assert_eq!(
        positions, expected,
        "partition {}/{} is not dense",
        list_id, column
    );
}

/// Store wrapper that counts write operations (put/update/delete)
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reset_writes(&self) {
        self.writes.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl StoreGateway for CountingStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(table, key).await
    }

    async fn put(&self, table: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.put(table, key, doc).await
    }

    async fn update(&self, table: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(table, key, fields).await
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(table, key).await
    }

    async fn scan(&self, table: &str, page_token: Option<&str>) -> Result<ScanPage, StoreError> {
        self.inner.scan(table, page_token).await
    }
}

/// Store wrapper that pauses one designated read
///
/// The armed `get` performs its read, then parks until `open_gate`; the
/// value it returns is the one read before the pause. This reproduces a
/// request whose snapshot was taken before a concurrent operation ran to
/// completion in the same window.
pub struct GatedStore {
    inner: MemoryStore,
    gated_key: Mutex<Option<String>>,
    reached: Semaphore,
    resume: Semaphore,
}

impl GatedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            gated_key: Mutex::new(None),
            reached: Semaphore::new(0),
            resume: Semaphore::new(0),
        }
    }

    /// Pause the next `get` of the given key, after it has read its value
    pub fn gate_next_get(&self, key: &str) {
        *self.gated_key.lock().unwrap() = Some(key.to_string());
    }

    /// Wait until the gated read holds its value and is parked
    pub async fn wait_until_gated(&self) {
        self.reached.acquire().await.unwrap().forget();
    }

    /// Let the parked read return
    pub fn open_gate(&self) {
        self.resume.add_permits(1);
    }
}

#[async_trait]
impl StoreGateway for GatedStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let gated = {
            let mut armed = self.gated_key.lock().unwrap();
            if armed.as_deref() == Some(key) {
                armed.take();
                true
            } else {
                false
            }
        };
        let value = self.inner.get(table, key).await?;
        if gated {
            self.reached.add_permits(1);
            self.resume.acquire().await.unwrap().forget();
        }
        Ok(value)
    }

    async fn put(&self, table: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        self.inner.put(table, key, doc).await
    }

    async fn update(&self, table: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        self.inner.update(table, key, fields).await
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        self.inner.delete(table, key).await
    }

    async fn scan(&self, table: &str, page_token: Option<&str>) -> Result<ScanPage, StoreError> {
        self.inner.scan(table, page_token).await
    }
}

/// Store wrapper that starts failing writes after a budget is spent
///
/// Reads always succeed. Used to exercise the documented partial-failure
/// behavior: a repositioning operation that dies between its individual
/// writes leaves the completed prefix in place and propagates the error.
pub struct FailingStore {
    inner: MemoryStore,
    write_budget: AtomicUsize,
}

impl FailingStore {
    pub fn new(write_budget: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            write_budget: AtomicUsize::new(write_budget),
        }
    }

    /// Allow more writes again (to seed data before arming the failure)
    pub fn set_budget(&self, budget: usize) {
        self.write_budget.store(budget, Ordering::SeqCst);
    }

    fn consume_write(&self) -> Result<(), StoreError> {
        self.write_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StoreError::Io(std::io::Error::other("store unavailable")))
    }
}

#[async_trait]
impl StoreGateway for FailingStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(table, key).await
    }

    async fn put(&self, table: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        self.consume_write()?;
        self.inner.put(table, key, doc).await
    }

    async fn update(&self, table: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        self.consume_write()?;
        self.inner.update(table, key, fields).await
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        self.consume_write()?;
        self.inner.delete(table, key).await
    }

    async fn scan(&self, table: &str, page_token: Option<&str>) -> Result<ScanPage, StoreError> {
        self.inner.scan(table, page_token).await
    }
}
