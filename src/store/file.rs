//! File-backed store gateway
//!
//! Persists each document as its own TOML file under
//! `<root>/<table>/<key>.toml`. Keys are ULIDs, so they are safe as file
//! names, and the directory listing sorted by name doubles as the scan order.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Document, SCAN_PAGE_SIZE, ScanPage, StoreError, StoreGateway};

/// Document store keeping one TOML file per document
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory and its table subdirectories are created lazily on the
    /// first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn document_path(&self, table: &str, key: &str) -> PathBuf {
        self.root.join(table).join(format!("{key}.toml"))
    }

    fn read_document(path: &Path) -> Result<Document, StoreError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn write_document(&self, table: &str, key: &str, doc: &Document) -> Result<(), StoreError> {
        fs::create_dir_all(self.root.join(table))?;
        let content = toml::to_string_pretty(doc)?;
        fs::write(self.document_path(table, key), content)?;
        Ok(())
    }

    /// All document keys of a table in ascending order
    fn table_keys(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(table);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "toml")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl StoreGateway for FileStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let path = self.document_path(table, key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_document(&path)?))
    }

    async fn put(&self, table: &str, key: &str, doc: Document) -> Result<(), StoreError> {
        self.write_document(table, key, &doc)
    }

    async fn update(&self, table: &str, key: &str, fields: Document) -> Result<(), StoreError> {
        let path = self.document_path(table, key);
        if !path.exists() {
            return Err(StoreError::MissingDocument {
                table: table.to_string(),
                key: key.to_string(),
            });
        }

        let mut doc = Self::read_document(&path)?;
        for (field, value) in fields {
            doc.insert(field, value);
        }
        self.write_document(table, key, &doc)
    }

    async fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        let path = self.document_path(table, key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    async fn scan(&self, table: &str, page_token: Option<&str>) -> Result<ScanPage, StoreError> {
        let keys = self.table_keys(table)?;
        let page_keys: Vec<&String> = keys
            .iter()
            .filter(|key| page_token.is_none_or(|token| key.as_str() > token))
            .take(SCAN_PAGE_SIZE)
            .collect();

        let mut items = Vec::new();
        for key in &page_keys {
            items.push(Self::read_document(&self.document_path(table, key))?);
        }

        let next_token = if items.len() == SCAN_PAGE_SIZE {
            page_keys.last().map(|key| (*key).clone())
        } else {
            None
        };
        Ok(ScanPage { items, next_token })
    }
}
