//! Repositories over the store gateway
//!
//! Each repository wraps one table of the document store and converts between
//! domain types and stored TOML documents:
//! - `tasks`: task records and per-list / per-partition retrieval
//! - `lists`: task-list metadata
//! - `labels`: label records and the full-scan reference count

mod labels;
mod lists;
mod tasks;

pub use labels::LabelRepository;
pub use lists::ListRepository;
pub use tasks::TaskRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{Document, StoreError};

/// Serialize a domain value into a stored document
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    Ok(Document::try_from(value)?)
}

/// Deserialize a stored document into a domain value
pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(doc.try_into()?)
}
