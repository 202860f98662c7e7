//! Board domain models
//!
//! This module contains the core Kanban data structures. It is split into
//! submodules for better organization:
//! - `task`: Task entity, board columns and rank targets
//! - `list`: TaskList metadata (name, color)
//! - `label`: Label entity with per-language display names

mod label;
mod list;
mod task;

// Re-export all public types
pub use label::Label;
pub use list::TaskList;
pub use task::{BoardColumn, RankTarget, Task, new_entity_id, now};
