//! MCP tool handlers for the Kanban board server
//!
//! This module contains the implementation of all MCP tool handlers.
//! Each handler group is in a separate file for better organization.

pub mod board;
pub mod labels;
pub mod lists;
pub mod reorder;
pub mod tasks;
