//! Formatting helper functions for the Kanban MCP server
//!
//! This module renders boards, lists and labels into the plain-text
//! responses returned by the MCP tools.

use std::collections::HashMap;

use crate::model::{BoardColumn, Label, Task, TaskList};

/// Language used for label display names in responses
const DISPLAY_LANGUAGE: &str = "en";

/// Format a full board view: every column with its tasks in rank order
///
/// # Arguments
/// * `list` - List metadata (name, color)
/// * `tasks` - All tasks of the list, any order
/// * `labels` - All labels, used to resolve label IDs to display names
pub fn format_board(list: &TaskList, tasks: &[Task], labels: &[Label]) -> String {
    let labels_by_id: HashMap<&str, &Label> =
        labels.iter().map(|label| (label.id.as_str(), label)).collect();

    let mut result = format!("Board '{}' [{}]", list.name, list.id);
    // Cleared colors persist as "" (TOML has no null), hide those too
    if let Some(color) = list.color.as_deref().filter(|c| !c.is_empty()) {
        result.push_str(&format!(" (color: {})", color));
    }
    result.push('\n');

    for column in BoardColumn::ALL {
        let mut column_tasks: Vec<&Task> =
            tasks.iter().filter(|t| t.column == column).collect();
        column_tasks.sort_by_key(|t| t.position);

        result.push_str(&format!("\n{} ({} task(s)):\n", column, column_tasks.len()));
        if column_tasks.is_empty() {
            result.push_str("  (empty)\n");
            continue;
        }
        for task in column_tasks {
            result.push_str(&format_task_line(task, &labels_by_id));
        }
    }

    result
}

fn format_task_line(task: &Task, labels_by_id: &HashMap<&str, &Label>) -> String {
    let mut line = format!("  {}. [{}] {}", task.position, task.id, task.title);

    if !task.label_ids.is_empty() {
        let names: Vec<&str> = task
            .label_ids
            .iter()
            .map(|id| {
                labels_by_id
                    .get(id.as_str())
                    .map(|label| label.display_name(DISPLAY_LANGUAGE))
                    .unwrap_or("(missing label)")
            })
            .collect();
        line.push_str(&format!(" {{{}}}", names.join(", ")));
    }

    if task.details.as_deref().is_some_and(|d| !d.is_empty()) {
        line.push_str(" *");
    }
    line.push('\n');
    line
}

/// Format all lists into a display string
pub fn format_lists(lists: &[TaskList]) -> String {
    if lists.is_empty() {
        return "No lists found".to_string();
    }

    let mut result = format!("Found {} list(s):\n\n", lists.len());
    for list in lists {
        result.push_str(&format!("- [{}] {}", list.id, list.name));
        if let Some(color) = list.color.as_deref().filter(|c| !c.is_empty()) {
            result.push_str(&format!(" (color: {})", color));
        }
        result.push('\n');
    }
    result
}

/// Format all labels with their task reference counts
pub fn format_labels(labels: &[(Label, usize)]) -> String {
    if labels.is_empty() {
        return "No labels found".to_string();
    }

    let mut result = format!("Found {} label(s):\n\n", labels.len());
    for (label, count) in labels {
        result.push_str(&format!(
            "- [{}] {}",
            label.id,
            label.display_name(DISPLAY_LANGUAGE)
        ));
        if let Some(color) = label.color.as_deref().filter(|c| !c.is_empty()) {
            result.push_str(&format!(" (color: {})", color));
        }
        result.push_str(&format!(" - used by {} task(s)\n", count));
    }
    result
}
