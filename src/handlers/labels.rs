//! Label handlers
//!
//! Label deletion is guarded here, not in the repository: a label may only
//! be deleted while no task references it, and the reference count comes
//! from a full scan of the task table.

use crate::BoardServerHandler;
use crate::error::BoardError;
use crate::formatting;
use crate::model::Label;
use mcp_attr::{Result as McpResult, bail, bail_public};

impl BoardServerHandler {
    /// Create a new label
    pub async fn handle_add_label(
        &self,
        name: String,
        language: Option<String>,
        color: Option<String>,
    ) -> McpResult<String> {
        if name.trim().is_empty() {
            bail_public!(_, "Label name must not be empty");
        }

        let language = language.unwrap_or_else(|| "en".to_string());
        let label = Label::new(language, name.trim(), color.filter(|c| !c.is_empty()));
        let label_id = label.id.clone();
        if let Err(e) = self.labels.create_or_update(&label).await {
            bail!("Failed to save label: {}", e);
        }

        Ok(format!("Label created with ID: {}", label_id))
    }

    /// Show all labels with their task reference counts
    pub async fn handle_list_labels(&self) -> McpResult<String> {
        let labels = match self.labels.all_labels().await {
            Ok(labels) => labels,
            Err(e) => bail!("Failed to load labels: {}", e),
        };

        let mut with_counts = Vec::new();
        for label in labels {
            let count = match self.labels.reference_count(&label.id).await {
                Ok(count) => count,
                Err(e) => bail!("Failed to count label references: {}", e),
            };
            with_counts.push((label, count));
        }

        Ok(formatting::format_labels(&with_counts))
    }

    /// Add or change a label's display name for a language, or its color
    ///
    /// **Tip**: Use empty string "" to clear the color.
    pub async fn handle_update_label(
        &self,
        label_id: String,
        language: Option<String>,
        name: Option<String>,
        color: Option<String>,
    ) -> McpResult<String> {
        let mut label = match self.labels.get_label(&label_id).await {
            Ok(label) => label,
            Err(BoardError::LabelNotFound { .. }) => {
                bail_public!(_, "Label '{}' does not exist", label_id)
            }
            Err(e) => bail!("Failed to load label: {}", e),
        };

        if let Some(new_name) = name {
            if new_name.trim().is_empty() {
                bail_public!(_, "Label name must not be empty");
            }
            let language = language.unwrap_or_else(|| "en".to_string());
            label
                .names
                .insert(language, new_name.trim().to_string());
        }
        if let Some(new_color) = color {
            label.color = if new_color.is_empty() {
                None
            } else {
                Some(new_color)
            };
        }

        if let Err(e) = self.labels.create_or_update(&label).await {
            bail!("Failed to save label: {}", e);
        }

        Ok(format!("Label {} updated", label.id))
    }

    /// Delete a label
    ///
    /// Refused while any task still references it; untag those tasks first.
    pub async fn handle_delete_label(&self, label_id: String) -> McpResult<String> {
        let count = match self.labels.reference_count(&label_id).await {
            Ok(count) => count,
            Err(e) => bail!("Failed to count label references: {}", e),
        };
        if count > 0 {
            bail_public!(
                _,
                "Label '{}' is referenced by {} task(s) and cannot be deleted",
                label_id,
                count
            );
        }

        match self.labels.delete_label(&label_id).await {
            Ok(()) => Ok(format!("Label {} deleted", label_id)),
            Err(BoardError::LabelNotFound { .. }) => {
                bail_public!(_, "Label '{}' does not exist", label_id)
            }
            Err(e) => bail!("Failed to delete label: {}", e),
        }
    }
}
