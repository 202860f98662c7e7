use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::task::new_entity_id;

/// A label that can be attached to tasks
///
/// Labels have an independent lifecycle and are referenced by zero or more
/// tasks via `Task::label_ids`. The reference is weak: deleting a label is
/// refused by the handler while any task still holds it (the repository
/// itself does not enforce this).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Unique identifier
    pub id: String,
    /// Optional display color (e.g. "#ff0000")
    ///
    /// Scalar fields come before `names` so the serialized TOML keeps its
    /// values ahead of the sub-table.
    pub color: Option<String>,
    /// Display name per language code (e.g. "en" -> "Urgent", "de" -> "Dringend")
    ///
    /// A BTreeMap keeps the serialized form stable across saves.
    pub names: BTreeMap<String, String>,
}

impl Label {
    /// Create a new label with a single display name
    pub fn new(language: impl Into<String>, name: impl Into<String>, color: Option<String>) -> Self {
        let mut names = BTreeMap::new();
        names.insert(language.into(), name.into());
        Self {
            id: new_entity_id(),
            color,
            names,
        }
    }

    /// Display name for the given language, falling back to any available name
    pub fn display_name(&self, language: &str) -> &str {
        self.names
            .get(language)
            .or_else(|| self.names.values().next())
            .map(String::as_str)
            .unwrap_or("(unnamed)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_label() {
        let label = Label::new("en", "Urgent", Some("#ff0000".to_string()));
        assert_eq!(label.names.get("en").unwrap(), "Urgent");
        assert_eq!(label.color.as_deref(), Some("#ff0000"));
        assert!(!label.id.is_empty());
    }

    #[test]
    fn test_display_name_fallback() {
        let label = Label::new("de", "Dringend", None);
        assert_eq!(label.display_name("de"), "Dringend");
        // No English name: fall back to any available one
        assert_eq!(label.display_name("en"), "Dringend");
    }

    #[test]
    fn test_label_serialization() {
        let mut label = Label::new("en", "Blocked", None);
        label.names.insert("ja".to_string(), "ブロック中".to_string());

        let serialized = toml::to_string(&label).unwrap();
        let deserialized: Label = toml::from_str(&serialized).unwrap();

        assert_eq!(label.id, deserialized.id);
        assert_eq!(label.names, deserialized.names);
        assert_eq!(label.color, deserialized.color);
    }
}
