//! Checklist element content

use serde::{Deserialize, Serialize};

use super::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    #[serde(default)]
    pub checked: bool,
}

impl ChecklistItem {
    pub fn new(label: impl Into<String>, checked: bool) -> Self {
        Self {
            label: label.into(),
            checked,
        }
    }

    /// Check mark printed next to the label
    pub fn mark(&self) -> char {
        if self.checked {
            '✔'
        } else {
            '✘'
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
}

const CHECKED_BOXES: &[char] = &['☑', '✔', '✓', '☒'];
const UNCHECKED_BOXES: &[char] = &['☐', '✘', '✗'];

impl Checklist {
    /// Parse checklist content
    ///
    /// Two forms are accepted: a JSON array of `{label, checked}` objects,
    /// or text items separated by `|` or newlines, each optionally starting
    /// with a box glyph (`☐ Pneus | ☑ Freins`).
    pub fn parse(content: &str) -> Result<Self, TemplateError> {
        let trimmed = content.trim();
        if trimmed.starts_with('[') {
            let items: Vec<ChecklistItem> =
                serde_json::from_str(trimmed).map_err(|e| TemplateError::InvalidChecklist {
                    message: e.to_string(),
                })?;
            return Ok(Self { items });
        }

        let items = trimmed
            .split(['|', '\n'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| {
                let mut chars = entry.chars();
                match chars.next() {
                    Some(c) if CHECKED_BOXES.contains(&c) => {
                        ChecklistItem::new(chars.as_str().trim(), true)
                    }
                    Some(c) if UNCHECKED_BOXES.contains(&c) => {
                        ChecklistItem::new(chars.as_str().trim(), false)
                    }
                    _ => ChecklistItem::new(entry, false),
                }
            })
            .filter(|item| !item.label.is_empty())
            .collect();
        Ok(Self { items })
    }

    pub fn from_items(items: impl IntoIterator<Item = (&'static str, bool)>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|(label, checked)| ChecklistItem::new(label, checked))
                .collect(),
        }
    }

    pub fn to_json(&self) -> String {
        // a Vec of plain structs always serializes
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|i| i.checked).count()
    }
}
