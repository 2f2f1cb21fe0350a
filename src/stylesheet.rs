//! Stylesheet system for document palettes
//!
//! Element colors may be written as symbolic tokens (`accent-1`,
//! `status-error`) instead of hex values. A stylesheet maps those tokens to
//! concrete colors, so one template prints in each agency's brand colors.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping symbolic colors to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Body font stack, overriding each element's family when set
    pub font_family: Option<String>,
    /// Color mappings: token name -> CSS color
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    fonts: Option<TomlFonts>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct TomlFonts {
    body: Option<String>,
}

/// Default palette, taken from the colors of the built-in templates
const DEFAULT_PALETTE: &str = r##"
[metadata]
name = "DriveFlow"

[colors]
# Text
text-1 = "#111827"
text-2 = "#374151"
text-3 = "#6b7280"
text-heading = "#1f2937"
text-light = "#ffffff"

# Panels and rules
background-1 = "#ffffff"
background-2 = "#f3f4f6"
background-info = "#dbeafe"
background-danger = "#fee2e2"
border-1 = "#e5e7eb"
border-2 = "#d1d5db"

# Section banners
accent-1 = "#2563eb"
accent-2 = "#7c3aed"
accent-3 = "#6366f1"
accent-info = "#0ea5e9"

# Status
status-success = "#059669"
status-warning = "#ea580c"
status-error = "#dc2626"
"##;

/// Category fallbacks for tokens missing from both the stylesheet and
/// the default palette
const CATEGORY_DEFAULTS: &[(&str, &str)] = &[
    ("text-", "#111827"),
    ("background-", "#ffffff"),
    ("border-", "#e5e7eb"),
    ("accent-", "#2563eb"),
    ("status-", "#6b7280"),
];

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    fn empty() -> Self {
        Self {
            name: None,
            description: None,
            font_family: None,
            colors: HashMap::new(),
        }
    }

    /// Resolve a symbolic color token to a concrete value
    ///
    /// Returns None if the token is not defined in this stylesheet.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Turn an element color into a CSS value
    ///
    /// Tokens resolve through this stylesheet, then the default palette,
    /// then their category default. Anything else (hex values, CSS color
    /// names, `transparent`) passes through unchanged.
    pub fn resolve_color(&self, value: &str) -> String {
        let value = value.trim();
        if let Some(color) = self.resolve(value) {
            return color.to_string();
        }
        if let Some(color) = default_palette().resolve(value) {
            return color.to_string();
        }
        CATEGORY_DEFAULTS
            .iter()
            .find(|(prefix, _)| value.starts_with(prefix))
            .map(|(_, color)| color.to_string())
            .unwrap_or_else(|| value.to_string())
    }

    /// CSS custom properties for every token of the effective palette
    pub fn css_variables(&self) -> BTreeMap<String, String> {
        let mut vars: BTreeMap<String, String> = default_palette()
            .colors
            .iter()
            .map(|(k, v)| (format!("--df-{}", k), v.clone()))
            .collect();
        for (k, v) in &self.colors {
            vars.insert(format!("--df-{}", k), v.clone());
        }
        vars
    }
}

impl FromStr for Stylesheet {
    type Err = StylesheetError;

    /// Load stylesheet from TOML string
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            font_family: parsed.fonts.and_then(|f| f.body),
            colors: parsed.colors,
        })
    }
}

/// The default palette, parsed once
fn default_palette() -> &'static Stylesheet {
    static PALETTE: OnceLock<Stylesheet> = OnceLock::new();
    PALETTE.get_or_init(|| DEFAULT_PALETTE.parse().unwrap_or_else(|_| Stylesheet::empty()))
}

impl Default for Stylesheet {
    fn default() -> Self {
        default_palette().clone()
    }
}
