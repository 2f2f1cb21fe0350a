//! Configuration for print rendering

use std::path::PathBuf;

/// Configuration options for HTML print output
#[derive(Debug, Clone)]
pub struct PrintConfig {
    /// Factor applied to every canvas coordinate and size
    pub scale: f64,

    /// Whether to open the print dialog once the document has loaded
    pub auto_print: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "df-" for "df-page")
    pub class_prefix: Option<String>,

    /// Directory that relative logo paths are resolved against
    pub asset_dir: Option<PathBuf>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            auto_print: true,
            pretty_print: true,
            class_prefix: Some("df-".to_string()),
            asset_dir: None,
        }
    }
}

impl PrintConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the render scale; non-positive values fall back to 1.0
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
        self
    }

    pub fn with_auto_print(mut self, auto_print: bool) -> Self {
        self.auto_print = auto_print;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PrintConfig::default();
        assert_eq!(config.scale, 1.0);
        assert!(config.auto_print);
        assert!(config.pretty_print);
        assert_eq!(config.class_prefix, Some("df-".to_string()));
        assert!(config.asset_dir.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PrintConfig::new()
            .with_scale(1.5)
            .with_auto_print(false)
            .with_pretty_print(false)
            .with_class_prefix("doc-")
            .with_asset_dir("/srv/agency");

        assert_eq!(config.scale, 1.5);
        assert!(!config.auto_print);
        assert!(!config.pretty_print);
        assert_eq!(config.class_prefix, Some("doc-".to_string()));
        assert_eq!(config.asset_dir, Some(PathBuf::from("/srv/agency")));
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        assert_eq!(PrintConfig::new().with_scale(0.0).scale, 1.0);
        assert_eq!(PrintConfig::new().with_scale(-2.0).scale, 1.0);
        assert_eq!(PrintConfig::new().with_scale(f64::NAN).scale, 1.0);
    }
}
