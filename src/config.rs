//! Render pipeline configuration and its TOML file format
//!
//! ```toml
//! [svg]
//! standalone = true
//! doctype = false
//! pretty_print = true
//! stylesheet = "style.css"
//!
//! [build]
//! strict = false
//! default_width = 400
//! default_height = 300
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::SvgConfig;
use crate::scene::BuildConfig;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Scene construction configuration
    pub build: BuildConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(content)?;
        log::debug!("loaded render config: {:?}", config);
        Ok(config)
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the build configuration
    pub fn with_build(mut self, config: BuildConfig) -> Self {
        self.build = config;
        self
    }

    /// Enable or disable strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.build.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.svg, SvgConfig::default());
        assert_eq!(config.build, BuildConfig::default());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new()
            .with_svg(SvgConfig::new().with_doctype(true))
            .with_strict(true);
        assert!(config.svg.doctype);
        assert!(config.build.strict);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[svg]
standalone = false
doctype = true
pretty_print = false
stylesheet = "style.css"

[build]
strict = true
default_width = 640
default_height = 480
"#;
        let config = RenderConfig::from_str(toml_str).expect("Should parse");
        assert!(!config.svg.standalone);
        assert!(config.svg.doctype);
        assert!(!config.svg.pretty_print);
        assert_eq!(config.svg.stylesheet, Some("style.css".to_string()));
        assert!(config.build.strict);
        assert_eq!(config.build.default_width, 640.0);
        assert_eq!(config.build.default_height, 480.0);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = RenderConfig::from_str("[svg]\ndoctype = true\n").expect("Should parse");
        assert!(config.svg.doctype);
        assert!(config.svg.standalone);
        assert_eq!(config.build, BuildConfig::default());

        let empty = RenderConfig::from_str("").expect("Should parse");
        assert_eq!(empty, RenderConfig::default());
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = RenderConfig::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_wrong_type_error() {
        let result = RenderConfig::from_str("[build]\nstrict = \"yes\"\n");
        assert!(result.is_err());
    }
}
