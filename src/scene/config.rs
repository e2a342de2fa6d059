//! Configuration for building scenes

use serde::Deserialize;

use super::constructors::MAX_VERTICES;

/// Configuration options for scene construction
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Turn any recorded warning into an error at the end of the build
    pub strict: bool,

    /// Document width when a script has no `document` header
    pub default_width: f64,

    /// Document height when a script has no `document` header
    pub default_height: f64,

    /// Most copies a script `repeat` may create
    pub max_repeat: usize,

    /// Most vertices a script `star` or `regular_polygon` may have
    pub max_vertices: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            strict: false,
            default_width: 400.0,
            default_height: 300.0,
            max_repeat: 10_000,
            max_vertices: MAX_VERTICES,
        }
    }
}

impl BuildConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the fallback document size
    pub fn with_default_size(mut self, width: f64, height: f64) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Set the largest `repeat` count a script may use
    pub fn with_max_repeat(mut self, max_repeat: usize) -> Self {
        self.max_repeat = max_repeat;
        self
    }

    /// Set the largest vertex count a script may use, capped at
    /// [`MAX_VERTICES`]
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices.min(MAX_VERTICES);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert!(!config.strict);
        assert_eq!(config.default_width, 400.0);
        assert_eq!(config.default_height, 300.0);
        assert_eq!(config.max_repeat, 10_000);
        assert_eq!(config.max_vertices, MAX_VERTICES);
    }

    #[test]
    fn test_builder_pattern() {
        let config = BuildConfig::new()
            .with_strict(true)
            .with_default_size(640.0, 480.0)
            .with_max_repeat(50)
            .with_max_vertices(usize::MAX);
        assert!(config.strict);
        assert_eq!(config.default_width, 640.0);
        assert_eq!(config.default_height, 480.0);
        assert_eq!(config.max_repeat, 50);
        assert_eq!(config.max_vertices, MAX_VERTICES);
    }

    #[test]
    fn test_limits_from_toml() {
        let config: BuildConfig = toml::from_str("max_repeat = 8\nmax_vertices = 12").unwrap();
        assert_eq!(config.max_repeat, 8);
        assert_eq!(config.max_vertices, 12);
        assert!(!config.strict);
    }
}
