//! svg-scene - build SVG documents from geometric scene descriptions
//!
//! A scene is a tree of shapes and groups, each node carrying its own
//! transform stack. Points remember the frame they were expressed in and can
//! be moved into any other node's frame, so shapes can be attached to
//! corners of other, arbitrarily transformed shapes.
//!
//! Scenes are built in code through [`scene::Builder`] or from a small
//! script language through [`render`].
//!
//! # Example
//!
//! ```rust
//! use svg_scene::render;
//!
//! let svg = render(r##"
//!     document 200 100 {
//!         rect box (10, 10) 80 40 [fill: "#eee"] rotate(10)
//!         arrow box.br (180, 90)
//!     }
//! "##).unwrap();
//!
//! assert!(svg.contains(r#"<rect x="10" y="10" width="80" height="40" id="box""#));
//! assert!(svg.contains("marker-arrowhead"));
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod scene;

pub use config::{ConfigError, RenderConfig};
pub use error::{format_scene_error, ParseError};
pub use parser::{parse, Document};
pub use renderer::{render_svg, SvgConfig};
pub use scene::{BuildConfig, Scene, SceneError};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while building the scene
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

impl RenderError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        match self {
            RenderError::Parse(errors) => errors
                .iter()
                .map(|e| e.format(source, filename))
                .collect::<Vec<_>>()
                .join("\n"),
            RenderError::Scene(err) => format_scene_error(err, source, filename),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a script and build its scene
pub fn build_scene(source: &str, config: &BuildConfig) -> Result<Scene, RenderError> {
    let doc = parse(source)?;
    let scene = scene::build(&doc, config)?;
    Ok(scene)
}

/// Render a script to SVG with default configuration
///
/// This is the main entry point for the library. It parses the source,
/// builds the scene, and generates SVG output.
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, &RenderConfig::default())
}

/// Render a script to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use svg_scene::{render_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new().with_svg(SvgConfig::new().with_standalone(false));
/// let svg = render_with_config("circle (10, 10) 5", &config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn render_with_config(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let scene = build_scene(source, &config.build)?;
    Ok(render_svg(&scene, &config.svg))
}
