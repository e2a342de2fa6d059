//! SVG renderer for built scenes
//!
//! Walks the scene tree depth-first and writes one element per node.
//! Rendering never modifies the scene.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::render_svg;
