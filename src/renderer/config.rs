//! Configuration for SVG rendering

use serde::Deserialize;

/// Configuration options for SVG output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Whether to start with an XML declaration
    pub standalone: bool,

    /// Whether to include the SVG 1.1 DOCTYPE
    pub doctype: bool,

    /// Whether to format output with newlines and indentation
    pub pretty_print: bool,

    /// Href of an `xml-stylesheet` processing instruction
    pub stylesheet: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            doctype: false,
            pretty_print: true,
            stylesheet: None,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether output is standalone
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set whether to emit the DOCTYPE
    pub fn with_doctype(mut self, doctype: bool) -> Self {
        self.doctype = doctype;
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Reference an external CSS stylesheet
    pub fn with_stylesheet(mut self, href: impl Into<String>) -> Self {
        self.stylesheet = Some(href.into());
        self
    }
}
