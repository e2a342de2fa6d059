//! Error types for the scene engine

use thiserror::Error;

use crate::parser::ast::Span;

/// Errors that abort building or querying a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// Malformed transform or shape constructor arguments
    #[error("invalid arguments to {kind}: {reason}")]
    InvalidArguments { kind: String, reason: String },

    /// A frame conversion needed the inverse of a non-invertible transform
    #[error("transform of '{frame}' is not invertible")]
    SingularTransform { frame: String },

    /// Normalization of a zero-length vector
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// Bounding box requested for a node without hull points
    #[error("{kind} has no hull points, bounding box is undefined")]
    EmptyHull { kind: String },

    /// Reference to a name that was never registered
    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    /// Reference to an attachment point the node does not have
    #[error("invalid anchor '{anchor}' on element '{element}' (valid anchors: {valid_anchors})")]
    InvalidAnchor {
        element: String,
        anchor: String,
        valid_anchors: String,
        span: Span,
    },

    /// Attempt to add a child to a leaf shape
    #[error("{kind} cannot contain other elements")]
    NotAContainer { kind: String },

    /// Strict mode turned the collected warnings into an error
    #[error("{count} warning(s) denied in strict mode, first: {first}")]
    WarningsDenied { count: usize, first: String },

    /// A geometric error raised while evaluating one script statement
    #[error("{source}")]
    AtStatement {
        span: Span,
        source: Box<SceneError>,
    },
}

impl SceneError {
    /// Create an invalid arguments error
    pub fn invalid_arguments(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Create an undefined identifier error with suggestions
    pub fn undefined(name: impl Into<String>, span: Span, suggestions: Vec<String>) -> Self {
        Self::UndefinedIdentifier {
            name: name.into(),
            span,
            suggestions,
        }
    }

    /// Create an invalid anchor error
    pub fn invalid_anchor(
        element: impl Into<String>,
        anchor: impl Into<String>,
        valid_anchors: &[&str],
        span: Span,
    ) -> Self {
        Self::InvalidAnchor {
            element: element.into(),
            anchor: anchor.into(),
            valid_anchors: if valid_anchors.is_empty() {
                "none".to_string()
            } else {
                valid_anchors.join(", ")
            },
            span,
        }
    }

    /// Attach the span of the statement being evaluated.
    ///
    /// Errors that already carry a span are returned unchanged.
    pub fn at(self, span: Span) -> Self {
        if self.span().is_some() {
            return self;
        }
        Self::AtStatement {
            span,
            source: Box::new(self),
        }
    }

    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UndefinedIdentifier { span, .. } => Some(span),
            Self::InvalidAnchor { span, .. } => Some(span),
            Self::AtStatement { span, .. } => Some(span),
            _ => None,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UndefinedIdentifier { suggestions, .. } => Some(suggestions),
            Self::AtStatement { source, .. } => source.suggestions(),
            _ => None,
        }
    }
}
