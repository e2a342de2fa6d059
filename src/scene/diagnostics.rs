//! Non-fatal warnings raised while building a scene.
//!
//! Warnings never abort a build. They are logged through `log::warn!` as
//! soon as they are recorded and kept on the scene so callers can inspect
//! them, or deny them in strict mode.

use std::fmt;

use super::error::SceneError;

/// A warning about a recoverable problem in the scene description
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub category: WarningCategory,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Category of warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCategory {
    /// A name was registered twice; the first binding wins
    DuplicateIdentifier,
    /// A style or event key outside the known property set
    UnknownProperty,
    /// A width or height below zero, normalized
    NegativeExtent,
    /// A `use` target that names no element
    UnresolvedReference,
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningCategory::DuplicateIdentifier => write!(f, "duplicate-identifier"),
            WarningCategory::UnknownProperty => write!(f, "unknown-property"),
            WarningCategory::NegativeExtent => write!(f, "negative-extent"),
            WarningCategory::UnresolvedReference => write!(f, "unresolved-reference"),
        }
    }
}

/// Ordered collection of warnings
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a warning
    pub fn warn(&mut self, category: WarningCategory, message: impl Into<String>) {
        let warning = Warning {
            category,
            message: message.into(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Take over warnings recorded elsewhere, without logging them again
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// The error strict mode reports for the collected warnings, if any
    pub fn denied(&self) -> Option<SceneError> {
        let first = self.warnings.first()?;
        Some(SceneError::WarningsDenied {
            count: self.warnings.len(),
            first: first.to_string(),
        })
    }
}
