//! Error types for the XSLT engine adapter.
//!
//! This module provides [`EngineError`], the primary error type for all engine
//! operations. It abstracts over the underlying XML library's errors, providing
//! a stable public API.

use std::fmt;
use std::path::PathBuf;

use crate::xml::Diagnostic;

/// Error type for template resolution, loading, and rendering.
///
/// Every fallible operation on [`XsltEngine`](crate::XsltEngine) returns this
/// type. The only place a failure is downgraded instead of surfaced is
/// [`XsltEngine::exists`](crate::XsltEngine::exists), which maps any
/// resolve-or-load failure to `false`.
#[derive(Debug)]
pub enum EngineError {
    /// Template name does not match the logical name grammar.
    NameResolution(String),

    /// The loader reported the template as absent.
    TemplateNotFound {
        /// The logical name that could not be located.
        logical_name: String,
    },

    /// Stylesheet or parameter XML failed to parse.
    ///
    /// Carries one structured diagnostic per parse error; the `Display`
    /// implementation joins the formatted lines with newlines.
    InvalidTemplate {
        /// Parse diagnostics, in document order.
        diagnostics: Vec<Diagnostic>,
    },

    /// The transform engine failed while compiling or executing a stylesheet.
    Transform(String),

    /// Parameter serialization to XML failed.
    Serialization(String),

    /// Failed to read file-backed stylesheet content.
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NameResolution(msg) => write!(f, "invalid template name: {}", msg),
            EngineError::TemplateNotFound { logical_name } => {
                write!(f, "the template \"{}\" does not exist", logical_name)
            }
            EngineError::InvalidTemplate { diagnostics } => {
                let lines: Vec<String> = diagnostics.iter().map(|d| d.format()).collect();
                write!(f, "{}", lines.join("\n"))
            }
            EngineError::Transform(msg) => write!(f, "transform failed: {}", msg),
            EngineError::Serialization(msg) => write!(f, "serialization error: {}", msg),
            EngineError::Io { path, message } => {
                write!(f, "failed to read \"{}\": {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<quick_xml::DeError> for EngineError {
    fn from(err: quick_xml::DeError) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
