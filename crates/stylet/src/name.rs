//! Logical template name parsing.
//!
//! Templates are addressed by logical names of the form
//! `bundle:controller:name.format.engine` (e.g.
//! `Shop:Checkout:receipt.html.xsl`). The bundle and controller segments may
//! be empty, in which case the name resolves relative to the loader root.
//!
//! [`NameParser`] is the seam for callers with a different naming scheme;
//! [`ColonNameParser`] implements the grammar above and is the default.

use std::path::PathBuf;

use crate::error::EngineError;

/// A resolved template reference.
///
/// Immutable once produced by a [`NameParser`]. Carries the structured
/// segments of the logical name plus the original string, which loaders may
/// use either as a relative path ([`TemplateRef::relative_path`]) or as an
/// opaque key ([`TemplateRef::logical_name`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    bundle: String,
    controller: String,
    name: String,
    format: String,
    engine: String,
    logical: String,
}

impl TemplateRef {
    /// Creates a reference from its segments.
    ///
    /// The logical name is reassembled canonically as
    /// `bundle:controller:name.format.engine`.
    pub fn new(
        bundle: impl Into<String>,
        controller: impl Into<String>,
        name: impl Into<String>,
        format: impl Into<String>,
        engine: impl Into<String>,
    ) -> Self {
        let bundle = bundle.into();
        let controller = controller.into();
        let name = name.into();
        let format = format.into();
        let engine = engine.into();
        let logical = format!(
            "{}:{}:{}.{}.{}",
            bundle, controller, name, format, engine
        );
        Self {
            bundle,
            controller,
            name,
            format,
            engine,
            logical,
        }
    }

    /// The bundle segment (may be empty).
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// The controller segment (may be empty).
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// The base template name, without format or engine suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The output format segment (e.g. `html`, `xml`).
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The engine tag segment (e.g. `xsl`).
    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// The full logical name, as given by the caller.
    pub fn logical_name(&self) -> &str {
        &self.logical
    }

    /// The reference as a relative filesystem path.
    ///
    /// Empty bundle/controller segments are skipped, so
    /// `::index.html.xsl` maps to `index.html.xsl` while
    /// `Shop:Checkout:receipt.html.xsl` maps to
    /// `Shop/Checkout/receipt.html.xsl`.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        if !self.bundle.is_empty() {
            path.push(&self.bundle);
        }
        if !self.controller.is_empty() {
            path.push(&self.controller);
        }
        path.push(format!("{}.{}.{}", self.name, self.format, self.engine));
        path
    }
}

/// Parses a logical template name into a [`TemplateRef`].
///
/// Implementations must be pure: the same name always yields the same
/// reference, and malformed names fail with
/// [`EngineError::NameResolution`] rather than panicking.
pub trait NameParser: Send + Sync {
    /// Parses `name`, failing on names that do not match the grammar.
    fn parse(&self, name: &str) -> Result<TemplateRef, EngineError>;
}

/// Default parser for `bundle:controller:name.format.engine` names.
///
/// Accepted forms:
///
/// - `Shop:Checkout:receipt.html.xsl` - fully qualified
/// - `::receipt.html.xsl` - empty bundle and controller
/// - `receipt.html.xsl` - no colon prefix at all
///
/// The trailing segment must carry at least three non-empty dot-separated
/// parts; extra dots belong to the base name (`report.v2.html.xsl` has base
/// name `report.v2`).
///
/// # Example
///
/// ```rust
/// use stylet::{ColonNameParser, NameParser};
///
/// let parser = ColonNameParser;
/// let reference = parser.parse("Shop:Checkout:receipt.html.xsl").unwrap();
/// assert_eq!(reference.bundle(), "Shop");
/// assert_eq!(reference.name(), "receipt");
/// assert_eq!(reference.engine(), "xsl");
///
/// assert!(parser.parse("no-engine-suffix").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonNameParser;

impl NameParser for ColonNameParser {
    fn parse(&self, name: &str) -> Result<TemplateRef, EngineError> {
        let (bundle, controller, tail) = match name.split(':').collect::<Vec<_>>()[..] {
            [tail] => ("", "", tail),
            [bundle, controller, tail] => (bundle, controller, tail),
            _ => {
                return Err(EngineError::NameResolution(format!(
                    "\"{}\" must have the form bundle:controller:name.format.engine",
                    name
                )))
            }
        };

        // Split the tail from the right: engine and format are the last two
        // dot segments, everything before them is the base name.
        let mut parts = tail.rsplitn(3, '.');
        let engine = parts.next().unwrap_or("");
        let format = parts.next().unwrap_or("");
        let base = parts.next().unwrap_or("");

        if base.is_empty() || format.is_empty() || engine.is_empty() {
            return Err(EngineError::NameResolution(format!(
                "\"{}\" is missing the name.format.engine suffix",
                name
            )));
        }

        Ok(TemplateRef::new(bundle, controller, base, format, engine))
    }
}
