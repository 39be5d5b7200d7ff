//! Hardened XML parsing with collected diagnostics.
//!
//! This module is the parse layer shared by stylesheet loading and parameter
//! serialization. Parsing is configured by an explicit [`ParseOptions`] value
//! passed per call; there is no process-global parser state, so concurrent
//! and sequential parses cannot leak error state into each other.
//!
//! Hardening defaults:
//!
//! - no DOCTYPE, which closes off external entities (the parser itself never
//!   touches the network or the filesystem)
//! - structural validation on (element nesting and end-tag names checked)
//! - parse errors are collected as structured [`Diagnostic`] values rather
//!   than surfaced as library errors
//!
//! A successful parse yields a [`Document`]: the validated source text plus
//! the node tree handed to the transform layer.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use xrust::item::Node;
use xrust::parser::xml::parse as build_tree;
use xrust::trees::smite::RNode;

/// Per-call parser configuration.
///
/// Defaults are hardened; loosen fields individually when a trusted input
/// genuinely needs it.
///
/// # Example
///
/// ```rust
/// use stylet::ParseOptions;
///
/// let options = ParseOptions::default();
/// assert!(!options.allow_doctype);
/// assert!(options.check_structure);
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Permit a DOCTYPE declaration.
    ///
    /// A DOCTYPE is the only place XML text can request external entities,
    /// so refusing it makes a parse provably self-contained.
    pub allow_doctype: bool,

    /// Enforce element structure: matching end-tag names and balanced nesting.
    pub check_structure: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_doctype: false,
            check_structure: true,
        }
    }
}

/// Diagnostic severity.
///
/// The parse layer currently emits [`Severity::Error`] only; `Warning` is
/// part of the formatted-diagnostic vocabulary for embedders that report
/// recoverable problems through the same channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable oddity; the document may still be usable.
    Warning,
    /// The document cannot be used.
    Error,
}

impl Severity {
    /// The severity as it appears in formatted diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// A single structured parse diagnostic.
///
/// Independent of the XML library's native error representation, so the
/// formatted output stays stable across library choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the problem.
    pub severity: Severity,
    /// Short machine-readable code (e.g. `syntax`, `ill-formed`, `doctype`).
    pub code: &'static str,
    /// Human-readable message, trimmed.
    pub message: String,
    /// Source file, when the content was file-backed.
    pub source: Option<PathBuf>,
    /// 1-based line of the problem (0 when unknown).
    pub line: usize,
    /// 1-based column of the problem (0 when unknown).
    pub column: usize,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(
        severity: Severity,
        code: &'static str,
        message: impl Into<String>,
        source: Option<&Path>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into().trim().to_string(),
            source: source.map(Path::to_path_buf),
            line,
            column,
        }
    }

    /// Formats the diagnostic as a single line:
    /// `[SEVERITY code] message (in source - line L, column C)`.
    ///
    /// The source slot reads `n/a` for in-memory content.
    pub fn format(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "[{} {}] {} (in {} - line {}, column {})",
            self.severity.as_str(),
            self.code,
            self.message,
            source,
            self.line,
            self.column
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// A parsed, well-formed XML document.
///
/// Holds the validated source text and the node tree. The tree is what the
/// transform layer consumes; the text is kept so documents can be
/// re-serialized and inspected.
#[derive(Clone)]
pub struct Document {
    source: String,
    root: RNode,
}

impl Document {
    /// The document root node.
    pub fn root(&self) -> &RNode {
        &self.root
    }

    /// The source text the document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Serializes the document tree back to XML text.
    pub fn to_xml(&self) -> String {
        self.root.to_xml()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Parses XML text into a [`Document`].
///
/// `source` names the originating file for diagnostics; pass `None` for
/// in-memory content. On failure, returns the collected diagnostics in
/// document order.
pub fn parse_document(
    text: &str,
    source: Option<&Path>,
    options: &ParseOptions,
) -> Result<Document, Vec<Diagnostic>> {
    let diagnostics = scan(text, source, options);
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    // The scan proved the text well-formed; tree construction failures are
    // stricter library rules (e.g. undeclared namespace prefixes). The tree
    // builder itself refuses DOCTYPE, so an admitted declaration is stripped
    // before the build; the scan already guaranteed it requests nothing.
    let tree_text = if options.allow_doctype {
        strip_doctype(text)
    } else {
        Cow::Borrowed(text)
    };
    let root = RNode::new_document();
    if let Err(err) = build_tree(root.clone(), &tree_text, None) {
        return Err(vec![Diagnostic::new(
            Severity::Error,
            "tree",
            err.to_string(),
            source,
            0,
            0,
        )]);
    }

    Ok(Document {
        source: text.to_string(),
        root,
    })
}

/// Streams the text through quick-xml, collecting well-formedness
/// diagnostics. An empty result means the text is acceptable.
fn scan(text: &str, source: Option<&Path>, options: &ParseOptions) -> Vec<Diagnostic> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = options.check_structure;
    reader.config_mut().allow_unmatched_ends = !options.check_structure;

    let mut diagnostics = Vec::new();
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader.read_event();
        let position = reader.buffer_position() as usize;
        match event {
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    roots += 1;
                    if roots > 1 {
                        diagnostics.push(at(
                            "ill-formed",
                            "extra content after document root",
                            text,
                            position,
                            source,
                        ));
                        break;
                    }
                }
                depth += 1;
            }
            Ok(Event::Empty(_)) => {
                if depth == 0 {
                    roots += 1;
                    if roots > 1 {
                        diagnostics.push(at(
                            "ill-formed",
                            "extra content after document root",
                            text,
                            position,
                            source,
                        ));
                        break;
                    }
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(Event::DocType(_)) => {
                if !options.allow_doctype {
                    diagnostics.push(at(
                        "doctype",
                        "DOCTYPE is not allowed; external entities are disabled",
                        text,
                        position,
                        source,
                    ));
                    break;
                }
            }
            Ok(Event::Text(_)) | Ok(Event::CData(_)) => {
                if depth == 0 {
                    diagnostics.push(at(
                        "ill-formed",
                        "character content outside the document root",
                        text,
                        position,
                        source,
                    ));
                    break;
                }
            }
            Ok(Event::Eof) => {
                if roots == 0 {
                    diagnostics.push(at(
                        "empty",
                        "document has no root element",
                        text,
                        position,
                        source,
                    ));
                }
                break;
            }
            Ok(_) => {}
            Err(err) => {
                let position = reader.error_position() as usize;
                diagnostics.push(at(error_code(&err), err.to_string(), text, position, source));
                break;
            }
        }
    }

    diagnostics
}

/// Builds an error diagnostic at a byte offset into the text.
fn at(
    code: &'static str,
    message: impl Into<String>,
    text: &str,
    offset: usize,
    source: Option<&Path>,
) -> Diagnostic {
    let (line, column) = line_col(text, offset);
    Diagnostic::new(Severity::Error, code, message, source, line, column)
}

/// Classifies a quick-xml error into a stable short code.
fn error_code(err: &quick_xml::Error) -> &'static str {
    use quick_xml::Error;
    match err {
        Error::Syntax(_) => "syntax",
        Error::IllFormed(_) => "ill-formed",
        Error::EscapeError(_) => "escape",
        Error::NonDecodable(_) => "encoding",
        Error::Io(_) => "io",
        _ => "parse",
    }
}

/// Removes a DOCTYPE declaration from scanned text.
///
/// Only called for text the scan admitted, so there is at most one
/// declaration and it sits before the root element. The `>` that closes it
/// is found at internal-subset bracket depth zero.
fn strip_doctype(text: &str) -> Cow<'_, str> {
    let Some(start) = text.find("<!DOCTYPE") else {
        return Cow::Borrowed(text);
    };
    let mut bracket_depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(start) {
        match b {
            b'[' => bracket_depth += 1,
            b']' => bracket_depth = bracket_depth.saturating_sub(1),
            b'>' if bracket_depth == 0 => {
                let mut out = String::with_capacity(text.len());
                out.push_str(&text[..start]);
                out.push_str(&text[i + 1..]);
                return Cow::Owned(out);
            }
            _ => {}
        }
    }
    Cow::Borrowed(text)
}

/// Converts a byte offset into 1-based line and column numbers.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(text.len());
    let before = &text.as_bytes()[..clamped];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = before
        .iter()
        .rev()
        .take_while(|&&b| b != b'\n')
        .count()
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Document, Vec<Diagnostic>> {
        parse_document(text, None, &ParseOptions::default())
    }

    // =========================================================================
    // Well-formed documents
    // =========================================================================

    #[test]
    fn test_parse_simple_document() {
        let doc = parse("<a><b>text</b></a>").unwrap();
        assert_eq!(doc.source(), "<a><b>text</b></a>");
    }

    #[test]
    fn test_parse_with_declaration() {
        assert!(parse("<?xml version=\"1.0\"?><root/>").is_ok());
    }

    #[test]
    fn test_parse_round_trip_is_idempotent() {
        let doc = parse("<a><b>text</b><c attr=\"v\"/></a>").unwrap();
        let first = doc.to_xml();
        let again = parse(&first).unwrap().to_xml();
        assert_eq!(first, again);
    }

    // =========================================================================
    // Ill-formed documents
    // =========================================================================

    #[test]
    fn test_parse_mismatched_end_tag() {
        let err = parse("<a><b></a>").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].severity, Severity::Error);
        assert_eq!(err[0].code, "ill-formed");
        assert_eq!(err[0].line, 1);
    }

    #[test]
    fn test_parse_empty_document() {
        let err = parse("").unwrap_err();
        assert_eq!(err[0].code, "empty");
    }

    #[test]
    fn test_parse_whitespace_only_document() {
        let err = parse("   \n  ").unwrap_err();
        assert_eq!(err[0].code, "empty");
    }

    #[test]
    fn test_parse_multiple_roots() {
        let err = parse("<a/><b/>").unwrap_err();
        assert_eq!(err[0].code, "ill-formed");
    }

    #[test]
    fn test_parse_text_outside_root() {
        let err = parse("<a/>trailing").unwrap_err();
        assert_eq!(err[0].code, "ill-formed");
    }

    // =========================================================================
    // DOCTYPE hardening
    // =========================================================================

    #[test]
    fn test_doctype_rejected_by_default() {
        let text = "<!DOCTYPE root SYSTEM \"http://example.com/evil.dtd\"><root/>";
        let err = parse(text).unwrap_err();
        assert_eq!(err[0].code, "doctype");
    }

    #[test]
    fn test_doctype_allowed_when_opted_in() {
        let options = ParseOptions {
            allow_doctype: true,
            ..ParseOptions::default()
        };
        let doc = parse_document("<!DOCTYPE root><root><a/></root>", None, &options).unwrap();
        // The declaration survives in the source but not in the tree.
        assert!(doc.source().contains("<!DOCTYPE"));
        assert!(doc.to_xml().contains("<a"));
    }

    #[test]
    fn test_doctype_with_internal_subset_allowed_when_opted_in() {
        let options = ParseOptions {
            allow_doctype: true,
            ..ParseOptions::default()
        };
        let text = "<!DOCTYPE root [<!ELEMENT root EMPTY>]><root/>";
        assert!(parse_document(text, None, &options).is_ok());
    }

    #[test]
    fn test_strip_doctype() {
        assert_eq!(strip_doctype("<a/>"), "<a/>");
        assert_eq!(strip_doctype("<!DOCTYPE a><a/>"), "<a/>");
        assert_eq!(
            strip_doctype("<?xml version=\"1.0\"?><!DOCTYPE a SYSTEM \"a.dtd\"><a/>"),
            "<?xml version=\"1.0\"?><a/>"
        );
        assert_eq!(
            strip_doctype("<!DOCTYPE a [<!ENTITY b \"c\">]><a/>"),
            "<a/>"
        );
    }

    // =========================================================================
    // Isolation: a failed parse leaves no state behind
    // =========================================================================

    #[test]
    fn test_failed_parse_does_not_affect_next_parse() {
        let options = ParseOptions::default();
        assert!(parse_document("<broken>", None, &options).is_err());
        assert!(parse_document("<fine/>", None, &options).is_ok());
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    #[test]
    fn test_diagnostic_format_in_memory() {
        let d = Diagnostic::new(Severity::Error, "syntax", " bad token ", None, 3, 7);
        assert_eq!(
            d.format(),
            "[ERROR syntax] bad token (in n/a - line 3, column 7)"
        );
    }

    #[test]
    fn test_diagnostic_format_with_source() {
        let d = Diagnostic::new(
            Severity::Warning,
            "escape",
            "odd entity",
            Some(Path::new("templates/a.xsl")),
            1,
            2,
        );
        assert_eq!(
            d.format(),
            "[WARNING escape] odd entity (in templates/a.xsl - line 1, column 2)"
        );
    }

    #[test]
    fn test_diagnostic_source_path_recorded() {
        let err = parse_document(
            "<broken>",
            Some(Path::new("views/broken.xsl")),
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err[0].source.as_deref(), Some(Path::new("views/broken.xsl")));
        assert!(err[0].format().contains("views/broken.xsl"));
    }

    #[test]
    fn test_line_col() {
        let text = "abc\ndef\nghi";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 2), (1, 3));
        assert_eq!(line_col(text, 4), (2, 1));
        assert_eq!(line_col(text, 9), (3, 2));
        // Offsets past the end clamp to the last position
        assert_eq!(line_col(text, 100), (3, 4));
    }
}
