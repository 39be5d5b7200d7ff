//! Stylesheet content loading.
//!
//! A [`Loader`] maps a resolved [`TemplateRef`] to stylesheet content, or to
//! a sentinel `None` when the template is absent. Absence is a value, not an
//! error: the engine turns it into
//! [`EngineError::TemplateNotFound`](crate::EngineError::TemplateNotFound)
//! so that loaders stay free of error policy.
//!
//! Two loaders are provided:
//!
//! - [`DirLoader`] resolves references to files under a root directory
//! - [`MapLoader`] serves in-memory content keyed by logical name
//!
//! Content is polymorphic over its storage ([`Storage`]): file-backed content
//! is dereferenced lazily by the engine at parse time, in-memory content is
//! used directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::name::TemplateRef;

/// How stylesheet content is stored or accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// Content read from disk on demand.
    ///
    /// The path is dereferenced at parse time, so edits to the file are
    /// picked up on the next load without re-resolving the name.
    File(PathBuf),

    /// Content held directly in memory.
    Inline(String),
}

/// Loads stylesheet content for a resolved template reference.
///
/// Returns `Ok(None)` when the template does not exist. Errors are reserved
/// for genuine failures (e.g. an unreadable directory), not for absence.
pub trait Loader: Send + Sync {
    /// Locates content for `reference`.
    fn load(&self, reference: &TemplateRef) -> Result<Option<Storage>, EngineError>;
}

/// Filesystem loader rooted at a directory.
///
/// References resolve to `root/bundle/controller/name.format.engine`, with
/// empty bundle/controller segments skipped (see
/// [`TemplateRef::relative_path`]).
///
/// # Example
///
/// ```rust,ignore
/// let loader = DirLoader::new("./templates");
/// // Shop:Checkout:receipt.html.xsl -> ./templates/Shop/Checkout/receipt.html.xsl
/// ```
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    /// Creates a loader serving templates under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory this loader serves from.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Loader for DirLoader {
    fn load(&self, reference: &TemplateRef) -> Result<Option<Storage>, EngineError> {
        let path = self.root.join(reference.relative_path());
        if path.is_file() {
            Ok(Some(Storage::File(path)))
        } else {
            Ok(None)
        }
    }
}

/// In-memory loader keyed by logical name.
///
/// The natural loader for tests and for deployments that embed their
/// stylesheets in the binary.
///
/// # Example
///
/// ```rust
/// use stylet::{ColonNameParser, Loader, MapLoader, NameParser, Storage};
///
/// let mut loader = MapLoader::new();
/// loader.add("::index.html.xsl", "<stylesheet/>");
///
/// let reference = ColonNameParser.parse("::index.html.xsl").unwrap();
/// let storage = loader.load(&reference).unwrap();
/// assert_eq!(storage, Some(Storage::Inline("<stylesheet/>".to_string())));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapLoader {
    templates: HashMap<String, String>,
}

impl MapLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers content under a logical name, replacing any previous entry.
    pub fn add(&mut self, logical_name: impl Into<String>, content: impl Into<String>) {
        self.templates.insert(logical_name.into(), content.into());
    }

    /// Returns the number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if no templates are registered.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Loader for MapLoader {
    fn load(&self, reference: &TemplateRef) -> Result<Option<Storage>, EngineError> {
        Ok(self
            .templates
            .get(reference.logical_name())
            .map(|content| Storage::Inline(content.clone())))
    }
}
