//! The XSLT template engine adapter.
//!
//! [`XsltEngine`] ties the pieces together: a [`NameParser`] resolves logical
//! names, a [`Loader`] locates stylesheet content, the hardened parse layer
//! turns content into documents, and a [`Transformer`] produces output
//! markup. Each call is stateless; nothing outlives a single
//! `render`/`exists`/`supports` invocation.
//!
//! # Example
//!
//! ```rust,ignore
//! use stylet::{ColonNameParser, DirLoader, XsltEngine};
//!
//! let engine = XsltEngine::new(
//!     Box::new(ColonNameParser),
//!     Box::new(DirLoader::new("./templates")),
//! );
//!
//! let html = engine.render("Shop:Checkout:receipt.html.xsl", &invoice)?;
//! ```

use std::fs;

use serde::Serialize;

use crate::error::EngineError;
use crate::loader::{Loader, Storage};
use crate::name::{NameParser, TemplateRef};
use crate::response::Response;
use crate::serialize::parameters_to_xml;
use crate::transform::{Transformer, XrustTransformer};
use crate::xml::{parse_document, Document, ParseOptions};

/// The engine tag this adapter claims in logical names.
pub const ENGINE_TAG: &str = "xsl";

/// Template engine adapter for XSLT stylesheets.
///
/// Construct with a name parser and a loader; the transformer and parse
/// options have hardened defaults and can be swapped with the builder
/// methods.
///
/// # Failure policy
///
/// Every failure is surfaced as a typed [`EngineError`] except inside
/// [`exists`](Self::exists), which downgrades any resolve-or-load failure
/// (absence *and* invalid content) to `false`. Transform failures are never
/// downgraded.
pub struct XsltEngine {
    parser: Box<dyn NameParser>,
    loader: Box<dyn Loader>,
    transformer: Box<dyn Transformer>,
    options: ParseOptions,
    globals: Option<serde_json::Value>,
}

impl XsltEngine {
    /// Creates an engine with the default transformer and hardened parse
    /// options.
    pub fn new(parser: Box<dyn NameParser>, loader: Box<dyn Loader>) -> Self {
        Self {
            parser,
            loader,
            transformer: Box::new(XrustTransformer::new()),
            options: ParseOptions::default(),
            globals: None,
        }
    }

    /// Replaces the transform backend.
    pub fn with_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// Replaces the parse options used for stylesheets and parameters.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches global context values.
    ///
    /// Globals are stored for host-framework integrations to read back; the
    /// core render path does not consume them.
    pub fn with_globals(mut self, globals: serde_json::Value) -> Self {
        self.globals = Some(globals);
        self
    }

    /// The attached globals, if any.
    pub fn globals(&self) -> Option<&serde_json::Value> {
        self.globals.as_ref()
    }

    /// Returns true if this engine can render the named template.
    ///
    /// True iff the resolved engine tag is `xsl`. The template need not
    /// exist; only the name is consulted.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::NameResolution`] for malformed names.
    pub fn supports(&self, name: &str) -> Result<bool, EngineError> {
        Ok(self.parser.parse(name)?.engine() == ENGINE_TAG)
    }

    /// Returns true if the named template resolves, loads, and parses.
    ///
    /// Any failure along the way - malformed name, loader sentinel,
    /// unreadable file, ill-formed XML - maps to `false`.
    pub fn exists(&self, name: &str) -> bool {
        self.parser
            .parse(name)
            .and_then(|reference| self.load(&reference))
            .is_ok()
    }

    /// Loads and parses the stylesheet for a resolved reference.
    ///
    /// File-backed storage is read from disk at this point; inline storage is
    /// parsed directly. Parsing uses the engine's [`ParseOptions`].
    ///
    /// # Errors
    ///
    /// - [`EngineError::TemplateNotFound`] when the loader reports absence
    /// - [`EngineError::Io`] when file-backed content cannot be read
    /// - [`EngineError::InvalidTemplate`] when the content is not
    ///   well-formed XML, carrying one diagnostic per parse error
    pub fn load(&self, reference: &TemplateRef) -> Result<Document, EngineError> {
        let storage = self.loader.load(reference)?;
        let Some(storage) = storage else {
            return Err(EngineError::TemplateNotFound {
                logical_name: reference.logical_name().to_string(),
            });
        };

        let (text, path) = match storage {
            Storage::File(path) => {
                let text = fs::read_to_string(&path).map_err(|e| EngineError::Io {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                (text, Some(path))
            }
            Storage::Inline(text) => (text, None),
        };

        parse_document(&text, path.as_deref(), &self.options)
            .map_err(|diagnostics| EngineError::InvalidTemplate { diagnostics })
    }

    /// Serializes render parameters into an XML input document.
    ///
    /// The serialized text is parsed with the same hardened options as
    /// stylesheets, so a serializer quirk cannot smuggle ill-formed XML into
    /// the transform.
    ///
    /// # Errors
    ///
    /// [`EngineError::Serialization`] when the value cannot be serialized,
    /// [`EngineError::InvalidTemplate`] when the serialized text does not
    /// parse.
    pub fn serialize_parameters<T: Serialize + ?Sized>(
        &self,
        parameters: &T,
    ) -> Result<Document, EngineError> {
        let xml = parameters_to_xml(parameters)?;
        parse_document(&xml, None, &self.options)
            .map_err(|diagnostics| EngineError::InvalidTemplate { diagnostics })
    }

    /// Renders the named template with the given parameters.
    ///
    /// Resolves the name, loads and parses the stylesheet, serializes the
    /// parameters, and runs the transform.
    ///
    /// # Errors
    ///
    /// Everything [`load`](Self::load) and
    /// [`serialize_parameters`](Self::serialize_parameters) fail with, plus
    /// [`EngineError::Transform`] when the stylesheet cannot be compiled or
    /// executed.
    pub fn render<T: Serialize + ?Sized>(
        &self,
        name: &str,
        parameters: &T,
    ) -> Result<String, EngineError> {
        let reference = self.parser.parse(name)?;
        let stylesheet = self.load(&reference)?;
        let input = self.serialize_parameters(parameters)?;
        self.transformer.transform(&stylesheet, &input)
    }

    /// Renders the named template into an HTTP [`Response`].
    ///
    /// When `response` is `None` a fresh `200 OK` response is created;
    /// otherwise the supplied response is reused with its body replaced.
    /// Render failures propagate unchanged.
    pub fn render_response<T: Serialize + ?Sized>(
        &self,
        name: &str,
        parameters: &T,
        response: Option<Response>,
    ) -> Result<Response, EngineError> {
        let body = self.render(name, parameters)?;
        let mut response = response.unwrap_or_default();
        response.set_body(body);
        Ok(response)
    }
}
