//! # Stylet - XSLT Templating Adapter
//!
//! `stylet` plugs an XSLT rendering backend into a web application's
//! templating layer. It resolves a logical template name to a stylesheet,
//! parses the stylesheet with hardened options, serializes call parameters
//! into an XML input document, and executes an XSLT transform to produce
//! output markup - optionally wrapped in an HTTP [`Response`].
//!
//! ## Core Concepts
//!
//! - [`XsltEngine`]: the adapter; `supports` / `exists` / `render` /
//!   `render_response`
//! - [`NameParser`] + [`TemplateRef`]: logical names like
//!   `Shop:Checkout:receipt.html.xsl`
//! - [`Loader`] + [`Storage`]: where stylesheet content comes from
//!   (filesystem or in-memory)
//! - [`Transformer`]: the XSLT backend seam; [`XrustTransformer`] is the
//!   default
//! - [`ParseOptions`] + [`Diagnostic`]: hardened parsing with collected,
//!   formatted parse errors
//!
//! ## Quick Start
//!
//! ```rust
//! use stylet::{ColonNameParser, MapLoader, XsltEngine};
//!
//! let mut loader = MapLoader::new();
//! loader.add(
//!     "::greeting.html.xsl",
//!     r#"<xsl:stylesheet version="1.0"
//!            xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
//!          <xsl:template match="/"><p>hello</p></xsl:template>
//!        </xsl:stylesheet>"#,
//! );
//!
//! let engine = XsltEngine::new(Box::new(ColonNameParser), Box::new(loader));
//!
//! assert!(engine.supports("::greeting.html.xsl").unwrap());
//! assert!(!engine.supports("::greeting.html.twig").unwrap());
//! assert!(engine.exists("::greeting.html.xsl"));
//! assert!(!engine.exists("::missing.html.xsl"));
//! ```
//!
//! ## Rendering
//!
//! ```rust,ignore
//! use serde::Serialize;
//! use stylet::{ColonNameParser, DirLoader, XsltEngine};
//!
//! #[derive(Serialize)]
//! struct Invoice { customer: String, total: u32 }
//!
//! let engine = XsltEngine::new(
//!     Box::new(ColonNameParser),
//!     Box::new(DirLoader::new("./templates")),
//! );
//!
//! // Parameters are serialized to XML and handed to the stylesheet as the
//! // input document.
//! let html = engine.render(
//!     "Shop:Checkout:receipt.html.xsl",
//!     &Invoice { customer: "Ada".into(), total: 42 },
//! )?;
//!
//! // Or straight into an HTTP response:
//! let response = engine.render_response("Shop:Checkout:receipt.html.xsl", &invoice, None)?;
//! ```
//!
//! ## Hardened Parsing
//!
//! Stylesheets and serialized parameters are parsed with DOCTYPE (and hence
//! external entities) refused and structural validation on; the parser never
//! touches the network. Parse failures carry formatted diagnostics:
//!
//! ```text
//! [ERROR ill-formed] ill-formed document: expected `</b>`, but `</a>` was found (in views/broken.xsl - line 3, column 12)
//! ```
//!
//! Parser configuration is an explicit per-call value, not process-global
//! state, so a failed parse can never leak error state into a concurrent or
//! subsequent parse.

mod engine;
mod error;
mod loader;
mod name;
mod response;
mod serialize;
mod transform;
mod xml;

pub use engine::{XsltEngine, ENGINE_TAG};
pub use error::EngineError;
pub use loader::{DirLoader, Loader, MapLoader, Storage};
pub use name::{ColonNameParser, NameParser, TemplateRef};
pub use response::Response;
pub use serialize::parameters_to_xml;
pub use transform::{Transformer, XrustTransformer, XML_DECLARATION};
pub use xml::{parse_document, Diagnostic, Document, ParseOptions, Severity};
