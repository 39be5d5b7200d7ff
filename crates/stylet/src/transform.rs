//! XSLT transform execution.
//!
//! This module defines the [`Transformer`] trait which allows the engine to
//! work with different XSLT backends. The default implementation is
//! [`XrustTransformer`], built on the pure-Rust `xrust` engine.

use xrust::item::{Item, Node, SequenceTrait};
use xrust::parser::xml::parse as build_tree;
use xrust::transform::context::StaticContextBuilder;
use xrust::trees::smite::RNode;
use xrust::xdmerror::{Error as XdmError, ErrorKind as XdmErrorKind};
use xrust::xslt::from_document;

use crate::error::EngineError;
use crate::xml::Document;

/// Declaration prefixed to every transform result.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// Applies a compiled stylesheet to an input document.
///
/// Backends compile the stylesheet, run it against the input, and serialize
/// the result to text. Compile-time and run-time stylesheet failures are both
/// reported as [`EngineError::Transform`]; a transformer must not perform
/// network or filesystem access on behalf of a stylesheet.
pub trait Transformer: Send + Sync {
    /// Transforms `input` through `stylesheet`, returning the output markup.
    fn transform(&self, stylesheet: &Document, input: &Document) -> Result<String, EngineError>;
}

/// XSLT backend built on `xrust`.
///
/// The static context is sealed: `document()` fetches and external parses are
/// refused, matching the hardened parse configuration used to produce the
/// documents in the first place.
#[derive(Debug, Clone, Copy, Default)]
pub struct XrustTransformer;

impl XrustTransformer {
    /// Creates a new transformer.
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for XrustTransformer {
    fn transform(&self, stylesheet: &Document, input: &Document) -> Result<String, EngineError> {
        let mut static_context = StaticContextBuilder::new()
            .message(|_| Ok(()))
            .fetcher(|_| {
                Err(XdmError::new(
                    XdmErrorKind::NotImplemented,
                    "external document fetch is disabled".to_string(),
                ))
            })
            .parser(|_| {
                Err(XdmError::new(
                    XdmErrorKind::NotImplemented,
                    "external document parsing is disabled".to_string(),
                ))
            })
            .build();

        let mut context = from_document(
            stylesheet.root().clone(),
            None,
            |text| {
                let doc = RNode::new_document();
                build_tree(doc.clone(), text, None).map(|_| doc)
            },
            |_| Ok(String::new()),
        )
        .map_err(|e| EngineError::Transform(e.to_string()))?;

        context.context(vec![Item::Node(input.root().clone())], 0);
        context.result_document(RNode::new_document());

        let sequence = context
            .evaluate(&mut static_context)
            .map_err(|e| EngineError::Transform(e.to_string()))?;

        Ok(format!("{}\n{}", XML_DECLARATION, sequence.to_xml()))
    }
}
