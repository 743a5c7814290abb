#![forbid(unsafe_code)]

//! Canonical XML normalization for structural comparison.
//!
//! The canonical form of a document:
//! - drops whitespace-only text nodes inside element-only containers,
//! - sorts attributes and sibling nodes of element-only containers by name,
//! - leaves elements with real text content untouched in order,
//! - re-serializes with uniform indentation.
//!
//! Two documents that differ only in formatting or in the ordering of
//! element-only siblings have identical canonical forms, so canonical
//! output (or the [`tree::Document`] it is rendered from) can be compared
//! directly.

pub mod compare;
pub mod escape;
pub mod render;
pub mod transform;
pub mod tree;

use knivsta_core::Error;

pub use compare::equivalent;
pub use transform::canonical_tree;

/// Options controlling canonical serialization.
#[derive(Debug, Clone)]
pub struct CanonOptions {
    /// The string emitted once per nesting level.
    pub indent: String,
    /// Whether to emit an XML declaration before the root element.
    pub xml_declaration: bool,
}

impl Default for CanonOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_owned(),
            xml_declaration: false,
        }
    }
}

/// Canonicalize an XML document given as text.
///
/// Parses the input, rewrites it into canonical form, and serializes the
/// result.  Fails with [`Error::XmlParse`] when the input is not
/// well-formed; no partial output is produced.
pub fn canonicalize(xml: &str, options: &CanonOptions) -> Result<String, Error> {
    let doc = parse_source(xml)?;
    Ok(canonicalize_doc(&doc, options))
}

/// Convenience: canonicalize a pre-parsed document.
pub fn canonicalize_doc(doc: &roxmltree::Document<'_>, options: &CanonOptions) -> String {
    render::serialize(&transform::canonical_tree(doc), options)
}

/// Parse XML source with the shared parsing options.
pub(crate) fn parse_source(xml: &str) -> Result<roxmltree::Document<'_>, Error> {
    roxmltree::Document::parse_with_options(xml, knivsta_xml::parsing_options())
        .map_err(|e| Error::XmlParse(e.to_string()))
}
