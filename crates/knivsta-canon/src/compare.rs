#![forbid(unsafe_code)]

//! Structural equivalence of XML documents.

use knivsta_core::Error;

use crate::transform::canonical_tree;

/// Check whether two XML documents are structurally equivalent.
///
/// Both inputs are rewritten into canonical trees and compared, so
/// formatting, insignificant whitespace, attribute order, and the order of
/// element-only siblings never affect the outcome.  Text content and the
/// child order of text-bearing elements do.
pub fn equivalent(a: &str, b: &str) -> Result<bool, Error> {
    let doc_a = crate::parse_source(a)?;
    let doc_b = crate::parse_source(b)?;
    Ok(canonical_tree(&doc_a) == canonical_tree(&doc_b))
}
