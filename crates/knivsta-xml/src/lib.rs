#![forbid(unsafe_code)]

//! XML document abstraction for the Knivsta normalizer.
//!
//! Provides an owned document wrapper over `roxmltree` so callers can
//! validate input once and re-parse a borrowing tree on demand.

pub mod document;

pub use document::XmlDocument;

/// Return roxmltree parsing options that allow DTD.
///
/// DTD is allowed because roxmltree does not expand external entities or
/// perform entity substitution beyond the five predefined XML entities,
/// so it is safe. Documents in the wild frequently carry DOCTYPE headers.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}
