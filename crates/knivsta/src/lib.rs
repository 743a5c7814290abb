#![forbid(unsafe_code)]

pub use knivsta_canon as canon;
pub use knivsta_core as core;
pub use knivsta_xml as xml;
