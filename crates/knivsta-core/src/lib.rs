#![forbid(unsafe_code)]

//! Shared error types for the Knivsta XML normalizer.

pub mod error;

pub use error::{Error, Result};
