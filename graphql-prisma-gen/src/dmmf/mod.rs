//! Schema input and the semantic model derived from it

pub mod annotations;
mod document;
pub mod naming;
pub mod raw;
pub mod resolve;
pub mod transform;
pub mod types;
pub mod variant;

#[cfg(test)]
pub(crate) mod fixtures;

pub use document::DmmfDocument;
pub use types::*;
