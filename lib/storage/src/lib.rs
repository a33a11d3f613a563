//! Contains storage layer implementations for RDF Weave.

pub(crate) mod index;
pub mod memory;
