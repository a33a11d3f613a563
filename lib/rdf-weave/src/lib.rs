//! RDF Weave compiles SPARQL graph patterns into an algebra and evaluates it as multisets of
//! solutions over an RDF dataset.
//!
//! The [store::Store] bundles an in-memory dataset with the evaluation settings and is the
//! easiest way to get started. The layers below are re-exported for direct use.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
pub mod store;

pub mod model {
    pub use rdf_weave_model::*;
}

pub mod common {
    pub use rdf_weave_common::*;
}

pub mod logical {
    pub use rdf_weave_logical::*;
}

pub mod engine {
    pub use rdf_weave_engine::*;
}

pub mod storage {
    pub use rdf_weave_storage::*;
}
