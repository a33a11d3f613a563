//! Contains the triple indexes of the in-memory storage.
//!
//! A triple index represents a particular ordering of the triple components subject, predicate,
//! and object. For example, the [IndexComponents::SPO] index represents that exact ordering while
//! the [IndexComponents::POS] index has the predicate as the first component. Different types of
//! triple patterns are better suited for different indexes.
//!
//! [IndexPermutations] holds one index per ordering and chooses the index for a scan.

mod components;
mod permutations;
mod triple_index;

pub use components::*;
pub use permutations::*;
pub use triple_index::*;
