mod dataset;
pub mod error;

pub use dataset::{Dataset, TripleIter};
