//! The logical layer of RDF Weave.
//!
//! Parsed queries are assembled into a [GraphPattern] tree through a [GraphPatternBuilder], which
//! takes care of splitting basic graph patterns at the points where SPARQL scoping requires it.
//! The finished tree is compiled into an [Algebra] expression that the engine evaluates.

pub mod algebra;
mod compiler;
mod error;
mod expression;
pub mod graph_pattern;
pub mod patterns;

pub use algebra::Algebra;
pub use error::PatternError;
pub use expression::{expression_variables, has_variables};
pub use graph_pattern::{GraphPattern, GraphPatternBuilder};

// Re-export the SPARQL algebra types that appear in graph patterns.
pub use spargebra::algebra::{Expression, Function, PropertyPathExpression};
