//! Evaluates the RDF Weave algebra against a [Dataset](rdf_weave_common::Dataset).
//!
//! The evaluation works on [Multiset]s of solutions. Every operator receives the solutions of the
//! enclosing operator and uses the values they bind as index keys for its own lookups.

mod construct;
mod context;
mod error;
mod eval;
mod expression;
mod multiset;
mod options;
mod paths;
mod property_function;
mod service;
mod triple_pattern;

pub use construct::construct_triples;
pub use context::EvaluationContext;
pub use error::EvaluationError;
pub use eval::evaluate_algebra;
pub use expression::{effective_boolean_value, evaluate_expression};
pub use multiset::{GroupedSolutions, Multiset, Solutions};
pub use options::EvaluationOptions;
pub use paths::transform_path;
pub use property_function::{PropertyFunction, PropertyFunctionRegistry};
pub use service::ServiceHandler;
pub use triple_pattern::{evaluate_triple_pattern, get_triples};
