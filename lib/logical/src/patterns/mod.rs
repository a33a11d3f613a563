mod bindings;
mod construct;
mod element;
mod path_pattern;
mod pattern_item;
mod property_function;
mod sub_query;
mod triple_pattern;

pub use bindings::{BindingTuple, BindingsPattern};
pub use construct::ConstructContext;
pub use element::{Assignment, AssignmentId, FilterId, PatternElement};
pub use path_pattern::PathPattern;
pub use pattern_item::PatternItem;
pub use property_function::PropertyFunctionPattern;
pub use sub_query::SubQuery;
pub use triple_pattern::{IndexType, TripleIndexing, TriplePattern};
