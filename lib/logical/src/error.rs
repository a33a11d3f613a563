use rdf_weave_model::Variable;
use thiserror::Error;

/// An error raised while constructing patterns or compiling them into an algebra.
///
/// These errors indicate a malformed query and are raised before any evaluation takes place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PatternError {
    #[error("Blank nodes may not be used as predicates: {0}")]
    BlankNodePredicate(String),
    #[error("The filter {0} is not an unplaced filter of this graph pattern")]
    UnplacedFilterNotFound(usize),
    #[error("The assignment {0} is not an unplaced assignment of this graph pattern")]
    UnplacedAssignmentNotFound(usize),
    #[error("A graph pattern cannot be both an EXISTS and a NOT EXISTS clause")]
    ConflictingExists,
    #[error("A graph pattern cannot be both {existing} and {requested}")]
    ConflictingModifiers {
        existing: &'static str,
        requested: &'static str,
    },
    #[error("A UNION must have at least one child pattern")]
    EmptyUnion,
    #[error("A negated property set must contain at least one predicate")]
    EmptyNegatedPropertySet,
    #[error("Binding tuple has {actual} values but {expected} variables are declared")]
    BindingsWidthMismatch { expected: usize, actual: usize },
    #[error("Variable {0} is declared more than once")]
    DuplicateVariable(Variable),
    #[error("Position {position} is out of range for {length} pattern elements")]
    PositionOutOfRange { position: usize, length: usize },
}
