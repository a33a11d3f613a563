mod error;
mod numeric;
mod solution;
mod triple;
mod typed_value;

pub use error::*;
pub use numeric::*;
pub use solution::*;
pub use triple::*;
pub use typed_value::*;

// Re-export some oxrdf types.
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeIdParseError, BlankNodeRef, GraphName, GraphNameRef, IriParseError,
    Literal, LiteralRef, NamedNode, NamedNodeRef, NamedOrBlankNode, Term, TermRef, Variable,
    VariableNameParseError, VariableRef,
};
