use rdf_weave_common::error::StorageError;
use rdf_weave_logical::PatternError;
use rdf_weave_model::{NamedNode, Term, Variable};
use std::error::Error;

/// An error raised while evaluating an algebra.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EvaluationError {
    /// An error from the underlying dataset.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// An algebra fragment that was built during the evaluation is invalid.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// A `BIND` targets a variable that already has a value.
    #[error("The variable {0} is already bound and cannot be assigned again")]
    VariableAlreadyBound(Variable),
    /// The evaluation of a sub-query failed.
    #[error("The sub-query selecting {projection} failed: {source}")]
    SubQuery {
        projection: String,
        #[source]
        source: Box<EvaluationError>,
    },
    /// The variable holding the `SERVICE` endpoint is not bound to a single value.
    #[error("The variable encoding the service name is unbound")]
    UnboundService,
    /// The `SERVICE` endpoint is not an IRI.
    #[error("{0} is not a valid service name")]
    InvalidServiceName(Term),
    /// No handler for `SERVICE` was configured.
    #[error("The service {0} is not supported")]
    UnsupportedService(NamedNode),
    /// Error during `SERVICE` evaluation.
    #[error("{0}")]
    Service(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// A property function is used that is not registered.
    #[error("The property function {0} is not registered")]
    UnknownPropertyFunction(NamedNode),
    /// A property function was called with invalid arguments.
    #[error("The property function {function} failed: {message}")]
    PropertyFunction { function: NamedNode, message: String },
}
