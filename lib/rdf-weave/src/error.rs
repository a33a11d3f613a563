use rdf_weave_engine::EvaluationError;
use rdf_weave_logical::PatternError;

/// An error raised while answering a query with a [`Store`](crate::store::Store).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The graph pattern cannot be compiled into an algebra.
    #[error(transparent)]
    Compile(#[from] PatternError),
    /// The evaluation of the compiled algebra failed.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
