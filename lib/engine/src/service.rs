use crate::Multiset;
use rdf_weave_logical::GraphPattern;
use rdf_weave_model::NamedNode;
use std::error::Error;

/// Evaluates the pattern of a `SERVICE` block against a remote endpoint.
///
/// The handler receives the solutions computed so far as `input`. It may use them to narrow the
/// remote request but must return every solution of `pattern` that is compatible with them.
///
/// ```
/// use rdf_weave_engine::{Multiset, ServiceHandler};
/// use rdf_weave_logical::GraphPattern;
/// use rdf_weave_model::NamedNode;
/// use std::error::Error;
///
/// struct EmptyService;
///
/// impl ServiceHandler for EmptyService {
///     fn handle(
///         &self,
///         _endpoint: &NamedNode,
///         _pattern: &GraphPattern,
///         _input: &Multiset,
///     ) -> Result<Multiset, Box<dyn Error + Send + Sync>> {
///         Ok(Multiset::Null)
///     }
/// }
/// ```
pub trait ServiceHandler: Send + Sync {
    fn handle(
        &self,
        endpoint: &NamedNode,
        pattern: &GraphPattern,
        input: &Multiset,
    ) -> Result<Multiset, Box<dyn Error + Send + Sync>>;
}
