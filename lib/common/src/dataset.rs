use crate::error::StorageError;
use rdf_weave_model::{GraphName, NamedOrBlankNode, Term, Triple};

/// A lazy sequence of triples returned by a [Dataset].
pub type TripleIter<'dataset> = Box<dyn Iterator<Item = Result<Triple, StorageError>> + 'dataset>;

/// Read access to an RDF dataset, as required by the query evaluation.
///
/// The only required retrieval method is [Dataset::triples_for_pattern], which accepts any
/// combination of fixed subject, predicate and object. Implementations are free to answer it with
/// secondary indexes or with a scan. The single and double key lookups used by the evaluator are
/// provided on top of it and may be overridden.
///
/// # Consistency
///
/// A query evaluation issues many lookups against the same dataset. It is the responsibility of
/// the implementation to answer all of them from the same state, for example by holding a read
/// lock or a snapshot for the lifetime of the borrowed dataset.
pub trait Dataset: Send + Sync {
    /// Returns the triples of `graph` that match the given nodes. [None] matches any node.
    fn triples_for_pattern(
        &self,
        graph: &GraphName,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<TripleIter<'_>, StorageError>;

    /// Returns whether `graph` contains `triple`.
    fn contains(&self, graph: &GraphName, triple: &Triple) -> Result<bool, StorageError>;

    /// Returns the list of named graphs in the dataset.
    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError>;

    /// Returns all triples of `graph`.
    fn triples(&self, graph: &GraphName) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, None, None, None)
    }

    fn triples_with_subject(
        &self,
        graph: &GraphName,
        subject: &Term,
    ) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, Some(subject), None, None)
    }

    fn triples_with_predicate(
        &self,
        graph: &GraphName,
        predicate: &Term,
    ) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, None, Some(predicate), None)
    }

    fn triples_with_object(
        &self,
        graph: &GraphName,
        object: &Term,
    ) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, None, None, Some(object))
    }

    fn triples_with_subject_predicate(
        &self,
        graph: &GraphName,
        subject: &Term,
        predicate: &Term,
    ) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, Some(subject), Some(predicate), None)
    }

    fn triples_with_subject_object(
        &self,
        graph: &GraphName,
        subject: &Term,
        object: &Term,
    ) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, Some(subject), None, Some(object))
    }

    fn triples_with_predicate_object(
        &self,
        graph: &GraphName,
        predicate: &Term,
        object: &Term,
    ) -> Result<TripleIter<'_>, StorageError> {
        self.triples_for_pattern(graph, None, Some(predicate), Some(object))
    }
}
