use crate::index::IndexPermutations;
use indexmap::IndexMap;
use rdf_weave_common::error::StorageError;
use rdf_weave_common::{Dataset, TripleIter};
use rdf_weave_model::{GraphName, NamedOrBlankNode, Term, Triple};
use rustc_hash::FxBuildHasher;
use tracing::debug;

/// An in-memory RDF dataset.
///
/// Each graph keeps its triples in all [IndexPermutations], so every lookup of the [Dataset]
/// trait is answered by a prefix scan. A named graph exists as long as it contains at least one
/// triple. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    graphs: IndexMap<GraphName, IndexPermutations, FxBuildHasher>,
}

impl MemoryDataset {
    /// Creates a new empty [MemoryDataset].
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `triple` into `graph`. Returns false if the triple was already present.
    pub fn insert(&mut self, graph: impl Into<GraphName>, triple: Triple) -> bool {
        self.graphs
            .entry(graph.into())
            .or_default()
            .insert(&triple)
    }

    /// Inserts all `triples` into `graph` and returns the number of new triples.
    pub fn extend(
        &mut self,
        graph: impl Into<GraphName>,
        triples: impl IntoIterator<Item = Triple>,
    ) -> usize {
        let graph = graph.into();
        let index = self.graphs.entry(graph.clone()).or_default();
        let inserted = triples
            .into_iter()
            .filter(|triple| index.insert(triple))
            .count();
        if index.is_empty() {
            self.graphs.shift_remove(&graph);
        }
        debug!("Inserted {inserted} triples into graph {graph}");
        inserted
    }

    /// Removes `triple` from `graph`. Returns false if the triple was not present.
    pub fn remove(&mut self, graph: &GraphName, triple: &Triple) -> bool {
        let Some(index) = self.graphs.get_mut(graph) else {
            return false;
        };
        let removed = index.remove(triple);
        if index.is_empty() {
            self.graphs.shift_remove(graph);
        }
        removed
    }

    /// Removes all triples of `graph`.
    pub fn clear_graph(&mut self, graph: &GraphName) {
        self.graphs.shift_remove(graph);
    }

    /// Returns the number of triples in all graphs.
    pub fn len(&self) -> usize {
        self.graphs.values().map(IndexPermutations::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Returns the number of triples in `graph`.
    pub fn graph_len(&self, graph: &GraphName) -> usize {
        self.graphs.get(graph).map_or(0, IndexPermutations::len)
    }
}

impl Dataset for MemoryDataset {
    fn triples_for_pattern(
        &self,
        graph: &GraphName,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Result<TripleIter<'_>, StorageError> {
        let Some(index) = self.graphs.get(graph) else {
            return Ok(Box::new(std::iter::empty()));
        };
        Ok(Box::new(index.scan([subject, predicate, object]).map(Ok)))
    }

    fn contains(&self, graph: &GraphName, triple: &Triple) -> Result<bool, StorageError> {
        Ok(self
            .graphs
            .get(graph)
            .is_some_and(|index| index.contains(triple)))
    }

    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        Ok(self
            .graphs
            .keys()
            .filter_map(|graph| match graph {
                GraphName::NamedNode(node) => Some(NamedOrBlankNode::from(node.clone())),
                GraphName::BlankNode(node) => Some(NamedOrBlankNode::from(node.clone())),
                GraphName::DefaultGraph => None,
            })
            .collect())
    }
}
