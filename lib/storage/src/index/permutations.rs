use crate::index::{IndexComponents, TripleIndex};
use rdf_weave_model::{Term, Triple};

/// Holds the triples of one graph in every [IndexComponents] permutation.
///
/// Every triple pattern has at least one permutation in which its fixed nodes form a prefix of
/// the index, so lookups never have to scan the whole graph.
#[derive(Debug, Clone)]
pub struct IndexPermutations {
    indexes: [TripleIndex; 3],
}

impl Default for IndexPermutations {
    fn default() -> Self {
        Self {
            indexes: IndexComponents::ALL.map(TripleIndex::new),
        }
    }
}

impl IndexPermutations {
    pub fn len(&self) -> usize {
        self.indexes[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `triple` into all indexes. Returns false if the triple already exists.
    pub fn insert(&mut self, triple: &Triple) -> bool {
        let mut inserted = false;
        for index in &mut self.indexes {
            inserted = index.insert(index.components().order_triple(triple.clone()));
        }
        inserted
    }

    /// Removes `triple` from all indexes. Returns false if the triple does not exist.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let mut removed = false;
        for index in &mut self.indexes {
            removed = index.remove(&index.components().order_triple(triple.clone()));
        }
        removed
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        let index = &self.indexes[0];
        index.contains(&index.components().order_triple(triple.clone()))
    }

    /// Returns the triples that match the pattern, given in subject, predicate, object order.
    pub fn scan<'a>(
        &'a self,
        pattern: [Option<&Term>; 3],
    ) -> impl Iterator<Item = Triple> + 'a {
        let index = self.choose_index(pattern);
        let components = index.components();
        index
            .scan(components.reorder(pattern))
            .map(move |nodes| components.restore_triple(nodes))
    }

    /// Chooses the index with the highest scan score for `pattern`.
    fn choose_index(&self, pattern: [Option<&Term>; 3]) -> &TripleIndex {
        let mut best = &self.indexes[0];
        let mut best_score = best.compute_scan_score(best.components().reorder(pattern));
        for index in &self.indexes[1..] {
            let score = index.compute_scan_score(index.components().reorder(pattern));
            if score > best_score {
                best = index;
                best_score = score;
            }
        }
        best
    }
}
