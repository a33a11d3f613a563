use crate::index::IndexComponents;
use indexmap::{IndexMap, IndexSet};
use rdf_weave_model::Term;
use rustc_hash::FxBuildHasher;

type ThirdLevel = IndexSet<Term, FxBuildHasher>;
type SecondLevel = IndexMap<Term, ThirdLevel, FxBuildHasher>;
type FirstLevel = IndexMap<Term, SecondLevel, FxBuildHasher>;

/// A three-level index over the triples of one graph, in the order given by its
/// [IndexComponents].
///
/// Each level keeps the insertion order of its keys, so scans are deterministic.
#[derive(Debug, Clone)]
pub struct TripleIndex {
    components: IndexComponents,
    data: FirstLevel,
    len: usize,
}

impl TripleIndex {
    pub fn new(components: IndexComponents) -> Self {
        Self {
            components,
            data: FirstLevel::default(),
            len: 0,
        }
    }

    pub fn components(&self) -> IndexComponents {
        self.components
    }

    /// Returns the total number of triples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Computes the "scan score" for the given `pattern`, which must be in the order of this
    /// index. The score is the number of leading components that are bound, as these are answered
    /// by lookups instead of iteration.
    pub fn compute_scan_score(&self, pattern: [Option<&Term>; 3]) -> usize {
        pattern.iter().take_while(|node| node.is_some()).count()
    }

    /// Inserts a triple given in index order. Returns false if the triple already exists.
    pub fn insert(&mut self, [first, second, third]: [Term; 3]) -> bool {
        let inserted = self
            .data
            .entry(first)
            .or_default()
            .entry(second)
            .or_default()
            .insert(third);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a triple given in index order. Returns false if the triple does not exist.
    ///
    /// Levels that become empty are removed while preserving the order of the remaining keys.
    pub fn remove(&mut self, [first, second, third]: &[Term; 3]) -> bool {
        let Some(second_level) = self.data.get_mut(first) else {
            return false;
        };
        let Some(third_level) = second_level.get_mut(second) else {
            return false;
        };
        if !third_level.shift_remove(third) {
            return false;
        }
        if third_level.is_empty() {
            second_level.shift_remove(second);
        }
        if second_level.is_empty() {
            self.data.shift_remove(first);
        }
        self.len -= 1;
        true
    }

    /// Returns true if the triple, given in index order, exists.
    pub fn contains(&self, [first, second, third]: &[Term; 3]) -> bool {
        self.data
            .get(first)
            .and_then(|level| level.get(second))
            .is_some_and(|level| level.contains(third))
    }

    /// Scans the triples that match `pattern`, which must be in the order of this index. The
    /// returned nodes are in index order as well.
    pub fn scan<'a>(
        &'a self,
        pattern: [Option<&Term>; 3],
    ) -> Box<dyn Iterator<Item = [Term; 3]> + 'a> {
        let [first, second, third] = pattern.map(|node| node.cloned());

        let first_level: Box<dyn Iterator<Item = (&'a Term, &'a SecondLevel)> + 'a> = match first
        {
            Some(first) => Box::new(self.data.get_key_value(&first).into_iter()),
            None => Box::new(self.data.iter()),
        };

        Box::new(first_level.flat_map(move |(first, second_level)| {
            let second_level: Box<dyn Iterator<Item = (&'a Term, &'a ThirdLevel)> + 'a> =
                match &second {
                    Some(second) => Box::new(second_level.get_key_value(second).into_iter()),
                    None => Box::new(second_level.iter()),
                };
            let third = third.clone();
            second_level.flat_map(move |(second, third_level)| {
                let third_level: Box<dyn Iterator<Item = &'a Term> + 'a> = match &third {
                    Some(third) => Box::new(third_level.get(third).into_iter()),
                    None => Box::new(third_level.iter()),
                };
                third_level.map(move |third| [first.clone(), second.clone(), third.clone()])
            })
        }))
    }
}
