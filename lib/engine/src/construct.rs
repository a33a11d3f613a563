use crate::Multiset;
use rdf_weave_logical::patterns::{ConstructContext, TriplePattern};
use rdf_weave_model::Triple;
use rustc_hash::FxHashSet;

/// Instantiates the `template` once per solution of `multiset`.
///
/// Blank nodes of the template are replaced by fresh blank nodes for each solution. Template
/// triples with an unbound variable or that would not be valid RDF are skipped, as are
/// duplicates.
pub fn construct_triples(template: &[TriplePattern], multiset: &Multiset) -> Vec<Triple> {
    let mut seen = FxHashSet::default();
    let mut triples = Vec::new();
    for solution in multiset.solutions() {
        let mut context = ConstructContext::new(solution);
        for pattern in template {
            let Ok(triple) = pattern.construct(&mut context) else {
                continue;
            };
            if triple.is_valid_rdf() && seen.insert(triple.clone()) {
                triples.push(triple);
            }
        }
    }
    triples
}
