use crate::test_utils::{iri, people, term, var};
use rdf_weave_common::Dataset;
use rdf_weave_engine::{get_triples, EvaluationContext, EvaluationError, EvaluationOptions, Multiset};
use rdf_weave_logical::patterns::{IndexType, PatternItem, TriplePattern};
use rdf_weave_model::{GraphName, Solution, Term, Triple};
use rdf_weave_storage::memory::MemoryDataset;

fn dataset() -> MemoryDataset {
    let mut dataset = people();
    dataset.extend(
        GraphName::DefaultGraph,
        [
            Triple::new(iri("alice"), iri("knows"), iri("carol")),
            Triple::new(iri("bob"), iri("likes"), iri("alice")),
            Triple::new(iri("carol"), iri("likes"), iri("bob")),
        ],
    );
    dataset
}

/// Returns the triples of the default graph that match the fixed positions of `pattern`.
fn full_scan(
    dataset: &MemoryDataset,
    pattern: &TriplePattern,
    inbound: &Multiset,
) -> Result<Vec<String>, EvaluationError> {
    let mut result = Vec::new();
    for triple in dataset.triples(&GraphName::DefaultGraph)? {
        let triple = triple?;
        if pattern.accepts(true, inbound, &triple) {
            result.push(triple.to_string());
        }
    }
    result.sort();
    Ok(result)
}

fn indexed(
    dataset: &MemoryDataset,
    pattern: &TriplePattern,
    inbound: &Multiset,
) -> Result<Vec<String>, EvaluationError> {
    let context = EvaluationContext::new(dataset, EvaluationOptions::default());
    let mut result = Vec::new();
    for triple in get_triples(&context, pattern, inbound)? {
        let triple = triple?;
        if pattern.accepts(true, inbound, &triple) {
            result.push(triple.to_string());
        }
    }
    result.sort();
    Ok(result)
}

fn item(fixed: bool, value: Term, variable: &str) -> PatternItem {
    if fixed {
        value.into()
    } else {
        var(variable).into()
    }
}

#[test]
fn test_every_index_type_equals_full_scan() -> Result<(), EvaluationError> {
    let dataset = dataset();
    let mut index_types = Vec::new();
    for mask in 0..8 {
        let pattern = TriplePattern::try_new(
            item(mask & 1 != 0, term("alice"), "s"),
            item(mask & 2 != 0, term("knows"), "p"),
            item(mask & 4 != 0, term("carol"), "o"),
        )?;
        index_types.push(pattern.index_type());
        assert_eq!(
            indexed(&dataset, &pattern, &Multiset::Identity)?,
            full_scan(&dataset, &pattern, &Multiset::Identity)?,
            "Indexed retrieval of {pattern} differs from the full scan"
        );
    }

    assert_eq!(
        index_types,
        vec![
            IndexType::None,
            IndexType::Subject,
            IndexType::Predicate,
            IndexType::SubjectPredicate,
            IndexType::Object,
            IndexType::SubjectObject,
            IndexType::PredicateObject,
            IndexType::NoVariables,
        ]
    );

    Ok(())
}

#[test]
fn test_bound_variables_narrow_lookups() -> Result<(), EvaluationError> {
    let dataset = dataset();
    let inbound = Multiset::from_solutions(
        [var("s")],
        [
            Solution::from_iter([(var("s"), term("alice"))]),
            Solution::from_iter([(var("s"), term("bob"))]),
        ],
    );
    let pattern = TriplePattern::try_new(var("s"), iri("knows"), var("o"))?;

    let triples = indexed(&dataset, &pattern, &inbound)?;
    assert_eq!(triples, full_scan(&dataset, &pattern, &inbound)?);
    insta::assert_snapshot!(triples.join("\n"), @r"
    <http://ex/alice> <http://ex/knows> <http://ex/bob>
    <http://ex/alice> <http://ex/knows> <http://ex/carol>
    <http://ex/bob> <http://ex/knows> <http://ex/carol>
    ");

    Ok(())
}

#[test]
fn test_bound_pairs_are_checked_for_existence() -> Result<(), EvaluationError> {
    let dataset = dataset();
    let inbound = Multiset::from_solutions(
        [var("s"), var("o")],
        [
            Solution::from_iter([(var("s"), term("alice")), (var("o"), term("bob"))]),
            Solution::from_iter([(var("s"), term("bob")), (var("o"), term("dave"))]),
        ],
    );
    let pattern = TriplePattern::try_new(var("s"), iri("knows"), var("o"))?;

    let triples = indexed(&dataset, &pattern, &inbound)?;
    insta::assert_snapshot!(triples.join("\n"), @"<http://ex/alice> <http://ex/knows> <http://ex/bob>");

    Ok(())
}

#[test]
fn test_floating_variable_does_not_narrow() -> Result<(), EvaluationError> {
    let dataset = dataset();
    let inbound = Multiset::from_solutions(
        [var("s")],
        [
            Solution::from_iter([(var("s"), term("carol"))]),
            Solution::from_iter([(var("s"), None::<Term>)]),
        ],
    );
    let pattern = TriplePattern::try_new(var("s"), iri("likes"), var("o"))?;

    let context = EvaluationContext::new(&dataset, EvaluationOptions::default());
    let candidates = get_triples(&context, &pattern, &inbound)?.count();
    assert_eq!(candidates, 2);

    Ok(())
}
