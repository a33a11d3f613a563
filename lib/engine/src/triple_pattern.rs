use crate::{EvaluationContext, EvaluationError, Multiset};
use rdf_weave_common::error::StorageError;
use rdf_weave_common::{Dataset, TripleIter};
use rdf_weave_logical::patterns::{IndexType, PatternItem, TriplePattern};
use rdf_weave_model::{GraphName, Term, Triple};
use tracing::trace;

/// Matches `pattern` against the active graph.
///
/// The solutions bind only the variables of `pattern`. The `inbound` solutions are used to narrow
/// the index lookups and, with rigorous evaluation, to reject triples that contradict them.
pub fn evaluate_triple_pattern(
    context: &EvaluationContext<'_>,
    pattern: &TriplePattern,
    inbound: &Multiset,
) -> Result<Multiset, EvaluationError> {
    if pattern.has_no_variables() {
        let triple = Triple::new(
            fixed_node(pattern.subject()),
            fixed_node(pattern.predicate()),
            fixed_node(pattern.object()),
        );
        let contains = context
            .dataset()
            .contains(context.active_graph(), &triple)?;
        return Ok(if contains {
            Multiset::Identity
        } else {
            Multiset::Null
        });
    }

    let rigorous = context.options().rigorous_evaluation;
    let mut solutions = Vec::new();
    for triple in get_triples(context, pattern, inbound)? {
        let triple = triple?;
        if pattern.accepts(rigorous, inbound, &triple) {
            solutions.push(pattern.create_result(&triple));
        }
    }
    trace!(
        "Matched {} solutions for pattern {pattern} with index {:?}",
        solutions.len(),
        pattern.index_type()
    );
    Ok(Multiset::from_solutions(
        pattern.variables().iter().cloned(),
        solutions,
    ))
}

/// Retrieves the candidate triples of `pattern` with the index that fits the fixed nodes of the
/// pattern and the values bound by `inbound`.
///
/// A variable position counts as bound if the variable has a value in every inbound solution.
/// Its distinct values then become additional index keys. If both non-key positions are bound,
/// the candidate triples are built from the distinct value pairs and checked for existence.
pub fn get_triples<'d>(
    context: &EvaluationContext<'d>,
    pattern: &TriplePattern,
    inbound: &Multiset,
) -> Result<TripleIter<'d>, StorageError> {
    let dataset = context.dataset();
    let graph = context.active_graph().clone();
    let subject = pattern.subject();
    let predicate = pattern.predicate();
    let object = pattern.object();

    let iter: TripleIter<'d> = match pattern.index_type() {
        IndexType::NoVariables => {
            let triple = Triple::new(
                fixed_node(subject),
                fixed_node(predicate),
                fixed_node(object),
            );
            if dataset.contains(&graph, &triple)? {
                Box::new(std::iter::once(Ok(triple)))
            } else {
                Box::new(std::iter::empty())
            }
        }
        IndexType::Subject => {
            let s = fixed_node(subject);
            match (
                bound_values(predicate, inbound),
                bound_values(object, inbound),
            ) {
                (Some(_), Some(_)) => {
                    let pairs = bound_pairs(predicate, object, inbound).unwrap_or_default();
                    existing(
                        dataset,
                        graph,
                        pairs
                            .into_iter()
                            .map(move |(p, o)| Triple::new(s.clone(), p, o)),
                    )
                }
                (Some(predicates), None) => lookups(predicates, move |p| {
                    dataset.triples_with_subject_predicate(&graph, &s, &p)
                }),
                (None, Some(objects)) => lookups(objects, move |o| {
                    dataset.triples_with_subject_object(&graph, &s, &o)
                }),
                (None, None) => dataset.triples_with_subject(&graph, &s)?,
            }
        }
        IndexType::SubjectPredicate => {
            let s = fixed_node(subject);
            let p = fixed_node(predicate);
            match bound_values(object, inbound) {
                Some(objects) => existing(
                    dataset,
                    graph,
                    objects
                        .into_iter()
                        .map(move |o| Triple::new(s.clone(), p.clone(), o)),
                ),
                None => dataset.triples_with_subject_predicate(&graph, &s, &p)?,
            }
        }
        IndexType::SubjectObject => {
            let s = fixed_node(subject);
            let o = fixed_node(object);
            match bound_values(predicate, inbound) {
                Some(predicates) => existing(
                    dataset,
                    graph,
                    predicates
                        .into_iter()
                        .map(move |p| Triple::new(s.clone(), p, o.clone())),
                ),
                None => dataset.triples_with_subject_object(&graph, &s, &o)?,
            }
        }
        IndexType::Predicate => {
            let p = fixed_node(predicate);
            match (bound_values(subject, inbound), bound_values(object, inbound)) {
                (Some(_), Some(_)) => {
                    let pairs = bound_pairs(subject, object, inbound).unwrap_or_default();
                    existing(
                        dataset,
                        graph,
                        pairs
                            .into_iter()
                            .map(move |(s, o)| Triple::new(s, p.clone(), o)),
                    )
                }
                (Some(subjects), None) => lookups(subjects, move |s| {
                    dataset.triples_with_subject_predicate(&graph, &s, &p)
                }),
                (None, Some(objects)) => lookups(objects, move |o| {
                    dataset.triples_with_predicate_object(&graph, &p, &o)
                }),
                (None, None) => dataset.triples_with_predicate(&graph, &p)?,
            }
        }
        IndexType::PredicateObject => {
            let p = fixed_node(predicate);
            let o = fixed_node(object);
            match bound_values(subject, inbound) {
                Some(subjects) => existing(
                    dataset,
                    graph,
                    subjects
                        .into_iter()
                        .map(move |s| Triple::new(s, p.clone(), o.clone())),
                ),
                None => dataset.triples_with_predicate_object(&graph, &p, &o)?,
            }
        }
        IndexType::Object => {
            let o = fixed_node(object);
            match (
                bound_values(subject, inbound),
                bound_values(predicate, inbound),
            ) {
                (Some(_), Some(_)) => {
                    let pairs = bound_pairs(subject, predicate, inbound).unwrap_or_default();
                    existing(
                        dataset,
                        graph,
                        pairs
                            .into_iter()
                            .map(move |(s, p)| Triple::new(s, p, o.clone())),
                    )
                }
                (Some(subjects), None) => lookups(subjects, move |s| {
                    dataset.triples_with_subject_object(&graph, &s, &o)
                }),
                (None, Some(predicates)) => lookups(predicates, move |p| {
                    dataset.triples_with_predicate_object(&graph, &p, &o)
                }),
                (None, None) => dataset.triples_with_object(&graph, &o)?,
            }
        }
        IndexType::None => {
            let subjects = bound_values(subject, inbound);
            let predicates = bound_values(predicate, inbound);
            let objects = bound_values(object, inbound);
            match (subjects, predicates, objects) {
                (Some(subjects), None, None) => lookups(subjects, move |s| {
                    dataset.triples_with_subject(&graph, &s)
                }),
                (None, Some(predicates), None) => lookups(predicates, move |p| {
                    dataset.triples_with_predicate(&graph, &p)
                }),
                (None, None, Some(objects)) => lookups(objects, move |o| {
                    dataset.triples_with_object(&graph, &o)
                }),
                _ => dataset.triples(&graph)?,
            }
        }
    };
    Ok(iter)
}

/// Returns the distinct values of the variable of `item` if it is bound in every inbound
/// solution.
fn bound_values(item: &PatternItem, inbound: &Multiset) -> Option<Vec<Term>> {
    inbound.fixed_values(&item.variable()?)
}

fn bound_pairs(
    first: &PatternItem,
    second: &PatternItem,
    inbound: &Multiset,
) -> Option<Vec<(Term, Term)>> {
    inbound.fixed_value_pairs(&first.variable()?, &second.variable()?)
}

/// Only called for positions that the index type declares as fixed.
fn fixed_node(item: &PatternItem) -> Term {
    match item {
        PatternItem::Fixed(term) => term.clone(),
        PatternItem::Variable(_) | PatternItem::BlankNode(_) => {
            unreachable!("Index keys are always fixed nodes")
        }
    }
}

/// Chains one lookup per key value.
fn lookups<'d>(
    values: Vec<Term>,
    lookup: impl Fn(Term) -> Result<TripleIter<'d>, StorageError> + 'd,
) -> TripleIter<'d> {
    Box::new(
        values
            .into_iter()
            .flat_map(move |value| match lookup(value) {
                Ok(triples) => triples,
                Err(error) => Box::new(std::iter::once(Err(error))),
            }),
    )
}

/// Keeps the candidate triples that exist in `graph`.
fn existing<'d>(
    dataset: &'d dyn Dataset,
    graph: GraphName,
    candidates: impl Iterator<Item = Triple> + 'd,
) -> TripleIter<'d> {
    Box::new(
        candidates.filter_map(move |triple| match dataset.contains(&graph, &triple) {
            Ok(true) => Some(Ok(triple)),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }),
    )
}
