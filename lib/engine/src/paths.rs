use crate::eval::evaluate_algebra;
use crate::{EvaluationContext, EvaluationError, Multiset};
use indexmap::IndexSet;
use rdf_weave_logical::algebra::BgpElement;
use rdf_weave_logical::patterns::{PathPattern, PatternItem, TriplePattern};
use rdf_weave_logical::{Algebra, Expression, PropertyPathExpression};
use rdf_weave_model::{Solution, Term, Variable};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Evaluates a property path pattern.
///
/// The path is rewritten into algebra that uses temporary variables for the intermediate nodes.
/// The algebra is evaluated rigorously and the temporary variables are removed from the result.
pub(crate) fn evaluate_path_pattern(
    context: &mut EvaluationContext<'_>,
    pattern: &PathPattern,
    inbound: &Multiset,
) -> Result<Multiset, EvaluationError> {
    context.with_rigorous_evaluation(|context| {
        let algebra = transform_path(context, pattern.subject(), pattern.path(), pattern.object())?;
        debug!("Rewrote path {pattern} into\n{algebra}");
        let result = evaluate_algebra(context, &algebra, inbound)?;
        Ok(result.retain_variables(|variable| !EvaluationContext::is_temporary(variable)))
    })
}

/// Rewrites the path expression between `subject` and `object` into algebra.
///
/// Predicates become triple patterns, sequences join over a fresh intermediate variable,
/// alternatives become unions and inverse paths swap their ends. Negated property sets match any
/// predicate except the listed ones. Repetitions become [Algebra::Path].
pub fn transform_path(
    context: &mut EvaluationContext<'_>,
    subject: &PatternItem,
    path: &PropertyPathExpression,
    object: &PatternItem,
) -> Result<Algebra, EvaluationError> {
    let algebra = match path {
        PropertyPathExpression::NamedNode(predicate) => {
            let pattern =
                TriplePattern::try_new(subject.clone(), predicate.clone(), object.clone())?;
            Algebra::Bgp(vec![BgpElement::Triple(pattern)])
        }
        PropertyPathExpression::Reverse(inner) => transform_path(context, object, inner, subject)?,
        PropertyPathExpression::Sequence(first, second) => {
            let middle = PatternItem::Variable(context.fresh_variable());
            let first = transform_path(context, subject, first, &middle)?;
            let second = transform_path(context, &middle, second, object)?;
            join_fragments(first, second)
        }
        PropertyPathExpression::Alternative(first, second) => {
            let first = transform_path(context, subject, first, object)?;
            let second = transform_path(context, subject, second, object)?;
            Algebra::union(first, second)
        }
        PropertyPathExpression::ZeroOrOne(inner) => {
            repetition(subject, inner, object, 0, Some(1))
        }
        PropertyPathExpression::ZeroOrMore(inner) => repetition(subject, inner, object, 0, None),
        PropertyPathExpression::OneOrMore(inner) => repetition(subject, inner, object, 1, None),
        PropertyPathExpression::NegatedPropertySet(excluded) => {
            let predicate = context.fresh_variable();
            let pattern = TriplePattern::try_new(
                subject.clone(),
                PatternItem::Variable(predicate.clone()),
                object.clone(),
            )?;
            let not_in = Expression::Not(Box::new(Expression::In(
                Box::new(Expression::Variable(predicate)),
                excluded
                    .iter()
                    .cloned()
                    .map(Expression::NamedNode)
                    .collect(),
            )));
            Algebra::Bgp(vec![
                BgpElement::Triple(pattern),
                BgpElement::Filter(not_in),
            ])
        }
    };
    Ok(algebra)
}

fn repetition(
    subject: &PatternItem,
    path: &PropertyPathExpression,
    object: &PatternItem,
    min_length: usize,
    max_length: Option<usize>,
) -> Algebra {
    Algebra::Path {
        subject: subject.clone(),
        path: path.clone(),
        object: object.clone(),
        min_length,
        max_length,
    }
}

/// Joins two fragments. Two basic graph patterns are merged into one.
fn join_fragments(first: Algebra, second: Algebra) -> Algebra {
    match (first, second) {
        (Algebra::Bgp(mut first), Algebra::Bgp(second)) => {
            first.extend(second);
            Algebra::Bgp(first)
        }
        (first, second) => Algebra::join(first, second),
    }
}

/// Evaluates an [Algebra::Path] by a breadth-first search from every start node.
///
/// The search starts from the subject if it is fixed or bound in every inbound solution, else from
/// the object along the inverse path. If neither end is bound, every node of the active graph is a
/// start node. Each pair of connected nodes is reported once.
pub(crate) fn evaluate_repetition(
    context: &mut EvaluationContext<'_>,
    subject: &PatternItem,
    path: &PropertyPathExpression,
    object: &PatternItem,
    (min_length, max_length): (usize, Option<usize>),
    inbound: &Multiset,
) -> Result<Multiset, EvaluationError> {
    let (start, end, step, start_nodes) = if let Some(nodes) = candidates(subject, inbound) {
        (subject, object, path.clone(), nodes)
    } else if let Some(nodes) = candidates(object, inbound) {
        let inverse = PropertyPathExpression::Reverse(Box::new(path.clone()));
        (object, subject, inverse, nodes)
    } else {
        (subject, object, path.clone(), graph_nodes(context)?)
    };

    let start_variable = start.variable();
    let end_variable = end.variable();
    let mut solutions = Vec::new();
    for start_node in start_nodes {
        let reached = reachable_nodes(context, &start_node, &step, min_length, max_length)?;
        for end_node in reached {
            if end.fixed().is_some_and(|fixed| *fixed != end_node) {
                continue;
            }
            let mut solution = Solution::new();
            if let Some(variable) = &start_variable {
                if solution.bind(variable.clone(), start_node.clone()).is_err() {
                    continue;
                }
            }
            if let Some(variable) = &end_variable {
                if solution.bind(variable.clone(), end_node).is_err() {
                    continue;
                }
            }
            solutions.push(solution);
        }
    }

    let variables = start_variable.into_iter().chain(end_variable);
    Ok(Multiset::from_solutions(variables, solutions))
}

/// Returns the start candidates for `item`: its fixed node or the values that every inbound
/// solution binds to its variable.
fn candidates(item: &PatternItem, inbound: &Multiset) -> Option<Vec<Term>> {
    match item {
        PatternItem::Fixed(term) => Some(vec![term.clone()]),
        PatternItem::Variable(_) | PatternItem::BlankNode(_) => {
            inbound.fixed_values(&item.variable()?)
        }
    }
}

fn graph_nodes(context: &EvaluationContext<'_>) -> Result<Vec<Term>, EvaluationError> {
    let mut nodes = IndexSet::new();
    for triple in context.dataset().triples(context.active_graph())? {
        let triple = triple?;
        nodes.insert(triple.subject);
        nodes.insert(triple.object);
    }
    Ok(nodes.into_iter().collect())
}

fn reachable_nodes(
    context: &mut EvaluationContext<'_>,
    start: &Term,
    step: &PropertyPathExpression,
    min_length: usize,
    max_length: Option<usize>,
) -> Result<IndexSet<Term>, EvaluationError> {
    let mut result = IndexSet::new();
    if min_length == 0 {
        result.insert(start.clone());
    }

    let mut visited = FxHashSet::default();
    let mut frontier = vec![start.clone()];
    let mut depth = 0;
    while !frontier.is_empty() && max_length.map_or(true, |max_length| depth < max_length) {
        depth += 1;
        let mut next = Vec::new();
        for node in frontier {
            for neighbour in single_step(context, &node, step)? {
                if visited.insert(neighbour.clone()) {
                    if depth >= min_length {
                        result.insert(neighbour.clone());
                    }
                    next.push(neighbour);
                }
            }
        }
        frontier = next;
    }
    Ok(result)
}

/// Returns the nodes reachable from `node` by one traversal of `path`.
fn single_step(
    context: &mut EvaluationContext<'_>,
    node: &Term,
    path: &PropertyPathExpression,
) -> Result<Vec<Term>, EvaluationError> {
    let target = context.fresh_variable();
    let algebra = transform_path(
        context,
        &PatternItem::Fixed(node.clone()),
        path,
        &PatternItem::Variable(target.clone()),
    )?;
    let result = evaluate_algebra(context, &algebra, &Multiset::Identity)?;
    Ok(distinct_values(&result, &target))
}

fn distinct_values(multiset: &Multiset, variable: &Variable) -> Vec<Term> {
    multiset
        .solutions()
        .iter()
        .filter_map(|solution| solution.get(variable).cloned())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
