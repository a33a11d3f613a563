use crate::expression::{effective_boolean_value, evaluate_expression};
use crate::paths::{evaluate_path_pattern, evaluate_repetition};
use crate::triple_pattern::evaluate_triple_pattern;
use crate::{EvaluationContext, EvaluationError, Multiset};
use rdf_weave_logical::algebra::BgpElement;
use rdf_weave_logical::patterns::{
    Assignment, BindingsPattern, PatternItem, PropertyFunctionPattern, SubQuery,
};
use rdf_weave_logical::{has_variables, Algebra, Expression, GraphPattern};
use rdf_weave_model::{GraphName, NamedNode, Solution, Term, Variable};
use tracing::{debug, warn};

/// Evaluates `algebra` and returns its solutions.
///
/// The `input` holds the solutions computed so far by the enclosing operator. It is only used to
/// narrow lookups: the result is the solutions of `algebra` alone and is joined with `input` by
/// the caller. Passing [Multiset::Identity] evaluates `algebra` without any restriction.
pub fn evaluate_algebra(
    context: &mut EvaluationContext<'_>,
    algebra: &Algebra,
    input: &Multiset,
) -> Result<Multiset, EvaluationError> {
    match algebra {
        Algebra::Bgp(elements) => evaluate_bgp(context, elements, input),
        Algebra::Join { lhs, rhs } => {
            let lhs = evaluate_algebra(context, lhs, input)?;
            if lhs.is_empty() {
                return Ok(Multiset::Null);
            }
            let rhs = evaluate_algebra(context, rhs, &lhs)?;
            Ok(lhs.join(rhs))
        }
        Algebra::LeftJoin { lhs, rhs, filter } => {
            let left = evaluate_algebra(context, lhs, input)?;
            if left.is_empty() {
                return Ok(Multiset::Null);
            }
            let right = if can_flow_to_rhs(lhs, rhs) {
                evaluate_algebra(context, rhs, &left)?
            } else {
                evaluate_algebra(context, rhs, &Multiset::Identity)?
            };
            Ok(left.left_join(right, |solution| {
                filter.as_ref().map_or(true, |filter| {
                    effective_boolean_value(filter, solution).unwrap_or(false)
                })
            }))
        }
        Algebra::Union { lhs, rhs } => {
            let identity = Multiset::Identity;
            let input = if is_extend(lhs) || is_extend(rhs) {
                &identity
            } else {
                input
            };
            let lhs = evaluate_algebra(context, lhs, input)?;
            let rhs = evaluate_algebra(context, rhs, input)?;
            Ok(lhs.union(rhs))
        }
        Algebra::Minus { lhs, rhs } => {
            let left = evaluate_algebra(context, lhs, input)?;
            if left.is_empty() {
                return Ok(Multiset::Null);
            }
            if is_disjoint(lhs, rhs) {
                return Ok(left);
            }
            let right = evaluate_algebra(context, rhs, &left)?;
            Ok(left.minus(right))
        }
        Algebra::ExistsJoin {
            lhs,
            rhs,
            must_exist,
        } => {
            let left = evaluate_algebra(context, lhs, input)?;
            if left.is_empty() {
                return Ok(Multiset::Null);
            }
            let right = evaluate_algebra(context, rhs, &left)?;
            Ok(left.exists_join(right, *must_exist))
        }
        Algebra::Filter { inner, expression } => {
            let inner = evaluate_algebra(context, inner, input)?;
            Ok(apply_filter(inner, expression))
        }
        Algebra::Extend {
            inner,
            variable,
            expression,
        } => {
            let inner = evaluate_algebra(context, inner, input)?;
            apply_extend(inner, variable, expression)
        }
        Algebra::Bindings(bindings) => Ok(evaluate_bindings(bindings)),
        Algebra::Graph { inner, graph } => evaluate_graph(context, inner, graph, input),
        Algebra::Service {
            endpoint,
            silent,
            pattern,
        } => evaluate_service(context, endpoint, *silent, pattern, input),
        Algebra::Path {
            subject,
            path,
            object,
            min_length,
            max_length,
        } => context.with_rigorous_evaluation(|context| {
            evaluate_repetition(
                context,
                subject,
                path,
                object,
                (*min_length, *max_length),
                input,
            )
        }),
    }
}

/// Evaluates the elements of a basic graph pattern from left to right.
///
/// The first element is narrowed by `input`, every following element by the solutions
/// accumulated so far. Filters and assignments apply to the accumulated solutions.
fn evaluate_bgp(
    context: &mut EvaluationContext<'_>,
    elements: &[BgpElement],
    input: &Multiset,
) -> Result<Multiset, EvaluationError> {
    let mut result = Multiset::Identity;
    for element in elements {
        let produced = {
            let narrowing = if result.is_identity() { input } else { &result };
            match element {
                BgpElement::Triple(pattern) => {
                    Some(evaluate_triple_pattern(context, pattern, narrowing)?)
                }
                BgpElement::Path(pattern) => {
                    Some(evaluate_path_pattern(context, pattern, narrowing)?)
                }
                BgpElement::PropertyFunction(pattern) => {
                    Some(evaluate_property_function(context, pattern, narrowing)?)
                }
                BgpElement::SubQuery(sub_query) => Some(evaluate_sub_query(context, sub_query)?),
                BgpElement::Filter(_) | BgpElement::Assignment(_) => None,
            }
        };

        result = match (element, produced) {
            (_, Some(produced)) => result.join(produced),
            (BgpElement::Filter(expression), None) => apply_filter(result, expression),
            (BgpElement::Assignment(assignment), None) => {
                apply_assignment(result, assignment)?
            }
            (_, None) => result,
        };
        if result.is_empty() {
            return Ok(Multiset::Null);
        }
    }
    Ok(result)
}

/// Keeps the solutions for which `expression` evaluates to true.
///
/// The identity only depends on the expression if the expression is variable-free. Otherwise,
/// the variables are bound outside of this operator and the identity is kept.
fn apply_filter(multiset: Multiset, expression: &Expression) -> Multiset {
    match multiset {
        Multiset::Null => Multiset::Null,
        Multiset::Identity if has_variables(expression) => Multiset::Identity,
        multiset => multiset
            .filter(|solution| effective_boolean_value(expression, solution).unwrap_or(false)),
    }
}

fn apply_assignment(
    multiset: Multiset,
    assignment: &Assignment,
) -> Result<Multiset, EvaluationError> {
    apply_extend(multiset, assignment.variable(), assignment.expression())
}

/// Binds `variable` to the value of `expression` in every solution. A failing expression leaves
/// the variable unbound. Assigning a variable that already has a value is an error.
fn apply_extend(
    multiset: Multiset,
    variable: &Variable,
    expression: &Expression,
) -> Result<Multiset, EvaluationError> {
    if multiset.is_empty() {
        return Ok(Multiset::Null);
    }
    let solutions = multiset.into_solutions();
    let mut variables = solutions.variables().iter().cloned().collect::<Vec<_>>();
    variables.push(variable.clone());

    let mut extended = Vec::with_capacity(solutions.len());
    for solution in solutions.solutions() {
        if solution.is_bound(variable) {
            return Err(EvaluationError::VariableAlreadyBound(variable.clone()));
        }
        let mut solution = solution.clone();
        match evaluate_expression(expression, &solution) {
            Ok(value) => solution
                .bind(variable.clone(), value)
                .map_err(|error| EvaluationError::VariableAlreadyBound(error.variable))?,
            Err(_) => solution.declare(variable.clone()),
        }
        extended.push(solution);
    }
    Ok(Multiset::from_solutions(variables, extended))
}

fn evaluate_bindings(bindings: &BindingsPattern) -> Multiset {
    Multiset::from_solutions(bindings.variables().iter().cloned(), bindings.to_solutions())
}

/// Evaluates `inner` with the graph(s) given by `graph` as the active graph.
///
/// A variable iterates over the named graphs, restricted to its inbound values if it is bound in
/// every inbound solution, and is bound to the graph name in each result.
fn evaluate_graph(
    context: &mut EvaluationContext<'_>,
    inner: &Algebra,
    graph: &PatternItem,
    input: &Multiset,
) -> Result<Multiset, EvaluationError> {
    let Some(variable) = graph.variable() else {
        return match graph.fixed() {
            Some(term) => match graph_name(term) {
                Some(name) => context.in_graph(name, |context| evaluate_algebra(context, inner, input)),
                None => Ok(Multiset::Null),
            },
            None => Ok(Multiset::Null),
        };
    };

    let named_graphs = context
        .dataset()
        .named_graphs()?
        .into_iter()
        .map(Term::from)
        .collect::<Vec<_>>();
    let candidates = match input.fixed_values(&variable) {
        Some(values) => values
            .into_iter()
            .filter(|value| named_graphs.contains(value))
            .collect(),
        None => named_graphs,
    };

    let mut result = Multiset::Null;
    for name in candidates {
        let Some(graph_name) = graph_name(&name) else {
            continue;
        };
        let graph_result = context.in_graph(graph_name, |context| {
            evaluate_algebra(context, inner, input)
        })?;
        if graph_result.is_empty() {
            continue;
        }
        let binding = Multiset::from_solutions(
            [variable.clone()],
            [Solution::from_iter([(variable.clone(), name)])],
        );
        result = result.union(graph_result.join(binding));
    }
    Ok(result)
}

fn graph_name(term: &Term) -> Option<GraphName> {
    match term {
        Term::NamedNode(node) => Some(node.clone().into()),
        Term::BlankNode(node) => Some(node.clone().into()),
        Term::Literal(_) => None,
    }
}

/// Delegates a `SERVICE` block to the registered handler. A silent service that fails or has no
/// handler yields the identity.
fn evaluate_service(
    context: &mut EvaluationContext<'_>,
    endpoint: &PatternItem,
    silent: bool,
    pattern: &GraphPattern,
    input: &Multiset,
) -> Result<Multiset, EvaluationError> {
    let result = resolve_endpoint(endpoint, input).and_then(|endpoint| {
        let handler = context
            .service_handler(&endpoint)
            .ok_or_else(|| EvaluationError::UnsupportedService(endpoint.clone()))?;
        debug!("Evaluating service {endpoint}");
        handler
            .handle(&endpoint, pattern, input)
            .map_err(EvaluationError::Service)
    });
    match result {
        Ok(result) => Ok(result),
        Err(error) if silent => {
            warn!("Ignoring failed silent service: {error}");
            Ok(Multiset::Identity)
        }
        Err(error) => Err(error),
    }
}

fn resolve_endpoint(
    endpoint: &PatternItem,
    input: &Multiset,
) -> Result<NamedNode, EvaluationError> {
    let term = match endpoint {
        PatternItem::Fixed(term) => term.clone(),
        PatternItem::Variable(_) | PatternItem::BlankNode(_) => {
            let values = endpoint
                .variable()
                .and_then(|variable| input.fixed_values(&variable))
                .unwrap_or_default();
            match <[Term; 1]>::try_from(values) {
                Ok([value]) => value,
                Err(_) => return Err(EvaluationError::UnboundService),
            }
        }
    };
    match term {
        Term::NamedNode(node) => Ok(node),
        other => Err(EvaluationError::InvalidServiceName(other)),
    }
}

/// Evaluates a sub-query in isolation: the enclosing solutions do not flow into it.
///
/// The inner solutions are grouped, projected, made distinct and sliced as requested.
pub(crate) fn evaluate_sub_query(
    context: &mut EvaluationContext<'_>,
    sub_query: &SubQuery<Algebra>,
) -> Result<Multiset, EvaluationError> {
    let result = evaluate_algebra(context, sub_query.inner(), &Multiset::Identity).map_err(
        |error| EvaluationError::SubQuery {
            projection: sub_query
                .projection()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            source: Box::new(error),
        },
    )?;
    let result = match sub_query.group_by() {
        Some(group_variables) => result.group_by(group_variables).flatten(),
        None => result,
    };
    let result = result.project(sub_query.projection());
    let result = if sub_query.is_distinct() {
        result.distinct()
    } else {
        result
    };
    Ok(result.slice(sub_query.offset(), sub_query.limit()))
}

fn evaluate_property_function(
    context: &mut EvaluationContext<'_>,
    pattern: &PropertyFunctionPattern,
    input: &Multiset,
) -> Result<Multiset, EvaluationError> {
    let function = context
        .property_functions()
        .get(pattern.function())
        .ok_or_else(|| EvaluationError::UnknownPropertyFunction(pattern.function().clone()))?;
    function.evaluate(context, pattern, input)
}

/// Returns true if the solutions of `lhs` may be used to narrow the evaluation of `rhs`: both
/// share a variable and no variable that `lhs` may leave unbound is used by `rhs`.
fn can_flow_to_rhs(lhs: &Algebra, rhs: &Algebra) -> bool {
    let rhs_variables = rhs.variables();
    let shares_variable = lhs
        .variables()
        .iter()
        .any(|variable| rhs_variables.contains(variable));
    shares_variable
        && !lhs
            .floating_variables()
            .iter()
            .any(|variable| rhs_variables.contains(variable))
}

fn is_disjoint(lhs: &Algebra, rhs: &Algebra) -> bool {
    let rhs_variables = rhs.variables();
    !lhs.variables()
        .iter()
        .any(|variable| rhs_variables.contains(variable))
}

fn is_extend(algebra: &Algebra) -> bool {
    matches!(algebra, Algebra::Extend { .. })
}
