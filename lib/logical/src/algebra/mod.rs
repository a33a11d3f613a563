mod display;

use crate::patterns::{BindingsPattern, PatternElement, PatternItem};
use crate::GraphPattern;
use rdf_weave_model::Variable;
use spargebra::algebra::{Expression, PropertyPathExpression};

/// An element of a compiled basic graph pattern. Sub-queries hold compiled algebra.
pub type BgpElement = PatternElement<Algebra>;

/// The SPARQL algebra evaluated by the engine.
///
/// An [Algebra] is produced by [GraphPattern::to_algebra] and is immutable afterward. The
/// constructor functions ([Algebra::join] etc.) apply the simplifications of the compiler and
/// should be preferred over building variants directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Algebra {
    /// A basic graph pattern. The empty BGP produces the identity multiset.
    Bgp(Vec<BgpElement>),
    Join {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
    },
    /// An `OPTIONAL`. The filter is evaluated on each joined solution.
    LeftJoin {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
        filter: Option<Expression>,
    },
    Union {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
    },
    Minus {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
    },
    /// Keeps the solutions of `lhs` that have (`must_exist`) or do not have a compatible solution
    /// in `rhs`.
    ExistsJoin {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
        must_exist: bool,
    },
    Filter {
        inner: Box<Algebra>,
        expression: Expression,
    },
    Extend {
        inner: Box<Algebra>,
        variable: Variable,
        expression: Expression,
    },
    Bindings(BindingsPattern),
    /// Evaluates `inner` against the named graph(s) given by `graph`.
    Graph {
        inner: Box<Algebra>,
        graph: PatternItem,
    },
    /// Delegates the evaluation of `pattern` to a remote endpoint.
    Service {
        endpoint: PatternItem,
        silent: bool,
        pattern: Box<GraphPattern>,
    },
    /// Connects `subject` and `object` by a chain of `min_length` to `max_length` (unbounded if
    /// [None]) repetitions of `path`. Each pair of nodes is returned at most once.
    Path {
        subject: PatternItem,
        path: PropertyPathExpression,
        object: PatternItem,
        min_length: usize,
        max_length: Option<usize>,
    },
}

impl Algebra {
    /// The empty basic graph pattern.
    pub fn empty_bgp() -> Self {
        Algebra::Bgp(Vec::new())
    }

    pub fn is_empty_bgp(&self) -> bool {
        matches!(self, Algebra::Bgp(elements) if elements.is_empty())
    }

    /// Creates a join. An empty basic graph pattern on either side is dropped.
    pub fn join(lhs: Algebra, rhs: Algebra) -> Self {
        if lhs.is_empty_bgp() {
            return rhs;
        }
        if rhs.is_empty_bgp() {
            return lhs;
        }
        Algebra::Join {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn left_join(lhs: Algebra, rhs: Algebra, filter: Option<Expression>) -> Self {
        Algebra::LeftJoin {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            filter,
        }
    }

    pub fn union(lhs: Algebra, rhs: Algebra) -> Self {
        Algebra::Union {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn minus(lhs: Algebra, rhs: Algebra) -> Self {
        Algebra::Minus {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn exists_join(lhs: Algebra, rhs: Algebra, must_exist: bool) -> Self {
        Algebra::ExistsJoin {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            must_exist,
        }
    }

    pub fn filter(inner: Algebra, expression: Expression) -> Self {
        Algebra::Filter {
            inner: Box::new(inner),
            expression,
        }
    }

    pub fn extend(inner: Algebra, variable: Variable, expression: Expression) -> Self {
        Algebra::Extend {
            inner: Box::new(inner),
            variable,
            expression,
        }
    }

    pub fn graph(inner: Algebra, graph: PatternItem) -> Self {
        Algebra::Graph {
            inner: Box::new(inner),
            graph,
        }
    }

    /// All variables that may be bound by the solutions of this algebra, in order of their first
    /// occurrence.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables = self.fixed_variables();
        for variable in self.floating_variables() {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        }
        variables
    }

    /// The variables that are bound in every solution of this algebra.
    pub fn fixed_variables(&self) -> Vec<Variable> {
        match self {
            Algebra::Bgp(elements) => distinct(elements.iter().flat_map(fixed_element_variables)),
            Algebra::Join { lhs, rhs } => {
                distinct(lhs.fixed_variables().into_iter().chain(rhs.fixed_variables()))
            }
            Algebra::Union { lhs, rhs } => {
                let rhs = rhs.fixed_variables();
                lhs.fixed_variables()
                    .into_iter()
                    .filter(|variable| rhs.contains(variable))
                    .collect()
            }
            Algebra::LeftJoin { lhs, .. }
            | Algebra::Minus { lhs, .. }
            | Algebra::ExistsJoin { lhs, .. }
            | Algebra::Filter { inner: lhs, .. }
            | Algebra::Extend { inner: lhs, .. } => lhs.fixed_variables(),
            Algebra::Bindings(bindings) => bindings.fixed_variables(),
            Algebra::Graph { inner, graph } => {
                distinct(inner.fixed_variables().into_iter().chain(graph.variable()))
            }
            Algebra::Service { .. } => Vec::new(),
            Algebra::Path {
                subject, object, ..
            } => distinct(subject.variable().into_iter().chain(object.variable())),
        }
    }

    /// The variables that are bound in some, but not necessarily all, solutions of this algebra.
    pub fn floating_variables(&self) -> Vec<Variable> {
        let fixed = self.fixed_variables();
        let candidates = match self {
            Algebra::Bgp(elements) => distinct(elements.iter().flat_map(PatternElement::variables)),
            Algebra::Join { lhs, rhs }
            | Algebra::LeftJoin { lhs, rhs, .. }
            | Algebra::Union { lhs, rhs } => {
                distinct(lhs.variables().into_iter().chain(rhs.variables()))
            }
            Algebra::Minus { lhs, .. }
            | Algebra::ExistsJoin { lhs, .. }
            | Algebra::Filter { inner: lhs, .. }
            | Algebra::Graph { inner: lhs, .. } => lhs.variables(),
            Algebra::Extend {
                inner, variable, ..
            } => distinct(inner.variables().into_iter().chain([variable.clone()])),
            Algebra::Bindings(bindings) => bindings.floating_variables(),
            Algebra::Service {
                endpoint, pattern, ..
            } => distinct(endpoint.variable().into_iter().chain(pattern.variables())),
            Algebra::Path { .. } => Vec::new(),
        };
        candidates
            .into_iter()
            .filter(|variable| !fixed.contains(variable))
            .collect()
    }
}

/// Sub-queries only fix the projected variables that their inner algebra binds in every
/// solution. A projected variable may be left undefined otherwise.
fn fixed_element_variables(element: &BgpElement) -> Vec<Variable> {
    match element {
        PatternElement::SubQuery(sub_query) => {
            let inner = sub_query.inner().fixed_variables();
            let keys = sub_query.group_by();
            sub_query
                .projection()
                .iter()
                .filter(|variable| inner.contains(variable))
                .filter(|variable| keys.map_or(true, |keys| keys.contains(variable)))
                .cloned()
                .collect()
        }
        _ if element.is_producer() => element.variables(),
        _ => Vec::new(),
    }
}

fn distinct(variables: impl IntoIterator<Item = Variable>) -> Vec<Variable> {
    let mut result = Vec::new();
    for variable in variables {
        if !result.contains(&variable) {
            result.push(variable);
        }
    }
    result
}
