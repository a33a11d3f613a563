use crate::patterns::{PathPattern, PropertyFunctionPattern, SubQuery, TriplePattern};
use crate::GraphPattern;
use rdf_weave_model::Variable;
use spargebra::algebra::Expression;
use std::fmt::{Display, Formatter};

/// Identifies a filter in the unplaced-filter backlog of a graph pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(pub(crate) usize);

/// Identifies an assignment in the unplaced-assignment backlog of a graph pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentId(pub(crate) usize);

/// A `BIND(expression AS ?variable)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    variable: Variable,
    expression: Expression,
}

impl Assignment {
    pub fn new(variable: Variable, expression: Expression) -> Self {
        Self {
            variable,
            expression,
        }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BIND({} AS {})", self.expression, self.variable)
    }
}

/// An element of the pattern list of a graph pattern.
///
/// Filters and assignments only become elements once an optimizer placed them at a specific
/// position. Until then, they live in the backlog of their graph pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternElement<P = GraphPattern> {
    Triple(TriplePattern),
    Path(PathPattern),
    Filter(Expression),
    Assignment(Assignment),
    SubQuery(Box<SubQuery<P>>),
    PropertyFunction(PropertyFunctionPattern),
}

impl<P> PatternElement<P> {
    /// The variables that this element may bind.
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            PatternElement::Triple(pattern) => pattern.variables().to_vec(),
            PatternElement::Path(pattern) => pattern.variables(),
            PatternElement::Filter(_) => Vec::new(),
            PatternElement::Assignment(assignment) => vec![assignment.variable().clone()],
            PatternElement::SubQuery(sub_query) => sub_query.projection().to_vec(),
            PatternElement::PropertyFunction(pattern) => pattern.variables(),
        }
    }

    /// Returns true if this element produces solutions on its own, as opposed to filters and
    /// assignments that transform the solutions of the elements before them.
    pub fn is_producer(&self) -> bool {
        !matches!(
            self,
            PatternElement::Filter(_) | PatternElement::Assignment(_)
        )
    }
}

impl<P> Display for PatternElement<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternElement::Triple(pattern) => pattern.fmt(f),
            PatternElement::Path(pattern) => pattern.fmt(f),
            PatternElement::Filter(expression) => write!(f, "FILTER({expression})"),
            PatternElement::Assignment(assignment) => assignment.fmt(f),
            PatternElement::SubQuery(sub_query) => {
                f.write_str("SubQuery(")?;
                for (i, variable) in sub_query.projection().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{variable}")?;
                }
                f.write_str(")")
            }
            PatternElement::PropertyFunction(pattern) => pattern.fmt(f),
        }
    }
}

impl<P> From<TriplePattern> for PatternElement<P> {
    fn from(value: TriplePattern) -> Self {
        PatternElement::Triple(value)
    }
}

impl<P> From<PathPattern> for PatternElement<P> {
    fn from(value: PathPattern) -> Self {
        PatternElement::Path(value)
    }
}

impl<P> From<PropertyFunctionPattern> for PatternElement<P> {
    fn from(value: PropertyFunctionPattern) -> Self {
        PatternElement::PropertyFunction(value)
    }
}

impl<P> From<SubQuery<P>> for PatternElement<P> {
    fn from(value: SubQuery<P>) -> Self {
        PatternElement::SubQuery(Box::new(value))
    }
}
