use crate::patterns::ConstructContext;
use rdf_weave_model::{BindingLookup, BlankNode, Term, ThinError, ThinResult, Variable};
use spargebra::term::{NamedNodePattern, TermPattern};
use std::fmt::{Display, Formatter};

/// A single position of a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternItem {
    /// A node that must match exactly.
    Fixed(Term),
    /// A variable that binds to the matched node.
    Variable(Variable),
    /// A blank node in a query pattern. It behaves like a variable named `_:label` that is not
    /// visible in the query results.
    BlankNode(BlankNode),
}

impl PatternItem {
    /// Returns the variable bound by this item, if any.
    pub fn variable(&self) -> Option<Variable> {
        match self {
            PatternItem::Variable(variable) => Some(variable.clone()),
            PatternItem::BlankNode(bnode) => {
                Some(Variable::new_unchecked(format!("_:{}", bnode.as_str())))
            }
            PatternItem::Fixed(_) => None,
        }
    }

    /// Returns the fixed node of this item, if any.
    pub fn fixed(&self) -> Option<&Term> {
        match self {
            PatternItem::Fixed(term) => Some(term),
            _ => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, PatternItem::Fixed(_))
    }

    /// Tests whether `candidate` can be bound to this item.
    ///
    /// Without rigorous evaluation the test is skipped, as the caller already retrieved the
    /// candidates with the fixed nodes and bound values as index keys. With rigorous evaluation,
    /// fixed items require an equal node and variables that are bound in `lookup` require a
    /// value that `lookup` accepts.
    pub fn accepts(
        &self,
        rigorous: bool,
        lookup: &(impl BindingLookup + ?Sized),
        candidate: &Term,
    ) -> bool {
        if !rigorous {
            return true;
        }
        match self {
            PatternItem::Fixed(term) => term == candidate,
            PatternItem::Variable(variable) => accepts_variable(lookup, variable, candidate),
            PatternItem::BlankNode(_) => match self.variable() {
                Some(variable) => accepts_variable(lookup, &variable, candidate),
                None => true,
            },
        }
    }

    /// Materializes the node for a CONSTRUCT template.
    ///
    /// Variables read the current solution and fail if they are unbound. Blank nodes are replaced
    /// by a blank node that is fresh for each solution but shared within one solution.
    pub fn construct_for(&self, context: &mut ConstructContext<'_>) -> ThinResult<Term> {
        match self {
            PatternItem::Fixed(term) => Ok(term.clone()),
            PatternItem::Variable(variable) => context
                .solution()
                .get(variable)
                .cloned()
                .ok_or(ThinError {}),
            PatternItem::BlankNode(bnode) => Ok(context.blank_node_for(bnode).into()),
        }
    }
}

fn accepts_variable(
    lookup: &(impl BindingLookup + ?Sized),
    variable: &Variable,
    candidate: &Term,
) -> bool {
    !lookup.is_bound(variable) || lookup.accepts_value(variable, candidate)
}

impl Display for PatternItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternItem::Fixed(term) => term.fmt(f),
            PatternItem::Variable(variable) => variable.fmt(f),
            PatternItem::BlankNode(bnode) => bnode.fmt(f),
        }
    }
}

impl From<Variable> for PatternItem {
    fn from(value: Variable) -> Self {
        PatternItem::Variable(value)
    }
}

impl From<Term> for PatternItem {
    fn from(value: Term) -> Self {
        PatternItem::Fixed(value)
    }
}

impl From<rdf_weave_model::NamedNode> for PatternItem {
    fn from(value: rdf_weave_model::NamedNode) -> Self {
        PatternItem::Fixed(value.into())
    }
}

impl From<rdf_weave_model::Literal> for PatternItem {
    fn from(value: rdf_weave_model::Literal) -> Self {
        PatternItem::Fixed(value.into())
    }
}

impl From<TermPattern> for PatternItem {
    fn from(pattern: TermPattern) -> Self {
        match pattern {
            TermPattern::NamedNode(nn) => PatternItem::Fixed(nn.into()),
            TermPattern::BlankNode(bnode) => PatternItem::BlankNode(bnode),
            TermPattern::Literal(lit) => PatternItem::Fixed(lit.into()),
            TermPattern::Variable(var) => PatternItem::Variable(var),
        }
    }
}

impl From<NamedNodePattern> for PatternItem {
    fn from(value: NamedNodePattern) -> Self {
        match value {
            NamedNodePattern::NamedNode(nn) => PatternItem::Fixed(nn.into()),
            NamedNodePattern::Variable(var) => PatternItem::Variable(var),
        }
    }
}
