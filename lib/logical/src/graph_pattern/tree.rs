use crate::patterns::{Assignment, AssignmentId, BindingsPattern, FilterId, PatternElement, PatternItem};
use rdf_weave_model::Variable;
use spargebra::algebra::Expression;
use std::fmt::{Display, Formatter};

/// Describes how a graph pattern relates to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternModifier {
    Optional,
    Exists,
    NotExists,
    Minus,
    /// The pattern is evaluated against the named graph(s) given by the item.
    Graph(PatternItem),
    /// The pattern is evaluated by the endpoint given by the item.
    Service {
        endpoint: PatternItem,
        silent: bool,
    },
}

impl PatternModifier {
    pub fn name(&self) -> &'static str {
        match self {
            PatternModifier::Optional => "OPTIONAL",
            PatternModifier::Exists => "EXISTS",
            PatternModifier::NotExists => "NOT EXISTS",
            PatternModifier::Minus => "MINUS",
            PatternModifier::Graph(_) => "GRAPH",
            PatternModifier::Service { .. } => "SERVICE",
        }
    }
}

/// An immutable graph pattern tree, as produced by a
/// [GraphPatternBuilder](crate::GraphPatternBuilder).
///
/// A graph pattern has a list of elements that form its basic graph pattern, child patterns that
/// are combined with it according to their [PatternModifier], optional inline data, and filters and
/// assignments that were not placed at a specific position by an optimizer. A union pattern
/// combines its children with `UNION` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GraphPattern {
    pub(crate) elements: Vec<PatternElement>,
    pub(crate) children: Vec<GraphPattern>,
    pub(crate) modifier: Option<PatternModifier>,
    pub(crate) is_union: bool,
    pub(crate) filter: Option<Expression>,
    pub(crate) unplaced_filters: Vec<(FilterId, Expression)>,
    pub(crate) unplaced_assignments: Vec<(AssignmentId, Assignment)>,
    pub(crate) inline_data: Option<BindingsPattern>,
}

impl GraphPattern {
    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    pub fn children(&self) -> &[GraphPattern] {
        &self.children
    }

    pub fn modifier(&self) -> Option<&PatternModifier> {
        self.modifier.as_ref()
    }

    pub fn is_union(&self) -> bool {
        self.is_union
    }

    /// Returns true for an `OPTIONAL` pattern. `EXISTS` and `NOT EXISTS` are not optional
    /// patterns.
    pub fn is_optional(&self) -> bool {
        self.modifier == Some(PatternModifier::Optional)
    }

    pub fn is_exists(&self) -> bool {
        self.modifier == Some(PatternModifier::Exists)
    }

    pub fn is_not_exists(&self) -> bool {
        self.modifier == Some(PatternModifier::NotExists)
    }

    pub fn is_minus(&self) -> bool {
        self.modifier == Some(PatternModifier::Minus)
    }

    pub fn is_graph(&self) -> bool {
        matches!(self.modifier, Some(PatternModifier::Graph(_)))
    }

    pub fn is_service(&self) -> bool {
        matches!(self.modifier, Some(PatternModifier::Service { .. }))
    }

    pub fn inline_data(&self) -> Option<&BindingsPattern> {
        self.inline_data.as_ref()
    }

    pub fn unplaced_filters(&self) -> impl Iterator<Item = (FilterId, &Expression)> {
        self.unplaced_filters.iter().map(|(id, filter)| (*id, filter))
    }

    pub fn unplaced_assignments(&self) -> impl Iterator<Item = (AssignmentId, &Assignment)> {
        self.unplaced_assignments
            .iter()
            .map(|(id, assignment)| (*id, assignment))
    }

    /// Returns true if a filter applies to the whole pattern.
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some() || !self.unplaced_filters.is_empty()
    }

    /// The conjunction of all filters that apply to the whole pattern.
    pub fn filter(&self) -> Option<Expression> {
        self.filter
            .iter()
            .chain(self.unplaced_filters.iter().map(|(_, filter)| filter))
            .cloned()
            .reduce(|lhs, rhs| Expression::And(Box::new(lhs), Box::new(rhs)))
    }

    /// Returns true if the pattern has no elements, no children and no inline data.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
            && self.children.is_empty()
            && self.inline_data.is_none()
            && self.unplaced_assignments.is_empty()
    }

    /// Returns true if this pattern only wraps a single sub-query and can be collapsed into its
    /// parent's basic graph pattern.
    pub fn is_sub_query(&self) -> bool {
        is_sub_query(
            &self.elements,
            &self.children,
            self.modifier.as_ref(),
            self.is_union,
            self.is_filtered(),
        )
    }

    /// All variables that occur in the pattern, in order of their first occurrence.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables = Vec::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut Vec<Variable>) {
        let mut push = |variable: Variable| {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        };
        if let Some(PatternModifier::Graph(item) | PatternModifier::Service { endpoint: item, .. }) =
            &self.modifier
        {
            if let Some(variable) = item.variable() {
                push(variable);
            }
        }
        for element in &self.elements {
            element.variables().into_iter().for_each(&mut push);
        }
        for (_, assignment) in &self.unplaced_assignments {
            push(assignment.variable().clone());
        }
        if let Some(data) = &self.inline_data {
            data.variables().iter().cloned().for_each(&mut push);
        }
        for child in &self.children {
            child.collect_variables(variables);
        }
    }

    /// Returns a copy of this pattern without its modifier.
    #[must_use]
    pub fn without_modifier(&self) -> GraphPattern {
        GraphPattern {
            modifier: None,
            ..self.clone()
        }
    }
}

pub(crate) fn is_sub_query<P>(
    elements: &[PatternElement<P>],
    children: &[impl Sized],
    modifier: Option<&PatternModifier>,
    is_union: bool,
    is_filtered: bool,
) -> bool {
    children.is_empty()
        && elements.len() == 1
        && matches!(elements.first(), Some(PatternElement::SubQuery(_)))
        && !is_filtered
        && modifier.is_none()
        && !is_union
}

impl Display for GraphPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.modifier {
            Some(PatternModifier::Graph(graph)) => write!(f, "GRAPH {graph} ")?,
            Some(PatternModifier::Service { endpoint, silent }) => {
                f.write_str("SERVICE ")?;
                if *silent {
                    f.write_str("SILENT ")?;
                }
                write!(f, "{endpoint} ")?;
            }
            Some(modifier) => write!(f, "{} ", modifier.name())?,
            None => {}
        }

        f.write_str("{")?;
        if self.is_union {
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(" UNION")?;
                }
                write!(f, " {child}")?;
            }
        } else {
            for element in &self.elements {
                write!(f, " {element} .")?;
            }
            for child in &self.children {
                write!(f, " {child}")?;
            }
        }
        if let Some(data) = &self.inline_data {
            write!(f, " {data}")?;
        }
        for (_, assignment) in &self.unplaced_assignments {
            write!(f, " {assignment}")?;
        }
        if let Some(filter) = self.filter() {
            write!(f, " FILTER({filter})")?;
        }
        f.write_str(" }")
    }
}
