use crate::graph_pattern::tree::{is_sub_query, GraphPattern, PatternModifier};
use crate::patterns::{
    Assignment, AssignmentId, BindingsPattern, FilterId, PathPattern, PatternElement,
    PatternItem, PropertyFunctionPattern, SubQuery, TriplePattern,
};
use crate::PatternError;
use spargebra::algebra::Expression;
use tracing::trace;

/// Incrementally assembles a [GraphPattern] while segmenting its basic graph patterns.
///
/// SPARQL scoping requires that triple patterns after an `OPTIONAL`, `MINUS`, `GRAPH`, inline
/// data, or a nested group do not end up in the same basic graph pattern as the triple patterns
/// before it. The builder tracks this with two flags:
///
/// - a *break* is pending once such a construct was appended,
/// - the pattern is *broken* once a new child was opened to receive the patterns that follow.
///
/// While broken, all further elements, children and breaks are delegated to the last child.
#[derive(Debug, Clone, Default)]
pub struct GraphPatternBuilder {
    elements: Vec<PatternElement>,
    children: Vec<GraphPatternBuilder>,
    modifier: Option<PatternModifier>,
    is_union: bool,
    filter: Option<Expression>,
    unplaced_filters: Vec<(FilterId, Expression)>,
    unplaced_assignments: Vec<(AssignmentId, Assignment)>,
    inline_data: Option<BindingsPattern>,
    break_pending: bool,
    broken: bool,
    next_id: usize,
}

impl GraphPatternBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for a `UNION` whose alternatives are added as children.
    pub fn new_union() -> Self {
        Self {
            is_union: true,
            ..Self::default()
        }
    }

    pub fn set_union(&mut self) {
        self.is_union = true;
    }

    pub fn set_optional(&mut self) -> Result<(), PatternError> {
        self.set_modifier(PatternModifier::Optional)
    }

    /// Marks the pattern as an `EXISTS` clause. Fails if it is already a `NOT EXISTS` clause.
    pub fn set_exists(&mut self) -> Result<(), PatternError> {
        self.set_modifier(PatternModifier::Exists)
    }

    /// Marks the pattern as a `NOT EXISTS` clause. Fails if it is already an `EXISTS` clause.
    pub fn set_not_exists(&mut self) -> Result<(), PatternError> {
        self.set_modifier(PatternModifier::NotExists)
    }

    pub fn set_minus(&mut self) -> Result<(), PatternError> {
        self.set_modifier(PatternModifier::Minus)
    }

    pub fn set_graph(&mut self, graph: impl Into<PatternItem>) -> Result<(), PatternError> {
        self.set_modifier(PatternModifier::Graph(graph.into()))
    }

    pub fn set_service(
        &mut self,
        endpoint: impl Into<PatternItem>,
        silent: bool,
    ) -> Result<(), PatternError> {
        self.set_modifier(PatternModifier::Service {
            endpoint: endpoint.into(),
            silent,
        })
    }

    fn set_modifier(&mut self, modifier: PatternModifier) -> Result<(), PatternError> {
        match &self.modifier {
            None => {
                self.modifier = Some(modifier);
                Ok(())
            }
            Some(existing) if *existing == modifier => Ok(()),
            Some(PatternModifier::Exists | PatternModifier::NotExists)
                if matches!(
                    modifier,
                    PatternModifier::Exists | PatternModifier::NotExists
                ) =>
            {
                Err(PatternError::ConflictingExists)
            }
            Some(existing) => Err(PatternError::ConflictingModifiers {
                existing: existing.name(),
                requested: modifier.name(),
            }),
        }
    }

    pub fn add_triple_pattern(&mut self, pattern: TriplePattern) {
        self.add_element(PatternElement::Triple(pattern));
    }

    pub fn add_path_pattern(&mut self, pattern: PathPattern) {
        self.add_element(PatternElement::Path(pattern));
    }

    pub fn add_property_function(&mut self, pattern: PropertyFunctionPattern) {
        self.add_element(PatternElement::PropertyFunction(pattern));
    }

    pub fn add_sub_query(&mut self, sub_query: SubQuery) {
        self.add_element(PatternElement::SubQuery(Box::new(sub_query)));
    }

    fn add_element(&mut self, element: PatternElement) {
        if self.break_pending {
            if !self.broken {
                trace!("Opening a new basic graph pattern for {element}");
                self.children.push(GraphPatternBuilder::new());
                self.broken = true;
            }
            if let Some(child) = self.children.last_mut() {
                child.add_element(element);
                return;
            }
        }
        self.elements.push(element);
    }

    /// Adds a `BIND` clause to the backlog of unplaced assignments.
    ///
    /// An assignment after a pending break stays with this pattern, so it extends everything that
    /// precedes it.
    pub fn add_assignment(&mut self, assignment: Assignment) -> AssignmentId {
        if self.break_pending && self.broken {
            if let Some(child) = self.children.last_mut() {
                return child.add_assignment(assignment);
            }
        }
        let id = AssignmentId(self.next_id());
        self.unplaced_assignments.push((id, assignment));
        id
    }

    /// Adds a `FILTER` clause to the backlog of unplaced filters. Filters apply to the whole
    /// pattern and are never delegated to a child.
    pub fn add_filter(&mut self, expression: Expression) -> FilterId {
        let id = FilterId(self.next_id());
        self.unplaced_filters.push((id, expression));
        id
    }

    /// Sets the filter of the whole pattern. An existing filter is combined with `expression`
    /// by a conjunction.
    pub fn set_filter(&mut self, expression: Expression) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Expression::And(Box::new(existing), Box::new(expression)),
            None => expression,
        });
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a child pattern.
    ///
    /// Unless this is a union or the child only wraps a sub-query, a break is signaled so that
    /// later triple patterns do not join the basic graph pattern before the child.
    pub fn add_graph_pattern(&mut self, child: GraphPatternBuilder) {
        if self.break_pending {
            if self.broken {
                if let Some(last) = self.children.last_mut() {
                    last.add_graph_pattern(child);
                    return;
                }
            }
            self.children.push(child);
        } else {
            let collapsible = child.is_sub_query();
            self.children.push(child);
            if !self.is_union && !collapsible {
                self.break_bgp();
            }
        }
    }

    /// Adds inline data (`VALUES`).
    pub fn add_inline_data(&mut self, data: BindingsPattern) {
        if self.break_pending {
            if self.broken {
                if let Some(last) = self.children.last_mut() {
                    last.add_inline_data(data);
                    return;
                }
            }
            if self.inline_data.is_none() && self.children.is_empty() {
                self.inline_data = Some(data);
            } else {
                let child = GraphPatternBuilder {
                    inline_data: Some(data),
                    ..GraphPatternBuilder::new()
                };
                self.children.push(child);
                self.broken = true;
            }
        } else if self.is_union {
            self.break_bgp();
            self.add_inline_data(data);
        } else {
            self.inline_data = Some(data);
            self.break_bgp();
        }
    }

    /// Signals that the current basic graph pattern ends here.
    pub fn break_bgp(&mut self) {
        if self.break_pending {
            if self.broken {
                if let Some(last) = self.children.last_mut() {
                    last.break_bgp();
                }
            }
        } else {
            trace!("Basic graph pattern break");
            self.break_pending = true;
        }
    }

    /// Moves the unplaced filter `id` into the element list at `position`.
    pub fn insert_filter(&mut self, id: FilterId, position: usize) -> Result<(), PatternError> {
        let index = self
            .unplaced_filters
            .iter()
            .position(|(candidate, _)| *candidate == id)
            .ok_or(PatternError::UnplacedFilterNotFound(id.0))?;
        self.check_position(position)?;
        let (_, expression) = self.unplaced_filters.remove(index);
        self.elements.insert(position, PatternElement::Filter(expression));
        Ok(())
    }

    /// Moves the unplaced assignment `id` into the element list at `position`.
    pub fn insert_assignment(
        &mut self,
        id: AssignmentId,
        position: usize,
    ) -> Result<(), PatternError> {
        let index = self
            .unplaced_assignments
            .iter()
            .position(|(candidate, _)| *candidate == id)
            .ok_or(PatternError::UnplacedAssignmentNotFound(id.0))?;
        self.check_position(position)?;
        let (_, assignment) = self.unplaced_assignments.remove(index);
        self.elements
            .insert(position, PatternElement::Assignment(assignment));
        Ok(())
    }

    /// Swaps two elements of the element list.
    pub fn swap_elements(&mut self, lhs: usize, rhs: usize) -> Result<(), PatternError> {
        let length = self.elements.len();
        for position in [lhs, rhs] {
            if position >= length {
                return Err(PatternError::PositionOutOfRange { position, length });
            }
        }
        self.elements.swap(lhs, rhs);
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<(), PatternError> {
        let length = self.elements.len();
        if position > length {
            return Err(PatternError::PositionOutOfRange { position, length });
        }
        Ok(())
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    pub fn children(&self) -> &[GraphPatternBuilder] {
        &self.children
    }

    pub fn unplaced_filters(&self) -> impl Iterator<Item = (FilterId, &Expression)> {
        self.unplaced_filters.iter().map(|(id, filter)| (*id, filter))
    }

    pub fn unplaced_assignments(&self) -> impl Iterator<Item = (AssignmentId, &Assignment)> {
        self.unplaced_assignments
            .iter()
            .map(|(id, assignment)| (*id, assignment))
    }

    fn is_filtered(&self) -> bool {
        self.filter.is_some() || !self.unplaced_filters.is_empty()
    }

    /// See [GraphPattern::is_sub_query].
    pub fn is_sub_query(&self) -> bool {
        is_sub_query(
            &self.elements,
            &self.children,
            self.modifier.as_ref(),
            self.is_union,
            self.is_filtered(),
        )
    }

    /// Freezes the builder into an immutable [GraphPattern].
    pub fn build(self) -> GraphPattern {
        GraphPattern {
            elements: self.elements,
            children: self
                .children
                .into_iter()
                .map(GraphPatternBuilder::build)
                .collect(),
            modifier: self.modifier,
            is_union: self.is_union,
            filter: self.filter,
            unplaced_filters: self.unplaced_filters,
            unplaced_assignments: self.unplaced_assignments,
            inline_data: self.inline_data,
        }
    }
}
