use crate::algebra::BgpElement;
use crate::graph_pattern::PatternModifier;
use crate::patterns::PatternElement;
use crate::{Algebra, GraphPattern, PatternError};
use tracing::debug;

impl GraphPattern {
    /// Compiles this graph pattern into an [Algebra].
    ///
    /// The compilation is bottom-up: children are compiled first and combined with the basic
    /// graph pattern of this pattern according to their modifiers. The filter of an `OPTIONAL`
    /// pattern is not applied by the pattern itself but becomes the filter of the `LeftJoin` that
    /// its parent creates.
    pub fn to_algebra(&self) -> Result<Algebra, PatternError> {
        if let Some(PatternModifier::Service { endpoint, silent }) = &self.modifier {
            return Ok(Algebra::Service {
                endpoint: endpoint.clone(),
                silent: *silent,
                pattern: Box::new(self.without_modifier()),
            });
        }

        let algebra = if self.is_union {
            self.compile_union()?
        } else if self.children.is_empty() {
            self.compile_leaf()?
        } else {
            self.compile_composite()?
        };
        debug!("Compiled graph pattern {self} into\n{algebra}");
        Ok(algebra)
    }

    fn compile_union(&self) -> Result<Algebra, PatternError> {
        let mut children = self.children.iter();
        let first = children.next().ok_or(PatternError::EmptyUnion)?.to_algebra()?;
        let mut algebra = children.try_fold(first, |acc, child| {
            Ok::<_, PatternError>(Algebra::union(acc, child.to_algebra()?))
        })?;

        algebra = self.join_inline_data(algebra);
        algebra = self.apply_assignments(algebra);
        algebra = self.wrap_graph(algebra);
        Ok(self.apply_filter(algebra))
    }

    fn compile_leaf(&self) -> Result<Algebra, PatternError> {
        let mut algebra = self.compile_bgp()?;
        algebra = self.apply_assignments(algebra);
        algebra = self.wrap_graph(algebra);
        algebra = self.join_inline_data(algebra);
        Ok(self.apply_filter(algebra))
    }

    fn compile_composite(&self) -> Result<Algebra, PatternError> {
        let mut algebra = self.compile_bgp()?;
        algebra = self.join_inline_data(algebra);

        for child in &self.children {
            let compiled = child.to_algebra()?;
            algebra = match &child.modifier {
                Some(PatternModifier::Optional) => {
                    Algebra::left_join(algebra, compiled, child.filter())
                }
                Some(PatternModifier::Exists) => Algebra::exists_join(algebra, compiled, true),
                Some(PatternModifier::NotExists) => Algebra::exists_join(algebra, compiled, false),
                Some(PatternModifier::Minus) => Algebra::minus(algebra, compiled),
                Some(PatternModifier::Graph(_) | PatternModifier::Service { .. }) | None => {
                    Algebra::join(algebra, compiled)
                }
            };
        }

        algebra = self.apply_assignments(algebra);
        algebra = self.wrap_graph(algebra);
        Ok(self.apply_filter(algebra))
    }

    fn compile_bgp(&self) -> Result<Algebra, PatternError> {
        let elements = self
            .elements
            .iter()
            .map(compile_element)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Algebra::Bgp(elements))
    }

    fn join_inline_data(&self, algebra: Algebra) -> Algebra {
        match &self.inline_data {
            Some(data) => Algebra::join(algebra, Algebra::Bindings(data.clone())),
            None => algebra,
        }
    }

    fn apply_assignments(&self, algebra: Algebra) -> Algebra {
        self.unplaced_assignments
            .iter()
            .fold(algebra, |acc, (_, assignment)| {
                Algebra::extend(
                    acc,
                    assignment.variable().clone(),
                    assignment.expression().clone(),
                )
            })
    }

    fn wrap_graph(&self, algebra: Algebra) -> Algebra {
        match &self.modifier {
            Some(PatternModifier::Graph(graph)) => Algebra::graph(algebra, graph.clone()),
            _ => algebra,
        }
    }

    fn apply_filter(&self, algebra: Algebra) -> Algebra {
        if self.is_optional() {
            return algebra;
        }
        match self.filter() {
            Some(filter) => Algebra::filter(algebra, filter),
            None => algebra,
        }
    }
}

fn compile_element(element: &PatternElement) -> Result<BgpElement, PatternError> {
    Ok(match element {
        PatternElement::Triple(pattern) => PatternElement::Triple(pattern.clone()),
        PatternElement::Path(pattern) => PatternElement::Path(pattern.clone()),
        PatternElement::Filter(expression) => PatternElement::Filter(expression.clone()),
        PatternElement::Assignment(assignment) => PatternElement::Assignment(assignment.clone()),
        PatternElement::SubQuery(sub_query) => {
            PatternElement::SubQuery(Box::new(sub_query.try_map(GraphPattern::to_algebra)?))
        }
        PatternElement::PropertyFunction(pattern) => {
            PatternElement::PropertyFunction(pattern.clone())
        }
    })
}
