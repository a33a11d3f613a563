use crate::GraphPattern;
use rdf_weave_model::Variable;

/// A nested `SELECT` inside a graph pattern.
///
/// The type parameter is the representation of the inner query: a [GraphPattern] while the query
/// is assembled and an [Algebra](crate::Algebra) after compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubQuery<P = GraphPattern> {
    inner: P,
    projection: Vec<Variable>,
    group_by: Option<Vec<Variable>>,
    distinct: bool,
    offset: usize,
    limit: Option<usize>,
}

impl<P> SubQuery<P> {
    /// Creates a sub-query that projects `projection` from the solutions of `inner`.
    pub fn new(inner: P, projection: Vec<Variable>) -> Self {
        Self {
            inner,
            projection,
            group_by: None,
            distinct: false,
            offset: 0,
            limit: None,
        }
    }

    /// Groups the solutions of the inner query by `variables`.
    #[must_use]
    pub fn with_group_by(mut self, variables: Vec<Variable>) -> Self {
        self.group_by = Some(variables);
        self
    }

    #[must_use]
    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Skips the first `offset` solutions and returns at most `limit` solutions.
    #[must_use]
    pub fn with_slice(mut self, offset: usize, limit: Option<usize>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn projection(&self) -> &[Variable] {
        &self.projection
    }

    pub fn group_by(&self) -> Option<&[Variable]> {
        self.group_by.as_deref()
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Converts the inner query while keeping the solution modifiers.
    pub fn try_map<Q, E>(&self, map: impl FnOnce(&P) -> Result<Q, E>) -> Result<SubQuery<Q>, E> {
        Ok(SubQuery {
            inner: map(&self.inner)?,
            projection: self.projection.clone(),
            group_by: self.group_by.clone(),
            distinct: self.distinct,
            offset: self.offset,
            limit: self.limit,
        })
    }
}
