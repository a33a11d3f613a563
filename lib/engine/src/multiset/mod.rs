mod group;
mod operations;

pub use group::GroupedSolutions;

use indexmap::IndexSet;
use rdf_weave_model::{BindingLookup, Solution, Term, Variable};
use rustc_hash::FxHashSet;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

static EMPTY_SOLUTION: LazyLock<Solution> = LazyLock::new(Solution::new);

/// A bag of solutions produced by evaluating an algebra operator.
///
/// Two degenerate forms exist next to the general case. [Multiset::Null] holds no solution and
/// absorbs joins. [Multiset::Identity] holds exactly one empty solution and is the neutral element
/// of joins. Operations normalize an empty result to [Multiset::Null].
#[derive(Debug, Clone, PartialEq)]
pub enum Multiset {
    Null,
    Identity,
    Solutions(Solutions),
    /// The solutions partitioned by the values of some grouping variables. Binary operations
    /// treat a group multiset as the multiset of its group keys.
    Group(GroupedSolutions),
}

/// The general form of a [Multiset]: a list of solutions with the variables they declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solutions {
    variables: IndexSet<Variable>,
    solutions: Vec<Solution>,
}

impl Solutions {
    /// Creates an empty list that declares `variables`.
    pub fn new(variables: impl IntoIterator<Item = Variable>) -> Self {
        Self {
            variables: variables.into_iter().collect(),
            solutions: Vec::new(),
        }
    }

    /// Appends `solution`. The variables of `solution` become declared.
    pub fn push(&mut self, solution: Solution) {
        for variable in solution.variables() {
            if !self.variables.contains(variable) {
                self.variables.insert(variable.clone());
            }
        }
        self.solutions.push(solution);
    }

    pub fn variables(&self) -> &IndexSet<Variable> {
        &self.variables
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

impl Extend<Solution> for Solutions {
    fn extend<T: IntoIterator<Item = Solution>>(&mut self, iter: T) {
        for solution in iter {
            self.push(solution);
        }
    }
}

impl Multiset {
    /// Creates a multiset from `solutions` that declares `variables` and the variables of the
    /// solutions. Returns [Multiset::Null] if `solutions` is empty.
    pub fn from_solutions(
        variables: impl IntoIterator<Item = Variable>,
        solutions: impl IntoIterator<Item = Solution>,
    ) -> Self {
        let mut result = Solutions::new(variables);
        result.extend(solutions);
        Multiset::from(result)
    }

    /// Returns true if this multiset holds no solution.
    pub fn is_empty(&self) -> bool {
        match self {
            Multiset::Null => true,
            Multiset::Identity => false,
            Multiset::Solutions(solutions) => solutions.is_empty(),
            Multiset::Group(groups) => groups.is_empty(),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Multiset::Identity)
    }

    pub fn len(&self) -> usize {
        self.solutions().len()
    }

    /// Returns the solutions of this multiset. The identity returns a single empty solution and a
    /// group returns its keys.
    pub fn solutions(&self) -> &[Solution] {
        match self {
            Multiset::Null => &[],
            Multiset::Identity => std::slice::from_ref(&*EMPTY_SOLUTION),
            Multiset::Solutions(solutions) => solutions.solutions(),
            Multiset::Group(groups) => groups.keys(),
        }
    }

    /// Returns the variables declared by this multiset.
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Multiset::Null | Multiset::Identity => Vec::new(),
            Multiset::Solutions(solutions) => solutions.variables().iter().cloned().collect(),
            Multiset::Group(groups) => groups.group_variables().to_vec(),
        }
    }

    pub fn contains_variable(&self, variable: &Variable) -> bool {
        match self {
            Multiset::Null | Multiset::Identity => false,
            Multiset::Solutions(solutions) => solutions.variables().contains(variable),
            Multiset::Group(groups) => groups.group_variables().contains(variable),
        }
    }

    /// Returns the declared variables that are bound in every solution.
    pub fn fixed_variables(&self) -> Vec<Variable> {
        self.variables()
            .into_iter()
            .filter(|variable| self.is_fixed(variable))
            .collect()
    }

    /// Returns the declared variables that are unbound in at least one solution.
    pub fn floating_variables(&self) -> Vec<Variable> {
        self.variables()
            .into_iter()
            .filter(|variable| !self.is_fixed(variable))
            .collect()
    }

    fn is_fixed(&self, variable: &Variable) -> bool {
        !self.is_empty()
            && self
                .solutions()
                .iter()
                .all(|solution| solution.is_bound(variable))
    }

    /// Returns the distinct values of `variable` if it is bound in every solution.
    ///
    /// The evaluator uses these values as index keys for the next operator.
    pub fn fixed_values(&self, variable: &Variable) -> Option<Vec<Term>> {
        if self.is_empty() {
            return None;
        }
        let mut values = IndexSet::new();
        for solution in self.solutions() {
            values.insert(solution.get(variable)?.clone());
        }
        Some(values.into_iter().collect())
    }

    /// Returns the distinct value pairs of `first` and `second` if both are bound in every
    /// solution.
    pub fn fixed_value_pairs(
        &self,
        first: &Variable,
        second: &Variable,
    ) -> Option<Vec<(Term, Term)>> {
        if self.is_empty() {
            return None;
        }
        let mut values = IndexSet::new();
        for solution in self.solutions() {
            values.insert((
                solution.get(first)?.clone(),
                solution.get(second)?.clone(),
            ));
        }
        Some(values.into_iter().collect())
    }

    /// Consumes the multiset and returns its solutions. See [Multiset::solutions].
    pub fn into_solutions(self) -> Solutions {
        match self {
            Multiset::Null => Solutions::default(),
            Multiset::Identity => {
                let mut solutions = Solutions::default();
                solutions.push(Solution::new());
                solutions
            }
            Multiset::Solutions(solutions) => solutions,
            Multiset::Group(groups) => groups.into_keys(),
        }
    }

    /// Replaces a group multiset by the multiset of its group keys.
    #[must_use]
    pub fn flatten(self) -> Multiset {
        match self {
            Multiset::Group(groups) => Multiset::from(groups.into_keys()),
            other => other,
        }
    }

    /// Keeps the solutions that satisfy `predicate`.
    #[must_use]
    pub fn filter(self, mut predicate: impl FnMut(&Solution) -> bool) -> Multiset {
        match self {
            Multiset::Null => Multiset::Null,
            Multiset::Identity if predicate(&*EMPTY_SOLUTION) => Multiset::Identity,
            Multiset::Identity => Multiset::Null,
            other => {
                let solutions = other.into_solutions();
                let variables = solutions.variables;
                let kept = solutions.solutions.into_iter().filter(|s| predicate(s));
                Multiset::from_solutions(variables, kept)
            }
        }
    }

    /// Restricts every solution to `variables`. Projected variables that a solution does not
    /// bind are declared as undefined.
    #[must_use]
    pub fn project(self, variables: &[Variable]) -> Multiset {
        if self.is_empty() {
            return Multiset::Null;
        }
        let solutions = self
            .into_solutions()
            .solutions
            .into_iter()
            .map(|solution| solution.project(variables))
            .collect::<Vec<_>>();
        Multiset::from_solutions(variables.iter().cloned(), solutions)
    }

    /// Removes the variables for which `predicate` returns false from the declared variables and
    /// from every solution.
    #[must_use]
    pub fn retain_variables(self, mut predicate: impl FnMut(&Variable) -> bool) -> Multiset {
        match self {
            Multiset::Null => Multiset::Null,
            Multiset::Identity => Multiset::Identity,
            other => {
                let solutions = other.into_solutions();
                let variables = solutions
                    .variables
                    .into_iter()
                    .filter(|variable| predicate(variable))
                    .collect::<Vec<_>>();
                let rows = solutions
                    .solutions
                    .into_iter()
                    .map(|mut solution| {
                        solution.retain_variables(&mut predicate);
                        solution
                    })
                    .collect::<Vec<_>>();
                Multiset::from_solutions(variables, rows)
            }
        }
    }

    /// Removes duplicate solutions. Two solutions are duplicates if they bind the same variables
    /// to the same values. The first occurrence is kept.
    #[must_use]
    pub fn distinct(self) -> Multiset {
        match self {
            Multiset::Null | Multiset::Identity => self,
            other => {
                let mut seen = FxHashSet::default();
                other.filter(|solution| seen.insert(solution.content_key()))
            }
        }
    }

    /// Skips `offset` solutions and keeps at most `limit` of the remaining ones.
    #[must_use]
    pub fn slice(self, offset: usize, limit: Option<usize>) -> Multiset {
        if offset == 0 && limit.is_none() {
            return self;
        }
        let solutions = self.into_solutions();
        let variables = solutions.variables;
        let rows = solutions
            .solutions
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX));
        Multiset::from_solutions(variables, rows)
    }

    /// Partitions the solutions by the values of `variables`.
    #[must_use]
    pub fn group_by(self, variables: &[Variable]) -> Multiset {
        if self.is_empty() {
            return Multiset::Null;
        }
        Multiset::Group(GroupedSolutions::new(
            variables.to_vec(),
            self.into_solutions().solutions,
        ))
    }
}

impl From<Solutions> for Multiset {
    fn from(solutions: Solutions) -> Self {
        if solutions.is_empty() {
            Multiset::Null
        } else {
            Multiset::Solutions(solutions)
        }
    }
}

impl BindingLookup for Multiset {
    fn is_bound(&self, variable: &Variable) -> bool {
        self.solutions()
            .iter()
            .any(|solution| solution.is_bound(variable))
    }

    fn accepts_value(&self, variable: &Variable, value: &Term) -> bool {
        self.solutions()
            .iter()
            .any(|solution| solution.get(variable).map_or(true, |bound| bound == value))
    }
}

impl Display for Multiset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Multiset::Null => f.write_str("Null"),
            Multiset::Identity => f.write_str("Identity"),
            Multiset::Solutions(_) | Multiset::Group(_) => {
                for (i, solution) in self.solutions().iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{solution}")?;
                }
                Ok(())
            }
        }
    }
}
