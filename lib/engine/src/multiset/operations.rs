use crate::multiset::{Multiset, Solutions};
use indexmap::IndexSet;
use rdf_weave_model::{Solution, Term, Variable};
use rustc_hash::FxHashMap;

impl Multiset {
    /// Joins the compatible solutions of both multisets.
    ///
    /// The solutions are matched on the variables declared by both sides. A solution that leaves
    /// one of these variables undefined is compatible with any value of it.
    #[must_use]
    pub fn join(self, other: Multiset) -> Multiset {
        if self.is_empty() || other.is_empty() {
            return Multiset::Null;
        }
        if other.is_identity() {
            return self;
        }
        if self.is_identity() {
            return other;
        }

        let lhs = self.into_solutions();
        let rhs = other.into_solutions();
        let join_variables = shared_variables(&lhs, &rhs);
        if join_variables.is_empty() {
            return product(&lhs, &rhs);
        }

        let index = JoinIndex::new(&rhs, &join_variables);
        let mut result = Solutions::new(declared_variables(&lhs, &rhs));
        for left in lhs.solutions() {
            for right in index.candidates(left) {
                if left.is_compatible_with(right) {
                    result.push(left.merge(right));
                }
            }
        }
        Multiset::from(result)
    }

    /// Joins the compatible solutions of both multisets that satisfy `filter`. A solution of
    /// `self` without such a partner is kept as is.
    #[must_use]
    pub fn left_join(self, other: Multiset, filter: impl Fn(&Solution) -> bool) -> Multiset {
        if self.is_empty() {
            return Multiset::Null;
        }
        if other.is_empty() || other.is_identity() {
            return self;
        }

        let lhs = self.into_solutions();
        let rhs = other.into_solutions();
        let join_variables = shared_variables(&lhs, &rhs);
        let index = JoinIndex::new(&rhs, &join_variables);
        let mut result = Solutions::new(declared_variables(&lhs, &rhs));
        for left in lhs.solutions() {
            let mut matched = false;
            for right in index.candidates(left) {
                if !left.is_compatible_with(right) {
                    continue;
                }
                let merged = left.merge(right);
                if filter(&merged) {
                    result.push(merged);
                    matched = true;
                }
            }
            if !matched {
                result.push(left.clone());
            }
        }
        Multiset::from(result)
    }

    /// Keeps the solutions of `self` that have (`must_exist`) or do not have a compatible
    /// solution in `other`.
    #[must_use]
    pub fn exists_join(self, other: Multiset, must_exist: bool) -> Multiset {
        if self.is_empty() {
            return Multiset::Null;
        }
        if other.is_empty() {
            return if must_exist { Multiset::Null } else { self };
        }

        let other = other.into_solutions();
        let join_variables = self
            .variables()
            .into_iter()
            .filter(|variable| other.variables().contains(variable))
            .collect::<Vec<_>>();
        if join_variables.is_empty() {
            return if must_exist { self } else { Multiset::Null };
        }

        let index = JoinIndex::new(&other, &join_variables);
        self.filter(|left| {
            let exists = index
                .candidates(left)
                .any(|right| left.is_compatible_with(right));
            exists == must_exist
        })
    }

    /// Removes the solutions of `self` that are compatible with a solution of `other` and share at
    /// least one bound variable with it.
    #[must_use]
    pub fn minus(self, other: Multiset) -> Multiset {
        if self.is_empty() || other.is_empty() || other.is_identity() {
            return self;
        }

        let other = other.into_solutions();
        let shares_variable = self
            .variables()
            .iter()
            .any(|variable| other.variables().contains(variable));
        if !shares_variable {
            return self;
        }

        self.filter(|left| {
            !other.solutions().iter().any(|right| {
                left.is_compatible_with(right) && left.shares_bound_variable_with(right)
            })
        })
    }

    /// Concatenates the solutions of both multisets. An identity contributes one empty solution.
    #[must_use]
    pub fn union(self, other: Multiset) -> Multiset {
        if self.is_empty() {
            return other.flatten();
        }
        if other.is_empty() {
            return self.flatten();
        }
        let mut result = self.into_solutions();
        let other = other.into_solutions();
        for variable in other.variables() {
            result.variables.insert(variable.clone());
        }
        result.solutions.extend(other.solutions);
        Multiset::from(result)
    }

    /// Combines every solution of `self` with every solution of `other`.
    #[must_use]
    pub fn product(self, other: Multiset) -> Multiset {
        if self.is_empty() || other.is_empty() {
            return Multiset::Null;
        }
        product(&self.into_solutions(), &other.into_solutions())
    }
}

fn product(lhs: &Solutions, rhs: &Solutions) -> Multiset {
    let mut result = Solutions::new(declared_variables(lhs, rhs));
    for left in lhs.solutions() {
        for right in rhs.solutions() {
            result.push(left.merge(right));
        }
    }
    Multiset::from(result)
}

fn shared_variables(lhs: &Solutions, rhs: &Solutions) -> Vec<Variable> {
    lhs.variables()
        .iter()
        .filter(|variable| rhs.variables().contains(*variable))
        .cloned()
        .collect()
}

fn declared_variables(lhs: &Solutions, rhs: &Solutions) -> IndexSet<Variable> {
    lhs.variables()
        .iter()
        .chain(rhs.variables())
        .cloned()
        .collect()
}

/// A hash index over the solutions of the right-hand side of a join.
///
/// Solutions that bind all join variables are hashed by their values. The remaining solutions
/// are candidates for every probe.
struct JoinIndex<'a> {
    join_variables: &'a [Variable],
    solutions: &'a [Solution],
    keyed: FxHashMap<Vec<&'a Term>, Vec<usize>>,
    unkeyed: Vec<usize>,
}

impl<'a> JoinIndex<'a> {
    fn new(solutions: &'a Solutions, join_variables: &'a [Variable]) -> Self {
        let mut keyed: FxHashMap<_, Vec<usize>> = FxHashMap::default();
        let mut unkeyed = Vec::new();
        for (i, solution) in solutions.solutions().iter().enumerate() {
            match join_key(solution, join_variables) {
                Some(key) => keyed.entry(key).or_default().push(i),
                None => unkeyed.push(i),
            }
        }
        Self {
            join_variables,
            solutions: solutions.solutions(),
            keyed,
            unkeyed,
        }
    }

    /// Returns the solutions that may be compatible with `probe`, in their original order.
    fn candidates<'b>(
        &'b self,
        probe: &'b Solution,
    ) -> impl Iterator<Item = &'a Solution> + 'b {
        let positions: Box<dyn Iterator<Item = usize> + 'b> =
            match join_key(probe, self.join_variables) {
                Some(key) => {
                    let keyed = self.keyed.get(&key).map_or(&[][..], Vec::as_slice);
                    Box::new(itertools::merge(
                        keyed.iter().copied(),
                        self.unkeyed.iter().copied(),
                    ))
                }
                None => Box::new(0..self.solutions.len()),
            };
        let solutions = self.solutions;
        positions.map(move |i| &solutions[i])
    }
}

fn join_key<'s>(solution: &'s Solution, join_variables: &[Variable]) -> Option<Vec<&'s Term>> {
    join_variables
        .iter()
        .map(|variable| solution.get(variable))
        .collect()
}
