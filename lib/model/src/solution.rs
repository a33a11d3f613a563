use indexmap::IndexMap;
use oxrdf::{Term, Variable};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Raised when a variable that already holds a value is bound to a different value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Variable {variable} is already bound to {existing}")]
pub struct BindingConflictError {
    pub variable: Variable,
    pub existing: Term,
}

/// A single query solution: a partial function from variables to terms.
///
/// A variable that is absent from the solution is unbound. A variable that is present without a
/// value is *undefined*, which is how `OPTIONAL` and `VALUES ... UNDEF` mark that a declared
/// variable has no value in this row. Both behave the same for compatibility checks but only the
/// latter contributes to the variables that a solution declares.
///
/// Bindings keep their insertion order, so solutions render deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    bindings: IndexMap<Variable, Option<Term>>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `variable`, if it is bound.
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.bindings.get(variable).and_then(Option::as_ref)
    }

    /// Returns true if `variable` is declared in this solution, with or without a value.
    pub fn contains_variable(&self, variable: &Variable) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Returns true if `variable` has a value in this solution.
    pub fn is_bound(&self, variable: &Variable) -> bool {
        self.get(variable).is_some()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over the declared variables.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.keys()
    }

    /// Iterates over the declared variables together with their (optional) value.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, Option<&Term>)> {
        self.bindings
            .iter()
            .map(|(variable, value)| (variable, value.as_ref()))
    }

    /// Binds `variable` to `value`.
    ///
    /// Binding an undefined or unbound variable always succeeds, as does re-binding the same
    /// value. Binding a different value fails, as solutions never change a value once it is set.
    pub fn bind(&mut self, variable: Variable, value: Term) -> Result<(), BindingConflictError> {
        match self.bindings.get_mut(&variable) {
            Some(Some(existing)) if *existing != value => Err(BindingConflictError {
                variable,
                existing: existing.clone(),
            }),
            Some(Some(_)) => Ok(()),
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => {
                self.bindings.insert(variable, Some(value));
                Ok(())
            }
        }
    }

    /// Declares `variable` without a value. Does nothing if the variable is already declared.
    pub fn declare(&mut self, variable: Variable) {
        self.bindings.entry(variable).or_insert(None);
    }

    /// Returns true if both solutions agree on every variable that is bound in both.
    pub fn is_compatible_with(&self, other: &Solution) -> bool {
        self.bindings.iter().all(|(variable, value)| {
            match (value, other.get(variable)) {
                (Some(lhs), Some(rhs)) => lhs == rhs,
                _ => true,
            }
        })
    }

    /// Returns true if at least one variable is bound in both solutions.
    pub fn shares_bound_variable_with(&self, other: &Solution) -> bool {
        self.bindings
            .iter()
            .any(|(variable, value)| value.is_some() && other.is_bound(variable))
    }

    /// Merges two compatible solutions. Values of `self` take precedence, undefined variables
    /// are filled from `other`.
    #[must_use]
    pub fn merge(&self, other: &Solution) -> Solution {
        let mut result = self.clone();
        for (variable, value) in &other.bindings {
            match result.bindings.get_mut(variable) {
                Some(slot) => {
                    if slot.is_none() {
                        slot.clone_from(value);
                    }
                }
                None => {
                    result.bindings.insert(variable.clone(), value.clone());
                }
            }
        }
        result
    }

    /// Restricts the solution to `variables`. Variables that are not declared in this solution
    /// are declared as undefined in the result, in the order of `variables`.
    #[must_use]
    pub fn project(&self, variables: &[Variable]) -> Solution {
        let bindings = variables
            .iter()
            .map(|variable| {
                let value = self.bindings.get(variable).cloned().flatten();
                (variable.clone(), value)
            })
            .collect();
        Solution { bindings }
    }

    /// Removes every variable for which `predicate` returns false.
    pub fn retain_variables(&mut self, mut predicate: impl FnMut(&Variable) -> bool) {
        self.bindings.retain(|variable, _| predicate(variable));
    }

    /// Returns a key that identifies the bound content of this solution, independent of the
    /// binding order and of undefined variables. Two solutions with equal keys are duplicates.
    pub fn content_key(&self) -> Vec<(Variable, Term)> {
        let mut key = self
            .bindings
            .iter()
            .filter_map(|(variable, value)| Some((variable.clone(), value.clone()?)))
            .collect::<Vec<_>>();
        key.sort_by(|(lhs, _), (rhs, _)| lhs.as_str().cmp(rhs.as_str()));
        key
    }
}

impl FromIterator<(Variable, Term)> for Solution {
    fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
        let bindings = iter
            .into_iter()
            .map(|(variable, value)| (variable, Some(value)))
            .collect();
        Self { bindings }
    }
}

impl FromIterator<(Variable, Option<Term>)> for Solution {
    fn from_iter<T: IntoIterator<Item = (Variable, Option<Term>)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (variable, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(value) => write!(f, "{variable} = {value}")?,
                None => write!(f, "{variable} = UNDEF")?,
            }
        }
        f.write_str("}")
    }
}

/// Read access to the variable bindings that constrain pattern matching.
///
/// Implemented by a single [Solution] and by collections of solutions. For a collection, a
/// variable is bound if any member binds it and a value is accepted if any member either binds the
/// variable to that value or leaves it unbound.
pub trait BindingLookup {
    /// Returns true if `variable` has a value.
    fn is_bound(&self, variable: &Variable) -> bool;

    /// Returns true if binding `variable` to `value` is consistent with the existing bindings.
    fn accepts_value(&self, variable: &Variable, value: &Term) -> bool;
}

impl BindingLookup for Solution {
    fn is_bound(&self, variable: &Variable) -> bool {
        Solution::is_bound(self, variable)
    }

    fn accepts_value(&self, variable: &Variable, value: &Term) -> bool {
        self.get(variable).map_or(true, |bound| bound == value)
    }
}
