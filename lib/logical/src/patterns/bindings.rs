use crate::PatternError;
use rdf_weave_model::{Solution, Term, Variable};
use std::fmt::{Display, Formatter};

/// One row of inline data. Undefined entries (`UNDEF`) are [None].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingTuple {
    values: Vec<Option<Term>>,
}

impl BindingTuple {
    pub fn values(&self) -> &[Option<Term>] {
        &self.values
    }

    /// Returns true if no entry of the tuple is undefined.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }
}

/// Inline data, as introduced by `VALUES`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingsPattern {
    variables: Vec<Variable>,
    tuples: Vec<BindingTuple>,
}

impl BindingsPattern {
    /// Creates a new bindings pattern. Every row must have one entry per variable.
    pub fn try_new(
        variables: Vec<Variable>,
        rows: Vec<Vec<Option<Term>>>,
    ) -> Result<Self, PatternError> {
        for (i, variable) in variables.iter().enumerate() {
            if variables[..i].contains(variable) {
                return Err(PatternError::DuplicateVariable(variable.clone()));
            }
        }

        let tuples = rows
            .into_iter()
            .map(|values| {
                if values.len() == variables.len() {
                    Ok(BindingTuple { values })
                } else {
                    Err(PatternError::BindingsWidthMismatch {
                        expected: variables.len(),
                        actual: values.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { variables, tuples })
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn tuples(&self) -> &[BindingTuple] {
        &self.tuples
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Returns true if `tuple` binds `variable`.
    pub fn is_bound(&self, tuple: &BindingTuple, variable: &Variable) -> bool {
        self.variables
            .iter()
            .position(|v| v == variable)
            .and_then(|i| tuple.values.get(i))
            .is_some_and(Option::is_some)
    }

    /// The variables that are bound in every tuple.
    pub fn fixed_variables(&self) -> Vec<Variable> {
        self.variables
            .iter()
            .filter(|variable| self.tuples.iter().all(|t| self.is_bound(t, variable)))
            .cloned()
            .collect()
    }

    /// The variables that are undefined in at least one tuple.
    pub fn floating_variables(&self) -> Vec<Variable> {
        self.variables
            .iter()
            .filter(|variable| !self.tuples.iter().all(|t| self.is_bound(t, variable)))
            .cloned()
            .collect()
    }

    /// Converts the tuples into solutions. Undefined entries are declared without a value.
    pub fn to_solutions(&self) -> Vec<Solution> {
        self.tuples
            .iter()
            .map(|tuple| {
                self.variables
                    .iter()
                    .cloned()
                    .zip(tuple.values.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

impl Display for BindingsPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("VALUES (")?;
        for (i, variable) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{variable}")?;
        }
        f.write_str(") {")?;
        for tuple in &self.tuples {
            f.write_str(" (")?;
            for (i, value) in tuple.values.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                match value {
                    Some(value) => write!(f, "{value}")?,
                    None => f.write_str("UNDEF")?,
                }
            }
            f.write_str(")")?;
        }
        f.write_str(" }")
    }
}
