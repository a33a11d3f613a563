use crate::patterns::PatternItem;
use crate::PatternError;
use rdf_weave_model::Variable;
use spargebra::algebra::PropertyPathExpression;
use std::fmt::{Display, Formatter};

/// A property path pattern, such as `?s :knows+ ?o`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
    subject: PatternItem,
    path: PropertyPathExpression,
    object: PatternItem,
}

impl PathPattern {
    /// Creates a new path pattern. Fails if the path contains an empty negated property set.
    pub fn try_new(
        subject: impl Into<PatternItem>,
        path: PropertyPathExpression,
        object: impl Into<PatternItem>,
    ) -> Result<Self, PatternError> {
        validate_path(&path)?;
        Ok(Self {
            subject: subject.into(),
            path,
            object: object.into(),
        })
    }

    pub fn subject(&self) -> &PatternItem {
        &self.subject
    }

    pub fn path(&self) -> &PropertyPathExpression {
        &self.path
    }

    pub fn object(&self) -> &PatternItem {
        &self.object
    }

    /// The distinct variables of the two end points.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables = Vec::new();
        for variable in [self.subject.variable(), self.object.variable()]
            .into_iter()
            .flatten()
        {
            if !variables.contains(&variable) {
                variables.push(variable);
            }
        }
        variables
    }
}

fn validate_path(path: &PropertyPathExpression) -> Result<(), PatternError> {
    match path {
        PropertyPathExpression::NamedNode(_) => Ok(()),
        PropertyPathExpression::NegatedPropertySet(predicates) => {
            if predicates.is_empty() {
                Err(PatternError::EmptyNegatedPropertySet)
            } else {
                Ok(())
            }
        }
        PropertyPathExpression::Reverse(inner)
        | PropertyPathExpression::ZeroOrMore(inner)
        | PropertyPathExpression::OneOrMore(inner)
        | PropertyPathExpression::ZeroOrOne(inner) => validate_path(inner),
        PropertyPathExpression::Sequence(lhs, rhs)
        | PropertyPathExpression::Alternative(lhs, rhs) => {
            validate_path(lhs)?;
            validate_path(rhs)
        }
    }
}

impl Display for PathPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.path, self.object)
    }
}
