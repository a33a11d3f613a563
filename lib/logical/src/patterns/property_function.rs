use crate::patterns::PatternItem;
use rdf_weave_model::{NamedNode, Variable};
use std::fmt::{Display, Formatter};

/// A triple pattern whose predicate names a property function.
///
/// Instead of matching triples, the evaluator calls the function registered for the predicate,
/// which computes bindings for the subject and object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyFunctionPattern {
    subject: PatternItem,
    function: NamedNode,
    object: PatternItem,
}

impl PropertyFunctionPattern {
    pub fn new(
        subject: impl Into<PatternItem>,
        function: NamedNode,
        object: impl Into<PatternItem>,
    ) -> Self {
        Self {
            subject: subject.into(),
            function,
            object: object.into(),
        }
    }

    pub fn subject(&self) -> &PatternItem {
        &self.subject
    }

    pub fn function(&self) -> &NamedNode {
        &self.function
    }

    pub fn object(&self) -> &PatternItem {
        &self.object
    }

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

impl Display for PropertyFunctionPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.function, self.object)
    }
}
