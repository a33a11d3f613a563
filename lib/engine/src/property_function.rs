use crate::{EvaluationContext, EvaluationError, Multiset};
use rdf_weave_logical::patterns::PropertyFunctionPattern;
use rdf_weave_model::NamedNode;
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A predicate that computes its solutions instead of matching triples.
///
/// The function receives the solutions computed so far as `input` and returns the solutions for
/// the variables of the pattern. The result is joined with `input` by the evaluator.
pub trait PropertyFunction: Send + Sync {
    fn evaluate(
        &self,
        context: &mut EvaluationContext<'_>,
        pattern: &PropertyFunctionPattern,
        input: &Multiset,
    ) -> Result<Multiset, EvaluationError>;
}

/// The property functions available during an evaluation, keyed by their IRI.
#[derive(Clone, Default)]
pub struct PropertyFunctionRegistry {
    functions: FxHashMap<NamedNode, Arc<dyn PropertyFunction>>,
}

impl PropertyFunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under `name`, replacing a previous registration.
    pub fn register(&mut self, name: impl Into<NamedNode>, function: Arc<dyn PropertyFunction>) {
        self.functions.insert(name.into(), function);
    }

    pub fn get(&self, name: &NamedNode) -> Option<Arc<dyn PropertyFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &NamedNode) -> bool {
        self.functions.contains_key(name)
    }
}

impl Debug for PropertyFunctionRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.functions.keys()).finish()
    }
}
