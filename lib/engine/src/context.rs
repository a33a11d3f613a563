use crate::eval::evaluate_algebra;
use crate::{
    EvaluationError, EvaluationOptions, Multiset, PropertyFunctionRegistry, ServiceHandler,
};
use rdf_weave_common::Dataset;
use rdf_weave_logical::Algebra;
use rdf_weave_model::{GraphName, NamedNode, Variable};
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

const TEMPORARY_VARIABLE_PREFIX: &str = "#path";

/// The state of a single evaluation.
///
/// The context borrows the dataset for the whole evaluation and owns the state that evaluation
/// steps share: the options, the active graph, the handlers for `SERVICE` and property functions
/// and the counter for temporary variables.
pub struct EvaluationContext<'dataset> {
    dataset: &'dataset dyn Dataset,
    options: EvaluationOptions,
    active_graph: GraphName,
    next_temporary: usize,
    service_handlers: FxHashMap<NamedNode, Arc<dyn ServiceHandler>>,
    default_service_handler: Option<Arc<dyn ServiceHandler>>,
    property_functions: PropertyFunctionRegistry,
}

impl<'dataset> EvaluationContext<'dataset> {
    /// Creates a context that evaluates against the default graph of `dataset`.
    pub fn new(dataset: &'dataset dyn Dataset, options: EvaluationOptions) -> Self {
        Self {
            dataset,
            options,
            active_graph: GraphName::DefaultGraph,
            next_temporary: 0,
            service_handlers: FxHashMap::default(),
            default_service_handler: None,
            property_functions: PropertyFunctionRegistry::default(),
        }
    }

    /// Uses `handler` for `SERVICE` blocks that target `endpoint`.
    #[must_use]
    pub fn with_service_handler(
        mut self,
        endpoint: impl Into<NamedNode>,
        handler: Arc<dyn ServiceHandler>,
    ) -> Self {
        self.service_handlers.insert(endpoint.into(), handler);
        self
    }

    /// Uses `handler` for `SERVICE` blocks without a dedicated handler.
    #[must_use]
    pub fn with_default_service_handler(mut self, handler: Arc<dyn ServiceHandler>) -> Self {
        self.default_service_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn with_property_functions(mut self, property_functions: PropertyFunctionRegistry) -> Self {
        self.property_functions = property_functions;
        self
    }

    /// Sets the graph that patterns outside of `GRAPH` blocks are matched against.
    #[must_use]
    pub fn with_active_graph(mut self, graph: impl Into<GraphName>) -> Self {
        self.active_graph = graph.into();
        self
    }

    pub fn dataset(&self) -> &'dataset dyn Dataset {
        self.dataset
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn active_graph(&self) -> &GraphName {
        &self.active_graph
    }

    pub fn property_functions(&self) -> &PropertyFunctionRegistry {
        &self.property_functions
    }

    pub(crate) fn service_handler(&self, endpoint: &NamedNode) -> Option<Arc<dyn ServiceHandler>> {
        self.service_handlers
            .get(endpoint)
            .or(self.default_service_handler.as_ref())
            .cloned()
    }

    /// Evaluates `algebra` from scratch.
    pub fn evaluate(&mut self, algebra: &Algebra) -> Result<Multiset, EvaluationError> {
        evaluate_algebra(self, algebra, &Multiset::Identity)
    }

    /// Returns a variable that does not occur in any query. The name is unique within this
    /// context.
    pub fn fresh_variable(&mut self) -> Variable {
        let variable =
            Variable::new_unchecked(format!("{TEMPORARY_VARIABLE_PREFIX}{}", self.next_temporary));
        self.next_temporary += 1;
        variable
    }

    /// Returns true if `variable` was created by [Self::fresh_variable].
    pub fn is_temporary(variable: &Variable) -> bool {
        variable.as_str().starts_with(TEMPORARY_VARIABLE_PREFIX)
    }

    /// Runs `action` with rigorous evaluation enabled. The previous setting is restored
    /// afterward.
    pub fn with_rigorous_evaluation<T>(&mut self, action: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.options.rigorous_evaluation;
        self.options.rigorous_evaluation = true;
        let result = action(self);
        self.options.rigorous_evaluation = previous;
        result
    }

    /// Runs `action` with `graph` as the active graph. The previous graph is restored afterward.
    pub fn in_graph<T>(&mut self, graph: GraphName, action: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.active_graph, graph);
        let result = action(self);
        self.active_graph = previous;
        result
    }
}

impl Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("options", &self.options)
            .field("active_graph", &self.active_graph)
            .field("next_temporary", &self.next_temporary)
            .field("property_functions", &self.property_functions)
            .finish_non_exhaustive()
    }
}
