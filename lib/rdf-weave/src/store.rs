//! API to evaluate graph patterns against an in-memory
//! [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
//!
//! The entry point of the module is the [`Store`] struct.
//!
//! Usage example:
//! ```
//! use rdf_weave::logical::patterns::TriplePattern;
//! use rdf_weave::logical::GraphPatternBuilder;
//! use rdf_weave::model::{GraphName, NamedNode, Triple, Variable};
//! use rdf_weave::store::Store;
//!
//! let mut store = Store::new();
//!
//! // insertion
//! let ex = NamedNode::new("http://example.com")?;
//! store.insert(GraphName::DefaultGraph, Triple::new(ex.clone(), ex.clone(), ex.clone()));
//!
//! // graph pattern evaluation
//! let s = Variable::new("s")?;
//! let mut pattern = GraphPatternBuilder::new();
//! pattern.add_triple_pattern(TriplePattern::try_new(s.clone(), ex.clone(), ex.clone())?);
//! let solutions = store.evaluate(&pattern.build())?;
//! assert_eq!(solutions.solutions()[0].get(&s), Some(&ex.into()));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::QueryError;
use rdf_weave_engine::{
    construct_triples, EvaluationContext, EvaluationOptions, Multiset, PropertyFunction,
    PropertyFunctionRegistry, ServiceHandler,
};
use rdf_weave_logical::patterns::TriplePattern;
use rdf_weave_logical::{Algebra, GraphPattern};
use rdf_weave_model::{GraphName, NamedNode, Triple};
use rdf_weave_storage::memory::MemoryDataset;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

/// An in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset) that
/// answers graph patterns.
///
/// Next to the triples, the store holds the [EvaluationOptions], the handlers for `SERVICE`
/// blocks and the registered property functions. Every evaluation creates a fresh
/// [EvaluationContext] from these settings.
///
/// Usage example:
/// ```
/// use rdf_weave::logical::patterns::TriplePattern;
/// use rdf_weave::logical::GraphPatternBuilder;
/// use rdf_weave::model::{GraphName, NamedNode, Triple, Variable};
/// use rdf_weave::store::Store;
///
/// let mut store = Store::new();
/// let ex = NamedNode::new("http://example.com")?;
/// store.insert(GraphName::DefaultGraph, Triple::new(ex.clone(), ex.clone(), ex.clone()));
/// assert_eq!(store.len(), 1);
///
/// let mut pattern = GraphPatternBuilder::new();
/// pattern.add_triple_pattern(TriplePattern::try_new(Variable::new("s")?, ex.clone(), ex)?);
/// assert_eq!(store.evaluate(&pattern.build())?.len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Default)]
pub struct Store {
    dataset: MemoryDataset,
    options: EvaluationOptions,
    service_handlers: Vec<(NamedNode, Arc<dyn ServiceHandler>)>,
    default_service_handler: Option<Arc<dyn ServiceHandler>>,
    property_functions: PropertyFunctionRegistry,
}

impl Store {
    /// Creates an empty [Store] with the default [EvaluationOptions].
    pub fn new() -> Store {
        Self::default()
    }

    /// Creates a [Store] that evaluates against `dataset`.
    pub fn new_with_dataset(dataset: MemoryDataset) -> Store {
        Self {
            dataset,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EvaluationOptions) -> Self {
        self.options = options;
        self
    }

    /// Uses `handler` for `SERVICE` blocks that target `endpoint`.
    #[must_use]
    pub fn with_service_handler(
        mut self,
        endpoint: impl Into<NamedNode>,
        handler: Arc<dyn ServiceHandler>,
    ) -> Self {
        self.service_handlers.push((endpoint.into(), handler));
        self
    }

    /// Uses `handler` for `SERVICE` blocks without a dedicated handler.
    #[must_use]
    pub fn with_default_service_handler(mut self, handler: Arc<dyn ServiceHandler>) -> Self {
        self.default_service_handler = Some(handler);
        self
    }

    /// Registers a property function under `name`.
    #[must_use]
    pub fn with_property_function(
        mut self,
        name: impl Into<NamedNode>,
        function: Arc<dyn PropertyFunction>,
    ) -> Self {
        self.property_functions.register(name, function);
        self
    }

    /// Returns a reference to the underlying [MemoryDataset].
    pub fn dataset(&self) -> &MemoryDataset {
        &self.dataset
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Inserts `triple` into `graph`. Returns false if the triple was already present.
    pub fn insert(&mut self, graph: impl Into<GraphName>, triple: Triple) -> bool {
        self.dataset.insert(graph, triple)
    }

    /// Inserts all `triples` into `graph` and returns the number of new triples.
    pub fn extend(
        &mut self,
        graph: impl Into<GraphName>,
        triples: impl IntoIterator<Item = Triple>,
    ) -> usize {
        self.dataset.extend(graph, triples)
    }

    /// Removes `triple` from `graph`. Returns false if the triple was not present.
    pub fn remove(&mut self, graph: &GraphName, triple: &Triple) -> bool {
        self.dataset.remove(graph, triple)
    }

    pub fn clear_graph(&mut self, graph: &GraphName) {
        self.dataset.clear_graph(graph);
    }

    /// Returns the number of triples in all graphs.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Compiles `pattern` into the algebra that [Self::evaluate] would evaluate.
    pub fn explain(&self, pattern: &GraphPattern) -> Result<Algebra, QueryError> {
        Ok(pattern.to_algebra()?)
    }

    /// Compiles and evaluates `pattern` against the default graph.
    pub fn evaluate(&self, pattern: &GraphPattern) -> Result<Multiset, QueryError> {
        let algebra = self.explain(pattern)?;
        self.evaluate_algebra(&algebra)
    }

    /// Evaluates an already compiled `algebra` against the default graph.
    pub fn evaluate_algebra(&self, algebra: &Algebra) -> Result<Multiset, QueryError> {
        let result = self.context().evaluate(algebra)?;
        debug!("Evaluation produced {} solutions", result.len());
        Ok(result)
    }

    /// Evaluates `pattern` and instantiates `template` for each solution.
    ///
    /// Triples with unbound or ill-positioned nodes are skipped, as are duplicates.
    pub fn construct(
        &self,
        template: &[TriplePattern],
        pattern: &GraphPattern,
    ) -> Result<Vec<Triple>, QueryError> {
        let solutions = self.evaluate(pattern)?;
        Ok(construct_triples(template, &solutions))
    }

    fn context(&self) -> EvaluationContext<'_> {
        let mut context = EvaluationContext::new(&self.dataset, self.options)
            .with_property_functions(self.property_functions.clone());
        for (endpoint, handler) in &self.service_handlers {
            context = context.with_service_handler(endpoint.clone(), Arc::clone(handler));
        }
        if let Some(handler) = &self.default_service_handler {
            context = context.with_default_service_handler(Arc::clone(handler));
        }
        context
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("dataset", &self.dataset)
            .field("options", &self.options)
            .field("property_functions", &self.property_functions)
            .finish_non_exhaustive()
    }
}
