use rdf_weave_engine::{EvaluationContext, EvaluationError, EvaluationOptions, Multiset};
use rdf_weave_logical::algebra::BgpElement;
use rdf_weave_logical::patterns::{PatternItem, TriplePattern};
use rdf_weave_logical::{Algebra, Expression};
use rdf_weave_model::{GraphName, Literal, NamedNode, Term, Triple, Variable};
use rdf_weave_storage::memory::MemoryDataset;

pub fn iri(value: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://ex/{value}"))
}

pub fn term(value: &str) -> Term {
    iri(value).into()
}

pub fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

/// Parses a pattern item: `?name` is a variable, anything else an IRI in the test namespace.
pub fn item(value: &str) -> PatternItem {
    match value.strip_prefix('?') {
        Some(name) => var(name).into(),
        None => iri(value).into(),
    }
}

pub fn pattern(subject: &str, predicate: &str, object: &str) -> TriplePattern {
    TriplePattern::try_new(item(subject), item(predicate), item(object)).unwrap()
}

pub fn bgp(patterns: impl IntoIterator<Item = TriplePattern>) -> Algebra {
    Algebra::Bgp(patterns.into_iter().map(BgpElement::Triple).collect())
}

pub fn greater_than(variable: &str, value: i64) -> Expression {
    Expression::Greater(
        Box::new(Expression::Variable(var(variable))),
        Box::new(Expression::Literal(Literal::from(value))),
    )
}

/// Three cars, one of them without a speed.
pub fn cars() -> MemoryDataset {
    let mut dataset = MemoryDataset::new();
    dataset.extend(
        GraphName::DefaultGraph,
        [
            Triple::new(iri("fiesta"), iri("type"), iri("Car")),
            Triple::new(iri("fiesta"), iri("speed"), Literal::from(120)),
            Triple::new(iri("panda"), iri("type"), iri("Car")),
            Triple::new(iri("panda"), iri("speed"), Literal::from(50)),
            Triple::new(iri("beetle"), iri("type"), iri("Car")),
        ],
    );
    dataset
}

/// A chain of `knows` relations from alice to dave.
pub fn people() -> MemoryDataset {
    let mut dataset = MemoryDataset::new();
    dataset.extend(
        GraphName::DefaultGraph,
        [
            Triple::new(iri("alice"), iri("knows"), iri("bob")),
            Triple::new(iri("alice"), iri("name"), Literal::new_simple_literal("Alice")),
            Triple::new(iri("bob"), iri("knows"), iri("carol")),
            Triple::new(iri("carol"), iri("knows"), iri("dave")),
        ],
    );
    dataset
}

pub fn evaluate(dataset: &MemoryDataset, algebra: &Algebra) -> Result<Multiset, EvaluationError> {
    EvaluationContext::new(dataset, EvaluationOptions::default()).evaluate(algebra)
}
