use crate::test_utils::{bgp, cars, evaluate, item, iri, pattern, term, var};
use rdf_weave_engine::{
    EvaluationContext, EvaluationError, EvaluationOptions, Multiset, ServiceHandler,
};
use rdf_weave_logical::{Algebra, GraphPattern, GraphPatternBuilder};
use rdf_weave_model::{NamedNode, Solution};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Answers every request with the speeds of a remote fleet and records the endpoints it was
/// called for.
#[derive(Default)]
struct RemoteFleet {
    calls: Mutex<Vec<String>>,
}

impl ServiceHandler for RemoteFleet {
    fn handle(
        &self,
        endpoint: &NamedNode,
        _pattern: &GraphPattern,
        _input: &Multiset,
    ) -> Result<Multiset, Box<dyn Error + Send + Sync>> {
        self.calls
            .lock()
            .map_err(|_| "poisoned")?
            .push(endpoint.to_string());
        Ok(Multiset::from_solutions(
            [var("s")],
            [Solution::from_iter([(var("s"), term("fiesta"))])],
        ))
    }
}

struct Unavailable;

impl ServiceHandler for Unavailable {
    fn handle(
        &self,
        _endpoint: &NamedNode,
        _pattern: &GraphPattern,
        _input: &Multiset,
    ) -> Result<Multiset, Box<dyn Error + Send + Sync>> {
        Err("connection refused".into())
    }
}

fn service(endpoint: &str, silent: bool) -> Algebra {
    let mut builder = GraphPatternBuilder::new();
    builder.add_triple_pattern(pattern("?s", "type", "Car"));
    Algebra::Service {
        endpoint: item(endpoint),
        silent,
        pattern: Box::new(builder.build()),
    }
}

#[test]
fn test_service_is_joined() -> Result<(), EvaluationError> {
    let dataset = cars();
    let handler = Arc::new(RemoteFleet::default());
    let mut context = EvaluationContext::new(&dataset, EvaluationOptions::default())
        .with_service_handler(iri("fleet"), handler.clone());
    let algebra = Algebra::join(
        bgp([pattern("?s", "speed", "?v")]),
        service("fleet", false),
    );

    let result = context.evaluate(&algebra)?;
    insta::assert_snapshot!(result, @r#"{?s = <http://ex/fiesta>, ?v = "120"^^<http://www.w3.org/2001/XMLSchema#integer>}"#);
    let calls = handler.calls.lock().map(|calls| calls.clone()).unwrap_or_default();
    assert_eq!(calls, vec!["<http://ex/fleet>".to_owned()]);

    Ok(())
}

#[test]
fn test_default_service_handler() -> Result<(), EvaluationError> {
    let dataset = cars();
    let mut context = EvaluationContext::new(&dataset, EvaluationOptions::default())
        .with_default_service_handler(Arc::new(RemoteFleet::default()));

    let result = context.evaluate(&service("anywhere", false))?;
    insta::assert_snapshot!(result, @"{?s = <http://ex/fiesta>}");

    Ok(())
}

#[test]
fn test_missing_handler() {
    let dataset = cars();

    let result = evaluate(&dataset, &service("fleet", false));
    assert!(matches!(result, Err(EvaluationError::UnsupportedService(endpoint)) if endpoint == iri("fleet")));
}

#[test]
fn test_silent_service_failure_is_identity() -> Result<(), EvaluationError> {
    let dataset = cars();
    let mut context = EvaluationContext::new(&dataset, EvaluationOptions::default())
        .with_service_handler(iri("fleet"), Arc::new(Unavailable));

    assert_eq!(context.evaluate(&service("fleet", true))?, Multiset::Identity);
    assert!(matches!(
        context.evaluate(&service("fleet", false)),
        Err(EvaluationError::Service(_))
    ));

    Ok(())
}

#[test]
fn test_unbound_service_variable() {
    let dataset = cars();

    let result = evaluate(&dataset, &service("?endpoint", false));
    assert!(matches!(result, Err(EvaluationError::UnboundService)));
}
