use crate::test_utils::{bgp, cars, evaluate, greater_than, iri, pattern, var};
use rdf_weave_engine::{EvaluationError, Multiset};
use rdf_weave_logical::algebra::BgpElement;
use rdf_weave_logical::patterns::{Assignment, TriplePattern};
use rdf_weave_logical::{Algebra, Expression};
use rdf_weave_model::{GraphName, Literal, Triple};

#[test]
fn test_bgp_joins_patterns() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = bgp([
        pattern("?s", "type", "Car"),
        pattern("?s", "speed", "?v"),
    ]);

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @r#"
    {?s = <http://ex/fiesta>, ?v = "120"^^<http://www.w3.org/2001/XMLSchema#integer>}
    {?s = <http://ex/panda>, ?v = "50"^^<http://www.w3.org/2001/XMLSchema#integer>}
    "#);

    Ok(())
}

#[test]
fn test_ground_pattern_is_identity_or_null() -> Result<(), EvaluationError> {
    let dataset = cars();

    let present = bgp([pattern("fiesta", "type", "Car")]);
    assert_eq!(evaluate(&dataset, &present)?, Multiset::Identity);

    let absent = bgp([pattern("fiesta", "type", "Bike")]);
    assert_eq!(evaluate(&dataset, &absent)?, Multiset::Null);

    Ok(())
}

#[test]
fn test_ground_literal_pattern() -> Result<(), EvaluationError> {
    let dataset = cars();
    let pattern = TriplePattern::try_new(iri("panda"), iri("speed"), Literal::from(50))
        .map_err(EvaluationError::from)?;
    assert_eq!(evaluate(&dataset, &bgp([pattern]))?, Multiset::Identity);

    Ok(())
}

#[test]
fn test_bgp_without_match_is_null() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = bgp([
        pattern("?s", "type", "Car"),
        pattern("?s", "color", "?c"),
    ]);
    assert_eq!(evaluate(&dataset, &algebra)?, Multiset::Null);

    Ok(())
}

#[test]
fn test_empty_bgp_is_identity() -> Result<(), EvaluationError> {
    let dataset = cars();
    assert_eq!(evaluate(&dataset, &Algebra::empty_bgp())?, Multiset::Identity);

    Ok(())
}

#[test]
fn test_bgp_filter_element() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = Algebra::Bgp(vec![
        BgpElement::Triple(pattern("?s", "speed", "?v")),
        BgpElement::Filter(greater_than("v", 100)),
    ]);

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @r#"{?s = <http://ex/fiesta>, ?v = "120"^^<http://www.w3.org/2001/XMLSchema#integer>}"#);

    Ok(())
}

#[test]
fn test_bgp_assignment_preserves_cardinality() -> Result<(), EvaluationError> {
    let dataset = cars();
    let double = Expression::Multiply(
        Box::new(Expression::Variable(var("v"))),
        Box::new(Expression::Literal(Literal::from(2))),
    );
    let algebra = Algebra::Bgp(vec![
        BgpElement::Triple(pattern("?s", "speed", "?v")),
        BgpElement::Assignment(Assignment::new(var("double"), double)),
    ]);

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @r#"
    {?s = <http://ex/fiesta>, ?v = "120"^^<http://www.w3.org/2001/XMLSchema#integer>, ?double = "240"^^<http://www.w3.org/2001/XMLSchema#integer>}
    {?s = <http://ex/panda>, ?v = "50"^^<http://www.w3.org/2001/XMLSchema#integer>, ?double = "100"^^<http://www.w3.org/2001/XMLSchema#integer>}
    "#);

    Ok(())
}

#[test]
fn test_failing_assignment_leaves_variable_unbound() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = Algebra::extend(
        bgp([pattern("?s", "type", "Car")]),
        var("v"),
        Expression::Variable(var("missing")),
    );

    let result = evaluate(&dataset, &algebra)?;
    assert_eq!(result.len(), 3);
    assert_eq!(result.fixed_variables(), vec![var("s")]);
    assert_eq!(result.floating_variables(), vec![var("v")]);

    Ok(())
}

#[test]
fn test_assignment_to_bound_variable_fails() {
    let dataset = cars();
    let algebra = Algebra::extend(
        bgp([pattern("?s", "type", "Car")]),
        var("s"),
        Expression::Literal(Literal::from(1)),
    );

    let result = evaluate(&dataset, &algebra);
    assert!(matches!(result, Err(EvaluationError::VariableAlreadyBound(v)) if v == var("s")));
}

#[test]
fn test_repeated_variable() -> Result<(), EvaluationError> {
    let mut dataset = cars();
    dataset.insert(
        GraphName::DefaultGraph,
        Triple::new(iri("panda"), iri("sameAs"), iri("panda")),
    );
    dataset.insert(
        GraphName::DefaultGraph,
        Triple::new(iri("fiesta"), iri("sameAs"), iri("panda")),
    );

    let result = evaluate(&dataset, &bgp([pattern("?s", "sameAs", "?s")]))?;
    insta::assert_snapshot!(result, @"{?s = <http://ex/panda>}");

    Ok(())
}
