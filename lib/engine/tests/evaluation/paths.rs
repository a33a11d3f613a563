use crate::test_utils::{evaluate, iri, item, people, term, var};
use rdf_weave_engine::{transform_path, EvaluationContext, EvaluationError, EvaluationOptions};
use rdf_weave_logical::algebra::BgpElement;
use rdf_weave_logical::patterns::PathPattern;
use rdf_weave_logical::{Algebra, PatternError, PropertyPathExpression};
use rdf_weave_model::{GraphName, Triple};
use rdf_weave_storage::memory::MemoryDataset;

fn knows() -> PropertyPathExpression {
    PropertyPathExpression::NamedNode(iri("knows"))
}

fn path(subject: &str, path: PropertyPathExpression, object: &str) -> Algebra {
    let pattern = PathPattern::try_new(item(subject), path, item(object)).unwrap();
    Algebra::Bgp(vec![BgpElement::Path(pattern)])
}

#[test]
fn test_transform_sequence() -> Result<(), EvaluationError> {
    let dataset = people();
    let mut context = EvaluationContext::new(&dataset, EvaluationOptions::default());
    let sequence = PropertyPathExpression::Sequence(Box::new(knows()), Box::new(knows()));

    let algebra = transform_path(&mut context, &item("alice"), &sequence, &item("?x"))?;
    insta::assert_snapshot!(algebra, @"Bgp: <http://ex/alice> <http://ex/knows> ?#path0 . ?#path0 <http://ex/knows> ?x");

    Ok(())
}

#[test]
fn test_transform_alternative_and_inverse() -> Result<(), EvaluationError> {
    let dataset = people();
    let mut context = EvaluationContext::new(&dataset, EvaluationOptions::default());
    let alternative = PropertyPathExpression::Alternative(
        Box::new(knows()),
        Box::new(PropertyPathExpression::Reverse(Box::new(knows()))),
    );

    let algebra = transform_path(&mut context, &item("bob"), &alternative, &item("?x"))?;
    insta::assert_snapshot!(algebra, @r"
    Union
      Bgp: <http://ex/bob> <http://ex/knows> ?x
      Bgp: ?x <http://ex/knows> <http://ex/bob>
    ");

    Ok(())
}

#[test]
fn test_transform_repetition() -> Result<(), EvaluationError> {
    let dataset = people();
    let mut context = EvaluationContext::new(&dataset, EvaluationOptions::default());
    let repetition = PropertyPathExpression::OneOrMore(Box::new(knows()));

    let algebra = transform_path(&mut context, &item("alice"), &repetition, &item("?x"))?;
    insta::assert_snapshot!(algebra, @"Path: <http://ex/alice> (<http://ex/knows>){1,} ?x");

    Ok(())
}

#[test]
fn test_sequence_path() -> Result<(), EvaluationError> {
    let dataset = people();
    let sequence = PropertyPathExpression::Sequence(Box::new(knows()), Box::new(knows()));

    let result = evaluate(&dataset, &path("alice", sequence, "?x"))?;
    insta::assert_snapshot!(result, @"{?x = <http://ex/carol>}");

    Ok(())
}

#[test]
fn test_inverse_path() -> Result<(), EvaluationError> {
    let dataset = people();
    let inverse = PropertyPathExpression::Reverse(Box::new(knows()));

    let result = evaluate(&dataset, &path("carol", inverse, "?x"))?;
    insta::assert_snapshot!(result, @"{?x = <http://ex/bob>}");

    Ok(())
}

#[test]
fn test_one_or_more_path() -> Result<(), EvaluationError> {
    let dataset = people();
    let repetition = PropertyPathExpression::OneOrMore(Box::new(knows()));

    let result = evaluate(&dataset, &path("alice", repetition, "?x"))?;
    insta::assert_snapshot!(result, @r"
    {?x = <http://ex/bob>}
    {?x = <http://ex/carol>}
    {?x = <http://ex/dave>}
    ");

    Ok(())
}

#[test]
fn test_zero_or_more_path_from_object() -> Result<(), EvaluationError> {
    let dataset = people();
    let repetition = PropertyPathExpression::ZeroOrMore(Box::new(knows()));

    let result = evaluate(&dataset, &path("?x", repetition, "carol"))?;
    insta::assert_snapshot!(result, @r"
    {?x = <http://ex/carol>}
    {?x = <http://ex/bob>}
    {?x = <http://ex/alice>}
    ");

    Ok(())
}

#[test]
fn test_zero_or_one_path() -> Result<(), EvaluationError> {
    let dataset = people();
    let repetition = PropertyPathExpression::ZeroOrOne(Box::new(knows()));

    let result = evaluate(&dataset, &path("bob", repetition, "?x"))?;
    insta::assert_snapshot!(result, @r"
    {?x = <http://ex/bob>}
    {?x = <http://ex/carol>}
    ");

    Ok(())
}

#[test]
fn test_repetition_with_cycle_terminates() -> Result<(), EvaluationError> {
    let mut dataset = people();
    dataset.insert(
        GraphName::DefaultGraph,
        Triple::new(iri("dave"), iri("knows"), iri("alice")),
    );
    let repetition = PropertyPathExpression::OneOrMore(Box::new(knows()));

    let result = evaluate(&dataset, &path("alice", repetition, "?x"))?;
    assert_eq!(result.len(), 4);

    Ok(())
}

#[test]
fn test_repetition_between_variables() -> Result<(), EvaluationError> {
    let mut dataset = MemoryDataset::new();
    dataset.extend(
        GraphName::DefaultGraph,
        [
            Triple::new(iri("a"), iri("knows"), iri("b")),
            Triple::new(iri("b"), iri("knows"), iri("c")),
        ],
    );
    let repetition = PropertyPathExpression::OneOrMore(Box::new(knows()));

    let result = evaluate(&dataset, &path("?s", repetition, "?o"))?;
    insta::assert_snapshot!(result, @r"
    {?s = <http://ex/a>, ?o = <http://ex/b>}
    {?s = <http://ex/a>, ?o = <http://ex/c>}
    {?s = <http://ex/b>, ?o = <http://ex/c>}
    ");

    Ok(())
}

#[test]
fn test_negated_property_set() -> Result<(), EvaluationError> {
    let dataset = people();
    let negated = PropertyPathExpression::NegatedPropertySet(vec![iri("knows")]);

    let result = evaluate(&dataset, &path("alice", negated, "?o"))?;
    insta::assert_snapshot!(result, @r#"{?o = "Alice"}"#);

    Ok(())
}

#[test]
fn test_empty_negated_property_set_is_rejected() {
    let result = PathPattern::try_new(
        term("alice"),
        PropertyPathExpression::NegatedPropertySet(Vec::new()),
        var("o"),
    );
    assert!(matches!(result, Err(PatternError::EmptyNegatedPropertySet)));
}

#[test]
fn test_path_strips_temporary_variables() -> Result<(), EvaluationError> {
    let dataset = people();
    let sequence = PropertyPathExpression::Sequence(
        Box::new(knows()),
        Box::new(PropertyPathExpression::Sequence(
            Box::new(knows()),
            Box::new(knows()),
        )),
    );

    let result = evaluate(&dataset, &path("alice", sequence, "?x"))?;
    assert_eq!(result.variables(), vec![var("x")]);
    assert!(result
        .variables()
        .iter()
        .all(|variable| !EvaluationContext::is_temporary(variable)));

    Ok(())
}
