use crate::test_utils::{bgp, cars, evaluate, iri, pattern, var};
use rdf_weave_engine::{EvaluationError, Multiset};
use rdf_weave_logical::algebra::BgpElement;
use rdf_weave_logical::patterns::{PropertyFunctionPattern, SubQuery};
use rdf_weave_logical::Algebra;

fn sub_query(sub_query: SubQuery<Algebra>) -> Algebra {
    Algebra::Bgp(vec![BgpElement::SubQuery(Box::new(sub_query))])
}

#[test]
fn test_sub_query_projection() -> Result<(), EvaluationError> {
    let dataset = cars();
    let inner = bgp([pattern("?s", "speed", "?v")]);

    let result = evaluate(&dataset, &sub_query(SubQuery::new(inner, vec![var("s")])))?;
    insta::assert_snapshot!(result, @r"
    {?s = <http://ex/fiesta>}
    {?s = <http://ex/panda>}
    ");

    Ok(())
}

#[test]
fn test_sub_query_distinct() -> Result<(), EvaluationError> {
    let dataset = cars();
    let inner = bgp([pattern("?s", "type", "?t")]);
    let query = SubQuery::new(inner, vec![var("t")]).with_distinct(true);

    let result = evaluate(&dataset, &sub_query(query))?;
    insta::assert_snapshot!(result, @"{?t = <http://ex/Car>}");

    Ok(())
}

#[test]
fn test_sub_query_slice() -> Result<(), EvaluationError> {
    let dataset = cars();
    let inner = bgp([pattern("?s", "type", "Car")]);
    let query = SubQuery::new(inner, vec![var("s")]).with_slice(1, Some(1));

    let result = evaluate(&dataset, &sub_query(query))?;
    insta::assert_snapshot!(result, @"{?s = <http://ex/panda>}");

    Ok(())
}

#[test]
fn test_sub_query_group_by() -> Result<(), EvaluationError> {
    let dataset = cars();
    let inner = bgp([pattern("?s", "type", "?t")]);
    let query = SubQuery::new(inner, vec![var("t")]).with_group_by(vec![var("t")]);

    let result = evaluate(&dataset, &sub_query(query))?;
    assert_eq!(result.len(), 1);

    Ok(())
}

#[test]
fn test_sub_query_is_joined_with_outer_pattern() -> Result<(), EvaluationError> {
    let dataset = cars();
    let inner = bgp([pattern("?s", "speed", "?v")]);
    let algebra = Algebra::Bgp(vec![
        BgpElement::Triple(pattern("?s", "type", "Car")),
        BgpElement::SubQuery(Box::new(SubQuery::new(inner, vec![var("s")]).with_slice(0, Some(1)))),
    ]);

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @"{?s = <http://ex/fiesta>}");

    Ok(())
}

#[test]
fn test_sub_query_without_solutions() -> Result<(), EvaluationError> {
    let dataset = cars();
    let inner = bgp([pattern("?s", "color", "?c")]);

    let result = evaluate(&dataset, &sub_query(SubQuery::new(inner, vec![var("s")])))?;
    assert_eq!(result, Multiset::Null);

    Ok(())
}

#[test]
fn test_sub_query_error_is_wrapped() {
    let dataset = cars();
    let inner = Algebra::Bgp(vec![BgpElement::PropertyFunction(
        PropertyFunctionPattern::new(var("s"), iri("unknown"), var("o")),
    )]);

    let result = evaluate(&dataset, &sub_query(SubQuery::new(inner, vec![var("s")])));
    let Err(EvaluationError::SubQuery { projection, source }) = result else {
        panic!("Expected a sub-query error");
    };
    assert_eq!(projection, "?s");
    assert!(matches!(
        *source,
        EvaluationError::UnknownPropertyFunction(function) if function == iri("unknown")
    ));
}
