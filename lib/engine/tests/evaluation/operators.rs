use crate::test_utils::{bgp, cars, evaluate, greater_than, iri, pattern, term, var};
use rdf_weave_engine::{EvaluationError, Multiset};
use rdf_weave_logical::patterns::BindingsPattern;
use rdf_weave_logical::{Algebra, Expression, PatternError};
use rdf_weave_model::{GraphName, Literal, Triple, Variable};
use rdf_weave_storage::memory::MemoryDataset;

/// Returns the content of `multiset` independent of the solution order.
fn content(multiset: &Multiset) -> Vec<String> {
    let mut content = multiset
        .solutions()
        .iter()
        .map(|solution| {
            solution
                .content_key()
                .iter()
                .map(|(variable, value)| format!("{variable}={value}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>();
    content.sort();
    content
}

fn cars_with_type() -> Algebra {
    bgp([pattern("?s", "type", "Car")])
}

fn cars_with_speed() -> Algebra {
    bgp([pattern("?s", "speed", "?v")])
}

#[test]
fn test_optional_with_scoped_filter() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = Algebra::left_join(cars_with_type(), cars_with_speed(), Some(greater_than("v", 100)));

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @r#"
    {?s = <http://ex/fiesta>, ?v = "120"^^<http://www.w3.org/2001/XMLSchema#integer>}
    {?s = <http://ex/panda>}
    {?s = <http://ex/beetle>}
    "#);

    Ok(())
}

#[test]
fn test_left_join_keeps_every_left_row() -> Result<(), EvaluationError> {
    let dataset = cars();
    let left = evaluate(&dataset, &cars_with_type())?;
    let algebra = Algebra::left_join(cars_with_type(), cars_with_speed(), None);

    let result = evaluate(&dataset, &algebra)?;
    assert!(result.len() >= left.len());
    assert_eq!(result.fixed_variables(), vec![Variable::new_unchecked("s")]);
    assert_eq!(result.floating_variables(), vec![Variable::new_unchecked("v")]);

    Ok(())
}

#[test]
fn test_values_with_undef() -> Result<(), EvaluationError> {
    let mut dataset = MemoryDataset::new();
    dataset.extend(
        GraphName::DefaultGraph,
        [
            Triple::new(iri("A"), iri("p"), Literal::from(1)),
            Triple::new(iri("B"), iri("p"), Literal::from(2)),
        ],
    );
    let values = BindingsPattern::try_new(vec![var("x")], vec![vec![Some(term("A"))], vec![None]])?;
    let algebra = Algebra::join(Algebra::Bindings(values), bgp([pattern("?x", "p", "?y")]));

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @r#"
    {?x = <http://ex/A>, ?y = "1"^^<http://www.w3.org/2001/XMLSchema#integer>}
    {?x = <http://ex/A>, ?y = "1"^^<http://www.w3.org/2001/XMLSchema#integer>}
    {?x = <http://ex/B>, ?y = "2"^^<http://www.w3.org/2001/XMLSchema#integer>}
    "#);

    Ok(())
}

#[test]
fn test_bindings_width_mismatch() {
    let result = BindingsPattern::try_new(vec![var("x")], vec![vec![None, None]]);
    assert_eq!(
        result.err(),
        Some(PatternError::BindingsWidthMismatch {
            expected: 1,
            actual: 2
        })
    );
}

#[test]
fn test_union_is_commutative_on_content() -> Result<(), EvaluationError> {
    let dataset = cars();
    let lhs = evaluate(&dataset, &Algebra::union(cars_with_type(), cars_with_speed()))?;
    let rhs = evaluate(&dataset, &Algebra::union(cars_with_speed(), cars_with_type()))?;

    assert_eq!(lhs.len(), 5);
    assert_eq!(content(&lhs), content(&rhs));

    Ok(())
}

#[test]
fn test_union_is_associative_on_content() -> Result<(), EvaluationError> {
    let dataset = cars();
    let third = bgp([pattern("?s", "type", "?t")]);
    let left_nested = Algebra::union(
        Algebra::union(cars_with_type(), cars_with_speed()),
        third.clone(),
    );
    let right_nested = Algebra::union(
        cars_with_type(),
        Algebra::union(cars_with_speed(), third),
    );

    let lhs = evaluate(&dataset, &left_nested)?;
    let rhs = evaluate(&dataset, &right_nested)?;
    assert_eq!(lhs.len(), 8);
    assert_eq!(content(&lhs), content(&rhs));

    Ok(())
}

#[test]
fn test_union_with_extend() -> Result<(), EvaluationError> {
    let dataset = cars();
    let constant = Algebra::extend(
        Algebra::empty_bgp(),
        var("x"),
        Expression::Literal(Literal::from(1)),
    );
    let algebra = Algebra::union(constant, cars_with_type());

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @r#"
    {?x = "1"^^<http://www.w3.org/2001/XMLSchema#integer>}
    {?s = <http://ex/fiesta>}
    {?s = <http://ex/panda>}
    {?s = <http://ex/beetle>}
    "#);

    Ok(())
}

#[test]
fn test_join_laws() -> Result<(), EvaluationError> {
    let dataset = cars();
    let speeds = evaluate(&dataset, &cars_with_speed())?;

    assert_eq!(speeds.clone().join(Multiset::Identity), speeds);
    assert_eq!(Multiset::Identity.join(speeds.clone()), speeds);
    assert_eq!(speeds.clone().join(Multiset::Null), Multiset::Null);

    let types = evaluate(&dataset, &cars_with_type())?;
    let lhs = speeds.clone().join(types.clone());
    let rhs = types.join(speeds);
    assert_eq!(content(&lhs), content(&rhs));

    Ok(())
}

#[test]
fn test_minus() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = Algebra::minus(cars_with_type(), cars_with_speed());

    let result = evaluate(&dataset, &algebra)?;
    insta::assert_snapshot!(result, @"{?s = <http://ex/beetle>}");

    Ok(())
}

#[test]
fn test_minus_is_idempotent() -> Result<(), EvaluationError> {
    let dataset = cars();
    let once = Algebra::minus(cars_with_type(), cars_with_speed());
    let twice = Algebra::minus(once.clone(), cars_with_speed());

    assert_eq!(evaluate(&dataset, &once)?, evaluate(&dataset, &twice)?);
    assert_eq!(
        evaluate(&dataset, &Algebra::minus(cars_with_type(), cars_with_type()))?,
        Multiset::Null
    );

    Ok(())
}

#[test]
fn test_minus_without_shared_variables() -> Result<(), EvaluationError> {
    let dataset = cars();
    let algebra = Algebra::minus(cars_with_type(), bgp([pattern("?x", "speed", "?y")]));

    let result = evaluate(&dataset, &algebra)?;
    assert_eq!(result, evaluate(&dataset, &cars_with_type())?);

    Ok(())
}

#[test]
fn test_exists_join() -> Result<(), EvaluationError> {
    let dataset = cars();

    let exists = Algebra::exists_join(cars_with_type(), cars_with_speed(), true);
    let result = evaluate(&dataset, &exists)?;
    insta::assert_snapshot!(result, @r"
    {?s = <http://ex/fiesta>}
    {?s = <http://ex/panda>}
    ");

    let not_exists = Algebra::exists_join(cars_with_type(), cars_with_speed(), false);
    let result = evaluate(&dataset, &not_exists)?;
    insta::assert_snapshot!(result, @"{?s = <http://ex/beetle>}");

    Ok(())
}

#[test]
fn test_filter_never_increases_cardinality() -> Result<(), EvaluationError> {
    let dataset = cars();
    let unfiltered = evaluate(&dataset, &cars_with_speed())?;
    for threshold in [0, 60, 200] {
        let filtered = evaluate(
            &dataset,
            &Algebra::filter(cars_with_speed(), greater_than("v", threshold)),
        )?;
        assert!(filtered.len() <= unfiltered.len());
    }

    Ok(())
}

#[test]
fn test_filter_on_identity() -> Result<(), EvaluationError> {
    let dataset = cars();

    let constant_false = Algebra::filter(
        Algebra::empty_bgp(),
        Expression::Literal(Literal::from(false)),
    );
    assert_eq!(evaluate(&dataset, &constant_false)?, Multiset::Null);

    let constant_true = Algebra::filter(
        Algebra::empty_bgp(),
        Expression::Literal(Literal::from(true)),
    );
    assert_eq!(evaluate(&dataset, &constant_true)?, Multiset::Identity);

    Ok(())
}
