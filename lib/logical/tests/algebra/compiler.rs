use crate::test_utils::{group, iri, term, triple, var};
use rdf_weave_logical::patterns::{Assignment, BindingsPattern, PatternItem, SubQuery, TriplePattern};
use rdf_weave_logical::{Algebra, Expression, GraphPatternBuilder, PatternError};
use rdf_weave_model::Literal;

fn speed_filter() -> Expression {
    Expression::Greater(
        Box::new(Expression::Variable(var("v"))),
        Box::new(Expression::Literal(Literal::from(100))),
    )
}

#[test]
fn test_compile_bgp() -> Result<(), PatternError> {
    let mut builder = GraphPatternBuilder::new();
    builder.add_triple_pattern(TriplePattern::try_new(var("s"), iri("type"), iri("Car"))?);
    builder.add_triple_pattern(triple("s", "speed", "v"));

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @"Bgp: ?s <http://ex/type> <http://ex/Car> . ?s <http://ex/speed> ?v");

    Ok(())
}

#[test]
fn test_compile_optional() -> Result<(), PatternError> {
    let mut optional = group([triple("s", "speed", "v")]);
    optional.set_optional()?;

    let mut builder = group([triple("s", "type", "t")]);
    builder.add_graph_pattern(optional);

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    LeftJoin
      Bgp: ?s <http://ex/type> ?t
      Bgp: ?s <http://ex/speed> ?v
    ");

    Ok(())
}

#[test]
fn test_compile_optional_moves_filter_into_left_join() -> Result<(), PatternError> {
    let mut optional = group([triple("s", "speed", "v")]);
    optional.set_optional()?;
    optional.add_filter(speed_filter());

    let mut builder = group([triple("s", "type", "t")]);
    builder.add_graph_pattern(optional);

    let algebra = builder.build().to_algebra()?;
    let Algebra::LeftJoin { rhs, filter, .. } = algebra else {
        panic!("Expected a left join");
    };
    assert_eq!(filter, Some(speed_filter()));
    assert!(matches!(*rhs, Algebra::Bgp(_)));

    Ok(())
}

#[test]
fn test_compile_filter_on_group() -> Result<(), PatternError> {
    let mut builder = group([triple("s", "speed", "v")]);
    builder.add_filter(speed_filter());

    let algebra = builder.build().to_algebra()?;
    let Algebra::Filter { inner, expression } = algebra else {
        panic!("Expected a filter");
    };
    assert_eq!(expression, speed_filter());
    assert!(matches!(*inner, Algebra::Bgp(_)));

    Ok(())
}

#[test]
fn test_compile_triples_after_optional() -> Result<(), PatternError> {
    let mut optional = group([triple("s", "speed", "v")]);
    optional.set_optional()?;

    let mut builder = group([triple("s", "type", "t")]);
    builder.add_graph_pattern(optional);
    builder.add_triple_pattern(triple("s", "name", "n"));

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    Join
      LeftJoin
        Bgp: ?s <http://ex/type> ?t
        Bgp: ?s <http://ex/speed> ?v
      Bgp: ?s <http://ex/name> ?n
    ");

    Ok(())
}

#[test]
fn test_compile_union() -> Result<(), PatternError> {
    let mut union = GraphPatternBuilder::new_union();
    union.add_graph_pattern(group([triple("s", "a", "o")]));
    union.add_graph_pattern(group([triple("s", "b", "o")]));
    union.add_graph_pattern(group([triple("s", "c", "o")]));

    let algebra = union.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    Union
      Union
        Bgp: ?s <http://ex/a> ?o
        Bgp: ?s <http://ex/b> ?o
      Bgp: ?s <http://ex/c> ?o
    ");

    Ok(())
}

#[test]
fn test_compile_empty_union_fails() {
    let result = GraphPatternBuilder::new_union().build().to_algebra();
    assert_eq!(result, Err(PatternError::EmptyUnion));
}

#[test]
fn test_compile_inline_data() -> Result<(), PatternError> {
    let data = BindingsPattern::try_new(vec![var("x")], vec![vec![Some(term("A"))], vec![None]])?;
    let mut builder = GraphPatternBuilder::new();
    builder.add_inline_data(data);
    builder.add_triple_pattern(triple("x", "p", "y"));

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    Join
      Bindings: VALUES (?x) { (<http://ex/A>) (UNDEF) }
      Bgp: ?x <http://ex/p> ?y
    ");

    Ok(())
}

#[test]
fn test_compile_minus_and_graph() -> Result<(), PatternError> {
    let mut minus = group([triple("s", "b", "x")]);
    minus.set_minus()?;
    let mut graph = group([triple("s", "c", "y")]);
    graph.set_graph(var("g"))?;

    let mut builder = group([triple("s", "a", "o")]);
    builder.add_graph_pattern(minus);
    builder.add_graph_pattern(graph);

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    Join
      Minus
        Bgp: ?s <http://ex/a> ?o
        Bgp: ?s <http://ex/b> ?x
      Graph: ?g
        Bgp: ?s <http://ex/c> ?y
    ");

    Ok(())
}

#[test]
fn test_compile_exists() -> Result<(), PatternError> {
    let mut exists = group([triple("s", "b", "x")]);
    exists.set_not_exists()?;

    let mut builder = group([triple("s", "a", "o")]);
    builder.add_graph_pattern(exists);

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    NotExists
      Bgp: ?s <http://ex/a> ?o
      Bgp: ?s <http://ex/b> ?x
    ");

    Ok(())
}

#[test]
fn test_compile_service() -> Result<(), PatternError> {
    let mut service = group([triple("s", "b", "x")]);
    service.set_service(iri("endpoint"), true)?;

    let mut builder = group([triple("s", "a", "o")]);
    builder.add_graph_pattern(service);

    let algebra = builder.build().to_algebra()?;
    let Algebra::Join { rhs, .. } = algebra else {
        panic!("Expected a join");
    };
    let Algebra::Service {
        endpoint,
        silent,
        pattern,
    } = *rhs
    else {
        panic!("Expected a service");
    };
    assert_eq!(endpoint, PatternItem::from(iri("endpoint")));
    assert!(silent);
    assert!(!pattern.is_service());
    assert_eq!(pattern.elements().len(), 1);

    Ok(())
}

#[test]
fn test_compile_assignments_extend_the_group() -> Result<(), PatternError> {
    let mut optional = group([triple("s", "speed", "v")]);
    optional.set_optional()?;

    let mut builder = group([triple("s", "type", "t")]);
    builder.add_graph_pattern(optional);
    builder.add_assignment(Assignment::new(var("w"), Expression::Variable(var("v"))));

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    Extend: ?w := ?v
      LeftJoin
        Bgp: ?s <http://ex/type> ?t
        Bgp: ?s <http://ex/speed> ?v
    ");

    Ok(())
}

#[test]
fn test_compile_collapsed_sub_query() -> Result<(), PatternError> {
    let mut sub_query = GraphPatternBuilder::new();
    sub_query.add_sub_query(SubQuery::new(group([triple("s", "b", "x")]).build(), vec![var("s")]));

    let mut builder = group([triple("s", "a", "o")]);
    builder.add_graph_pattern(sub_query);
    builder.add_triple_pattern(triple("s", "c", "y"));

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @r"
    Join
      Bgp: ?s <http://ex/a> ?o . ?s <http://ex/c> ?y
      Bgp: SubQuery(?s)
    ");

    Ok(())
}

#[test]
fn test_compile_drops_empty_groups() -> Result<(), PatternError> {
    let mut builder = GraphPatternBuilder::new();
    builder.add_graph_pattern(group([triple("s", "a", "o")]));

    let algebra = builder.build().to_algebra()?;
    insta::assert_snapshot!(algebra, @"Bgp: ?s <http://ex/a> ?o");

    Ok(())
}
