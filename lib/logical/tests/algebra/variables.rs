use crate::test_utils::{group, term, triple, var};
use rdf_weave_logical::patterns::{BindingsPattern, SubQuery};
use rdf_weave_logical::{GraphPatternBuilder, PatternError};

#[test]
fn test_left_join_variables_float() -> Result<(), PatternError> {
    let mut optional = group([triple("s", "speed", "v")]);
    optional.set_optional()?;
    let mut builder = group([triple("s", "type", "t")]);
    builder.add_graph_pattern(optional);

    let algebra = builder.build().to_algebra()?;
    assert_eq!(algebra.fixed_variables(), vec![var("s"), var("t")]);
    assert_eq!(algebra.floating_variables(), vec![var("v")]);
    assert_eq!(algebra.variables(), vec![var("s"), var("t"), var("v")]);

    Ok(())
}

#[test]
fn test_union_fixes_shared_variables() -> Result<(), PatternError> {
    let mut union = GraphPatternBuilder::new_union();
    union.add_graph_pattern(group([triple("s", "a", "x")]));
    union.add_graph_pattern(group([triple("s", "b", "y")]));

    let algebra = union.build().to_algebra()?;
    assert_eq!(algebra.fixed_variables(), vec![var("s")]);
    assert_eq!(algebra.floating_variables(), vec![var("x"), var("y")]);

    Ok(())
}

#[test]
fn test_undefined_bindings_float() -> Result<(), PatternError> {
    let data = BindingsPattern::try_new(
        vec![var("x"), var("y")],
        vec![vec![Some(term("A")), None], vec![Some(term("B")), Some(term("C"))]],
    )?;
    let mut builder = GraphPatternBuilder::new();
    builder.add_inline_data(data);
    builder.add_triple_pattern(triple("x", "p", "z"));

    let algebra = builder.build().to_algebra()?;
    assert_eq!(algebra.fixed_variables(), vec![var("x"), var("z")]);
    assert_eq!(algebra.floating_variables(), vec![var("y")]);

    Ok(())
}

#[test]
fn test_sub_query_fixes_only_inner_fixed_projection() -> Result<(), PatternError> {
    let mut optional = group([triple("s", "speed", "v")]);
    optional.set_optional()?;
    let mut inner = group([triple("s", "type", "t")]);
    inner.add_graph_pattern(optional);
    let mut builder = GraphPatternBuilder::new();
    builder.add_sub_query(SubQuery::new(inner.build(), vec![var("s"), var("v")]));

    let algebra = builder.build().to_algebra()?;
    assert_eq!(algebra.fixed_variables(), vec![var("s")]);
    assert_eq!(algebra.floating_variables(), vec![var("v")]);

    Ok(())
}
