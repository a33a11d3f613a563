mod strings;

use rdf_weave_logical::{Expression, Function};
use rdf_weave_model::{Literal, Numeric, Solution, Term, ThinError, ThinResult, TypedValueRef};
use std::cmp::Ordering;

/// Evaluates `expression` against the bindings of `solution`.
///
/// Failures are the expected errors of SPARQL expressions, such as unbound variables or type
/// errors, and do not carry a reason. `EXISTS` is compiled into the algebra and is an error here.
pub fn evaluate_expression(expression: &Expression, solution: &Solution) -> ThinResult<Term> {
    match expression {
        Expression::NamedNode(node) => Ok(node.clone().into()),
        Expression::Literal(literal) => Ok(literal.clone().into()),
        Expression::Variable(variable) => solution.get(variable).cloned().ok_or(ThinError {}),
        Expression::Or(lhs, rhs) => {
            let lhs = effective_boolean_value(lhs, solution);
            let rhs = effective_boolean_value(rhs, solution);
            match (lhs, rhs) {
                (Ok(true), _) | (_, Ok(true)) => Ok(boolean(true)),
                (Ok(false), Ok(false)) => Ok(boolean(false)),
                _ => ThinError::expected(),
            }
        }
        Expression::And(lhs, rhs) => {
            let lhs = effective_boolean_value(lhs, solution);
            let rhs = effective_boolean_value(rhs, solution);
            match (lhs, rhs) {
                (Ok(false), _) | (_, Ok(false)) => Ok(boolean(false)),
                (Ok(true), Ok(true)) => Ok(boolean(true)),
                _ => ThinError::expected(),
            }
        }
        Expression::Not(inner) => Ok(boolean(!effective_boolean_value(inner, solution)?)),
        Expression::Equal(lhs, rhs) => {
            let lhs = evaluate_expression(lhs, solution)?;
            let rhs = evaluate_expression(rhs, solution)?;
            Ok(boolean(value_equals(&lhs, &rhs)?))
        }
        Expression::SameTerm(lhs, rhs) => {
            let lhs = evaluate_expression(lhs, solution)?;
            let rhs = evaluate_expression(rhs, solution)?;
            Ok(boolean(lhs == rhs))
        }
        Expression::Greater(lhs, rhs) => {
            compare(lhs, rhs, solution, |ordering| ordering == Ordering::Greater)
        }
        Expression::GreaterOrEqual(lhs, rhs) => {
            compare(lhs, rhs, solution, |ordering| ordering != Ordering::Less)
        }
        Expression::Less(lhs, rhs) => {
            compare(lhs, rhs, solution, |ordering| ordering == Ordering::Less)
        }
        Expression::LessOrEqual(lhs, rhs) => {
            compare(lhs, rhs, solution, |ordering| ordering != Ordering::Greater)
        }
        Expression::In(needle, haystack) => {
            let needle = evaluate_expression(needle, solution)?;
            let mut has_error = false;
            for candidate in haystack {
                match evaluate_expression(candidate, solution)
                    .and_then(|candidate| value_equals(&needle, &candidate))
                {
                    Ok(true) => return Ok(boolean(true)),
                    Ok(false) => {}
                    Err(_) => has_error = true,
                }
            }
            if has_error {
                ThinError::expected()
            } else {
                Ok(boolean(false))
            }
        }
        Expression::Add(lhs, rhs) => arithmetic(lhs, rhs, solution, Numeric::checked_add),
        Expression::Subtract(lhs, rhs) => arithmetic(lhs, rhs, solution, Numeric::checked_sub),
        Expression::Multiply(lhs, rhs) => arithmetic(lhs, rhs, solution, Numeric::checked_mul),
        Expression::Divide(lhs, rhs) => arithmetic(lhs, rhs, solution, Numeric::checked_div),
        Expression::UnaryPlus(inner) => Ok(numeric(inner, solution)?.into_literal().into()),
        Expression::UnaryMinus(inner) => {
            Ok(numeric(inner, solution)?.checked_neg()?.into_literal().into())
        }
        Expression::Bound(variable) => Ok(boolean(solution.is_bound(variable))),
        Expression::If(condition, if_true, if_false) => {
            if effective_boolean_value(condition, solution)? {
                evaluate_expression(if_true, solution)
            } else {
                evaluate_expression(if_false, solution)
            }
        }
        Expression::Coalesce(alternatives) => alternatives
            .iter()
            .find_map(|alternative| evaluate_expression(alternative, solution).ok())
            .ok_or(ThinError {}),
        Expression::Exists(_) => ThinError::expected(),
        Expression::FunctionCall(function, arguments) => {
            evaluate_function(function, arguments, solution)
        }
    }
}

/// Evaluates `expression` and computes the effective boolean value of the result.
pub fn effective_boolean_value(expression: &Expression, solution: &Solution) -> ThinResult<bool> {
    let term = evaluate_expression(expression, solution)?;
    TypedValueRef::from(term.as_ref()).effective_boolean_value()
}

fn evaluate_function(
    function: &Function,
    arguments: &[Expression],
    solution: &Solution,
) -> ThinResult<Term> {
    let arguments = arguments
        .iter()
        .map(|argument| evaluate_expression(argument, solution))
        .collect::<ThinResult<Vec<_>>>()?;
    match (function, arguments.as_slice()) {
        (Function::Str, [term]) => strings::str(term),
        (Function::Lang, [Term::Literal(literal)]) => {
            Ok(Literal::new_simple_literal(literal.language().unwrap_or_default()).into())
        }
        (Function::LangMatches, [tag, range]) => strings::lang_matches(tag, range),
        (Function::Datatype, [Term::Literal(literal)]) => {
            Ok(literal.datatype().into_owned().into())
        }
        (Function::IsIri, [term]) => Ok(boolean(term.is_named_node())),
        (Function::IsBlank, [term]) => Ok(boolean(term.is_blank_node())),
        (Function::IsLiteral, [term]) => Ok(boolean(term.is_literal())),
        (Function::IsNumeric, [term]) => Ok(boolean(matches!(
            TypedValueRef::from(term.as_ref()),
            TypedValueRef::NumericLiteral(_)
        ))),
        (Function::StrLen, [term]) => strings::str_len(term),
        (Function::UCase, [term]) => strings::map_string(term, str::to_uppercase),
        (Function::LCase, [term]) => strings::map_string(term, str::to_lowercase),
        (Function::Contains, [text, pattern]) => {
            strings::test_strings(text, pattern, |text, pattern| text.contains(pattern))
        }
        (Function::StrStarts, [text, pattern]) => {
            strings::test_strings(text, pattern, |text, pattern| text.starts_with(pattern))
        }
        (Function::StrEnds, [text, pattern]) => {
            strings::test_strings(text, pattern, |text, pattern| text.ends_with(pattern))
        }
        (Function::Concat, parts) => strings::concat(parts),
        (Function::Abs, [term]) => Ok(TypedValueRef::from(term.as_ref())
            .as_numeric()?
            .checked_abs()?
            .into_literal()
            .into()),
        (Function::Regex, [text, pattern]) => strings::regex(text, pattern, None),
        (Function::Regex, [text, pattern, flags]) => strings::regex(text, pattern, Some(flags)),
        _ => ThinError::expected(),
    }
}

fn value_equals(lhs: &Term, rhs: &Term) -> ThinResult<bool> {
    TypedValueRef::from(lhs.as_ref()).value_equals(&TypedValueRef::from(rhs.as_ref()))
}

fn compare(
    lhs: &Expression,
    rhs: &Expression,
    solution: &Solution,
    accept: impl Fn(Ordering) -> bool,
) -> ThinResult<Term> {
    let lhs = evaluate_expression(lhs, solution)?;
    let rhs = evaluate_expression(rhs, solution)?;
    let ordering =
        TypedValueRef::from(lhs.as_ref()).value_compare(&TypedValueRef::from(rhs.as_ref()))?;
    Ok(boolean(accept(ordering)))
}

fn arithmetic(
    lhs: &Expression,
    rhs: &Expression,
    solution: &Solution,
    operation: impl Fn(Numeric, Numeric) -> ThinResult<Numeric>,
) -> ThinResult<Term> {
    let lhs = numeric(lhs, solution)?;
    let rhs = numeric(rhs, solution)?;
    Ok(operation(lhs, rhs)?.into_literal().into())
}

fn numeric(expression: &Expression, solution: &Solution) -> ThinResult<Numeric> {
    let term = evaluate_expression(expression, solution)?;
    TypedValueRef::from(term.as_ref()).as_numeric()
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}
