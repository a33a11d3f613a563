use rdf_weave_model::Variable;
use spargebra::algebra::Expression;

/// Returns the variables mentioned by `expression`, in order of their first occurrence.
///
/// Variables that only occur inside an `EXISTS` pattern are not included.
pub fn expression_variables(expression: &Expression) -> Vec<Variable> {
    let mut variables = Vec::new();
    collect_variables(expression, &mut variables);
    variables
}

/// Returns true if `expression` can observe variable bindings.
///
/// An `EXISTS` clause is considered to observe bindings as its result depends on the solution it
/// is evaluated against.
pub fn has_variables(expression: &Expression) -> bool {
    match expression {
        Expression::NamedNode(_) | Expression::Literal(_) => false,
        Expression::Variable(_) | Expression::Bound(_) | Expression::Exists(_) => true,
        Expression::Or(lhs, rhs)
        | Expression::And(lhs, rhs)
        | Expression::Equal(lhs, rhs)
        | Expression::SameTerm(lhs, rhs)
        | Expression::Greater(lhs, rhs)
        | Expression::GreaterOrEqual(lhs, rhs)
        | Expression::Less(lhs, rhs)
        | Expression::LessOrEqual(lhs, rhs)
        | Expression::Add(lhs, rhs)
        | Expression::Subtract(lhs, rhs)
        | Expression::Multiply(lhs, rhs)
        | Expression::Divide(lhs, rhs) => has_variables(lhs) || has_variables(rhs),
        Expression::UnaryPlus(inner) | Expression::UnaryMinus(inner) | Expression::Not(inner) => {
            has_variables(inner)
        }
        Expression::In(lhs, rhs) => has_variables(lhs) || rhs.iter().any(has_variables),
        Expression::If(test, if_true, if_false) => {
            has_variables(test) || has_variables(if_true) || has_variables(if_false)
        }
        Expression::Coalesce(args) | Expression::FunctionCall(_, args) => {
            args.iter().any(has_variables)
        }
    }
}

fn collect_variables(expression: &Expression, variables: &mut Vec<Variable>) {
    match expression {
        Expression::NamedNode(_) | Expression::Literal(_) | Expression::Exists(_) => {}
        Expression::Variable(variable) | Expression::Bound(variable) => {
            if !variables.contains(variable) {
                variables.push(variable.clone());
            }
        }
        Expression::Or(lhs, rhs)
        | Expression::And(lhs, rhs)
        | Expression::Equal(lhs, rhs)
        | Expression::SameTerm(lhs, rhs)
        | Expression::Greater(lhs, rhs)
        | Expression::GreaterOrEqual(lhs, rhs)
        | Expression::Less(lhs, rhs)
        | Expression::LessOrEqual(lhs, rhs)
        | Expression::Add(lhs, rhs)
        | Expression::Subtract(lhs, rhs)
        | Expression::Multiply(lhs, rhs)
        | Expression::Divide(lhs, rhs) => {
            collect_variables(lhs, variables);
            collect_variables(rhs, variables);
        }
        Expression::UnaryPlus(inner) | Expression::UnaryMinus(inner) | Expression::Not(inner) => {
            collect_variables(inner, variables);
        }
        Expression::In(lhs, rhs) => {
            collect_variables(lhs, variables);
            for expression in rhs {
                collect_variables(expression, variables);
            }
        }
        Expression::If(test, if_true, if_false) => {
            collect_variables(test, variables);
            collect_variables(if_true, variables);
            collect_variables(if_false, variables);
        }
        Expression::Coalesce(args) | Expression::FunctionCall(_, args) => {
            for expression in args {
                collect_variables(expression, variables);
            }
        }
    }
}
