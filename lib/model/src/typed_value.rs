use crate::{Numeric, ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{BlankNodeRef, LiteralRef, NamedNodeRef, TermRef};
use std::cmp::Ordering;

/// A view of a term as a SPARQL value.
///
/// Literals of the datatypes that SPARQL operators understand are decoded into their value
/// space. Literals with an invalid lexical form or an unknown datatype become
/// [TypedValueRef::OtherLiteral] and only support term equality.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TypedValueRef<'value> {
    NamedNode(NamedNodeRef<'value>),
    BlankNode(BlankNodeRef<'value>),
    BooleanLiteral(bool),
    NumericLiteral(Numeric),
    /// A simple literal or an `xsd:string`.
    SimpleLiteral(&'value str),
    LanguageStringLiteral {
        value: &'value str,
        language: &'value str,
    },
    OtherLiteral(LiteralRef<'value>),
}

impl<'value> From<TermRef<'value>> for TypedValueRef<'value> {
    fn from(term: TermRef<'value>) -> Self {
        match term {
            TermRef::NamedNode(node) => TypedValueRef::NamedNode(node),
            TermRef::BlankNode(node) => TypedValueRef::BlankNode(node),
            TermRef::Literal(literal) => TypedValueRef::from(literal),
        }
    }
}

impl<'value> From<LiteralRef<'value>> for TypedValueRef<'value> {
    fn from(literal: LiteralRef<'value>) -> Self {
        let datatype = literal.datatype();
        if let Some(language) = literal.language() {
            return TypedValueRef::LanguageStringLiteral {
                value: literal.value(),
                language,
            };
        }
        if datatype == xsd::STRING {
            return TypedValueRef::SimpleLiteral(literal.value());
        }
        if datatype == xsd::BOOLEAN {
            return match literal.value() {
                "true" | "1" => TypedValueRef::BooleanLiteral(true),
                "false" | "0" => TypedValueRef::BooleanLiteral(false),
                _ => TypedValueRef::OtherLiteral(literal),
            };
        }
        if Numeric::is_numeric_datatype(datatype) {
            return match Numeric::from_literal(literal) {
                Ok(numeric) => TypedValueRef::NumericLiteral(numeric),
                Err(_) => TypedValueRef::OtherLiteral(literal),
            };
        }
        TypedValueRef::OtherLiteral(literal)
    }
}

impl TypedValueRef<'_> {
    /// Computes the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv).
    pub fn effective_boolean_value(&self) -> ThinResult<bool> {
        match self {
            TypedValueRef::BooleanLiteral(value) => Ok(*value),
            TypedValueRef::NumericLiteral(value) => Ok(value.effective_boolean_value()),
            TypedValueRef::SimpleLiteral(value) => Ok(!value.is_empty()),
            _ => ThinError::expected(),
        }
    }

    /// Returns the string content of string literals (simple or language-tagged).
    pub fn as_string(&self) -> ThinResult<&str> {
        match self {
            TypedValueRef::SimpleLiteral(value)
            | TypedValueRef::LanguageStringLiteral { value, .. } => Ok(value),
            _ => ThinError::expected(),
        }
    }

    /// Returns the numeric value of numeric literals.
    pub fn as_numeric(&self) -> ThinResult<Numeric> {
        match self {
            TypedValueRef::NumericLiteral(value) => Ok(*value),
            _ => ThinError::expected(),
        }
    }

    /// Implements the SPARQL `=` operator.
    ///
    /// Values of known datatypes are compared in their value space. Two literals that are not
    /// term-equal and of which at least one has an unknown datatype cannot be compared, which is
    /// an error.
    pub fn value_equals(&self, other: &Self) -> ThinResult<bool> {
        match (self, other) {
            (TypedValueRef::NumericLiteral(lhs), TypedValueRef::NumericLiteral(rhs)) => {
                Ok(lhs.compare(*rhs) == Some(Ordering::Equal))
            }
            (TypedValueRef::BooleanLiteral(lhs), TypedValueRef::BooleanLiteral(rhs)) => {
                Ok(lhs == rhs)
            }
            (TypedValueRef::SimpleLiteral(lhs), TypedValueRef::SimpleLiteral(rhs)) => {
                Ok(lhs == rhs)
            }
            (
                TypedValueRef::LanguageStringLiteral {
                    value: lhs_value,
                    language: lhs_language,
                },
                TypedValueRef::LanguageStringLiteral {
                    value: rhs_value,
                    language: rhs_language,
                },
            ) => Ok(lhs_value == rhs_value && lhs_language.eq_ignore_ascii_case(rhs_language)),
            (TypedValueRef::NamedNode(lhs), TypedValueRef::NamedNode(rhs)) => Ok(lhs == rhs),
            (TypedValueRef::BlankNode(lhs), TypedValueRef::BlankNode(rhs)) => Ok(lhs == rhs),
            (TypedValueRef::OtherLiteral(lhs), TypedValueRef::OtherLiteral(rhs)) if lhs == rhs => {
                Ok(true)
            }
            (TypedValueRef::OtherLiteral(_), _) | (_, TypedValueRef::OtherLiteral(_))
                if self.is_literal() && other.is_literal() =>
            {
                ThinError::expected()
            }
            _ => Ok(false),
        }
    }

    /// Implements the ordering of the SPARQL `<`, `<=`, `>` and `>=` operators.
    ///
    /// Only numerics, strings of the same kind and booleans are ordered. Everything else is an
    /// error.
    pub fn value_compare(&self, other: &Self) -> ThinResult<Ordering> {
        let ordering = match (self, other) {
            (TypedValueRef::NumericLiteral(lhs), TypedValueRef::NumericLiteral(rhs)) => {
                lhs.compare(*rhs)
            }
            (TypedValueRef::BooleanLiteral(lhs), TypedValueRef::BooleanLiteral(rhs)) => {
                Some(lhs.cmp(rhs))
            }
            (TypedValueRef::SimpleLiteral(lhs), TypedValueRef::SimpleLiteral(rhs)) => {
                Some(lhs.cmp(rhs))
            }
            (
                TypedValueRef::LanguageStringLiteral {
                    value: lhs_value,
                    language: lhs_language,
                },
                TypedValueRef::LanguageStringLiteral {
                    value: rhs_value,
                    language: rhs_language,
                },
            ) if lhs_language.eq_ignore_ascii_case(rhs_language) => Some(lhs_value.cmp(rhs_value)),
            _ => None,
        };
        ordering.ok_or(ThinError {})
    }

    fn is_literal(&self) -> bool {
        !matches!(
            self,
            TypedValueRef::NamedNode(_) | TypedValueRef::BlankNode(_)
        )
    }
}
