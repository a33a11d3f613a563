use crate::{ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, LiteralRef, NamedNodeRef};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A numeric value of one of the XSD numeric types.
///
/// The variants are ordered by the SPARQL type promotion hierarchy: an operation on two values
/// of different variants is carried out in the "larger" variant. `xsd:decimal` values are
/// approximated by a 64-bit float.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Decimal(f64),
    Float(f32),
    Double(f64),
}

impl Numeric {
    /// Returns true if `datatype` is `xsd:integer`, one of its derived types, `xsd:decimal`,
    /// `xsd:float`, or `xsd:double`.
    pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
        is_integer_datatype(datatype)
            || datatype == xsd::DECIMAL
            || datatype == xsd::FLOAT
            || datatype == xsd::DOUBLE
    }

    /// Parses a numeric literal. Fails if the literal is not numeric or its lexical form is
    /// invalid for its datatype.
    pub fn from_literal(literal: LiteralRef<'_>) -> ThinResult<Self> {
        let datatype = literal.datatype();
        let value = literal.value();
        if is_integer_datatype(datatype) {
            Ok(Numeric::Integer(value.parse()?))
        } else if datatype == xsd::DECIMAL {
            let is_decimal_lexical = value
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-'));
            if !is_decimal_lexical {
                return ThinError::expected();
            }
            Ok(Numeric::Decimal(value.parse()?))
        } else if datatype == xsd::FLOAT {
            Ok(Numeric::Float(parse_floating_point(value)?))
        } else if datatype == xsd::DOUBLE {
            Ok(Numeric::Double(parse_floating_point(value)?))
        } else {
            ThinError::expected()
        }
    }

    /// Converts the value into a literal of its own datatype.
    pub fn into_literal(self) -> Literal {
        match self {
            Numeric::Integer(value) => Literal::from(value),
            Numeric::Decimal(value) => Literal::new_typed_literal(value.to_string(), xsd::DECIMAL),
            Numeric::Float(value) => Literal::from(value),
            Numeric::Double(value) => Literal::from(value),
        }
    }

    /// The effective boolean value of a number: false for zero and NaN.
    pub fn effective_boolean_value(self) -> bool {
        match self {
            Numeric::Integer(value) => value != 0,
            Numeric::Decimal(value) | Numeric::Double(value) => value != 0.0 && !value.is_nan(),
            Numeric::Float(value) => value != 0.0 && !value.is_nan(),
        }
    }

    pub fn checked_add(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            Promoted::Integer(lhs, rhs) => lhs.checked_add(rhs).map(Numeric::Integer).ok_or(ThinError {}),
            Promoted::Decimal(lhs, rhs) => Ok(Numeric::Decimal(lhs + rhs)),
            Promoted::Float(lhs, rhs) => Ok(Numeric::Float(lhs + rhs)),
            Promoted::Double(lhs, rhs) => Ok(Numeric::Double(lhs + rhs)),
        }
    }

    pub fn checked_sub(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            Promoted::Integer(lhs, rhs) => lhs.checked_sub(rhs).map(Numeric::Integer).ok_or(ThinError {}),
            Promoted::Decimal(lhs, rhs) => Ok(Numeric::Decimal(lhs - rhs)),
            Promoted::Float(lhs, rhs) => Ok(Numeric::Float(lhs - rhs)),
            Promoted::Double(lhs, rhs) => Ok(Numeric::Double(lhs - rhs)),
        }
    }

    pub fn checked_mul(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            Promoted::Integer(lhs, rhs) => lhs.checked_mul(rhs).map(Numeric::Integer).ok_or(ThinError {}),
            Promoted::Decimal(lhs, rhs) => Ok(Numeric::Decimal(lhs * rhs)),
            Promoted::Float(lhs, rhs) => Ok(Numeric::Float(lhs * rhs)),
            Promoted::Double(lhs, rhs) => Ok(Numeric::Double(lhs * rhs)),
        }
    }

    /// Divides two numbers. The division of two integers yields a decimal. Division by zero is
    /// an error for integers and decimals.
    pub fn checked_div(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs) {
            Promoted::Integer(lhs, rhs) => {
                if rhs == 0 {
                    return ThinError::expected();
                }
                Ok(Numeric::Decimal(integer_to_f64(lhs) / integer_to_f64(rhs)))
            }
            Promoted::Decimal(lhs, rhs) => {
                if rhs == 0.0 {
                    return ThinError::expected();
                }
                Ok(Numeric::Decimal(lhs / rhs))
            }
            Promoted::Float(lhs, rhs) => Ok(Numeric::Float(lhs / rhs)),
            Promoted::Double(lhs, rhs) => Ok(Numeric::Double(lhs / rhs)),
        }
    }

    pub fn checked_neg(self) -> ThinResult<Self> {
        match self {
            Numeric::Integer(value) => value.checked_neg().map(Numeric::Integer).ok_or(ThinError {}),
            Numeric::Decimal(value) => Ok(Numeric::Decimal(-value)),
            Numeric::Float(value) => Ok(Numeric::Float(-value)),
            Numeric::Double(value) => Ok(Numeric::Double(-value)),
        }
    }

    pub fn checked_abs(self) -> ThinResult<Self> {
        match self {
            Numeric::Integer(value) => value.checked_abs().map(Numeric::Integer).ok_or(ThinError {}),
            Numeric::Decimal(value) => Ok(Numeric::Decimal(value.abs())),
            Numeric::Float(value) => Ok(Numeric::Float(value.abs())),
            Numeric::Double(value) => Ok(Numeric::Double(value.abs())),
        }
    }

    /// Compares two numbers after type promotion. Returns [None] if NaN is involved.
    pub fn compare(self, rhs: Self) -> Option<Ordering> {
        match promote(self, rhs) {
            Promoted::Integer(lhs, rhs) => Some(lhs.cmp(&rhs)),
            Promoted::Decimal(lhs, rhs) | Promoted::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
            Promoted::Float(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }
}

impl Display for Numeric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Integer(value) => write!(f, "{value}"),
            Numeric::Decimal(value) | Numeric::Double(value) => write!(f, "{value}"),
            Numeric::Float(value) => write!(f, "{value}"),
        }
    }
}

enum Promoted {
    Integer(i64, i64),
    Decimal(f64, f64),
    Float(f32, f32),
    Double(f64, f64),
}

fn promote(lhs: Numeric, rhs: Numeric) -> Promoted {
    match (lhs, rhs) {
        (Numeric::Integer(lhs), Numeric::Integer(rhs)) => Promoted::Integer(lhs, rhs),
        (Numeric::Double(_), _) | (_, Numeric::Double(_)) => {
            Promoted::Double(to_f64(lhs), to_f64(rhs))
        }
        (Numeric::Float(_), _) | (_, Numeric::Float(_)) => {
            Promoted::Float(to_f32(lhs), to_f32(rhs))
        }
        _ => Promoted::Decimal(to_f64(lhs), to_f64(rhs)),
    }
}

#[allow(clippy::cast_precision_loss, reason = "xsd:decimal is approximated by f64")]
fn integer_to_f64(value: i64) -> f64 {
    value as f64
}

fn to_f64(value: Numeric) -> f64 {
    match value {
        Numeric::Integer(value) => integer_to_f64(value),
        Numeric::Decimal(value) | Numeric::Double(value) => value,
        Numeric::Float(value) => f64::from(value),
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "promotion to xsd:float is lossy by definition"
)]
fn to_f32(value: Numeric) -> f32 {
    match value {
        Numeric::Integer(value) => value as f32,
        Numeric::Decimal(value) | Numeric::Double(value) => value as f32,
        Numeric::Float(value) => value,
    }
}

fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    [
        xsd::INTEGER,
        xsd::LONG,
        xsd::INT,
        xsd::SHORT,
        xsd::BYTE,
        xsd::NON_NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::UNSIGNED_LONG,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_BYTE,
    ]
    .contains(&datatype)
}

fn parse_floating_point<T: std::str::FromStr>(value: &str) -> ThinResult<T>
where
    ThinError: From<T::Err>,
{
    let normalized = match value {
        "INF" | "+INF" => "inf",
        "-INF" => "-inf",
        "NaN" => "NaN",
        "inf" | "+inf" | "-inf" | "infinity" | "+infinity" | "-infinity" | "nan" => {
            return ThinError::expected()
        }
        _ => value,
    };
    Ok(normalized.parse()?)
}
