use crate::error::{DiagnosticKind, RenderFailure};
use crate::token::{Span, TokenKind};
use crate::value::Value;

enum Num {
    Int(i128),
    Float(f64),
}

fn as_num(value: &Value) -> Option<Num> {
    match value {
        Value::Int(i) => Some(Num::Int(*i as i128)),
        Value::UInt(u) => Some(Num::Int(*u as i128)),
        Value::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

/// Narrows an `i128` result back into the value model: `Int` if it fits,
/// `UInt` for the large-unsigned range, `Float` beyond that.
fn narrow(n: i128) -> Value {
    if let Ok(i) = i64::try_from(n) {
        Value::Int(i)
    } else if let Ok(u) = u64::try_from(n) {
        Value::UInt(u)
    } else {
        Value::Float(n as f64)
    }
}

pub(crate) fn apply_binary(
    lhs: &Value,
    op: &TokenKind,
    rhs: &Value,
    span: Span,
) -> Result<Value, RenderFailure> {
    match op {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent => arithmetic(lhs, op, rhs, span),

        TokenKind::Eq => Ok(Value::Bool(lhs == rhs)),
        TokenKind::NotEq => Ok(Value::Bool(lhs != rhs)),
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
            let Some(ordering) = lhs.partial_cmp(rhs) else {
                return Err(RenderFailure::new(
                    DiagnosticKind::TypeError,
                    format!(
                        "cannot compare {} with {}",
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                    span,
                ));
            };
            let result = match op {
                TokenKind::Lt => ordering.is_lt(),
                TokenKind::LtEq => ordering.is_le(),
                TokenKind::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            };
            Ok(Value::Bool(result))
        }

        TokenKind::In => membership(lhs, rhs, span),

        other => Err(RenderFailure::fatal(
            DiagnosticKind::TypeError,
            format!("unsupported binary operator '{other}'"),
            span,
        )),
    }
}

fn arithmetic(
    lhs: &Value,
    op: &TokenKind,
    rhs: &Value,
    span: Span,
) -> Result<Value, RenderFailure> {
    let type_error = || {
        RenderFailure::new(
            DiagnosticKind::TypeError,
            format!(
                "unsupported operand types for '{op}': {} and {}",
                lhs.type_name(),
                rhs.type_name()
            ),
            span,
        )
    };
    let division_by_zero = || {
        RenderFailure::new(DiagnosticKind::TypeError, "division by zero", span)
    };

    let (a, b) = match (as_num(lhs), as_num(rhs)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(type_error()),
    };

    match (a, b) {
        // integer / integer stays integral; division is integer division
        (Num::Int(a), Num::Int(b)) => match op {
            TokenKind::Plus => Ok(narrow(a + b)),
            TokenKind::Minus => Ok(narrow(a - b)),
            TokenKind::Star => match a.checked_mul(b) {
                Some(n) => Ok(narrow(n)),
                None => Ok(Value::Float(a as f64 * b as f64)),
            },
            TokenKind::Slash => {
                if b == 0 {
                    Err(division_by_zero())
                } else {
                    Ok(narrow(a / b))
                }
            }
            _ => {
                if b == 0 {
                    Err(division_by_zero())
                } else {
                    Ok(narrow(a % b))
                }
            }
        },
        (a, b) => {
            let a = match a {
                Num::Int(i) => i as f64,
                Num::Float(f) => f,
            };
            let b = match b {
                Num::Int(i) => i as f64,
                Num::Float(f) => f,
            };
            match op {
                TokenKind::Plus => Ok(Value::Float(a + b)),
                TokenKind::Minus => Ok(Value::Float(a - b)),
                TokenKind::Star => Ok(Value::Float(a * b)),
                TokenKind::Slash => {
                    if b == 0.0 {
                        Err(division_by_zero())
                    } else {
                        Ok(Value::Float(a / b))
                    }
                }
                _ => {
                    if b == 0.0 {
                        Err(division_by_zero())
                    } else {
                        Ok(Value::Float(a % b))
                    }
                }
            }
        }
    }
}

/// `in`: element membership for arrays, key membership for objects,
/// substring for strings.
fn membership(lhs: &Value, rhs: &Value, span: Span) -> Result<Value, RenderFailure> {
    match rhs {
        Value::Array(items) => Ok(Value::Bool(items.iter().any(|item| item == lhs))),
        Value::Object(map) => match lhs {
            Value::String(key) => Ok(Value::Bool(map.contains_key(key))),
            other => Err(RenderFailure::new(
                DiagnosticKind::TypeError,
                format!(
                    "'in' on an object requires a string key, got {}",
                    other.type_name()
                ),
                span,
            )),
        },
        Value::String(haystack) => match lhs {
            Value::String(needle) => Ok(Value::Bool(haystack.contains(needle.as_str()))),
            other => Err(RenderFailure::new(
                DiagnosticKind::TypeError,
                format!(
                    "'in' on a string requires a string, got {}",
                    other.type_name()
                ),
                span,
            )),
        },
        other => Err(RenderFailure::new(
            DiagnosticKind::TypeError,
            format!("'in' requires an array, object or string, got {}", other.type_name()),
            span,
        )),
    }
}

pub(crate) fn apply_unary(
    op: &TokenKind,
    value: &Value,
    span: Span,
) -> Result<Value, RenderFailure> {
    match op {
        TokenKind::Not => Ok(Value::Bool(!value.is_truthy())),
        TokenKind::Minus => match value {
            Value::Int(i) => match i.checked_neg() {
                Some(n) => Ok(Value::Int(n)),
                None => Ok(Value::Float(-(*i as f64))),
            },
            Value::UInt(u) => {
                if *u <= i64::MAX as u64 {
                    Ok(Value::Int(-(*u as i64)))
                } else {
                    Ok(Value::Float(-(*u as f64)))
                }
            }
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(RenderFailure::new(
                DiagnosticKind::TypeError,
                format!("unary '-' requires a number, got {}", other.type_name()),
                span,
            )),
        },
        other => Err(RenderFailure::fatal(
            DiagnosticKind::TypeError,
            format!("unsupported unary operator '{other}'"),
            span,
        )),
    }
}

/// Shared subscript semantics for `a[i]`, member access and the `at`
/// builtin: integer indices on arrays count from the end when negative;
/// string keys on objects.
pub(crate) fn index_value(
    receiver: &Value,
    index: &Value,
    span: Span,
) -> Result<Value, RenderFailure> {
    match (receiver, index) {
        (Value::Array(items), _) if index.is_number() => {
            let raw = match index {
                Value::Int(i) => *i,
                Value::UInt(u) => *u as i64,
                _ => {
                    return Err(RenderFailure::new(
                        DiagnosticKind::TypeError,
                        "array index must be an integer",
                        span,
                    ));
                }
            };
            let len = items.len() as i64;
            let effective = if raw < 0 { raw + len } else { raw };
            if effective < 0 || effective >= len {
                return Err(RenderFailure::new(
                    DiagnosticKind::IndexError,
                    format!("index {raw} out of range"),
                    span,
                ));
            }
            Ok(items[effective as usize].clone())
        }
        (Value::Object(map), Value::String(key)) => match map.get(key) {
            Some(value) => Ok(value.clone()),
            None => Err(RenderFailure::new(
                DiagnosticKind::VariableNotFound,
                format!("variable '{key}' not found"),
                span,
            )),
        },
        (Value::Null, _) => Err(RenderFailure::new(
            DiagnosticKind::TypeError,
            "cannot index into null",
            span,
        )),
        (other, _) => Err(RenderFailure::new(
            DiagnosticKind::TypeError,
            format!("cannot index into {}", other.type_name()),
            span,
        )),
    }
}
