use crate::ast::{Expr, ExprKind};
use crate::error::{DiagnosticKind, RenderFailure};
use crate::token::TokenKind;
use crate::value::{Object, Value};

use super::ops::{apply_binary, apply_unary, index_value};
use super::Renderer;

pub(crate) fn evaluate(r: &Renderer<'_>, expr: &Expr) -> Result<Value, RenderFailure> {
    let span = expr.span;
    match &expr.kind {
        ExprKind::Literal(value) => Ok(value.clone()),
        ExprKind::Ident(path) => {
            let segments: Vec<&str> = path.split('.').collect();
            r.ctx.lookup(&segments).ok_or_else(|| {
                RenderFailure::new(
                    DiagnosticKind::VariableNotFound,
                    format!("variable '{path}' not found"),
                    span,
                )
            })
        }
        ExprKind::Logical(lhs, op, rhs) => {
            // short-circuit: the right side is never evaluated when the left
            // side already decides the outcome
            let left = evaluate(r, lhs)?;
            match op {
                TokenKind::And if !left.is_truthy() => Ok(Value::Bool(false)),
                TokenKind::Or if left.is_truthy() => Ok(Value::Bool(true)),
                _ => Ok(Value::Bool(evaluate(r, rhs)?.is_truthy())),
            }
        }
        ExprKind::Unary(op, inner) => {
            let value = evaluate(r, inner)?;
            apply_unary(op, &value, span)
        }
        ExprKind::Binary(lhs, op, rhs) => {
            let left = evaluate(r, lhs)?;
            let right = evaluate(r, rhs)?;
            apply_binary(&left, op, &right, span)
        }
        ExprKind::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(r, arg)?);
            }
            call(r, name, &values, span)
        }
        ExprKind::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(evaluate(r, item)?);
            }
            Ok(Value::Array(values))
        }
        ExprKind::Object(entries) => {
            let mut map = Object::new();
            for (key_expr, value_expr) in entries {
                let key = match evaluate(r, key_expr)? {
                    Value::String(s) => s,
                    other => {
                        return Err(RenderFailure::new(
                            DiagnosticKind::TypeError,
                            format!("object key must be a string, got {}", other.type_name()),
                            key_expr.span,
                        ));
                    }
                };
                map.insert(key, evaluate(r, value_expr)?);
            }
            Ok(Value::Object(map))
        }
        ExprKind::Index(receiver, index) => {
            let receiver = evaluate(r, receiver)?;
            let index = evaluate(r, index)?;
            index_value(&receiver, &index, span)
        }
    }
}

/// Calls resolve in the user callback registry first, then the builtin
/// operator table, both keyed by name and arity.
fn call(
    r: &Renderer<'_>,
    name: &str,
    args: &[Value],
    span: crate::token::Span,
) -> Result<Value, RenderFailure> {
    if let Some(callback) = r.env.callback(name, args.len()) {
        return callback.as_ref()(args)
            .map_err(|message| RenderFailure::new(DiagnosticKind::TypeError, message, span));
    }
    if let Some(builtin) = r.env.operator(name, args.len()) {
        return builtin(args)
            .map_err(|message| RenderFailure::new(DiagnosticKind::TypeError, message, span));
    }
    Err(RenderFailure::new(
        DiagnosticKind::CallbackNotFound,
        format!("callback '{name}' not found"),
        span,
    ))
}
