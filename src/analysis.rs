use crate::ast::{Expr, ExprKind, Stmt, StmtKind};

/// Read-only AST walk counting identifier references. Callback names are not
/// references; an identifier piped into or passed to a callback is.
pub(crate) fn count_variable_refs(stmts: &[Stmt]) -> usize {
    stmts.iter().map(count_in_stmt).sum()
}

fn count_in_stmt(stmt: &Stmt) -> usize {
    match &stmt.kind {
        StmtKind::Text(_) | StmtKind::Raw(_) | StmtKind::Include(_) => 0,
        StmtKind::Output { expr, .. } => expr.as_ref().map_or(0, count_in_expr),
        StmtKind::If {
            branches,
            else_body,
        } => {
            let mut count = 0;
            for (cond, body) in branches {
                count += count_in_expr(cond);
                count += count_variable_refs(body);
            }
            if let Some(body) = else_body {
                count += count_variable_refs(body);
            }
            count
        }
        StmtKind::For {
            iterable, body, ..
        } => count_in_expr(iterable) + count_variable_refs(body),
        StmtKind::Set { value, .. } => count_in_expr(value),
    }
}

fn count_in_expr(expr: &Expr) -> usize {
    match &expr.kind {
        ExprKind::Literal(_) => 0,
        ExprKind::Ident(_) => 1,
        ExprKind::Unary(_, inner) => count_in_expr(inner),
        ExprKind::Binary(lhs, _, rhs) | ExprKind::Logical(lhs, _, rhs) => {
            count_in_expr(lhs) + count_in_expr(rhs)
        }
        ExprKind::Call { args, .. } => args.iter().map(count_in_expr).sum(),
        ExprKind::Array(items) => items.iter().map(count_in_expr).sum(),
        ExprKind::Object(entries) => entries
            .iter()
            .map(|(k, v)| count_in_expr(k) + count_in_expr(v))
            .sum(),
        ExprKind::Index(obj, index) => count_in_expr(obj) + count_in_expr(index),
    }
}
