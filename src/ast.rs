use std::sync::Arc;

use crate::token::{Span, TokenKind};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Value),
    /// Dotted identifier path as written, e.g. `brother.daughter0.name`.
    Ident(String),
    Unary(TokenKind, Box<Expr>),
    Binary(Box<Expr>, TokenKind, Box<Expr>),
    /// `and` / `or`, kept apart from Binary for short-circuit evaluation.
    Logical(Box<Expr>, TokenKind, Box<Expr>),
    /// Call by name; resolved in the callback registry first, then the
    /// builtin operator table. Pipes desugar to this.
    Call { name: String, args: Vec<Expr> },
    Array(Vec<Expr>),
    Object(Vec<(Expr, Expr)>),
    Index(Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Residual literal text after whitespace control.
    Text(String),
    /// An expression tag. `original` is the exact source of the whole tag,
    /// delimiters and inner whitespace included; it is reproduced verbatim
    /// when graceful mode recovers a failed evaluation. A tag with no
    /// expression fails at render time.
    Output {
        expr: Option<Expr>,
        original: String,
    },
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
    },
    For {
        vars: Vec<String>,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    Set {
        path: Vec<String>,
        value: Expr,
    },
    Include(IncludeRef),
    Raw(String),
}

#[derive(Debug, Clone)]
pub enum IncludeRef {
    /// Registered under a name; looked up in the environment at render time.
    Registered(String),
    /// Resolved at parse time from a file or the include callback.
    Inline(Arc<Template>),
}

/// A parsed template plus the source it came from. Immutable once parsed;
/// may be rendered many times against different contexts.
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) nodes: Vec<Stmt>,
    pub(crate) source: String,
}

impl Template {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of variable references across all expression positions of the
    /// template, conditions and call arguments included.
    pub fn count_variables(&self) -> usize {
        crate::analysis::count_variable_refs(&self.nodes)
    }
}
