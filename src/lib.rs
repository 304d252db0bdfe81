//! Text template engine in the Jinja2 family: expressions `{{ }}`,
//! statements `{% %}`, comments `{# #}` and a `##` line-statement prefix,
//! all reconfigurable, with an optional graceful mode that substitutes the
//! verbatim source of failing output tags and records diagnostics instead
//! of aborting.

// Internal
mod analysis;
mod ast;
mod builtins;
mod conversion;
mod environment;
mod error;
mod lexer;
mod parser;
mod renderer;
mod token;
mod value;

// Re-export core types
pub use ast::{Expr, ExprKind, IncludeRef, Stmt, StmtKind, Template};
pub use builtins::register_array_functions;
pub use environment::{CallbackFn, Environment, IncludeCallback};
pub use error::{Diagnostic, DiagnosticKind, Error, ErrorKind, Location};
pub use value::{Object, Value};

// The lexer and parser are exported for tooling and for the integration
// tests, which exercise them as an external crate.
pub use lexer::{Lexer, SyntaxConfig};
pub use parser::Parser;
pub use token::{Span, Token, TokenKind};
