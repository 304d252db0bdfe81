use core::fmt;

use crate::token::Span;

/// 1-based line/column position in the template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parser,
    Render,
    File,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parser => write!(f, "parser"),
            ErrorKind::Render => write!(f, "render"),
            ErrorKind::File => write!(f, "file"),
        }
    }
}

/// A fatal parse, render or include-resolution failure. File errors carry no
/// source location.
#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<Location>,
}

impl Error {
    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Error {
            kind: ErrorKind::Parser,
            message: message.into(),
            location: Some(span.location()),
        }
    }

    pub fn render(message: impl Into<String>, location: Location) -> Self {
        Error {
            kind: ErrorKind::Render,
            message: message.into(),
            location: Some(location),
        }
    }

    pub fn file(message: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::File,
            message: message.into(),
            location: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "[inja.exception.{}_error] (at {}:{}) {}",
                self.kind, loc.line, loc.column, self.message
            ),
            None => write!(f, "[inja.exception.{}_error] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    VariableNotFound,
    CallbackNotFound,
    TypeError,
    IndexError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::VariableNotFound => write!(f, "variable_not_found"),
            DiagnosticKind::CallbackNotFound => write!(f, "callback_not_found"),
            DiagnosticKind::TypeError => write!(f, "type_error"),
            DiagnosticKind::IndexError => write!(f, "index_error"),
        }
    }
}

/// A recoverable render-time failure, recorded in graceful mode instead of
/// aborting the render. `original_text` is the verbatim source of the tag
/// (or offending token, for control-flow failures) as written.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub original_text: String,
    pub location: Location,
}

/// Internal render failure, produced by expression evaluation and resolved
/// at the nearest output or statement boundary: recoverable failures turn
/// into a `Diagnostic` in graceful mode, everything else into an `Error`.
#[derive(Debug, Clone)]
pub(crate) struct RenderFailure {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    pub recoverable: bool,
}

impl RenderFailure {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        RenderFailure {
            kind,
            message: message.into(),
            span,
            recoverable: true,
        }
    }

    pub fn fatal(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        RenderFailure {
            kind,
            message: message.into(),
            span,
            recoverable: false,
        }
    }

    pub fn into_error(self) -> Error {
        Error::render(self.message, self.span.location())
    }
}
