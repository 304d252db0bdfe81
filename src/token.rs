use core::fmt;

use crate::error::Location;

/// Byte range into the template source, plus the 1-based line/column of the
/// range start. The slice `source[start..end]` is the token's original text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Span {
            start,
            end,
            line,
            column,
        }
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Literal template text between tags. The content is the span's slice;
    /// whitespace-control trimming has already been applied to the span.
    Text,

    ExpressionOpen,
    ExpressionClose,
    StatementOpen,
    StatementClose,
    CommentOpen,
    CommentClose,

    // Literals
    Identifier(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Assign,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Pipe,

    // Keywords
    If,
    Elif,
    Else,
    EndIf,
    For,
    EndFor,
    In,
    Set,
    Include,
    Raw,
    EndRaw,
    True,
    False,
    Null,
    And,
    Or,
    Not,

    Eof,
}

impl TokenKind {
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "if" => Some(TokenKind::If),
            "elif" => Some(TokenKind::Elif),
            "else" => Some(TokenKind::Else),
            "endif" => Some(TokenKind::EndIf),
            "for" => Some(TokenKind::For),
            "endfor" => Some(TokenKind::EndFor),
            "in" => Some(TokenKind::In),
            "set" => Some(TokenKind::Set),
            "include" => Some(TokenKind::Include),
            "raw" => Some(TokenKind::Raw),
            "endraw" => Some(TokenKind::EndRaw),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "null" => Some(TokenKind::Null),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            _ => None,
        }
    }
}

// Used when quoting the offending token in error messages.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Text => write!(f, "<text>"),
            TokenKind::ExpressionOpen => write!(f, "<expression open>"),
            TokenKind::ExpressionClose => write!(f, "<expression close>"),
            TokenKind::StatementOpen => write!(f, "<statement open>"),
            TokenKind::StatementClose => write!(f, "<statement close>"),
            TokenKind::CommentOpen => write!(f, "<comment open>"),
            TokenKind::CommentClose => write!(f, "<comment close>"),
            TokenKind::Identifier(s) => write!(f, "{s}"),
            TokenKind::Int(v) => write!(f, "{v}"),
            TokenKind::UInt(v) => write!(f, "{v}"),
            TokenKind::Float(v) => write!(f, "{v:?}"),
            TokenKind::Str(s) => write!(f, "{s}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Elif => write!(f, "elif"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::EndIf => write!(f, "endif"),
            TokenKind::For => write!(f, "for"),
            TokenKind::EndFor => write!(f, "endfor"),
            TokenKind::In => write!(f, "in"),
            TokenKind::Set => write!(f, "set"),
            TokenKind::Include => write!(f, "include"),
            TokenKind::Raw => write!(f, "raw"),
            TokenKind::EndRaw => write!(f, "endraw"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Not => write!(f, "not"),
            TokenKind::Eof => write!(f, "<eof>"),
        }
    }
}
