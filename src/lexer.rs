use std::collections::VecDeque;

use crate::error::Error;
use crate::token::{Span, Token, TokenKind};

/// Delimiter and whitespace-control configuration shared by the lexer and
/// the environment that owns it.
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
    pub expression_open: String,
    pub expression_close: String,
    pub statement_open: String,
    pub statement_close: String,
    pub comment_open: String,
    pub comment_close: String,
    pub line_statement: String,
    pub lstrip_blocks: bool,
    pub trim_blocks: bool,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        SyntaxConfig {
            expression_open: "{{".to_string(),
            expression_close: "}}".to_string(),
            statement_open: "{%".to_string(),
            statement_close: "%}".to_string(),
            comment_open: "{#".to_string(),
            comment_close: "#}".to_string(),
            line_statement: "##".to_string(),
            lstrip_blocks: false,
            trim_blocks: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    Expression,
    Statement,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Tag(TagKind),
    LineStatement,
}

/// Streaming template lexer. Operates as a byte cursor with two sub-modes:
/// literal text and inside a tag. The parser pulls tokens on demand, which
/// keeps the cursor available for raw-block scans.
pub struct Lexer<'s> {
    source: &'s str,
    config: &'s SyntaxConfig,
    pos: usize,
    line: usize,
    line_start: usize,
    state: State,
    nesting: usize,
    // Whether the previous in-tag token can end an operand; decides if '-'
    // starts a signed number or is the subtraction operator.
    operand: bool,
    pending: VecDeque<Token>,
}

/// Strips trailing spaces/tabs from `text` if its final line consists of
/// nothing else; the newline itself is kept. Any other character on the
/// final line leaves the text untouched.
fn clear_final_line_if_whitespace(text: &str) -> &str {
    let mut end = text.len();
    for (i, b) in text.bytes().enumerate().rev() {
        match b {
            b' ' | b'\t' => end = i,
            b'\n' => break,
            _ => return text,
        }
    }
    &text[..end]
}

fn is_ident_leader(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'@' || b == b'$'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'@' || b == b'$'
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str, config: &'s SyntaxConfig) -> Self {
        Lexer {
            source,
            config,
            pos: 0,
            line: 1,
            line_start: 0,
            state: State::Text,
            nesting: 0,
            operand: false,
            pending: VecDeque::new(),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(token);
        }
        match self.state {
            State::Text => self.text_token(),
            State::Tag(TagKind::Comment) => self.comment_close_token(),
            State::Tag(kind) => self.tag_token(kind),
            State::LineStatement => self.line_statement_token(),
        }
    }

    fn column(&self, pos: usize) -> usize {
        pos - self.line_start + 1
    }

    fn span_from(&self, start: usize, line: usize, column: usize) -> Span {
        Span::new(start, self.pos, line, column)
    }

    fn eof_token(&self) -> Token {
        Token {
            kind: TokenKind::Eof,
            span: Span::new(self.pos, self.pos, self.line, self.column(self.pos)),
        }
    }

    /// Moves the cursor forward, keeping the line counter in sync.
    fn advance_to(&mut self, new_pos: usize) {
        let bytes = self.source.as_bytes();
        for i in self.pos..new_pos {
            if bytes[i] == b'\n' {
                self.line += 1;
                self.line_start = i + 1;
            }
        }
        self.pos = new_pos;
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn starts_with_at(&self, pos: usize, pat: &str) -> bool {
        !pat.is_empty() && self.source.as_bytes()[pos..].starts_with(pat.as_bytes())
    }

    /// Longest open delimiter matching at `pos`, if any.
    fn match_opener(&self, pos: usize) -> Option<(TagKind, usize)> {
        let mut best: Option<(TagKind, usize)> = None;
        let candidates = [
            (TagKind::Expression, self.config.expression_open.len(), self.starts_with_at(pos, &self.config.expression_open)),
            (TagKind::Statement, self.config.statement_open.len(), self.starts_with_at(pos, &self.config.statement_open)),
            (TagKind::Comment, self.config.comment_open.len(), self.starts_with_at(pos, &self.config.comment_open)),
        ];
        for (kind, len, matched) in candidates {
            if matched && best.map_or(true, |(_, l)| len > l) {
                best = Some((kind, len));
            }
        }
        best
    }

    // ---- text mode ----

    fn text_token(&mut self) -> Result<Token, Error> {
        if self.pos >= self.source.len() {
            return Ok(self.eof_token());
        }

        let bytes = self.source.as_bytes();
        let text_start = self.pos;
        let text_line = self.line;
        let text_column = self.column(self.pos);

        enum Found {
            Tag { at: usize, kind: TagKind, open_len: usize },
            Line { at: usize, prefix_start: usize },
        }

        let mut found = None;
        let mut p = self.pos;
        while p < bytes.len() {
            if p == 0 || bytes[p - 1] == b'\n' {
                let mut q = p;
                while q < bytes.len() && (bytes[q] == b' ' || bytes[q] == b'\t') {
                    q += 1;
                }
                if self.starts_with_at(q, &self.config.line_statement) {
                    found = Some(Found::Line { at: p, prefix_start: q });
                    break;
                }
            }
            if let Some((kind, open_len)) = self.match_opener(p) {
                found = Some(Found::Tag { at: p, kind, open_len });
                break;
            }
            p += 1;
        }

        match found {
            None => {
                self.advance_to(self.source.len());
                Ok(Token {
                    kind: TokenKind::Text,
                    span: Span::new(text_start, self.source.len(), text_line, text_column),
                })
            }
            Some(Found::Tag { at, kind, open_len }) => {
                let after = at + open_len;
                let marker = bytes.get(after).copied();
                let (trim_open, preserve) = match marker {
                    Some(b'-') => (true, false),
                    Some(b'+') => (false, true),
                    _ => (false, false),
                };

                let raw_text = &self.source[text_start..at];
                let text_end = if trim_open
                    || (self.config.lstrip_blocks && kind != TagKind::Expression && !preserve)
                {
                    text_start + clear_final_line_if_whitespace(raw_text).len()
                } else {
                    at
                };

                self.advance_to(at);
                let open_line = self.line;
                let open_column = self.column(at);
                let open_end = after + if trim_open || preserve { 1 } else { 0 };
                self.advance_to(open_end);

                let open_kind = match kind {
                    TagKind::Expression => TokenKind::ExpressionOpen,
                    TagKind::Statement => TokenKind::StatementOpen,
                    TagKind::Comment => TokenKind::CommentOpen,
                };
                let open_token = Token {
                    kind: open_kind,
                    span: Span::new(at, open_end, open_line, open_column),
                };
                self.state = State::Tag(kind);
                self.nesting = 0;
                self.operand = false;

                if text_end > text_start {
                    self.pending.push_back(open_token);
                    Ok(Token {
                        kind: TokenKind::Text,
                        span: Span::new(text_start, text_end, text_line, text_column),
                    })
                } else {
                    Ok(open_token)
                }
            }
            Some(Found::Line { at, prefix_start }) => {
                self.advance_to(prefix_start);
                let open_line = self.line;
                let open_column = self.column(prefix_start);
                let open_end = prefix_start + self.config.line_statement.len();
                self.advance_to(open_end);

                let open_token = Token {
                    kind: TokenKind::StatementOpen,
                    span: Span::new(prefix_start, open_end, open_line, open_column),
                };
                self.state = State::LineStatement;
                self.nesting = 0;
                self.operand = false;

                if at > text_start {
                    self.pending.push_back(open_token);
                    Ok(Token {
                        kind: TokenKind::Text,
                        span: Span::new(text_start, at, text_line, text_column),
                    })
                } else {
                    Ok(open_token)
                }
            }
        }
    }

    // ---- comment mode ----

    fn comment_close_token(&mut self) -> Result<Token, Error> {
        let close = &self.config.comment_close;
        let bytes = self.source.as_bytes();
        let mut p = self.pos;
        while p < bytes.len() {
            if self.starts_with_at(p, close) {
                let trim = p > self.pos && bytes[p - 1] == b'-';
                let tok_start = if trim { p - 1 } else { p };
                self.advance_to(tok_start);
                let line = self.line;
                let column = self.column(tok_start);
                self.advance_to(p + close.len());
                let token = Token {
                    kind: TokenKind::CommentClose,
                    span: self.span_from(tok_start, line, column),
                };
                if trim {
                    self.skip_whitespace_and_newlines();
                } else if self.config.trim_blocks {
                    self.skip_whitespace_and_first_newline();
                }
                self.state = State::Text;
                return Ok(token);
            }
            p += 1;
        }
        self.advance_to(self.source.len());
        Err(Error::parser(
            "expected comment close, got '<eof>'",
            Span::new(self.pos, self.pos, self.line, self.column(self.pos)),
        ))
    }

    // ---- tag mode ----

    fn tag_token(&mut self, kind: TagKind) -> Result<Token, Error> {
        // whitespace inside tags is insignificant, newlines included
        while let Some(b) = self.peek_byte() {
            if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' {
                self.advance_to(self.pos + 1);
            } else {
                break;
            }
        }
        if self.pos >= self.source.len() {
            return Ok(self.eof_token());
        }
        if self.nesting == 0 {
            if let Some(token) = self.try_close(kind) {
                return Ok(token);
            }
        }
        self.body_token()
    }

    fn try_close(&mut self, kind: TagKind) -> Option<Token> {
        let (close, close_kind) = match kind {
            TagKind::Expression => (&self.config.expression_close, TokenKind::ExpressionClose),
            TagKind::Statement => (&self.config.statement_close, TokenKind::StatementClose),
            TagKind::Comment => (&self.config.comment_close, TokenKind::CommentClose),
        };
        let close = close.clone();

        let trim = self.peek_byte() == Some(b'-') && self.starts_with_at(self.pos + 1, &close);
        if !trim && !self.starts_with_at(self.pos, &close) {
            return None;
        }

        let start = self.pos;
        let line = self.line;
        let column = self.column(start);
        let end = start + close.len() + if trim { 1 } else { 0 };
        self.advance_to(end);
        let token = Token {
            kind: close_kind,
            span: self.span_from(start, line, column),
        };

        if trim {
            self.skip_whitespace_and_newlines();
        } else if self.config.trim_blocks && kind != TagKind::Expression {
            self.skip_whitespace_and_first_newline();
        }
        self.state = State::Text;
        Some(token)
    }

    // ---- line statement mode ----

    fn line_statement_token(&mut self) -> Result<Token, Error> {
        while let Some(b) = self.peek_byte() {
            if b == b' ' || b == b'\t' || b == b'\r' {
                self.advance_to(self.pos + 1);
            } else {
                break;
            }
        }
        match self.peek_byte() {
            None | Some(b'\n') => {
                let start = self.pos;
                let line = self.line;
                let column = self.column(start);
                if self.peek_byte() == Some(b'\n') {
                    self.advance_to(self.pos + 1);
                }
                self.state = State::Text;
                Ok(Token {
                    kind: TokenKind::StatementClose,
                    span: self.span_from(start, line, column),
                })
            }
            Some(_) => self.body_token(),
        }
    }

    // ---- shared tag-body lexing ----

    fn body_token(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let line = self.line;
        let column = self.column(start);
        let bytes = self.source.as_bytes();
        let b = bytes[start];

        let kind = match b {
            b'"' | b'\'' => return self.string_literal(b as char),
            b'0'..=b'9' => return self.number(),
            b'-' => {
                if !self.operand && bytes.get(start + 1).is_some_and(|c| c.is_ascii_digit()) {
                    return self.number();
                }
                self.advance_to(start + 1);
                TokenKind::Minus
            }
            b'+' => {
                self.advance_to(start + 1);
                TokenKind::Plus
            }
            b'*' => {
                self.advance_to(start + 1);
                TokenKind::Star
            }
            b'/' => {
                self.advance_to(start + 1);
                TokenKind::Slash
            }
            b'%' => {
                self.advance_to(start + 1);
                TokenKind::Percent
            }
            b'=' => {
                if bytes.get(start + 1) == Some(&b'=') {
                    self.advance_to(start + 2);
                    TokenKind::Eq
                } else {
                    self.advance_to(start + 1);
                    TokenKind::Assign
                }
            }
            b'!' => {
                if bytes.get(start + 1) == Some(&b'=') {
                    self.advance_to(start + 2);
                    TokenKind::NotEq
                } else {
                    self.advance_to(start + 1);
                    return Err(Error::parser(
                        "unexpected character '!'",
                        self.span_from(start, line, column),
                    ));
                }
            }
            b'<' => {
                if bytes.get(start + 1) == Some(&b'=') {
                    self.advance_to(start + 2);
                    TokenKind::LtEq
                } else {
                    self.advance_to(start + 1);
                    TokenKind::Lt
                }
            }
            b'>' => {
                if bytes.get(start + 1) == Some(&b'=') {
                    self.advance_to(start + 2);
                    TokenKind::GtEq
                } else {
                    self.advance_to(start + 1);
                    TokenKind::Gt
                }
            }
            b'|' => {
                self.advance_to(start + 1);
                TokenKind::Pipe
            }
            b'(' => {
                self.nesting += 1;
                self.advance_to(start + 1);
                TokenKind::LParen
            }
            b')' => {
                self.nesting = self.nesting.saturating_sub(1);
                self.advance_to(start + 1);
                TokenKind::RParen
            }
            b'[' => {
                self.nesting += 1;
                self.advance_to(start + 1);
                TokenKind::LBracket
            }
            b']' => {
                self.nesting = self.nesting.saturating_sub(1);
                self.advance_to(start + 1);
                TokenKind::RBracket
            }
            b'{' => {
                self.nesting += 1;
                self.advance_to(start + 1);
                TokenKind::LBrace
            }
            b'}' => {
                self.nesting = self.nesting.saturating_sub(1);
                self.advance_to(start + 1);
                TokenKind::RBrace
            }
            b',' => {
                self.advance_to(start + 1);
                TokenKind::Comma
            }
            b':' => {
                self.advance_to(start + 1);
                TokenKind::Colon
            }
            b'.' => {
                self.advance_to(start + 1);
                TokenKind::Dot
            }
            b if is_ident_leader(b) => return self.identifier(),
            _ => {
                let c = self.source[start..].chars().next().unwrap_or('?');
                self.advance_to(start + c.len_utf8());
                return Err(Error::parser(
                    format!("unexpected character '{c}'"),
                    self.span_from(start, line, column),
                ));
            }
        };

        self.operand = matches!(
            kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        );
        Ok(Token {
            kind,
            span: self.span_from(start, line, column),
        })
    }

    fn identifier(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let line = self.line;
        let column = self.column(start);
        let bytes = self.source.as_bytes();
        let mut p = start + 1;
        while p < bytes.len() && is_ident_char(bytes[p]) {
            p += 1;
        }
        // dotted path extensions: `.segment` or `.N`
        let mut dotted = false;
        while p < bytes.len()
            && bytes[p] == b'.'
            && bytes
                .get(p + 1)
                .is_some_and(|&b| is_ident_char(b))
        {
            dotted = true;
            p += 2;
            while p < bytes.len() && is_ident_char(bytes[p]) {
                p += 1;
            }
        }
        self.advance_to(p);
        let lexeme = &self.source[start..p];

        let kind = if !dotted {
            TokenKind::from_keyword(lexeme).unwrap_or_else(|| TokenKind::Identifier(lexeme.to_string()))
        } else {
            TokenKind::Identifier(lexeme.to_string())
        };
        self.operand = matches!(
            kind,
            TokenKind::Identifier(_) | TokenKind::True | TokenKind::False | TokenKind::Null
        );
        Ok(Token {
            kind,
            span: self.span_from(start, line, column),
        })
    }

    fn number(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let line = self.line;
        let column = self.column(start);
        let bytes = self.source.as_bytes();
        let mut p = start;
        if bytes[p] == b'-' {
            p += 1;
        }
        while p < bytes.len() && bytes[p].is_ascii_digit() {
            p += 1;
        }
        let mut is_float = false;
        if p < bytes.len()
            && bytes[p] == b'.'
            && bytes.get(p + 1).is_some_and(|b| b.is_ascii_digit())
        {
            is_float = true;
            p += 1;
            while p < bytes.len() && bytes[p].is_ascii_digit() {
                p += 1;
            }
        }
        if p < bytes.len() && (bytes[p] == b'e' || bytes[p] == b'E') {
            let mut q = p + 1;
            if q < bytes.len() && (bytes[q] == b'+' || bytes[q] == b'-') {
                q += 1;
            }
            if q < bytes.len() && bytes[q].is_ascii_digit() {
                is_float = true;
                p = q;
                while p < bytes.len() && bytes[p].is_ascii_digit() {
                    p += 1;
                }
            }
        }
        self.advance_to(p);
        let lexeme = &self.source[start..p];

        let kind = if is_float {
            TokenKind::Float(lexeme.parse::<f64>().unwrap_or(0.0))
        } else if let Ok(i) = lexeme.parse::<i64>() {
            TokenKind::Int(i)
        } else if let Ok(u) = lexeme.parse::<u64>() {
            TokenKind::UInt(u)
        } else {
            TokenKind::Float(lexeme.parse::<f64>().unwrap_or(0.0))
        };
        self.operand = true;
        Ok(Token {
            kind,
            span: self.span_from(start, line, column),
        })
    }

    fn string_literal(&mut self, quote: char) -> Result<Token, Error> {
        let start = self.pos;
        let line = self.line;
        let column = self.column(start);
        self.advance_to(start + 1);

        let mut value = String::new();
        loop {
            let Some(c) = self.source[self.pos..].chars().next() else {
                return Err(Error::parser(
                    "unterminated string literal",
                    self.span_from(start, line, column),
                ));
            };
            if c == quote {
                self.advance_to(self.pos + 1);
                break;
            }
            if c == '\\' {
                self.advance_to(self.pos + 1);
                let Some(escaped) = self.source[self.pos..].chars().next() else {
                    return Err(Error::parser(
                        "unterminated string literal",
                        self.span_from(start, line, column),
                    ));
                };
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '\\' => value.push('\\'),
                    '"' => value.push('"'),
                    '\'' => value.push('\''),
                    other => value.push(other),
                }
                self.advance_to(self.pos + escaped.len_utf8());
            } else {
                value.push(c);
                self.advance_to(self.pos + c.len_utf8());
            }
        }

        self.operand = true;
        Ok(Token {
            kind: TokenKind::Str(value),
            span: self.span_from(start, line, column),
        })
    }

    // ---- whitespace control after close delimiters ----

    fn skip_whitespace_and_newlines(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.advance_to(self.pos + 1);
            } else {
                break;
            }
        }
    }

    fn skip_whitespace_and_first_newline(&mut self) {
        let bytes = self.source.as_bytes();
        let mut p = self.pos;
        while p < bytes.len() && (bytes[p] == b' ' || bytes[p] == b'\t') {
            p += 1;
        }
        if p >= bytes.len() {
            // trailing whitespace at end of input stays
            return;
        }
        self.advance_to(p);
        if self.peek_byte() == Some(b'\r') {
            self.advance_to(self.pos + 1);
        }
        if self.peek_byte() == Some(b'\n') {
            self.advance_to(self.pos + 1);
        }
    }

    /// Scans a raw block body: everything up to the first statement opener
    /// whose keyword is `endraw`. Raw blocks do not nest. Returns the body
    /// span and its text (with left-trim rules applied at the tail), leaving
    /// the cursor at the `endraw` opener; `None` if no `endraw` follows.
    pub(crate) fn scan_raw_body(&mut self) -> Option<(Span, String)> {
        let body_start = self.pos;
        let body_line = self.line;
        let body_column = self.column(self.pos);
        let bytes = self.source.as_bytes();
        let open = self.config.statement_open.clone();

        let mut p = self.pos;
        while p < bytes.len() {
            if self.starts_with_at(p, &open) {
                let mut q = p + open.len();
                let marker = match bytes.get(q) {
                    Some(b'-') => {
                        q += 1;
                        Some(b'-')
                    }
                    Some(b'+') => {
                        q += 1;
                        Some(b'+')
                    }
                    _ => None,
                };
                while q < bytes.len() && bytes[q].is_ascii_whitespace() {
                    q += 1;
                }
                let id_start = q;
                while q < bytes.len() && is_ident_char(bytes[q]) {
                    q += 1;
                }
                if &self.source[id_start..q] == "endraw" {
                    let raw = &self.source[body_start..p];
                    let kept = if marker == Some(b'-')
                        || (self.config.lstrip_blocks && marker != Some(b'+'))
                    {
                        clear_final_line_if_whitespace(raw)
                    } else {
                        raw
                    };
                    let span = Span::new(
                        body_start,
                        body_start + kept.len(),
                        body_line,
                        body_column,
                    );
                    let text = kept.to_string();
                    self.advance_to(p);
                    return Some((span, text));
                }
            }
            p += 1;
        }
        None
    }
}
