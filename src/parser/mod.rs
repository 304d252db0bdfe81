use core::mem;

use crate::ast::{Stmt, StmtKind, Template};
use crate::environment::Environment;
use crate::error::Error;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

mod expr;
mod stmt;

pub(crate) use stmt::OpenBlock;

/// Bound on nested includes, both while resolving them at parse time and
/// while rendering registered ones. Recursive includes hit this instead of
/// overflowing the stack.
pub(crate) const MAX_INCLUDE_DEPTH: usize = 64;

/// Recursive-descent statement driver over the streaming lexer, with a
/// Pratt expression parser (`expr.rs`) and the statement grammar
/// (`stmt.rs`) hanging off it.
pub struct Parser<'a> {
    pub(crate) lexer: Lexer<'a>,
    pub(crate) env: &'a Environment,
    pub(crate) source: &'a str,
    pub(crate) current: Token,
    pub(crate) include_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(env: &'a Environment, source: &'a str) -> Result<Self, Error> {
        Parser::with_depth(env, source, 0)
    }

    pub(crate) fn with_depth(
        env: &'a Environment,
        source: &'a str,
        include_depth: usize,
    ) -> Result<Self, Error> {
        let mut lexer = Lexer::new(source, env.syntax());
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            env,
            source,
            current,
            include_depth,
        })
    }

    pub(crate) fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current.kind) == mem::discriminant(kind)
    }

    pub(crate) fn match_token(&mut self, kinds: &[TokenKind]) -> Result<Option<Token>, Error> {
        for kind in kinds {
            if self.check(kind) {
                return Ok(Some(self.advance()?));
            }
        }
        Ok(None)
    }

    pub(crate) fn expect_statement_close(&mut self) -> Result<Token, Error> {
        if self.check(&TokenKind::StatementClose) {
            self.advance()
        } else {
            Err(Error::parser(
                format!("expected statement close, got '{}'", self.current.kind),
                self.current.span,
            ))
        }
    }

    pub(crate) fn expect_expression_close(&mut self) -> Result<Token, Error> {
        if self.check(&TokenKind::ExpressionClose) {
            self.advance()
        } else {
            Err(Error::parser(
                format!("expected expression close, got '{}'", self.current.kind),
                self.current.span,
            ))
        }
    }

    pub fn parse(mut self) -> Result<Template, Error> {
        let mut body: Vec<Stmt> = Vec::new();
        let mut blocks: Vec<OpenBlock> = Vec::new();

        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::Eof => {
                    if let Some(block) = blocks.last() {
                        return Err(Error::parser(block.unmatched_message(), token.span));
                    }
                    return Ok(Template {
                        nodes: body,
                        source: self.source.to_string(),
                    });
                }
                TokenKind::Text => {
                    let text = self.source[token.span.start..token.span.end].to_string();
                    body.push(Stmt {
                        kind: StmtKind::Text(text),
                        span: token.span,
                    });
                }
                TokenKind::CommentOpen => {
                    // the lexer has already skipped the comment body
                    if !self.check(&TokenKind::CommentClose) {
                        return Err(Error::parser(
                            format!("expected comment close, got '{}'", self.current.kind),
                            self.current.span,
                        ));
                    }
                    self.advance()?;
                }
                TokenKind::ExpressionOpen => {
                    let stmt = self.output_tag(token.span)?;
                    body.push(stmt);
                }
                TokenKind::StatementOpen => {
                    self.statement_tag(token.span, &mut body, &mut blocks)?;
                }
                other => {
                    return Err(Error::parser(
                        format!("unexpected token '{other}'"),
                        token.span,
                    ));
                }
            }
        }
    }

    fn output_tag(&mut self, open_span: Span) -> Result<Stmt, Error> {
        let expr = if self.check(&TokenKind::ExpressionClose) {
            None
        } else {
            Some(self.expression()?)
        };
        let close = self.expect_expression_close()?;
        let span = Span::new(
            open_span.start,
            close.span.end,
            open_span.line,
            open_span.column,
        );
        let original = self.source[span.start..span.end].to_string();
        Ok(Stmt {
            kind: StmtKind::Output { expr, original },
            span,
        })
    }
}
