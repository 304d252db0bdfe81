use core::mem;
use std::sync::Arc;

use crate::ast::{Expr, IncludeRef, Stmt, StmtKind};
use crate::error::Error;
use crate::token::{Span, TokenKind};

use super::{Parser, MAX_INCLUDE_DEPTH};

/// Block statement currently being collected. `parent` holds the node list
/// the finished block is appended to once its terminator arrives.
pub(crate) enum OpenBlock {
    If {
        start: Span,
        branches: Vec<(Expr, Vec<Stmt>)>,
        cond: Option<Expr>,
        else_started: bool,
        parent: Vec<Stmt>,
    },
    For {
        start: Span,
        vars: Vec<String>,
        iterable: Expr,
        parent: Vec<Stmt>,
    },
}

impl OpenBlock {
    pub(crate) fn unmatched_message(&self) -> &'static str {
        match self {
            OpenBlock::If { .. } => "unmatched if",
            OpenBlock::For { .. } => "unmatched for",
        }
    }
}

impl Parser<'_> {
    pub(crate) fn statement_tag(
        &mut self,
        open_span: Span,
        body: &mut Vec<Stmt>,
        blocks: &mut Vec<OpenBlock>,
    ) -> Result<(), Error> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::If => {
                let cond = self.expression()?;
                self.expect_statement_close()?;
                blocks.push(OpenBlock::If {
                    start: open_span,
                    branches: Vec::new(),
                    cond: Some(cond),
                    else_started: false,
                    parent: mem::take(body),
                });
                Ok(())
            }
            TokenKind::Elif => {
                let cond = self.expression()?;
                self.expect_statement_close()?;
                self.next_branch(token.span, body, blocks, Some(cond))
            }
            TokenKind::Else => {
                // `else if <expr>` inside one tag behaves like `elif`
                if self.check(&TokenKind::If) {
                    self.advance()?;
                    let cond = self.expression()?;
                    self.expect_statement_close()?;
                    self.next_branch(token.span, body, blocks, Some(cond))
                } else {
                    self.expect_statement_close()?;
                    self.next_branch(token.span, body, blocks, None)
                }
            }
            TokenKind::EndIf => {
                let close = self.expect_statement_close()?;
                match blocks.pop() {
                    Some(OpenBlock::If {
                        start,
                        mut branches,
                        cond,
                        else_started,
                        parent,
                    }) => {
                        let finished = mem::replace(body, parent);
                        let else_body = if else_started {
                            Some(finished)
                        } else {
                            branches.push((cond.expect("open branch"), finished));
                            None
                        };
                        body.push(Stmt {
                            kind: StmtKind::If {
                                branches,
                                else_body,
                            },
                            span: Span::new(
                                start.start,
                                close.span.end,
                                start.line,
                                start.column,
                            ),
                        });
                        Ok(())
                    }
                    other => {
                        if let Some(block) = other {
                            blocks.push(block);
                        }
                        Err(Error::parser("endif without matching if", token.span))
                    }
                }
            }
            TokenKind::For => {
                let vars = self.loop_variables()?;
                if !self.check(&TokenKind::In) {
                    return Err(Error::parser(
                        format!("expected 'in', got '{}'", self.current.kind),
                        self.current.span,
                    ));
                }
                self.advance()?;
                let iterable = self.expression()?;
                self.expect_statement_close()?;
                blocks.push(OpenBlock::For {
                    start: open_span,
                    vars,
                    iterable,
                    parent: mem::take(body),
                });
                Ok(())
            }
            TokenKind::EndFor => {
                let close = self.expect_statement_close()?;
                match blocks.pop() {
                    Some(OpenBlock::For {
                        start,
                        vars,
                        iterable,
                        parent,
                    }) => {
                        let finished = mem::replace(body, parent);
                        body.push(Stmt {
                            kind: StmtKind::For {
                                vars,
                                iterable,
                                body: finished,
                            },
                            span: Span::new(
                                start.start,
                                close.span.end,
                                start.line,
                                start.column,
                            ),
                        });
                        Ok(())
                    }
                    other => {
                        if let Some(block) = other {
                            blocks.push(block);
                        }
                        Err(Error::parser("endfor without matching for", token.span))
                    }
                }
            }
            TokenKind::Set => {
                let target = self.advance()?;
                let path = match target.kind {
                    TokenKind::Identifier(name) => {
                        name.split('.').map(str::to_string).collect::<Vec<_>>()
                    }
                    other => {
                        return Err(Error::parser(
                            format!("expected identifier, got '{other}'"),
                            target.span,
                        ));
                    }
                };
                if self.match_token(&[TokenKind::Assign])?.is_none() {
                    return Err(Error::parser(
                        format!("expected '=', got '{}'", self.current.kind),
                        self.current.span,
                    ));
                }
                let value = self.expression()?;
                let close = self.expect_statement_close()?;
                body.push(Stmt {
                    kind: StmtKind::Set { path, value },
                    span: Span::new(
                        open_span.start,
                        close.span.end,
                        open_span.line,
                        open_span.column,
                    ),
                });
                Ok(())
            }
            TokenKind::Include => {
                let name_token = self.advance()?;
                let name = match name_token.kind {
                    TokenKind::Str(s) => s,
                    other => {
                        return Err(Error::parser(
                            format!("expected string, got '{other}'"),
                            name_token.span,
                        ));
                    }
                };
                let include = self.resolve_include(&name)?;
                let close = self.expect_statement_close()?;
                body.push(Stmt {
                    kind: StmtKind::Include(include),
                    span: Span::new(
                        open_span.start,
                        close.span.end,
                        open_span.line,
                        open_span.column,
                    ),
                });
                Ok(())
            }
            TokenKind::Raw => self.raw_block(open_span, body),
            TokenKind::EndRaw => {
                Err(Error::parser("endraw without matching raw", token.span))
            }
            other => Err(Error::parser(
                format!("expected statement, got '{other}'"),
                token.span,
            )),
        }
    }

    /// Moves the innermost `if` block to its next branch: `Some(cond)` for
    /// `elif` / `else if`, `None` for `else`.
    fn next_branch(
        &mut self,
        keyword_span: Span,
        body: &mut Vec<Stmt>,
        blocks: &mut [OpenBlock],
        next_cond: Option<Expr>,
    ) -> Result<(), Error> {
        let keyword = if next_cond.is_some() { "elif" } else { "else" };
        match blocks.last_mut() {
            Some(OpenBlock::If {
                branches,
                cond,
                else_started,
                ..
            }) if !*else_started => {
                branches.push((cond.take().expect("open branch"), mem::take(body)));
                match next_cond {
                    Some(c) => *cond = Some(c),
                    None => *else_started = true,
                }
                Ok(())
            }
            _ => Err(Error::parser(
                format!("{keyword} without matching if"),
                keyword_span,
            )),
        }
    }

    fn loop_variables(&mut self) -> Result<Vec<String>, Error> {
        let mut vars = Vec::new();
        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::Identifier(name) if !name.contains('.') => vars.push(name),
                other => {
                    return Err(Error::parser(
                        format!("expected identifier, got '{other}'"),
                        token.span,
                    ));
                }
            }
            if self.match_token(&[TokenKind::Comma])?.is_none() {
                return Ok(vars);
            }
        }
    }

    fn raw_block(&mut self, open_span: Span, body: &mut Vec<Stmt>) -> Result<(), Error> {
        if !self.check(&TokenKind::StatementClose) {
            return Err(Error::parser(
                format!("expected statement close, got '{}'", self.current.kind),
                self.current.span,
            ));
        }
        let close_span = self.current.span;

        // The close token is the lookahead, so the cursor sits at the start
        // of the raw body; scan it without tokenising.
        let Some((_, text)) = self.lexer.scan_raw_body() else {
            return Err(Error::parser("unmatched raw", close_span));
        };
        self.current = self.lexer.next_token()?;

        let open = self.advance()?;
        if !matches!(open.kind, TokenKind::StatementOpen) {
            return Err(Error::parser(
                format!("expected statement open, got '{}'", open.kind),
                open.span,
            ));
        }
        let keyword = self.advance()?;
        if !matches!(keyword.kind, TokenKind::EndRaw) {
            return Err(Error::parser(
                format!("expected 'endraw', got '{}'", keyword.kind),
                keyword.span,
            ));
        }
        let close = self.expect_statement_close()?;

        body.push(Stmt {
            kind: StmtKind::Raw(text),
            span: Span::new(
                open_span.start,
                close.span.end,
                open_span.line,
                open_span.column,
            ),
        });
        Ok(())
    }

    fn resolve_include(&self, name: &str) -> Result<IncludeRef, Error> {
        if self.env.has_template(name) {
            return Ok(IncludeRef::Registered(name.to_string()));
        }
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(Error::file(format!("include depth exceeded at '{name}'")));
        }
        if self.env.search_included_templates_in_files() {
            if let Ok(source) = std::fs::read_to_string(name) {
                let template =
                    Parser::with_depth(self.env, &source, self.include_depth + 1)?.parse()?;
                return Ok(IncludeRef::Inline(Arc::new(template)));
            }
        }
        if let Some(callback) = self.env.include_callback() {
            if let Ok(source) = callback.as_ref()(name) {
                let template =
                    Parser::with_depth(self.env, &source, self.include_depth + 1)?.parse()?;
                return Ok(IncludeRef::Inline(Arc::new(template)));
            }
        }
        Err(Error::file(format!("failed accessing file at '{name}'")))
    }
}
