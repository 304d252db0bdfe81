use crate::ast::{Expr, ExprKind};
use crate::error::Error;
use crate::token::{Span, TokenKind};
use crate::value::Value;

use super::Parser;

impl Parser<'_> {
    fn make_expr(&self, kind: ExprKind, start: Span, end: Span) -> Expr {
        Expr {
            kind,
            span: Span::new(start.start, end.end, start.line, start.column),
        }
    }

    /// Precedence ladder, low to high:
    /// `or`, `and`, prefix `not`, `in`, comparisons, `+ -`, `* / %`,
    /// unary `-`, `|` pipe, postfix subscript/member, atoms.
    pub(crate) fn expression(&mut self) -> Result<Expr, Error> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, Error> {
        let mut expr = self.and_expr()?;
        while let Some(op) = self.match_token(&[TokenKind::Or])? {
            let right = self.and_expr()?;
            let (start, end) = (expr.span, right.span);
            expr = self.make_expr(
                ExprKind::Logical(Box::new(expr), op.kind, Box::new(right)),
                start,
                end,
            );
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr, Error> {
        let mut expr = self.not_expr()?;
        while let Some(op) = self.match_token(&[TokenKind::And])? {
            let right = self.not_expr()?;
            let (start, end) = (expr.span, right.span);
            expr = self.make_expr(
                ExprKind::Logical(Box::new(expr), op.kind, Box::new(right)),
                start,
                end,
            );
        }
        Ok(expr)
    }

    fn not_expr(&mut self) -> Result<Expr, Error> {
        if let Some(op) = self.match_token(&[TokenKind::Not])? {
            let right = self.not_expr()?;
            let (start, end) = (op.span, right.span);
            return Ok(self.make_expr(ExprKind::Unary(op.kind, Box::new(right)), start, end));
        }
        self.in_expr()
    }

    fn in_expr(&mut self) -> Result<Expr, Error> {
        let mut expr = self.comparison()?;
        while let Some(op) = self.match_token(&[TokenKind::In])? {
            let right = self.comparison()?;
            let (start, end) = (expr.span, right.span);
            expr = self.make_expr(
                ExprKind::Binary(Box::new(expr), op.kind, Box::new(right)),
                start,
                end,
            );
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, Error> {
        let mut expr = self.additive()?;
        while let Some(op) = self.match_token(&[
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
        ])? {
            let right = self.additive()?;
            let (start, end) = (expr.span, right.span);
            expr = self.make_expr(
                ExprKind::Binary(Box::new(expr), op.kind, Box::new(right)),
                start,
                end,
            );
        }
        Ok(expr)
    }

    fn additive(&mut self) -> Result<Expr, Error> {
        let mut expr = self.multiplicative()?;
        while let Some(op) = self.match_token(&[TokenKind::Plus, TokenKind::Minus])? {
            let right = self.multiplicative()?;
            let (start, end) = (expr.span, right.span);
            expr = self.make_expr(
                ExprKind::Binary(Box::new(expr), op.kind, Box::new(right)),
                start,
                end,
            );
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr, Error> {
        let mut expr = self.unary()?;
        while let Some(op) =
            self.match_token(&[TokenKind::Star, TokenKind::Slash, TokenKind::Percent])?
        {
            let right = self.unary()?;
            let (start, end) = (expr.span, right.span);
            expr = self.make_expr(
                ExprKind::Binary(Box::new(expr), op.kind, Box::new(right)),
                start,
                end,
            );
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, Error> {
        if let Some(op) = self.match_token(&[TokenKind::Minus])? {
            let right = self.unary()?;
            let (start, end) = (op.span, right.span);
            return Ok(self.make_expr(ExprKind::Unary(op.kind, Box::new(right)), start, end));
        }
        self.pipe_expr()
    }

    /// `x | f(a)` is sugar for `f(x, a)`; chains associate left.
    fn pipe_expr(&mut self) -> Result<Expr, Error> {
        let mut expr = self.postfix()?;
        while self.match_token(&[TokenKind::Pipe])?.is_some() {
            let name_token = self.advance()?;
            let name = match name_token.kind {
                TokenKind::Identifier(name) if !name.contains('.') => name,
                other => {
                    return Err(Error::parser(
                        format!("expected identifier, got '{other}'"),
                        name_token.span,
                    ));
                }
            };
            let mut args = vec![expr];
            let mut end = name_token.span;
            if self.match_token(&[TokenKind::LParen])?.is_some() {
                end = self.call_arguments(&mut args)?;
            }
            let start = args[0].span;
            expr = self.make_expr(ExprKind::Call { name, args }, start, end);
        }
        Ok(expr)
    }

    fn postfix(&mut self) -> Result<Expr, Error> {
        let mut expr = self.primary()?;
        loop {
            if self.match_token(&[TokenKind::LBracket])?.is_some() {
                let index = self.expression()?;
                let close = self.advance()?;
                if !matches!(close.kind, TokenKind::RBracket) {
                    return Err(Error::parser(
                        format!("expected ']', got '{}'", close.kind),
                        close.span,
                    ));
                }
                let start = expr.span;
                expr = self.make_expr(
                    ExprKind::Index(Box::new(expr), Box::new(index)),
                    start,
                    close.span,
                );
            } else if self.check(&TokenKind::Dot) {
                self.advance()?;
                let member = self.advance()?;
                let segments = match &member.kind {
                    TokenKind::Identifier(name) => name.clone(),
                    TokenKind::Int(i) if *i >= 0 => i.to_string(),
                    other => {
                        return Err(Error::parser(
                            format!("expected identifier, got '{other}'"),
                            member.span,
                        ));
                    }
                };
                // the member may itself be a dotted path
                for segment in segments.split('.') {
                    let key = if segment.bytes().all(|b| b.is_ascii_digit()) {
                        Value::Int(segment.parse().unwrap_or(0))
                    } else {
                        Value::String(segment.to_string())
                    };
                    let start = expr.span;
                    let index = self.make_expr(ExprKind::Literal(key), member.span, member.span);
                    expr = self.make_expr(
                        ExprKind::Index(Box::new(expr), Box::new(index)),
                        start,
                        member.span,
                    );
                }
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, Error> {
        let token = self.advance()?;
        let span = token.span;
        match token.kind {
            TokenKind::True => Ok(self.make_expr(
                ExprKind::Literal(Value::Bool(true)),
                span,
                span,
            )),
            TokenKind::False => Ok(self.make_expr(
                ExprKind::Literal(Value::Bool(false)),
                span,
                span,
            )),
            TokenKind::Null => Ok(self.make_expr(ExprKind::Literal(Value::Null), span, span)),
            TokenKind::Int(i) => {
                Ok(self.make_expr(ExprKind::Literal(Value::Int(i)), span, span))
            }
            TokenKind::UInt(u) => {
                Ok(self.make_expr(ExprKind::Literal(Value::UInt(u)), span, span))
            }
            TokenKind::Float(f) => {
                Ok(self.make_expr(ExprKind::Literal(Value::Float(f)), span, span))
            }
            TokenKind::Str(s) => {
                Ok(self.make_expr(ExprKind::Literal(Value::String(s)), span, span))
            }
            TokenKind::Identifier(name) => {
                if self.check(&TokenKind::LParen) {
                    self.advance()?;
                    // `obj.foo(x)` is method-call sugar for `foo(obj, x)`
                    let (callee, mut args) = match name.rfind('.') {
                        Some(dot) => {
                            let receiver = self.make_expr(
                                ExprKind::Ident(name[..dot].to_string()),
                                span,
                                span,
                            );
                            (name[dot + 1..].to_string(), vec![receiver])
                        }
                        None => (name, Vec::new()),
                    };
                    let end = self.call_arguments(&mut args)?;
                    Ok(self.make_expr(ExprKind::Call { name: callee, args }, span, end))
                } else {
                    Ok(self.make_expr(ExprKind::Ident(name), span, span))
                }
            }
            TokenKind::LParen => {
                let expr = self.expression()?;
                let close = self.advance()?;
                if !matches!(close.kind, TokenKind::RParen) {
                    return Err(Error::parser(
                        format!("expected ')', got '{}'", close.kind),
                        close.span,
                    ));
                }
                Ok(expr)
            }
            TokenKind::LBracket => {
                let mut items = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        items.push(self.expression()?);
                        if self.match_token(&[TokenKind::Comma])?.is_none() {
                            break;
                        }
                        if self.check(&TokenKind::RBracket) {
                            break;
                        }
                    }
                }
                let close = self.advance()?;
                if !matches!(close.kind, TokenKind::RBracket) {
                    return Err(Error::parser(
                        format!("expected ']', got '{}'", close.kind),
                        close.span,
                    ));
                }
                Ok(self.make_expr(ExprKind::Array(items), span, close.span))
            }
            TokenKind::LBrace => {
                let mut entries = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    loop {
                        let key = self.expression()?;
                        let colon = self.advance()?;
                        if !matches!(colon.kind, TokenKind::Colon) {
                            return Err(Error::parser(
                                format!("expected ':', got '{}'", colon.kind),
                                colon.span,
                            ));
                        }
                        let value = self.expression()?;
                        entries.push((key, value));
                        if self.match_token(&[TokenKind::Comma])?.is_none() {
                            break;
                        }
                        if self.check(&TokenKind::RBrace) {
                            break;
                        }
                    }
                }
                let close = self.advance()?;
                if !matches!(close.kind, TokenKind::RBrace) {
                    return Err(Error::parser(
                        format!("expected '}}', got '{}'", close.kind),
                        close.span,
                    ));
                }
                Ok(self.make_expr(ExprKind::Object(entries), span, close.span))
            }
            TokenKind::Eof => Err(Error::parser(
                "expected expression close, got '<eof>'",
                span,
            )),
            other => Err(Error::parser(
                format!("unexpected token '{other}'"),
                span,
            )),
        }
    }

    /// Parses the remainder of an argument list, the opening paren already
    /// consumed. Arguments are appended to `args`; returns the span of the
    /// closing paren.
    fn call_arguments(&mut self, args: &mut Vec<Expr>) -> Result<Span, Error> {
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if self.match_token(&[TokenKind::Comma])?.is_none() {
                    break;
                }
                if self.check(&TokenKind::RParen) {
                    break;
                }
            }
        }
        let close = self.advance()?;
        if !matches!(close.kind, TokenKind::RParen) {
            return Err(Error::parser(
                format!("expected ')', got '{}'", close.kind),
                close.span,
            ));
        }
        Ok(close.span)
    }
}
