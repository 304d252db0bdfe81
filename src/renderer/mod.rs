use crate::ast::{IncludeRef, Stmt, StmtKind, Template};
use crate::environment::Environment;
use crate::error::{Diagnostic, Error, RenderFailure};
use crate::parser::MAX_INCLUDE_DEPTH;
use crate::value::Value;

mod context;
mod eval;
mod ops;

use context::ContextStack;
use eval::evaluate;

/// Tree walk over a parsed template: expression evaluation against the
/// context stack, statement execution, include resolution, and graceful
/// diagnostic recording.
pub(crate) struct Renderer<'a> {
    env: &'a Environment,
    ctx: ContextStack<'a>,
    output: String,
    diagnostics: Vec<Diagnostic>,
    include_depth: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(env: &'a Environment, data: &'a Value) -> Self {
        Renderer {
            env,
            ctx: ContextStack::new(data),
            output: String::new(),
            diagnostics: Vec::new(),
            include_depth: 0,
        }
    }

    pub fn render(mut self, template: &Template) -> (Result<String, Error>, Vec<Diagnostic>) {
        let result = self.walk(&template.nodes, &template.source);
        match result {
            Ok(()) => (Ok(self.output), self.diagnostics),
            Err(error) => (Err(error), self.diagnostics),
        }
    }

    fn walk(&mut self, nodes: &[Stmt], source: &str) -> Result<(), Error> {
        for node in nodes {
            self.execute(node, source)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt, source: &str) -> Result<(), Error> {
        match &stmt.kind {
            StmtKind::Text(text) => {
                self.output.push_str(text);
                Ok(())
            }
            StmtKind::Raw(text) => {
                self.output.push_str(text);
                Ok(())
            }
            StmtKind::Output { expr, original } => {
                let Some(expr) = expr else {
                    return Err(Error::render("empty expression", stmt.span.location()));
                };
                match evaluate(self, expr) {
                    Ok(value) => {
                        value.render_to(&mut self.output);
                        Ok(())
                    }
                    Err(failure) if self.recoverable(&failure) => {
                        // substitute the tag's verbatim source text
                        self.output.push_str(original);
                        self.record(failure, original.clone());
                        Ok(())
                    }
                    Err(failure) => Err(failure.into_error()),
                }
            }
            StmtKind::If {
                branches,
                else_body,
            } => {
                for (cond, branch_body) in branches {
                    match evaluate(self, cond) {
                        Ok(value) if value.is_truthy() => {
                            return self.walk(branch_body, source);
                        }
                        Ok(_) => {}
                        Err(failure) if self.recoverable(&failure) => {
                            // a failing condition behaves as false
                            let original = snippet(source, &failure);
                            self.record(failure, original);
                        }
                        Err(failure) => return Err(failure.into_error()),
                    }
                }
                if let Some(body) = else_body {
                    return self.walk(body, source);
                }
                Ok(())
            }
            StmtKind::For {
                vars,
                iterable,
                body,
            } => {
                let value = match evaluate(self, iterable) {
                    Ok(value) => value,
                    Err(failure) if self.recoverable(&failure) => {
                        // a failing iterable yields zero iterations
                        let original = snippet(source, &failure);
                        self.record(failure, original);
                        return Ok(());
                    }
                    Err(failure) => return Err(failure.into_error()),
                };
                self.run_loop(vars, value, body, source, iterable.span)
            }
            StmtKind::Set { path, value } => {
                match evaluate(self, value) {
                    Ok(value) => {
                        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                        self.ctx.set(&segments, value);
                        Ok(())
                    }
                    Err(failure) if self.recoverable(&failure) => {
                        let original = snippet(source, &failure);
                        self.record(failure, original);
                        Ok(())
                    }
                    Err(failure) => Err(failure.into_error()),
                }
            }
            StmtKind::Include(include) => {
                if self.include_depth >= MAX_INCLUDE_DEPTH {
                    return Err(Error::render(
                        "include depth exceeded",
                        stmt.span.location(),
                    ));
                }
                let template = match include {
                    IncludeRef::Inline(template) => template.clone(),
                    IncludeRef::Registered(name) => match self.env.template(name) {
                        Some(template) => template,
                        None => {
                            return Err(Error::render(
                                format!("include '{name}' not found"),
                                stmt.span.location(),
                            ));
                        }
                    },
                };
                self.include_depth += 1;
                // includes share the current context stack
                let result = self.walk(&template.nodes, &template.source);
                self.include_depth -= 1;
                result
            }
        }
    }

    fn run_loop(
        &mut self,
        vars: &[String],
        value: Value,
        body: &[Stmt],
        source: &str,
        span: crate::token::Span,
    ) -> Result<(), Error> {
        enum Entries {
            Array(Vec<Value>),
            Object(Vec<(String, Value)>),
        }

        let entries = match value {
            Value::Array(items) => Entries::Array(items),
            Value::Object(map) if vars.len() == 2 => {
                Entries::Object(map.into_iter().collect())
            }
            other => {
                let failure = RenderFailure::new(
                    crate::error::DiagnosticKind::TypeError,
                    format!("{} is not iterable", other.type_name()),
                    span,
                );
                if self.recoverable(&failure) {
                    let original = snippet(source, &failure);
                    self.record(failure, original);
                    return Ok(());
                }
                return Err(failure.into_error());
            }
        };

        let len = match &entries {
            Entries::Array(items) => items.len(),
            Entries::Object(pairs) => pairs.len(),
        };

        self.ctx.push_frame(len);
        let result = (|| -> Result<(), Error> {
            match entries {
                Entries::Array(items) => {
                    for (index, item) in items.into_iter().enumerate() {
                        self.ctx.set_frame_index(index);
                        self.ctx.push_scope();
                        if vars.len() == 2 {
                            self.ctx.define(&vars[0], Value::Int(index as i64));
                            self.ctx.define(&vars[1], item);
                        } else {
                            self.ctx.define(&vars[0], item);
                        }
                        let step = self.walk(body, source);
                        self.ctx.pop_scope();
                        step?;
                    }
                }
                Entries::Object(pairs) => {
                    for (index, (key, item)) in pairs.into_iter().enumerate() {
                        self.ctx.set_frame_index(index);
                        self.ctx.push_scope();
                        self.ctx.define(&vars[0], Value::String(key));
                        self.ctx.define(&vars[1], item);
                        let step = self.walk(body, source);
                        self.ctx.pop_scope();
                        step?;
                    }
                }
            }
            Ok(())
        })();
        self.ctx.pop_frame();
        result
    }

    fn recoverable(&self, failure: &RenderFailure) -> bool {
        self.env.graceful_errors() && failure.recoverable
    }

    fn record(&mut self, failure: RenderFailure, original_text: String) {
        log::debug!(
            "graceful recovery at {}:{}: {}",
            failure.span.line,
            failure.span.column,
            failure.message
        );
        self.diagnostics.push(Diagnostic {
            kind: failure.kind,
            message: failure.message,
            original_text,
            location: failure.span.location(),
        });
    }
}

/// Original text of the offending token, for diagnostics that do not
/// substitute a whole tag.
fn snippet(source: &str, failure: &RenderFailure) -> String {
    source
        .get(failure.span.start..failure.span.end)
        .unwrap_or("")
        .to_string()
}

