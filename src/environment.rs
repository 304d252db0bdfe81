use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::ast::Template;
use crate::builtins::{self, BuiltinFn};
use crate::error::{Diagnostic, Error};
use crate::lexer::SyntaxConfig;
use crate::parser::Parser;
use crate::renderer::Renderer;
use crate::value::Value;

/// User callback: positional arguments in, a new value out. Registered per
/// arity, so several signatures may coexist under one name.
pub type CallbackFn = Arc<dyn Fn(&[Value]) -> Result<Value, String> + Send + Sync>;

/// Include resolver consulted at parse time when a template name is neither
/// registered nor readable from disk. Returns the template *source* for the
/// requested name.
pub type IncludeCallback = Arc<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// Public engine façade: delimiter configuration, callback and template
/// registries, parse/render entry points, and the graceful-mode diagnostic
/// buffer of the last render.
///
/// One environment must not be shared between concurrent renders; clone it
/// instead. Registries and parsed templates are `Arc`-shared, so clones are
/// cheap.
#[derive(Clone)]
pub struct Environment {
    syntax: SyntaxConfig,
    graceful_errors: bool,
    callbacks: HashMap<(String, usize), CallbackFn>,
    operators: HashMap<(String, usize), BuiltinFn>,
    templates: HashMap<String, Arc<Template>>,
    search_included_templates_in_files: bool,
    include_callback: Option<IncludeCallback>,
    render_errors: Vec<Diagnostic>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            syntax: SyntaxConfig::default(),
            graceful_errors: false,
            callbacks: HashMap::new(),
            operators: builtins::operator_table(),
            templates: HashMap::new(),
            search_included_templates_in_files: true,
            include_callback: None,
            render_errors: Vec::new(),
        }
    }

    // ---- configuration ----

    pub fn set_expression(&mut self, open: &str, close: &str) {
        self.syntax.expression_open = open.to_string();
        self.syntax.expression_close = close.to_string();
    }

    pub fn set_statement(&mut self, open: &str, close: &str) {
        self.syntax.statement_open = open.to_string();
        self.syntax.statement_close = close.to_string();
    }

    pub fn set_comment(&mut self, open: &str, close: &str) {
        self.syntax.comment_open = open.to_string();
        self.syntax.comment_close = close.to_string();
    }

    pub fn set_line_statement(&mut self, prefix: &str) {
        self.syntax.line_statement = prefix.to_string();
    }

    pub fn set_lstrip_blocks(&mut self, lstrip_blocks: bool) {
        self.syntax.lstrip_blocks = lstrip_blocks;
    }

    pub fn set_trim_blocks(&mut self, trim_blocks: bool) {
        self.syntax.trim_blocks = trim_blocks;
    }

    pub fn set_graceful_errors(&mut self, graceful: bool) {
        self.graceful_errors = graceful;
    }

    pub fn set_search_included_templates_in_files(&mut self, search: bool) {
        self.search_included_templates_in_files = search;
    }

    pub fn set_include_callback<F>(&mut self, callback: F)
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        self.include_callback = Some(Arc::new(callback));
    }

    pub fn add_callback<F>(&mut self, name: &str, arity: usize, callback: F)
    where
        F: Fn(&[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.callbacks
            .insert((name.to_string(), arity), Arc::new(callback));
    }

    pub fn include_template(&mut self, name: &str, template: Template) {
        self.templates.insert(name.to_string(), Arc::new(template));
    }

    // ---- parse and render ----

    pub fn parse(&self, source: &str) -> Result<Template, Error> {
        log::debug!("parsing template ({} bytes)", source.len());
        Parser::new(self, source)?.parse()
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Template, Error> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|_| {
            Error::file(format!("failed accessing file at '{}'", path.display()))
        })?;
        self.parse(&source)
    }

    pub fn render(&mut self, source: &str, data: &Value) -> Result<String, Error> {
        let template = self.parse(source)?;
        self.render_template(&template, data)
    }

    pub fn render_template(&mut self, template: &Template, data: &Value) -> Result<String, Error> {
        self.render_errors.clear();
        let (result, diagnostics) = Renderer::new(self, data).render(template);
        if !diagnostics.is_empty() {
            log::debug!("render recovered {} failure(s)", diagnostics.len());
        }
        self.render_errors = diagnostics;
        result
    }

    pub fn render_file(&mut self, path: impl AsRef<Path>, data: &Value) -> Result<String, Error> {
        let template = self.parse_file(path)?;
        self.render_template(&template, data)
    }

    // ---- diagnostics ----

    pub fn get_last_render_errors(&self) -> &[Diagnostic] {
        &self.render_errors
    }

    pub fn clear_render_errors(&mut self) {
        self.render_errors.clear();
    }

    // ---- crate-internal accessors ----

    pub(crate) fn syntax(&self) -> &SyntaxConfig {
        &self.syntax
    }

    pub(crate) fn graceful_errors(&self) -> bool {
        self.graceful_errors
    }

    pub(crate) fn callback(&self, name: &str, arity: usize) -> Option<CallbackFn> {
        self.callbacks.get(&(name.to_string(), arity)).cloned()
    }

    pub(crate) fn operator(&self, name: &str, arity: usize) -> Option<BuiltinFn> {
        self.operators.get(&(name.to_string(), arity)).copied()
    }

    pub(crate) fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub(crate) fn template(&self, name: &str) -> Option<Arc<Template>> {
        self.templates.get(name).cloned()
    }

    pub(crate) fn search_included_templates_in_files(&self) -> bool {
        self.search_included_templates_in_files
    }

    pub(crate) fn include_callback(&self) -> Option<IncludeCallback> {
        self.include_callback.clone()
    }
}
