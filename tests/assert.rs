#![allow(dead_code)]

use grimoire::{Diagnostic, Environment, Value};

/// Renders with a fresh default environment, panicking on failure.
pub fn render(template: &str, data: &serde_json::Value) -> String {
    let mut env = Environment::new();
    match env.render(template, &Value::from(data)) {
        Ok(output) => output,
        Err(error) => panic!("render failed.\nTemplate: {template:?}\nError: {error}"),
    }
}

/// Renders with a fresh default environment and returns the formatted error
/// message, panicking if the render unexpectedly succeeds.
pub fn render_err(template: &str, data: &serde_json::Value) -> String {
    let mut env = Environment::new();
    match env.render(template, &Value::from(data)) {
        Ok(output) => panic!(
            "expected render to fail, but it produced {output:?}.\nTemplate: {template:?}"
        ),
        Err(error) => error.to_string(),
    }
}

/// Parses with a fresh default environment and returns the formatted error
/// message, panicking if the parse unexpectedly succeeds.
pub fn parse_err(template: &str) -> String {
    let env = Environment::new();
    match env.parse(template) {
        Ok(_) => panic!("expected parse to fail.\nTemplate: {template:?}"),
        Err(error) => error.to_string(),
    }
}

/// Renders in graceful mode, returning the output and recorded diagnostics.
pub fn render_graceful(template: &str, data: &serde_json::Value) -> (String, Vec<Diagnostic>) {
    let mut env = Environment::new();
    env.set_graceful_errors(true);
    let output = match env.render(template, &Value::from(data)) {
        Ok(output) => output,
        Err(error) => panic!(
            "graceful render failed.\nTemplate: {template:?}\nError: {error}"
        ),
    };
    let diagnostics = env.get_last_render_errors().to_vec();
    (output, diagnostics)
}
