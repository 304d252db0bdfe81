use std::collections::HashMap;

use crate::value::Value;

mod arrays;
mod collections;
mod numbers;
mod strings;

pub use arrays::register_array_functions;

/// Builtin operators share the callback calling convention: positional
/// arguments in, a new value out. Errors surface as render-time type errors
/// at the call site.
pub(crate) type BuiltinFn = fn(&[Value]) -> Result<Value, String>;

/// The operator table every environment starts with, keyed by name and
/// arity. User callbacks are consulted first, so these can be shadowed.
pub(crate) fn operator_table() -> HashMap<(String, usize), BuiltinFn> {
    let mut table = HashMap::new();
    for (name, arity, f) in strings::operators() {
        table.insert((name.to_string(), arity), f);
    }
    for (name, arity, f) in collections::operators() {
        table.insert((name.to_string(), arity), f);
    }
    for (name, arity, f) in numbers::operators() {
        table.insert((name.to_string(), arity), f);
    }
    table
}

pub(crate) fn expect_str<'a>(args: &'a [Value], index: usize, name: &str) -> Result<&'a str, String> {
    args[index]
        .as_str()
        .ok_or_else(|| format!("{name}: expected a string, got {}", args[index].type_name()))
}

pub(crate) fn expect_array<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
) -> Result<&'a Vec<Value>, String> {
    args[index]
        .as_array()
        .ok_or_else(|| format!("{name}: expected an array, got {}", args[index].type_name()))
}

pub(crate) fn expect_f64(args: &[Value], index: usize, name: &str) -> Result<f64, String> {
    args[index]
        .as_f64()
        .ok_or_else(|| format!("{name}: expected a number, got {}", args[index].type_name()))
}

pub(crate) fn expect_int(args: &[Value], index: usize, name: &str) -> Result<i64, String> {
    match &args[index] {
        Value::Int(i) => Ok(*i),
        Value::UInt(u) => Ok(*u as i64),
        other => Err(format!(
            "{name}: expected an integer, got {}",
            other.type_name()
        )),
    }
}
