use crate::value::Value;

use super::{expect_array, expect_str, BuiltinFn};

pub(super) fn operators() -> Vec<(&'static str, usize, BuiltinFn)> {
    vec![
        ("upper", 1, upper),
        ("lower", 1, lower),
        ("replace", 3, replace),
        ("join", 2, join),
        ("split", 2, split),
        ("trim", 1, trim),
        ("capitalize", 1, capitalize),
    ]
}

fn upper(args: &[Value]) -> Result<Value, String> {
    Ok(Value::String(expect_str(args, 0, "upper")?.to_uppercase()))
}

fn lower(args: &[Value]) -> Result<Value, String> {
    Ok(Value::String(expect_str(args, 0, "lower")?.to_lowercase()))
}

fn replace(args: &[Value]) -> Result<Value, String> {
    let subject = expect_str(args, 0, "replace")?;
    let from = expect_str(args, 1, "replace")?;
    let to = expect_str(args, 2, "replace")?;
    Ok(Value::String(subject.replace(from, to)))
}

fn join(args: &[Value]) -> Result<Value, String> {
    let items = expect_array(args, 0, "join")?;
    let separator = expect_str(args, 1, "join")?;
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(&item.to_string());
    }
    Ok(Value::String(out))
}

fn split(args: &[Value]) -> Result<Value, String> {
    let subject = expect_str(args, 0, "split")?;
    let separator = expect_str(args, 1, "split")?;
    Ok(subject
        .split(separator)
        .map(Value::from)
        .collect::<Value>())
}

fn trim(args: &[Value]) -> Result<Value, String> {
    Ok(Value::String(expect_str(args, 0, "trim")?.trim().to_string()))
}

fn capitalize(args: &[Value]) -> Result<Value, String> {
    let subject = expect_str(args, 0, "capitalize")?;
    let mut chars = subject.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    };
    Ok(Value::String(capitalized))
}
