use core::cmp::Ordering;

use crate::value::Value;

use super::{expect_array, expect_int, expect_str, BuiltinFn};

pub(super) fn operators() -> Vec<(&'static str, usize, BuiltinFn)> {
    vec![
        ("length", 1, length),
        ("sort", 1, sort),
        ("first", 1, first),
        ("last", 1, last),
        ("range", 1, range),
        ("at", 2, at),
        ("existsIn", 2, exists_in),
    ]
}

fn length(args: &[Value]) -> Result<Value, String> {
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        other => {
            return Err(format!(
                "length: expected a string, array or object, got {}",
                other.type_name()
            ));
        }
    };
    Ok(Value::Int(len as i64))
}

fn sort(args: &[Value]) -> Result<Value, String> {
    let mut items = expect_array(args, 0, "sort")?.clone();
    let mut incomparable = false;
    items.sort_by(|a, b| {
        a.partial_cmp(b).unwrap_or_else(|| {
            incomparable = true;
            Ordering::Equal
        })
    });
    if incomparable {
        return Err("sort: cannot compare array elements".to_string());
    }
    Ok(Value::Array(items))
}

fn first(args: &[Value]) -> Result<Value, String> {
    expect_array(args, 0, "first")?
        .first()
        .cloned()
        .ok_or_else(|| "first: empty array".to_string())
}

fn last(args: &[Value]) -> Result<Value, String> {
    expect_array(args, 0, "last")?
        .last()
        .cloned()
        .ok_or_else(|| "last: empty array".to_string())
}

fn range(args: &[Value]) -> Result<Value, String> {
    let count = expect_int(args, 0, "range")?;
    Ok((0..count.max(0)).map(Value::Int).collect())
}

/// Same semantics as the subscript operator: negative indices count from
/// the end of an array, object access is by string key.
fn at(args: &[Value]) -> Result<Value, String> {
    match (&args[0], &args[1]) {
        (Value::Array(items), index) if index.is_number() => {
            let raw = expect_int(args, 1, "at")?;
            let len = items.len() as i64;
            let effective = if raw < 0 { raw + len } else { raw };
            if effective < 0 || effective >= len {
                return Err(format!("index {raw} out of range"));
            }
            Ok(items[effective as usize].clone())
        }
        (Value::Object(map), Value::String(key)) => map
            .get(key)
            .cloned()
            .ok_or_else(|| format!("variable '{key}' not found")),
        (receiver, _) => Err(format!("at: cannot index into {}", receiver.type_name())),
    }
}

fn exists_in(args: &[Value]) -> Result<Value, String> {
    let map = args[0]
        .as_object()
        .ok_or_else(|| format!("existsIn: expected an object, got {}", args[0].type_name()))?;
    let key = expect_str(args, 1, "existsIn")?;
    Ok(Value::Bool(map.contains_key(key)))
}
