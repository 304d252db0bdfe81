use core::cmp::Ordering;

use crate::value::Value;

use super::{expect_array, expect_f64, expect_int, BuiltinFn};

pub(super) fn operators() -> Vec<(&'static str, usize, BuiltinFn)> {
    vec![
        ("int", 1, int),
        ("float", 1, float),
        ("round", 2, round),
        ("abs", 1, abs),
        ("min", 1, min),
        ("max", 1, max),
    ]
}

fn int(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::UInt(u) => Ok(Value::UInt(*u)),
        Value::Float(f) => Ok(Value::Int(*f as i64)),
        Value::Bool(b) => Ok(Value::Int(*b as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("int: cannot convert '{s}'")),
        other => Err(format!("int: cannot convert {}", other.type_name())),
    }
}

fn float(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::UInt(u) => Ok(Value::Float(*u as f64)),
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("float: cannot convert '{s}'")),
        other => Err(format!("float: cannot convert {}", other.type_name())),
    }
}

fn round(args: &[Value]) -> Result<Value, String> {
    let value = expect_f64(args, 0, "round")?;
    let digits = expect_int(args, 1, "round")?;
    let factor = 10f64.powi(digits as i32);
    Ok(Value::Float((value * factor).round() / factor))
}

fn abs(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(i.saturating_abs())),
        Value::UInt(u) => Ok(Value::UInt(*u)),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(format!("abs: expected a number, got {}", other.type_name())),
    }
}

fn min(args: &[Value]) -> Result<Value, String> {
    extremum(args, "min", Ordering::Less)
}

fn max(args: &[Value]) -> Result<Value, String> {
    extremum(args, "max", Ordering::Greater)
}

fn extremum(args: &[Value], name: &str, keep: Ordering) -> Result<Value, String> {
    let items = expect_array(args, 0, name)?;
    let mut best = items
        .first()
        .ok_or_else(|| format!("{name}: empty array"))?;
    for item in &items[1..] {
        match item.partial_cmp(best) {
            Some(ordering) if ordering == keep => best = item,
            Some(_) => {}
            None => return Err(format!("{name}: cannot compare array elements")),
        }
    }
    Ok(best.clone())
}
