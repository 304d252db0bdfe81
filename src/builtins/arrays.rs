use crate::environment::Environment;
use crate::value::Value;

/// Registers the optional array and object manipulation callbacks. All of
/// them are pure: the receiver is copied and a new value returned. Wrong
/// receiver types degrade to the neutral result instead of failing, so the
/// helpers compose with graceful mode.
pub fn register_array_functions(env: &mut Environment) {
    env.add_callback("append", 2, append);
    env.add_callback("push", 2, append);
    env.add_callback("extend", 2, extend);
    env.add_callback("insert", 3, insert);
    env.add_callback("pop", 1, pop_last);
    env.add_callback("pop", 2, pop_at);
    env.add_callback("remove", 2, remove);
    env.add_callback("clear", 1, clear);
    env.add_callback("reverse", 1, reverse);
    env.add_callback("index", 2, index_of);
    env.add_callback("count", 2, count);
    env.add_callback("unique", 1, unique);
    env.add_callback("flatten", 1, |args: &[Value]| flatten(args, 1));
    env.add_callback("flatten", 2, |args: &[Value]| {
        let depth = match &args[1] {
            Value::Int(i) => *i,
            Value::UInt(u) => *u as i64,
            _ => 1,
        };
        flatten(args, depth)
    });
    env.add_callback("update", 2, update);
    env.add_callback("keys", 1, keys);
    env.add_callback("values", 1, values);
    env.add_callback("items", 1, items);
    env.add_callback("get", 2, |args: &[Value]| get(args, Value::Null));
    env.add_callback("get", 3, |args: &[Value]| get(args, args[2].clone()));
    env.add_callback("has_key", 2, has_key);
}

fn append(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    result.push(args[1].clone());
    Ok(Value::Array(result))
}

fn extend(args: &[Value]) -> Result<Value, String> {
    let (Value::Array(items), Value::Array(extra)) = (&args[0], &args[1]) else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    result.extend(extra.iter().cloned());
    Ok(Value::Array(result))
}

fn normalize(index: i64, len: usize) -> i64 {
    if index < 0 {
        index + len as i64
    } else {
        index
    }
}

fn integer_arg(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::UInt(u) => Some(*u as i64),
        _ => None,
    }
}

fn insert(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    if let Some(raw) = integer_arg(&args[1]) {
        let index = normalize(raw, result.len());
        if index >= 0 && index as usize <= result.len() {
            result.insert(index as usize, args[2].clone());
        }
    }
    Ok(Value::Array(result))
}

fn pop_last(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    result.pop();
    Ok(Value::Array(result))
}

fn pop_at(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    if let Some(raw) = integer_arg(&args[1]) {
        let index = normalize(raw, result.len());
        if index >= 0 && (index as usize) < result.len() {
            result.remove(index as usize);
        }
    }
    Ok(Value::Array(result))
}

fn remove(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    if let Some(position) = result.iter().position(|item| item == &args[1]) {
        result.remove(position);
    }
    Ok(Value::Array(result))
}

fn clear(args: &[Value]) -> Result<Value, String> {
    let Value::Array(_) = &args[0] else {
        return Ok(args[0].clone());
    };
    Ok(Value::Array(Vec::new()))
}

fn reverse(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = items.clone();
    result.reverse();
    Ok(Value::Array(result))
}

fn index_of(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(Value::Int(-1));
    };
    let position = items
        .iter()
        .position(|item| item == &args[1])
        .map_or(-1, |i| i as i64);
    Ok(Value::Int(position))
}

fn count(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(Value::Int(0));
    };
    let occurrences = items.iter().filter(|item| *item == &args[1]).count();
    Ok(Value::Int(occurrences as i64))
}

fn unique(args: &[Value]) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result: Vec<Value> = Vec::new();
    for item in items {
        if !result.contains(item) {
            result.push(item.clone());
        }
    }
    Ok(Value::Array(result))
}

fn flatten(args: &[Value], max_depth: i64) -> Result<Value, String> {
    let Value::Array(items) = &args[0] else {
        return Ok(args[0].clone());
    };
    fn flatten_into(items: &[Value], depth: i64, out: &mut Vec<Value>) {
        for item in items {
            match item {
                Value::Array(inner) if depth > 0 => flatten_into(inner, depth - 1, out),
                other => out.push(other.clone()),
            }
        }
    }
    let mut result = Vec::new();
    flatten_into(items, max_depth, &mut result);
    Ok(Value::Array(result))
}

fn update(args: &[Value]) -> Result<Value, String> {
    let Value::Object(map) = &args[0] else {
        return Ok(args[0].clone());
    };
    let mut result = map.clone();
    if let Value::Object(other) = &args[1] {
        for (key, value) in other {
            // existing keys keep their position, new keys append
            result.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Object(result))
}

fn keys(args: &[Value]) -> Result<Value, String> {
    let Value::Object(map) = &args[0] else {
        return Ok(Value::Array(Vec::new()));
    };
    Ok(map.keys().map(|k| Value::String(k.clone())).collect())
}

fn values(args: &[Value]) -> Result<Value, String> {
    let Value::Object(map) = &args[0] else {
        return Ok(Value::Array(Vec::new()));
    };
    Ok(map.values().cloned().collect())
}

fn items(args: &[Value]) -> Result<Value, String> {
    let Value::Object(map) = &args[0] else {
        return Ok(Value::Array(Vec::new()));
    };
    Ok(map
        .iter()
        .map(|(key, value)| {
            Value::Array(vec![Value::String(key.clone()), value.clone()])
        })
        .collect())
}

fn get(args: &[Value], default: Value) -> Result<Value, String> {
    if let (Value::Object(map), Value::String(key)) = (&args[0], &args[1]) {
        if let Some(value) = map.get(key) {
            return Ok(value.clone());
        }
    }
    Ok(default)
}

fn has_key(args: &[Value]) -> Result<Value, String> {
    if let (Value::Object(map), Value::String(key)) = (&args[0], &args[1]) {
        return Ok(Value::Bool(map.contains_key(key)));
    }
    Ok(Value::Bool(false))
}
