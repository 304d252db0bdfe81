mod assert;

use grimoire::{Environment, Value};
use serde_json::json;

fn data() -> serde_json::Value {
    json!({
        "name": "Peter",
        "age": 29,
        "names": ["Jeff", "Seb"],
        "brother": { "name": "Chris" }
    })
}

fn render_with(env: &mut Environment, template: &str) -> String {
    env.render(template, &Value::from(&data()))
        .unwrap_or_else(|error| panic!("render failed for {template:?}: {error}"))
}

#[test]
fn test_user_callbacks() {
    let mut env = Environment::new();
    env.add_callback("double", 1, |args: &[Value]| match &args[0] {
        Value::Int(i) => Ok(Value::Int(i * 2)),
        other => Err(format!("double: expected an integer, got {}", other.type_name())),
    });

    assert_eq!(render_with(&mut env, "{{ double(age) }}"), "58");
    assert_eq!(render_with(&mut env, "{{ double(4) }}"), "8");
    assert_eq!(render_with(&mut env, "{{ age | double }}"), "58");
}

#[test]
fn test_callback_arity_overloads() {
    let mut env = Environment::new();
    env.add_callback("greet", 1, |args: &[Value]| {
        Ok(Value::String(format!("Hello {}", args[0])))
    });
    env.add_callback("greet", 2, |args: &[Value]| {
        Ok(Value::String(format!("{} {}", args[0], args[1])))
    });

    assert_eq!(render_with(&mut env, "{{ greet(name) }}"), "Hello Peter");
    assert_eq!(render_with(&mut env, "{{ greet(\"Hi\", name) }}"), "Hi Peter");
}

#[test]
fn test_callbacks_shadow_builtins() {
    let mut env = Environment::new();
    env.add_callback("upper", 1, |_: &[Value]| Ok(Value::String("shadowed".into())));
    assert_eq!(render_with(&mut env, "{{ upper(name) }}"), "shadowed");
}

#[test]
fn test_missing_callback_is_strict_error() {
    assert_eq!(
        assert::render_err("{{ triple(age) }}", &data()),
        "[inja.exception.render_error] (at 1:4) callback 'triple' not found"
    );
    // arity is part of the lookup key
    let mut env = Environment::new();
    env.add_callback("pair", 2, |args: &[Value]| {
        Ok(Value::Array(vec![args[0].clone(), args[1].clone()]))
    });
    let error = env
        .render("{{ pair(1) }}", &Value::from(&data()))
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "[inja.exception.render_error] (at 1:4) callback 'pair' not found"
    );
}

#[test]
fn test_string_builtins() {
    assert_eq!(assert::render("{{ upper(name) }}", &data()), "PETER");
    assert_eq!(assert::render("{{ lower(\"HELLO\") }}", &data()), "hello");
    assert_eq!(
        assert::render("{{ replace(\"Hello World\", \"World\", \"There\") }}", &data()),
        "Hello There"
    );
    assert_eq!(
        assert::render("{{ join(names, \" and \") }}", &data()),
        "Jeff and Seb"
    );
    assert_eq!(
        assert::render("{{ split(\"a,b,c\", \",\") }}", &data()),
        "[\"a\",\"b\",\"c\"]"
    );
    assert_eq!(assert::render("{{ trim(\"  x  \") }}", &data()), "x");
    assert_eq!(assert::render("{{ capitalize(\"hELLO\") }}", &data()), "Hello");
}

#[test]
fn test_collection_builtins() {
    assert_eq!(assert::render("{{ length(names) }}", &data()), "2");
    assert_eq!(assert::render("{{ length(\"hello\") }}", &data()), "5");
    assert_eq!(assert::render("{{ length(brother) }}", &data()), "1");
    assert_eq!(
        assert::render("{{ sort([3, 1, 2]) }}", &data()),
        "[1,2,3]"
    );
    assert_eq!(
        assert::render("{{ sort([\"b\", \"c\", \"a\"]) }}", &data()),
        "[\"a\",\"b\",\"c\"]"
    );
    assert_eq!(assert::render("{{ first(names) }}", &data()), "Jeff");
    assert_eq!(assert::render("{{ last(names) }}", &data()), "Seb");
    assert_eq!(assert::render("{{ range(4) }}", &data()), "[0,1,2,3]");
    assert_eq!(assert::render("{{ at(names, 1) }}", &data()), "Seb");
    assert_eq!(assert::render("{{ at(names, -1) }}", &data()), "Seb");
    assert_eq!(
        assert::render("{{ at(brother, \"name\") }}", &data()),
        "Chris"
    );
    assert_eq!(
        assert::render("{{ existsIn(brother, \"name\") }}", &data()),
        "true"
    );
    assert_eq!(
        assert::render("{{ existsIn(brother, \"sister\") }}", &data()),
        "false"
    );
}

#[test]
fn test_number_builtins() {
    assert_eq!(assert::render("{{ int(\"42\") }}", &data()), "42");
    assert_eq!(assert::render("{{ int(2.7) }}", &data()), "2");
    assert_eq!(assert::render("{{ float(2) }}", &data()), "2.0");
    assert_eq!(assert::render("{{ round(3.14159, 2) }}", &data()), "3.14");
    assert_eq!(assert::render("{{ round(4.6, 0) }}", &data()), "5.0");
    assert_eq!(assert::render("{{ abs(-3) }}", &data()), "3");
    assert_eq!(assert::render("{{ abs(3.5) }}", &data()), "3.5");
    assert_eq!(assert::render("{{ min([3, 1, 2]) }}", &data()), "1");
    assert_eq!(assert::render("{{ max([3, 1, 2]) }}", &data()), "3");
}

#[test]
fn test_builtin_pipelines() {
    assert_eq!(
        assert::render("{{ \"a,b,c\" | split(\",\") | length }}", &data()),
        "3"
    );
    assert_eq!(
        assert::render("{{ names | join(\"-\") | upper }}", &data()),
        "JEFF-SEB"
    );
}

#[test]
fn test_builtin_argument_type_errors() {
    assert_eq!(
        assert::render_err("{{ upper(42) }}", &data()),
        "[inja.exception.render_error] (at 1:4) upper: expected a string, got int"
    );
    assert_eq!(
        assert::render_err("{{ sort([1, \"a\"]) }}", &data()),
        "[inja.exception.render_error] (at 1:4) sort: cannot compare array elements"
    );
}
