mod assert;

use grimoire::{register_array_functions, Environment, Value};
use serde_json::json;

fn env() -> Environment {
    let mut env = Environment::new();
    register_array_functions(&mut env);
    env
}

fn data() -> Value {
    Value::from(&json!({
        "items": [1, 2, 3],
        "obj": { "name": "Alice", "age": 30 }
    }))
}

fn render(template: &str) -> String {
    env()
        .render(template, &data())
        .unwrap_or_else(|error| panic!("render failed for {template:?}: {error}"))
}

#[test]
fn test_append_and_push() {
    assert_eq!(render("{{ append(items, 4) }}"), "[1,2,3,4]");
    assert_eq!(render("{{ append([], 1) }}"), "[1]");
    assert_eq!(render("{{ push(items, 4) }}"), "[1,2,3,4]");
    assert_eq!(render("{{ push([], 1) }}"), "[1]");

    // pure: the source array is unchanged
    assert_eq!(
        render("{% set ignored = append(items, 4) %}{{ items }}"),
        "[1,2,3]"
    );
}

#[test]
fn test_extend() {
    assert_eq!(render("{{ extend(items, [4, 5]) }}"), "[1,2,3,4,5]");
    assert_eq!(render("{{ extend([], [1, 2]) }}"), "[1,2]");
}

#[test]
fn test_insert() {
    assert_eq!(render("{{ insert(items, 0, 0) }}"), "[0,1,2,3]");
    assert_eq!(render("{{ insert(items, 2, 99) }}"), "[1,2,99,3]");
    assert_eq!(render("{{ insert(items, -1, 99) }}"), "[1,2,99,3]");
}

#[test]
fn test_pop() {
    assert_eq!(render("{{ pop(items) }}"), "[1,2]");
    assert_eq!(render("{{ pop(items, 0) }}"), "[2,3]");
    assert_eq!(render("{{ pop(items, 1) }}"), "[1,3]");
    assert_eq!(render("{{ pop(items, -1) }}"), "[1,2]");
}

#[test]
fn test_remove() {
    assert_eq!(render("{{ remove(items, 2) }}"), "[1,3]");
    assert_eq!(render("{{ remove(items, 99) }}"), "[1,2,3]");
}

#[test]
fn test_clear_and_reverse() {
    assert_eq!(render("{{ clear(items) }}"), "[]");
    assert_eq!(render("{{ reverse(items) }}"), "[3,2,1]");
    assert_eq!(render("{{ reverse([]) }}"), "[]");
}

#[test]
fn test_index_and_count() {
    assert_eq!(render("{{ index(items, 2) }}"), "1");
    assert_eq!(render("{{ index(items, 99) }}"), "-1");
    assert_eq!(
        render("{% set duplicates = [1, 2, 2, 3, 2] %}{{ count(duplicates, 2) }}"),
        "3"
    );
    assert_eq!(
        render("{% set duplicates = [1, 2, 2, 3, 2] %}{{ count(duplicates, 99) }}"),
        "0"
    );
}

#[test]
fn test_unique_and_flatten() {
    assert_eq!(
        render("{% set duplicates = [1, 2, 2, 3, 1, 3] %}{{ unique(duplicates) }}"),
        "[1,2,3]"
    );
    assert_eq!(render("{{ flatten([1, [2, 3], 4]) | length }}"), "4");
    assert_eq!(
        render("{% set deep = [1, [2, [3, 4]]] %}{{ flatten(deep, 1) | length }}"),
        "3"
    );
    assert_eq!(
        render("{% set deep = [1, [2, [3, 4]]] %}{{ flatten(deep, 2) | length }}"),
        "4"
    );
}

#[test]
fn test_object_helpers() {
    assert_eq!(
        render("{% set obj2 = {\"age\": 31, \"city\": \"NYC\"} %}{{ update(obj, obj2) }}"),
        "{\"name\":\"Alice\",\"age\":31,\"city\":\"NYC\"}"
    );
    assert_eq!(render("{{ keys(obj) }}"), "[\"name\",\"age\"]");
    assert_eq!(render("{{ values(obj) }}"), "[\"Alice\",30]");
    assert_eq!(render("{{ items(obj) | length }}"), "2");
    assert_eq!(render("{{ items(obj) }}"), "[[\"name\",\"Alice\"],[\"age\",30]]");
}

#[test]
fn test_get_and_has_key() {
    assert_eq!(render("{{ get(obj, \"name\") }}"), "Alice");
    assert_eq!(render("{{ get(obj, \"missing\") }}"), "");
    assert_eq!(render("{{ get(obj, \"missing\", \"default\") }}"), "default");
    assert_eq!(render("{{ has_key(obj, \"name\") }}"), "true");
    assert_eq!(render("{{ has_key(obj, \"missing\") }}"), "false");
}

#[test]
fn test_building_arrays_in_templates() {
    let template = "{% set myArray = [] %}\
{% set myArray = append(myArray, {\"name\": \"Item1\", \"value\": 10}) %}\
{% set myArray = append(myArray, {\"name\": \"Item2\", \"value\": 20}) %}\
Count: {{ myArray | length }}\
{% for item in myArray %} {{ item.name }}={{ item.value }}{% endfor %}";
    assert_eq!(render(template), "Count: 2 Item1=10 Item2=20");
}

#[test]
fn test_conditional_array_building() {
    let template = "{% set active = [] %}\
{% if true %}{% set active = append(active, \"Feature1\") %}{% endif %}\
{% if false %}{% set active = append(active, \"Feature2\") %}{% endif %}\
{% if true %}{% set active = append(active, \"Feature3\") %}{% endif %}\
{{ active | join(\",\") }}";
    assert_eq!(render(template), "Feature1,Feature3");
}

#[test]
fn test_manipulation_chain() {
    let template = "{% set nums = [1, 2, 3] %}\
{% set nums = append(nums, 4) %}\
{% set nums = append(nums, 5) %}\
{% set nums = reverse(nums) %}\
{{ nums }}";
    assert_eq!(render(template), "[5,4,3,2,1]");
}

#[test]
fn test_wrong_receiver_types_degrade_quietly() {
    assert_eq!(render("{{ append(\"string\", \"item\") }}"), "string");
    assert_eq!(render("{{ keys(items) }}"), "[]");
    assert_eq!(render("{{ index(obj, 1) }}"), "-1");
    assert_eq!(render("{{ count(obj, 1) }}"), "0");
    assert_eq!(render("{{ has_key(items, \"a\") }}"), "false");
    assert_eq!(render("{{ get(items, \"a\") }}"), "");
}
