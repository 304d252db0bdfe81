mod assert;

use serde_json::json;

fn data() -> serde_json::Value {
    json!({ "name": "Peter", "age": 29, "items": ["a", "b", "c"] })
}

#[test]
fn test_basic_raw_blocks() {
    assert_eq!(
        assert::render("{% raw %}{{ name }}{% endraw %}", &data()),
        "{{ name }}"
    );
    assert_eq!(
        assert::render("Before {% raw %}{{ name }}{% endraw %} After", &data()),
        "Before {{ name }} After"
    );
    assert_eq!(
        assert::render("{% raw %}{{ name }} is {{ age }} years old{% endraw %}", &data()),
        "{{ name }} is {{ age }} years old"
    );
    assert_eq!(assert::render("{% raw %}{% endraw %}", &data()), "");
}

#[test]
fn test_raw_blocks_hide_statements() {
    assert_eq!(
        assert::render("{% raw %}{% if true %}test{% endif %}{% endraw %}", &data()),
        "{% if true %}test{% endif %}"
    );
    assert_eq!(
        assert::render(
            "{% raw %}{% for item in items %}{{ item }}{% endfor %}{% endraw %}",
            &data()
        ),
        "{% for item in items %}{{ item }}{% endfor %}"
    );
}

#[test]
fn test_raw_blocks_preserve_whitespace() {
    assert_eq!(
        assert::render("{% raw %}  {{ name }}  \n  {{ age }}  {% endraw %}", &data()),
        "  {{ name }}  \n  {{ age }}  "
    );
}

#[test]
fn test_multiple_raw_blocks() {
    assert_eq!(
        assert::render("{% raw %}{{ a }}{% endraw %} and {% raw %}{{ b }}{% endraw %}", &data()),
        "{{ a }} and {{ b }}"
    );
    assert_eq!(
        assert::render("{{ name }} {% raw %}{{ age }}{% endraw %} {{ age }}", &data()),
        "Peter {{ age }} 29"
    );
}

#[test]
fn test_raw_blocks_with_special_characters() {
    assert_eq!(
        assert::render("{% raw %}#{{ name }} @{{ age }}{% endraw %}", &data()),
        "#{{ name }} @{{ age }}"
    );
}

#[test]
fn test_raw_blocks_in_control_flow() {
    assert_eq!(
        assert::render(
            "{% if age == 29 %}{% raw %}{{ name }}{% endraw %}{% endif %}",
            &data()
        ),
        "{{ name }}"
    );
    assert_eq!(
        assert::render(
            "{% if age == 30 %}{% raw %}{{ name }}{% endraw %}{% endif %}",
            &data()
        ),
        ""
    );
    assert_eq!(
        assert::render(
            "{% for item in items %}{% raw %}{{ x }}{% endraw %} {% endfor %}",
            &data()
        ),
        "{{ x }} {{ x }} {{ x }} "
    );
}

#[test]
fn test_raw_block_errors() {
    assert_eq!(
        assert::render_err("{% raw %}{{ name }}", &data()),
        "[inja.exception.parser_error] (at 1:8) unmatched raw"
    );
    assert_eq!(
        assert::render_err("{% endraw %}", &data()),
        "[inja.exception.parser_error] (at 1:4) endraw without matching raw"
    );
    // the first endraw closes the block; the second is stray
    assert_eq!(
        assert::render_err(
            "{% raw %}{% raw %}inner{% endraw %} outer{% endraw %}",
            &data()
        ),
        "[inja.exception.parser_error] (at 1:45) endraw without matching raw"
    );
}
