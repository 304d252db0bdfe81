mod assert;

use grimoire::{Environment, Value};
use serde_json::json;

fn data() -> serde_json::Value {
    json!({ "name": "Peter", "is_happy": true })
}

fn render_with(env: &mut Environment, template: &str) -> String {
    match env.render(template, &Value::from(&data())) {
        Ok(output) => output,
        Err(error) => panic!("render failed.\nTemplate: {template:?}\nError: {error}"),
    }
}

#[test]
fn test_no_trimming_by_default() {
    assert_eq!(
        assert::render("{% if is_happy %}{{ name }}{% endif %}", &data()),
        "Peter"
    );
    assert_eq!(
        assert::render("   {% if is_happy %}{{ name }}{% endif %}   ", &data()),
        "   Peter   "
    );
    assert_eq!(
        assert::render("   {% if is_happy %}{{ name }}{% endif %}\n ", &data()),
        "   Peter\n "
    );
    assert_eq!(assert::render("   {{ name }}\n ", &data()), "   Peter\n ");
}

#[test]
fn test_trim_markers() {
    assert_eq!(
        assert::render("Test\n   {%- if is_happy %}{{ name }}{% endif %}   ", &data()),
        "Test\nPeter   "
    );
    assert_eq!(
        assert::render("   {%+ if is_happy %}{{ name }}{% endif %}", &data()),
        "   Peter"
    );
    assert_eq!(
        assert::render("   {%- if is_happy %}{{ name }}{% endif -%}   \n   ", &data()),
        "Peter"
    );
    assert_eq!(assert::render("   {{- name -}}   \n   ", &data()), "Peter");
    assert_eq!(assert::render("Test\n   {{- name }}   ", &data()), "Test\nPeter   ");
    assert_eq!(assert::render("{{ name }}{# name -#}    !", &data()), "Peter!");
    assert_eq!(assert::render("   {#- name -#}    !", &data()), "!");

    // nothing is stripped when other characters precede the tag on its line
    assert_eq!(
        assert::render(".  {%- if is_happy %}{{ name }}{% endif -%}\n", &data()),
        ".  Peter"
    );
    assert_eq!(assert::render(".  {#- comment -#}\n.", &data()), ".  .");
}

#[test]
fn test_lstrip_blocks() {
    let mut env = Environment::new();
    env.set_lstrip_blocks(true);

    assert_eq!(render_with(&mut env, "Hello {{ name }}!"), "Hello Peter!");
    assert_eq!(
        render_with(&mut env, "   {% if is_happy %}{{ name }}{% endif %}"),
        "Peter"
    );
    assert_eq!(
        render_with(&mut env, "   {% if is_happy %}{{ name }}{% endif %}   "),
        "Peter   "
    );
    assert_eq!(
        render_with(&mut env, "   {% if is_happy %}{{ name }}{% endif -%}   "),
        "Peter"
    );
    assert_eq!(
        render_with(&mut env, "   {%+ if is_happy %}{{ name }}{% endif %}"),
        "   Peter"
    );
    assert_eq!(
        render_with(&mut env, "\n   {%+ if is_happy %}{{ name }}{% endif -%}   "),
        "\n   Peter"
    );
    assert_eq!(
        render_with(&mut env, "{% if is_happy %}{{ name }}{% endif %}\n"),
        "Peter\n"
    );
    assert_eq!(render_with(&mut env, "   {# comment #}"), "");

    // expression tags are unaffected by lstrip_blocks
    assert_eq!(render_with(&mut env, "   {{ name }}"), "   Peter");
}

#[test]
fn test_trim_blocks() {
    let mut env = Environment::new();
    env.set_lstrip_blocks(true);
    env.set_trim_blocks(true);

    assert_eq!(
        render_with(&mut env, "{% if is_happy %}{{ name }}{% endif %}"),
        "Peter"
    );
    assert_eq!(
        render_with(&mut env, "{% if is_happy %}{{ name }}{% endif %}\n"),
        "Peter"
    );
    assert_eq!(
        render_with(&mut env, "{% if is_happy %}{{ name }}{% endif %}   \n."),
        "Peter."
    );
    assert_eq!(
        render_with(&mut env, "{%- if is_happy %}{{ name }}{% endif -%}   \n."),
        "Peter."
    );
    assert_eq!(render_with(&mut env, "   {# comment #}   \n."), ".");

    // expression closes are unaffected by trim_blocks
    assert_eq!(render_with(&mut env, "{{ name }}\n."), "Peter\n.");
}

#[test]
fn test_line_statements() {
    assert_eq!(
        assert::render("## if is_happy\nYeah!\n## endif", &data()),
        "Yeah!\n"
    );
    assert_eq!(
        assert::render("## if is_happy\n## if is_happy\nYeah!\n## endif\n## endif    ", &data()),
        "Yeah!\n"
    );
}

#[test]
fn test_other_expression_syntax() {
    let mut env = Environment::new();
    assert_eq!(render_with(&mut env, "Hello {{ name }}!"), "Hello Peter!");

    env.set_expression("(&", "&)");
    assert_eq!(render_with(&mut env, "Hello {{ name }}!"), "Hello {{ name }}!");
    assert_eq!(render_with(&mut env, "Hello (& name &)!"), "Hello Peter!");
}

#[test]
fn test_other_comment_syntax() {
    let mut env = Environment::new();
    env.set_comment("(&", "&)");

    assert_eq!(render_with(&mut env, "Hello {# Test #}"), "Hello {# Test #}");
    assert_eq!(render_with(&mut env, "Hello (& Test &)"), "Hello ");
}

#[test]
fn test_multiple_syntax_changes() {
    let mut env = Environment::new();
    env.set_line_statement("$$");
    env.set_expression("<%", "%>");

    let template = "Hello <%name%>\n$$ if name == \"Peter\"\n    You really are <%name%>\n$$ endif\n";
    assert_eq!(
        render_with(&mut env, template),
        "Hello Peter\n    You really are Peter\n"
    );
}
