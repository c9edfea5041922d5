//! Server/client agreement for the built-in rules.

use expect_test::expect;
use formtree_rules::{
    LengthBound, Rule, RuleOptions, RuleRegistry, ValidationScript, JS_VAR,
};
use serde_json::json;

fn options(token: &str) -> RuleOptions {
    RuleOptions::Operator(token.into())
}

#[test]
fn compare_rule_keeps_text_equality_and_numeric_ordering() {
    let registry = RuleRegistry::default();
    let compare = registry.get("compare").expect("compare");

    assert!(!compare.validate(&json!(["5", "5.0"]), &options("eq")));
    assert!(compare.validate(&json!(["5", "5.0"]), &options("gte")));
    assert!(compare.validate(&json!(["10", "9"]), &options("gt")));
    assert!(compare.validate(&json!(["a", "a"]), &options("bogus")));
}

#[test]
fn range_rules_by_name() {
    let registry = RuleRegistry::default();
    let hello = json!("hello");
    let three = RuleOptions::Length(LengthBound::Scalar(3));

    assert!(registry.get("minlength").unwrap().validate(&hello, &three));
    assert!(!registry.get("maxlength").unwrap().validate(&hello, &three));

    let range = registry.get("rangelength").unwrap();
    let two_six = RuleOptions::Length(LengthBound::Pair(2, 6));
    assert!(range.validate(&hello, &two_six));
    assert!(!range.validate(&json!("h"), &two_six));
}

#[test]
fn every_builtin_script_guards_empty_values() {
    let registry = RuleRegistry::default();
    let cases = [
        ("compare", options("lt")),
        ("minlength", RuleOptions::Length(LengthBound::Scalar(2))),
        ("maxlength", RuleOptions::Length(LengthBound::Scalar(9))),
        ("rangelength", RuleOptions::Length(LengthBound::Pair(2, 9))),
    ];
    for (name, options) in cases {
        let script = registry
            .get(name)
            .unwrap()
            .validation_script(&options)
            .expect("client script");
        assert!(script.setup.is_empty(), "{name}");
        assert!(script.test.contains(JS_VAR), "{name}");
        assert!(
            script.test.starts_with("'' != {jsVar}[0] && ")
                || script.test.starts_with("{jsVar} != '' && "),
            "{name}: {}",
            script.test
        );
    }
}

#[test]
fn bound_scripts_reference_the_field() {
    let registry = RuleRegistry::default();
    let scripts: Vec<ValidationScript> = [
        ("compare", options("gte")),
        ("rangelength", RuleOptions::Length(LengthBound::Pair(2, 6))),
    ]
    .into_iter()
    .map(|(name, options)| {
        registry
            .get(name)
            .unwrap()
            .validation_script(&options)
            .unwrap()
            .bind("value")
    })
    .collect();

    let rendered = scripts
        .iter()
        .map(|script| script.test.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    expect![[r#"
        '' != value[0] && !(Number(value[0]) >= Number(value[1]))
        value != '' && (value.length < 2 || value.length > 6)"#]]
    .assert_eq(&rendered);
}
