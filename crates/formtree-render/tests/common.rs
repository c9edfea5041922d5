#![allow(dead_code, unused_imports)]

use formtree_elements::{Form, FormMethod, Group, Header, Input, Label, Separator};
use formtree_render::{ElementRecord, GroupElements, KeyTree, OutputModel};

/// Order form with a flat part, a named and an unnamed section, a cyclic
/// separator group and one required element.
pub fn order_form() -> Form {
    let mut form = Form::new("order", FormMethod::Post, "/order");
    form.add_element(Input::text(
        "customer",
        Label::list(["Customer", "As on the card"]),
    ))
    .unwrap();
    form.add_element(Input::hidden("ref", "x1")).unwrap();
    form.add_element(Header::new("when", "Delivery")).unwrap();
    form.add_element(
        Group::new("date", "Date")
            .with_separator(vec!["-", "|"])
            .with_element(Input::text("y", Label::None))
            .with_element(Input::text("m", Label::None))
            .with_element(Input::text("d", Label::None)),
    )
    .unwrap();
    form.add_element(Header::new("", "Confirm")).unwrap();
    form.add_element(Input::submit("go", "Order")).unwrap();
    form.add_required("customer", "Customer is required").unwrap();
    form
}

/// Profile form exercising bracket names, radios, a group and an unnamed
/// button.
pub fn profile_form() -> Form {
    let mut form = Form::new("profile", FormMethod::Post, "/profile");
    form.add_element(Input::hidden("id", "7")).unwrap();
    form.add_element(Input::text("addr[city]", "City").with_value("Oslo"))
        .unwrap();
    form.add_element(Input::radio("color", "Red", "red")).unwrap();
    form.add_element(Input::radio("color", "Blue", "blue")).unwrap();
    form.add_element(
        Group::new("dob", "Birthday")
            .with_separator("/")
            .with_element(Input::text("d", Label::None))
            .with_element(Input::text("m", Label::None)),
    )
    .unwrap();
    form.add_element(Input::submit("", "Save")).unwrap();
    form
}

/// One line per record, indented per nesting level.
pub fn outline(output: &OutputModel) -> String {
    let mut lines = Vec::new();
    for record in &output.elements {
        push_record(&mut lines, record, 0);
    }
    for section in &output.sections {
        lines.push(format!(
            "section {}: {}",
            section.name.as_deref().unwrap_or("-"),
            section.header
        ));
        for record in &section.elements {
            push_record(&mut lines, record, 1);
        }
    }
    lines.join("\n")
}

fn push_record(lines: &mut Vec<String>, record: &ElementRecord, depth: usize) {
    let mut line = format!("{}{} [{}]", "  ".repeat(depth), record.name, record.kind);
    if let Some(label) = &record.label {
        line.push_str(&format!(" label={label}"));
    }
    for (key, text) in &record.extra_labels {
        line.push_str(&format!(" {key}={text}"));
    }
    if record.required {
        line.push_str(" *");
    }
    if let Some(error) = &record.error {
        line.push_str(&format!(" error={error}"));
    }
    match &record.separator {
        Some(Separator::Text(text)) if !text.is_empty() => line.push_str(&format!(" sep={text}")),
        Some(Separator::Cycle(items)) => line.push_str(&format!(" sep={}", items.join(","))),
        _ => {}
    }
    lines.push(line);
    for child in record.children() {
        push_record(lines, child, depth + 1);
    }
}

/// One `path type name` line per record of a keyed tree.
pub fn keyed_outline(tree: &KeyTree) -> String {
    let mut lines = Vec::new();
    walk(tree, "", &mut lines);
    lines.join("\n")
}

fn walk(tree: &KeyTree, path: &str, lines: &mut Vec<String>) {
    let join = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    };
    match tree {
        KeyTree::Record(record) => {
            lines.push(format!("{path} {} {}", record.kind, record.name));
            if let Some(GroupElements::Keyed(members)) = &record.elements {
                walk(members, &join("elements"), lines);
            }
        }
        KeyTree::Map(map) => {
            for (key, child) in map {
                walk(child, &join(key), lines);
            }
        }
        KeyTree::List(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &join(&index.to_string()), lines);
            }
        }
    }
}
