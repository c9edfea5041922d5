//! Visitor order, required flags and client scripts.

mod common;

use common::Recorder;
use expect_test::expect;
use formtree_elements::{
    FileInput, Form, FormMethod, Group, Header, Input, Label, UploadStatus, UploadTable,
    UploadedFile,
};
use formtree_rules::{LengthBound, RuleOptions};
use serde_json::json;

fn contact_form() -> Form {
    let mut form = Form::new("contact", FormMethod::Post, "/send");
    form.add_element(Input::hidden("token", "abc")).unwrap();
    form.add_element(Header::new("who", "About you")).unwrap();
    form.add_element(Input::text("name", "Name")).unwrap();
    form.add_element(
        Group::new("phone", "Phone")
            .with_separator("-")
            .with_element(Input::text("area", Label::None))
            .with_element(Input::text("number", Label::None))
            .with_element(Input::hidden("kind", "mobile")),
    )
    .unwrap();
    form.add_element(Input::submit("send", "Send")).unwrap();
    form.add_required("name", "Name is required").unwrap();
    form.add_required("phone", "Phone is required").unwrap();
    form.add_required("phone[number]", "Number is required").unwrap();
    form
}

#[test]
fn accept_walks_in_declaration_order() {
    let mut form = contact_form();
    form.validate();
    let mut recorder = Recorder::default();
    form.accept(&mut recorder).unwrap();
    expect![[r#"
        start_form contact frozen=false js=true
        hidden token
        header who "About you"
        element text name required=true error=Some("Name is required")
        start_group phone required=true error=None
        element text phone[area] required=false error=None
        element text phone[number] required=true error=Some("Number is required")
        hidden phone[kind]
        finish_group phone
        element submit send required=false error=None
        finish_form contact"#]]
    .assert_eq(&recorder.text());
}

#[test]
fn frozen_elements_are_never_required() {
    let mut form = contact_form();
    form.freeze();
    let mut recorder = Recorder::default();
    form.accept(&mut recorder).unwrap();
    let text = recorder.text();
    assert!(text.starts_with("start_form contact frozen=true js=false"));
    assert!(text.contains("element text name required=false"));
    assert!(text.contains("element text phone[number] required=false"));
}

#[test]
fn client_script_binds_each_rule() {
    let mut form = Form::new("signup", FormMethod::Post, "/join");
    form.add_element(Input::text("user", "User")).unwrap();
    form.add_element(Input::password("pw", "Password")).unwrap();
    form.add_element(Input::password("pw2", "Repeat")).unwrap();
    form.add_required("user", "User is required").unwrap();
    form.add_rule(
        "user",
        "Use 3 to 12 characters",
        "rangelength",
        RuleOptions::Length(LengthBound::Pair(3, 12)),
    )
    .unwrap();
    form.add_rule(
        ("pw", "pw2"),
        "Passwords don't match",
        "compare",
        RuleOptions::Operator("eq".into()),
    )
    .unwrap();

    expect![[r#"
        <script type="text/javascript">
        //<![CDATA[
        function validate_signup(frm) {
          var value;
          var errors = [];

          value = frm.elements['user'].value;
          if (value == '') {
            errors.push('User is required');
          }

          value = frm.elements['user'].value;
          if (value != '' && (value.length < 3 || value.length > 12)) {
            errors.push('Use 3 to 12 characters');
          }

          value = [frm.elements['pw'].value, frm.elements['pw2'].value];
          if ('' != value[0] && !(String(value[0]) === String(value[1]))) {
            errors.push('Passwords don\'t match');
          }

          if (errors.length > 0) {
            alert('Invalid information entered.\n - ' + errors.join('\n - '));
            return false;
          }
          return true;
        }
        //]]>
        </script>"#]]
    .assert_eq(&form.validation_script());
}

#[test]
fn uploads_bind_by_bracket_name_and_feed_file_rules() {
    let mut form = Form::new("upload", FormMethod::Post, "/up");
    form.add_element(FileInput::new("files[cv]", "CV")).unwrap();
    form.add_rule("files[cv]", "Upload your CV", "uploadedfile", RuleOptions::None)
        .unwrap();
    form.add_rule("files[cv]", "Max 1 kB", "maxfilesize", RuleOptions::Size(1024))
        .unwrap();
    form.add_required("files[cv]", "CV is required").unwrap();

    let mut uploads = UploadTable::new();
    uploads.insert(
        "files[cv]",
        UploadedFile {
            name: "cv.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size: 4096,
            tmp_name: "/tmp/upload-1".to_string(),
            error: UploadStatus::Ok,
        },
    );
    form.bind_uploads(&uploads);
    assert!(!form.validate());
    assert_eq!(form.element_error("files[cv]"), Some("Max 1 kB"));

    let value = form.element("files[cv]").unwrap().value();
    assert_eq!(value["name"], json!("cv.pdf"));
    assert_eq!(value["type"], json!("application/pdf"));
}
