use std::path::PathBuf;

use form_autofill::{
    dom::{extract::parse_page, page::PageDocument, surface::ControlId},
    profile::form_data::FormData,
    screen::{
        classifier::classify,
        field_model::{ControlType, FieldDescriptor, field_signature},
    },
};

pub const SCHOLARSHIP_URL: &str = "http://localhost:8080/scholarship/apply";
pub const WELFARE_URL: &str = "https://welfare.example.org/services";

/// Three bare inputs in one form: the smallest page a fill should complete.
pub const MINIMAL_FORM_HTML: &str = r#"
<html><body>
  <form>
    <input name="fullName">
    <input name="email">
    <input name="income">
  </form>
</body></html>
"#;

pub fn fixture_path(name: &str) -> PathBuf {
    let base = std::env::current_dir().unwrap();
    base.join("tests").join("fixtures").join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

pub fn fixture_page(name: &str, url: &str) -> PageDocument {
    parse_page(url, &fixture(name))
}

pub fn minimal_page() -> PageDocument {
    parse_page("http://localhost/scholarship", MINIMAL_FORM_HTML)
}

pub fn minimal_profile() -> FormData {
    FormData::new()
        .with("fullName", "A B")
        .with("email", "a@b.com")
        .with("income", "20000")
}

/// A scanned-looking field without a page behind it.
pub fn field(name: &str, label: &str, control_type: ControlType) -> FieldDescriptor {
    FieldDescriptor {
        control: ControlId(0),
        control_type,
        name: name.to_string(),
        id: String::new(),
        placeholder: String::new(),
        label: label.to_string(),
        required: false,
        categories: classify(&field_signature(name, "", "", label)),
    }
}

pub fn fields(specs: &[(&str, ControlType)]) -> Vec<FieldDescriptor> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (name, control_type))| FieldDescriptor {
            control: ControlId(i),
            ..field(name, "", *control_type)
        })
        .collect()
}

/// Unique scratch file under the system temp dir.
pub fn temp_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("form-autofill-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
