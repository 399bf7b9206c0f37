use form_autofill::{
    dom::{
        extract::{collapse_whitespace, parse_page},
        page::JournalEntry,
        surface::{ControlId, DomEvent, FormSurface, SurfaceError},
    },
    screen::label::resolve_label,
};

use crate::common::utils::{WELFARE_URL, fixture_page};

mod common;

// =========================================================================
// HTML extraction
// =========================================================================

#[test]
fn parse_page_counts_forms_and_controls_in_document_order() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);

    assert_eq!(page.form_count(), 2);
    let names: Vec<String> = page.controls().into_iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![
            "fullName",
            "annualIncome",
            "occupation",
            "guardianName",
            "agree",
            "subscriberEmail",
            "schoolName",
            "marks",
            "city",
        ]
    );
    assert_eq!(page.page_url(), WELFARE_URL);
}

#[test]
fn form_owner_comes_from_ancestor_or_form_attribute() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);
    let owners: Vec<Option<usize>> = page.controls().iter().map(|c| c.form_index).collect();

    assert_eq!(owners[0], Some(0), "fullName sits inside the benefit form");
    assert_eq!(owners[5], Some(1), "subscriberEmail sits inside the newsletter form");
    assert_eq!(owners[6], None, "schoolName is outside every form");
    assert_eq!(owners[8], Some(0), "city joins the benefit form via form=\"benefit\"");
}

#[test]
fn snapshot_reads_attributes_and_flags() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);
    let controls = page.controls();

    let full_name = &controls[0];
    assert_eq!(full_name.tag, "input");
    assert_eq!(full_name.input_type, None);
    assert_eq!(full_name.id, "fullName");
    assert!(full_name.required);
    assert!(!full_name.disabled);

    assert!(controls[3].disabled, "guardianName is disabled");
    assert_eq!(controls[4].input_type.as_deref(), Some("checkbox"));
    assert_eq!(controls[5].placeholder, "Your email");
}

#[test]
fn select_value_and_options() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);
    let occupation = ControlId(2);

    assert_eq!(
        page.value_of(occupation),
        Some("salaried"),
        "the selected option provides the initial value"
    );

    let options = page.options(occupation);
    assert_eq!(options.len(), 4);
    assert_eq!(options[1].value, "Farmer", "missing value attribute falls back to text");
    assert_eq!(options[2].text, "Daily wage labourer");
    assert!(options[3].selected);
}

#[test]
fn select_without_selected_option_takes_first() {
    let page = fixture_page("scholarship_form.html", WELFARE_URL);
    let gender = page.control_named("gender").unwrap();
    assert_eq!(page.value_of(gender), Some(""));
}

#[test]
fn textarea_value_is_its_text() {
    let page = parse_page(
        "http://localhost/",
        "<form><textarea name=\"remarks\">First year</textarea></form>",
    );
    assert_eq!(page.value_of(ControlId(0)), Some("First year"));
}

#[test]
fn collapse_whitespace_joins_runs() {
    assert_eq!(collapse_whitespace("  Annual \n\t Family   Income "), "Annual Family Income");
    assert_eq!(collapse_whitespace(" \n "), "");
}

// =========================================================================
// PageDocument as a FormSurface
// =========================================================================

#[test]
fn writes_are_journaled_in_order() {
    let mut page = fixture_page("multi_forms.html", WELFARE_URL);
    let name = ControlId(0);

    page.focus(name).unwrap();
    page.set_value(name, "Ravi").unwrap();
    page.dispatch_event(name, DomEvent::Change).unwrap();
    page.dispatch_event(name, DomEvent::Blur).unwrap();

    assert_eq!(
        page.journal(),
        &[
            JournalEntry::Focus { control: name },
            JournalEntry::SetValue {
                control: name,
                value: "Ravi".into()
            },
            JournalEntry::Event {
                control: name,
                event: DomEvent::Change
            },
            JournalEntry::Event {
                control: name,
                event: DomEvent::Blur
            },
        ]
    );
    assert_eq!(page.value_of(name), Some("Ravi"));
    assert_eq!(page.focused(), None, "blur releases focus");
}

#[test]
fn select_option_updates_value_and_selection() {
    let mut page = fixture_page("multi_forms.html", WELFARE_URL);
    let occupation = ControlId(2);

    page.select_option(occupation, 2).unwrap();

    assert_eq!(page.value_of(occupation), Some("labour"));
    let selected: Vec<bool> = page.options(occupation).iter().map(|o| o.selected).collect();
    assert_eq!(selected, vec![false, false, true, false]);
}

#[test]
fn surface_errors_for_missing_controls_and_options() {
    let mut page = fixture_page("multi_forms.html", WELFARE_URL);

    assert!(matches!(
        page.focus(ControlId(99)),
        Err(SurfaceError::Detached(ControlId(99)))
    ));
    assert!(matches!(
        page.select_option(ControlId(2), 7),
        Err(SurfaceError::NoSuchOption { index: 7, .. })
    ));
    assert!(page.journal().is_empty(), "failed writes leave no journal entry");
}

#[test]
fn values_report_every_control() {
    let mut page = fixture_page("multi_forms.html", WELFARE_URL);
    page.set_value(ControlId(8), "Mysuru").unwrap();

    let values = page.values();
    assert_eq!(values.len(), 9);
    assert_eq!(values[8].name, "city");
    assert_eq!(values[8].value, "Mysuru");
}

// =========================================================================
// Label resolution
// =========================================================================

fn label_of(html: &str, control: usize) -> String {
    let page = parse_page("http://localhost/", html);
    let snapshot = page.controls().remove(control);
    resolve_label(&page, &snapshot)
}

#[test]
fn enclosing_label_wins_over_label_for() {
    let html = r#"
        <label>Student   Name <input id="sn" name="a"></label>
        <label for="sn">Something else</label>
    "#;
    assert_eq!(label_of(html, 0), "Student Name");
}

#[test]
fn label_for_is_found_anywhere_in_document() {
    let html = r#"
        <form><input id="mob" name="m"></form>
        <footer><label for="mob">Mobile Number</label></footer>
    "#;
    assert_eq!(label_of(html, 0), "Mobile Number");
}

#[test]
fn parent_text_is_used_without_the_controls_value() {
    let html = r#"<div>Remarks <textarea name="r">hello</textarea></div>"#;
    assert_eq!(label_of(html, 0), "Remarks");
}

#[test]
fn long_parent_text_is_not_a_label() {
    let filler = "Please read the eligibility criteria carefully before you continue. ".repeat(3);
    let html = format!("<div>{}<input name=\"x\"></div>", filler);
    assert_eq!(label_of(&html, 0), "");
}

#[test]
fn control_without_any_label_gets_empty_string() {
    let html = r#"<div><input name="x"></div>"#;
    assert_eq!(label_of(html, 0), "");
}

#[test]
fn label_for_ignores_controls_without_id() {
    let html = r#"
        <label for="">Ghost</label>
        <div><input name="x"></div>
    "#;
    assert_eq!(label_of(html, 0), "");
}
