use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::dom::page::{PageControl, PageDocument, PageLabel};
use crate::dom::surface::{ControlId, ControlSnapshot, SelectOption};

static FORMS: LazyLock<Selector> = LazyLock::new(|| selector("form"));
static CONTROLS: LazyLock<Selector> = LazyLock::new(|| selector("input, select, textarea"));
static FOR_LABELS: LazyLock<Selector> = LazyLock::new(|| selector("label[for]"));
static OPTIONS: LazyLock<Selector> = LazyLock::new(|| selector("option"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Parse an HTML document into a [`PageDocument`].
///
/// `url` is the address the page was loaded from; it only feeds the
/// page-level scoring signal.
pub fn parse_page(url: &str, html: &str) -> PageDocument {
    let doc = Html::parse_document(html);

    let forms: Vec<ElementRef<'_>> = doc.select(&FORMS).collect();

    let labels = doc
        .select(&FOR_LABELS)
        .filter_map(|label| {
            let for_id = label.value().attr("for")?.to_string();
            Some(PageLabel {
                for_id,
                text: collapse_whitespace(&element_text(label)),
            })
        })
        .collect();

    let controls = doc
        .select(&CONTROLS)
        .enumerate()
        .map(|(i, el)| to_control(ControlId(i), el, &forms))
        .collect();

    PageDocument::new(url, forms.len(), controls, labels)
}

fn to_control(control: ControlId, el: ElementRef<'_>, forms: &[ElementRef<'_>]) -> PageControl {
    let element = el.value();
    let tag = element.name().to_ascii_lowercase();
    let attr = |name: &str| element.attr(name).unwrap_or_default().to_string();

    let options = if tag == "select" { select_options(el) } else { Vec::new() };

    let value = match tag.as_str() {
        "textarea" => element_text(el),
        "select" => options
            .iter()
            .find(|o| o.selected)
            .or_else(|| options.first())
            .map(|o| o.value.clone())
            .unwrap_or_default(),
        _ => attr("value"),
    };

    let snapshot = ControlSnapshot {
        control,
        tag,
        input_type: element.attr("type").map(|t| t.trim().to_ascii_lowercase()),
        name: attr("name"),
        id: attr("id"),
        placeholder: attr("placeholder"),
        value,
        required: element.attr("required").is_some(),
        disabled: element.attr("disabled").is_some(),
        form_index: owning_form(el, forms),
    };

    PageControl {
        snapshot,
        native_label: enclosing_label(el),
        parent_text: el
            .parent()
            .and_then(ElementRef::wrap)
            .map(element_text),
        options,
    }
}

/// Form owner: explicit `form="<id>"` attribute first, then nearest ancestor.
fn owning_form(el: ElementRef<'_>, forms: &[ElementRef<'_>]) -> Option<usize> {
    if let Some(form_id) = el.value().attr("form") {
        if let Some(index) = forms
            .iter()
            .position(|f| f.value().attr("id") == Some(form_id))
        {
            return Some(index);
        }
    }

    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name().eq_ignore_ascii_case("form"))
        .and_then(|form| forms.iter().position(|f| f.id() == form.id()))
}

fn enclosing_label(el: ElementRef<'_>) -> Option<String> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name().eq_ignore_ascii_case("label"))
        .map(|label| collapse_whitespace(&element_text(label)))
}

fn select_options(el: ElementRef<'_>) -> Vec<SelectOption> {
    el.select(&OPTIONS)
        .map(|option| {
            let text = collapse_whitespace(&element_text(option));
            SelectOption {
                // An option without a value attribute submits its text.
                value: option
                    .value()
                    .attr("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| text.clone()),
                text,
                selected: option.value().attr("selected").is_some(),
            }
        })
        .collect()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
