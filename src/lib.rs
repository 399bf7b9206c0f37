use crate::{
    dom::extract::parse_page,
    screen::{
        field_model::FormDescriptor,
        scorer::{ScoringConfig, detect_forms},
    },
};

pub mod cli;
pub mod dom;
pub mod engine;
pub mod fill;
pub mod profile;
pub mod report;
pub mod screen;
pub mod trace;

/// Parse `html` as the page at `url` and return its accepted forms, best first.
pub fn detect_in_html(url: &str, html: &str, config: &ScoringConfig) -> Vec<FormDescriptor> {
    let page = parse_page(url, html);
    detect_forms(&page, config)
}
