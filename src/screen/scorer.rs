use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::dom::surface::FormSurface;
use crate::screen::field_model::{Category, FieldDescriptor, FormDescriptor, FormKey, FormKind};
use crate::screen::scan::scan_forms;

// ============================================================================
// Scoring configuration
// ============================================================================

/// Weights and threshold for the government-form confidence score.
///
/// The default threshold of 40 means the page-level bonus alone (30) never
/// accepts a form; at least one field signal is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    #[serde(default)]
    pub weights: CategoryWeights,

    /// Added once when personal fields appear together with education or
    /// income fields.
    #[serde(default = "default_combination_bonus")]
    pub combination_bonus: u32,

    #[serde(default = "default_page_bonus")]
    pub page_bonus: u32,

    /// Lower-case substrings of the page URL that earn the page bonus.
    #[serde(default = "default_page_tokens")]
    pub page_tokens: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            weights: CategoryWeights::default(),
            combination_bonus: default_combination_bonus(),
            page_bonus: default_page_bonus(),
            page_tokens: default_page_tokens(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    #[serde(default = "default_ten")]
    pub personal: u32,
    #[serde(default = "default_fifteen")]
    pub education: u32,
    #[serde(default = "default_fifteen")]
    pub income: u32,
    #[serde(default = "default_ten")]
    pub documents: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            personal: 10,
            education: 15,
            income: 15,
            documents: 10,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> u32 {
        match category {
            Category::Personal => self.personal,
            Category::Education => self.education,
            Category::Income => self.income,
            Category::Documents => self.documents,
        }
    }
}

// Serde default helpers
fn default_threshold() -> u32 { 40 }
fn default_combination_bonus() -> u32 { 20 }
fn default_page_bonus() -> u32 { 30 }
fn default_ten() -> u32 { 10 }
fn default_fifteen() -> u32 { 15 }
fn default_page_tokens() -> Vec<String> {
    [".gov", "scholarship", "benefit", "localhost", "127.0.0.1"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

// ============================================================================
// Scoring
// ============================================================================

/// Score one form's fields against the page URL.
pub fn score_form(
    key: FormKey,
    fields: Vec<FieldDescriptor>,
    page_url: &str,
    config: &ScoringConfig,
) -> FormDescriptor {
    let mut score: u32 = 0;
    let mut hits = BTreeSet::new();

    for field in &fields {
        for category in &field.categories {
            score += config.weights.weight(*category);
            hits.insert(*category);
        }
    }

    let kind = form_kind(&hits);
    if kind != FormKind::Unknown {
        score += config.combination_bonus;
    }

    score += page_bonus(page_url, config);

    FormDescriptor {
        key,
        fingerprint: fingerprint(&fields),
        fields,
        category_hits: hits,
        kind,
        confidence_score: score,
        accepted: score >= config.threshold,
        is_target_form: false,
    }
}

/// Education + personal reads as a scholarship form; income + personal as a
/// benefit form. Scholarship wins when both apply.
pub fn form_kind(hits: &BTreeSet<Category>) -> FormKind {
    if !hits.contains(&Category::Personal) {
        FormKind::Unknown
    } else if hits.contains(&Category::Education) {
        FormKind::Scholarship
    } else if hits.contains(&Category::Income) {
        FormKind::Benefit
    } else {
        FormKind::Unknown
    }
}

pub fn page_bonus(page_url: &str, config: &ScoringConfig) -> u32 {
    let url = page_url.to_lowercase();
    if config.page_tokens.iter().any(|t| url.contains(t.as_str())) {
        config.page_bonus
    } else {
        0
    }
}

/// Score every form on the page, accepted or not, in document order.
pub fn score_page<S: FormSurface + ?Sized>(surface: &S, config: &ScoringConfig) -> Vec<FormDescriptor> {
    let url = surface.page_url().to_string();
    scan_forms(surface)
        .into_iter()
        .map(|form| score_form(form.key, form.fields, &url, config))
        .collect()
}

/// Accepted forms sorted by descending score; the first is the target.
pub fn detect_forms<S: FormSurface + ?Sized>(surface: &S, config: &ScoringConfig) -> Vec<FormDescriptor> {
    rank(score_page(surface, config))
}

/// Keep accepted descriptors, order them by descending score (document order
/// breaks ties) and flag the winner as target.
pub fn rank(descriptors: Vec<FormDescriptor>) -> Vec<FormDescriptor> {
    let mut accepted: Vec<FormDescriptor> = descriptors.into_iter().filter(|d| d.accepted).collect();
    accepted.sort_by(|a, b| b.confidence_score.cmp(&a.confidence_score));

    for (i, descriptor) in accepted.iter_mut().enumerate() {
        descriptor.is_target_form = i == 0;
    }

    accepted
}

/// The highest-scoring accepted form.
pub fn select_target(descriptors: &[FormDescriptor]) -> Option<&FormDescriptor> {
    descriptors
        .iter()
        .filter(|d| d.accepted)
        .fold(None, |best: Option<&FormDescriptor>, d| match best {
            Some(b) if b.confidence_score >= d.confidence_score => Some(b),
            _ => Some(d),
        })
}

pub fn fingerprint(fields: &[FieldDescriptor]) -> String {
    let mut hasher = Sha1::new();
    for field in fields {
        hasher.update(format!("{}|{}|{:?};", field.name, field.id, field.control_type).as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Site check
// ============================================================================

const GOVERNMENT_HOSTS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    ".gov",
    ".gov.in",
    "scholarships.gov.in",
    "ssp.postmatric.karnataka.gov.in",
    "karepass.cgg.gov.in",
];

/// Whether a URL belongs to a known government or local test site.
pub fn is_government_site(url: &str) -> bool {
    let url = url.to_lowercase();
    GOVERNMENT_HOSTS.iter().any(|h| url.contains(h))
}
