use crate::profile::form_data::FormData;
use crate::profile::format::format_for_control;
use crate::screen::field_model::{ControlType, FieldDescriptor};

/// Where a pattern looks for its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A profile key.
    Key(&'static str),
    /// First word of `fullName`.
    FirstOfFullName,
    /// `fullName` minus its first word.
    RestOfFullName,
    /// Fixed value used when the profile has nothing better.
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Mapping {
    pub pattern: &'static str,
    pub sources: &'static [Source],
}

use Source::{FirstOfFullName, Key, Literal, RestOfFullName};

const fn map(pattern: &'static str, sources: &'static [Source]) -> Mapping {
    Mapping { pattern, sources }
}

/// Pattern → profile sources, checked in this order against the field
/// signature. A pattern that is a substring of another must come after it
/// (`fullname` contains `lname`, `schoolname` contains `lname`,
/// `percentage` contains `age`).
pub const FIELD_MAPPINGS: &[Mapping] = &[
    // Personal
    map("fullname", &[Key("fullName"), Key("name")]),
    map("fathername", &[Key("fatherName"), Key("father")]),
    map("mothername", &[Key("motherName"), Key("mother")]),
    map("father", &[Key("fatherName")]),
    map("mother", &[Key("motherName")]),
    map("accountholder", &[Key("accountHolderName"), Key("fullName"), Key("name")]),
    // Institutions before the name parts they contain
    map("school", &[Key("school")]),
    map("college", &[Key("university"), Key("college")]),
    map("university", &[Key("university")]),
    map("preferredinstitute", &[Key("preferredInstitute")]),
    map("firstname", &[Key("firstName"), FirstOfFullName]),
    map("fname", &[Key("firstName"), FirstOfFullName]),
    map("lastname", &[Key("lastName"), RestOfFullName]),
    map("lname", &[Key("lastName"), RestOfFullName]),
    map("email", &[Key("email")]),
    map("mobile", &[Key("mobile"), Key("phone")]),
    map("phone", &[Key("phone"), Key("mobile")]),
    map("dateofbirth", &[Key("dateOfBirth"), Key("dob")]),
    map("dob", &[Key("dob"), Key("dateOfBirth")]),
    map("birth", &[Key("dob"), Key("dateOfBirth")]),
    map("gender", &[Key("gender")]),
    map("address", &[Key("address")]),
    map("district", &[Key("district"), Key("city")]),
    map("city", &[Key("city")]),
    map("pincode", &[Key("pincode")]),
    map("zip", &[Key("pincode")]),
    map("state", &[Key("state")]),
    // Education
    map("education", &[Key("education")]),
    map("qualification", &[Key("education")]),
    map("class", &[Key("class"), Key("currentClass")]),
    map("course", &[Key("course")]),
    map("marks", &[Key("marks")]),
    map("percentage", &[Key("percentage")]),
    map("cgpa", &[Key("cgpa")]),
    map("yearofpassing", &[Key("yearOfPassing"), Literal("2024")]),
    // Financial
    map("banknumber", &[Key("bankAccount"), Key("accountNumber")]),
    map("bankaccount", &[Key("bankAccount"), Key("accountNumber")]),
    map("account", &[Key("bankAccount")]),
    map("ifsccode", &[Key("ifscCode"), Key("ifsc")]),
    map("ifsc", &[Key("ifscCode"), Key("ifsc")]),
    map("income", &[Key("income"), Key("familyIncome"), Key("annualIncome")]),
    map("annual", &[Key("annualIncome"), Key("income")]),
    map("family", &[Key("familyIncome"), Key("income")]),
    map("salary", &[Key("annualIncome"), Key("income")]),
    // Research
    map("researcharea", &[Key("researchArea")]),
    map(
        "researchproposal",
        &[
            Key("researchProposal"),
            Literal("Research proposal summary will be provided separately."),
        ],
    ),
    map("research", &[Key("researchArea")]),
    map("supervisor", &[Key("supervisor")]),
    map("publications", &[Key("publications")]),
    map("experience", &[Key("experience")]),
    map("awards", &[Key("awards")]),
    map("examscores", &[Key("examScores")]),
    map("category", &[Key("category")]),
    map("age", &[Key("age")]),
];

/// Pattern name reported when the generic name fallback supplied the value.
pub const NAME_FALLBACK: &str = "name";

/// Outcome of mapping one field onto the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// `pattern` matched and produced a value usable for the control.
    Value { pattern: &'static str, value: String },
    /// `pattern` matched but formatting rejected the value for this control.
    Rejected { pattern: &'static str },
    /// No pattern produced a value.
    Unmatched,
}

impl Resolution {
    pub fn value(&self) -> Option<&str> {
        match self {
            Resolution::Value { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            Resolution::Value { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            Resolution::Value { pattern, .. } | Resolution::Rejected { pattern } => Some(*pattern),
            Resolution::Unmatched => None,
        }
    }
}

/// The value to write into `field`, if any.
pub fn resolve_value(field: &FieldDescriptor, data: &FormData) -> Option<String> {
    resolve(&field.signature(), field.control_type, data).into_value()
}

/// Map a field signature onto the profile.
///
/// The first pattern that occurs in the signature *and* has a present source
/// decides the outcome; its value is then formatted for `control_type`, and
/// a rejected format does not fall through to later patterns. Any field whose
/// signature mentions "email" only takes values containing `@`.
pub fn resolve(signature: &str, control_type: ControlType, data: &FormData) -> Resolution {
    let signature = signature.to_lowercase();
    let wants_email = signature.contains("email");

    for mapping in FIELD_MAPPINGS {
        if !signature.contains(mapping.pattern) {
            continue;
        }

        if let Some(raw) = first_present(mapping.sources, data) {
            return finish(mapping.pattern, &raw, control_type, wants_email);
        }
    }

    if signature.contains("name") && !signature.contains("father") && !signature.contains("mother") {
        if let Some(full) = data.full_name() {
            return finish(NAME_FALLBACK, full, control_type, wants_email);
        }
    }

    Resolution::Unmatched
}

fn first_present(sources: &[Source], data: &FormData) -> Option<String> {
    sources.iter().find_map(|source| match source {
        Source::Key(key) => data.get(key).map(str::to_string),
        Source::FirstOfFullName => data.first_name_from_full().map(str::to_string),
        Source::RestOfFullName => data.last_name_from_full(),
        Source::Literal(value) => Some(value.to_string()),
    })
}

fn finish(pattern: &'static str, raw: &str, control_type: ControlType, wants_email: bool) -> Resolution {
    // Plain text inputs named like an email get the same check as type=email,
    // even when an earlier pattern (school, father, ...) matched.
    if wants_email && !raw.contains('@') {
        return Resolution::Rejected { pattern };
    }

    match format_for_control(raw, control_type) {
        Some(value) => Resolution::Value { pattern, value },
        None => Resolution::Rejected { pattern },
    }
}
