use std::collections::BTreeSet;

use crate::screen::field_model::Category;

pub const PERSONAL_KEYWORDS: &[&str] = &[
    "name", "fname", "lname", "firstname", "lastname", "fullname",
    "email", "phone", "mobile", "address", "city",
    "state", "pincode", "zip", "dob", "birth", "dateofbirth",
    "gender", "father", "mother", "guardian",
];

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "education", "qualification", "degree", "school",
    "college", "university", "marks", "percentage",
    "grade", "class", "course", "subject", "board", "cgpa",
];

pub const INCOME_KEYWORDS: &[&str] = &[
    "income", "salary", "earning", "annual",
    "monthly", "family", "parent", "occupation",
    "employment", "job", "profession",
];

pub const DOCUMENT_KEYWORDS: &[&str] = &[
    "document", "certificate", "upload", "file",
    "attachment", "proof", "copy", "scan", "bank", "ifsc",
];

pub fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Personal => PERSONAL_KEYWORDS,
        Category::Education => EDUCATION_KEYWORDS,
        Category::Income => INCOME_KEYWORDS,
        Category::Documents => DOCUMENT_KEYWORDS,
    }
}

const ALL_CATEGORIES: [Category; 4] = [
    Category::Personal,
    Category::Education,
    Category::Income,
    Category::Documents,
];

/// Tag a field signature with every category one of whose keywords it
/// contains. Deliberately high-recall: a false hit only inflates a score.
pub fn classify(signature: &str) -> BTreeSet<Category> {
    let text = signature.to_lowercase();

    ALL_CATEGORIES
        .into_iter()
        .filter(|category| keywords(*category).iter().any(|k| text.contains(k)))
        .collect()
}
