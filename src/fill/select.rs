use crate::dom::surface::SelectOption;

/// Pick the option a resolved value refers to.
///
/// Exact case-insensitive match on value or visible text first. Failing that,
/// the first option whose non-empty text contains the value or is contained
/// in it. The fuzzy pass is order-sensitive: `"M"` lands on whichever of
/// `Male`/`Female` is listed first.
pub fn match_option(options: &[SelectOption], value: &str) -> Option<usize> {
    let wanted = value.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let exact = options.iter().position(|o| {
        o.value.to_lowercase() == wanted || o.text.to_lowercase() == wanted
    });
    if exact.is_some() {
        return exact;
    }

    options.iter().position(|o| {
        let text = o.text.trim().to_lowercase();
        !text.is_empty() && (text.contains(&wanted) || wanted.contains(&text))
    })
}
