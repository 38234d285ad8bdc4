//! URL tag classification.

/// Tag used when no rule matches.
pub const FALLBACK_TAG: &str = "Web";

/// Ordered rule table: any listed substring adds the tag.
const TAG_RULES: &[(&[&str], &str)] = &[
    (&["youtube", "vimeo"], "Video"),
    (&["github", "stackoverflow"], "Code"),
    (&["amazon", "ebay"], "Shopping"),
    (&["medium", "dev.to"], "Article"),
    (&["spotify", "music"], "Music"),
];

/// Derive category tags for a raw URL.
///
/// Rules are evaluated independently, so a URL can carry several tags. The
/// result is never empty.
pub fn classify(url: &str) -> Vec<String> {
    let lower = url.to_lowercase();

    let tags: Vec<String> = TAG_RULES
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, tag)| (*tag).to_string())
        .collect();

    if tags.is_empty() {
        vec![FALLBACK_TAG.to_string()]
    } else {
        tags
    }
}
