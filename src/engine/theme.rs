//! Domain to theme resolution.

use crate::models::{ThemeFamily, ThemeStyles};

/// Ordered rule table; the first family with a matching substring wins.
const THEME_RULES: &[(&[&str], ThemeFamily)] = &[
    (&["youtube", "netflix", "cnn"], ThemeFamily::Red),
    (&["spotify", "medium", "whatsapp"], ThemeFamily::Green),
    (&["github", "stackoverflow", "vercel"], ThemeFamily::Slate),
    (&["amazon", "etsy"], ThemeFamily::Orange),
];

/// Pick the theme family for a domain.
pub fn resolve_family(domain: &str) -> ThemeFamily {
    let lower = domain.to_lowercase();

    THEME_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map(|(_, family)| *family)
        .unwrap_or_default()
}

/// Resolve the style bundle for a domain. Total: unknown domains get blue.
pub fn resolve_theme(domain: &str) -> ThemeStyles {
    resolve_family(domain).styles()
}
