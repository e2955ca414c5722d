use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

// Word characters are ASCII only, so letters the decomposition cannot fold
// (CJK, Cyrillic, ...) are dropped along with punctuation.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Combining Diacritical Marks block
fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Turn a title into the path segment the mirror is expected to use.
///
/// Lowercases, decomposes (NFD) and drops diacritics, removes anything that
/// is not a word character, whitespace or `-`, trims, then joins the
/// remaining words with single hyphens. Distinct titles may share a slug.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .collect();

    let stripped = DISALLOWED.replace_all(&folded, "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), "-")
        .into_owned()
}
