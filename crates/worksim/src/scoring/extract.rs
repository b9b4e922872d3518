//! Leaf-level heuristics over a single field. All of them are total: absent
//! or empty input yields zero/false, never an error.

/// Trimmed, lowercased, non-blank entries of a configured word list.
fn needles<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| keyword.as_ref().trim().to_lowercase())
        .filter(|needle| !needle.is_empty())
        .collect()
}

/// Fraction of `keywords` appearing in `text` (case-insensitive substring), in `[0, 1]`.
/// Blank keywords are ignored.
pub fn keyword_coverage<S: AsRef<str>>(text: Option<&str>, keywords: &[S]) -> f32 {
    let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
        return 0.0;
    };
    let needles = needles(keywords);
    if needles.is_empty() {
        return 0.0;
    }

    let haystack = text.to_lowercase();
    let found = needles
        .iter()
        .filter(|needle| haystack.contains(needle.as_str()))
        .count();

    (found as f32 / needles.len() as f32).clamp(0.0, 1.0)
}

/// Like [`keyword_coverage`] but only whole words count, so `is` does not match `this`.
pub fn word_coverage<S: AsRef<str>>(text: Option<&str>, words: &[S]) -> f32 {
    let Some(text) = text else {
        return 0.0;
    };
    let words = needles(words);
    if words.is_empty() {
        return 0.0;
    }

    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect();

    let found = words
        .iter()
        .filter(|word| tokens.iter().any(|token| token == *word))
        .count();

    (found as f32 / words.len() as f32).clamp(0.0, 1.0)
}

pub fn meets_min_length(text: Option<&str>, min_chars: usize) -> bool {
    text.map(|text| text.trim().chars().count() >= min_chars)
        .unwrap_or(false)
}

/// Character count relative to `target_chars`, saturating at 1.
pub fn length_score(text: Option<&str>, target_chars: usize) -> f32 {
    let len = text.map(|text| text.trim().chars().count()).unwrap_or(0);
    if target_chars == 0 {
        return if len > 0 { 1.0 } else { 0.0 };
    }
    (len as f32 / target_chars as f32).clamp(0.0, 1.0)
}

/// Item count relative to `minimum`, saturating at 1.
pub fn list_score<T>(items: &[T], minimum: usize) -> f32 {
    if minimum == 0 {
        return 1.0;
    }
    (items.len() as f32 / minimum as f32).clamp(0.0, 1.0)
}

/// Parses money-ish input such as `$1,299.00` or `249 USD`.
pub fn parse_amount(text: Option<&str>) -> Option<f64> {
    let cleaned: String = text?
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
