//! Pluralization for log messages.

/// `"s"` unless `n == 1`.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Count followed by the noun, pluralized when `count != 1`.
///
/// Handles the consonant + `y` ending (`category` → `categories`); every
/// other noun just gets an `s`.
///
/// - `plural_count(1, "topic")` -> `"1 topic"`
/// - `plural_count(2, "empty category")` -> `"2 empty categories"`
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        return format!("{count} {noun}");
    }
    match noun.strip_suffix('y') {
        Some(stem) if stem.ends_with(|c: char| !"aeiou".contains(c)) => {
            format!("{count} {stem}ies")
        }
        _ => format!("{count} {noun}s"),
    }
}
