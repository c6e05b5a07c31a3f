//! Heading anchor ids.

use rustc_hash::FxHashSet;

/// Id used when a heading slugifies to nothing (e.g. `"???"`).
const EMPTY_SLUG: &str = "section";

/// Convert heading text to a URL fragment.
///
/// Text is transliterated to ASCII, lowercased, stripped of everything but
/// word characters, whitespace and hyphens, then runs of whitespace/hyphens
/// become a single `-`. Leading and trailing `-`/`_` are trimmed.
///
/// # Examples
/// ```ignore
/// slugify("Risk Factors")        -> "risk-factors"
/// slugify("Crohn's Disease")     -> "crohns-disease"
/// slugify("Ménière's  disease")  -> "menieres-disease"
/// slugify("Home-Care")           -> "home-care"
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut in_separator = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            in_separator = false;
        } else if c == '-' || c.is_ascii_whitespace() {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        }
    }

    slug.trim_matches(['-', '_']).to_owned()
}

/// Issues unique anchor ids within one rendered document.
#[derive(Debug, Default)]
pub struct AnchorSet {
    used: FxHashSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an id for `text`, suffixing `-1`, `-2`, … until it is unused.
    ///
    /// The suffix counter starts over for every heading, so a heading whose
    /// own slug already ends in `-1` can end up as `…-1-1`.
    pub fn claim(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = EMPTY_SLUG.to_owned();
        }

        let mut id = base.clone();
        let mut counter = 1;
        while self.used.contains(&id) {
            id = format!("{base}-{counter}");
            counter += 1;
        }

        self.used.insert(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Risk Factors"), "risk-factors");
        assert_eq!(slugify("Crohn's Disease"), "crohns-disease");
        assert_eq!(slugify("Home-Care"), "home-care");
        assert_eq!(slugify("  FAQs  "), "faqs");
        assert_eq!(slugify("A - B"), "a-b");
        assert_eq!(slugify("_private_"), "private");
        assert_eq!(slugify("snake_case name"), "snake_case-name");
        assert_eq!(slugify("Ménière's disease"), "menieres-disease");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_claim_suffixes() {
        let mut anchors = AnchorSet::new();
        assert_eq!(anchors.claim("Symptoms"), "symptoms");
        assert_eq!(anchors.claim("Symptoms"), "symptoms-1");
        assert_eq!(anchors.claim("Symptoms"), "symptoms-2");
    }

    #[test]
    fn test_claim_suffix_restarts_per_heading() {
        let mut anchors = AnchorSet::new();
        assert_eq!(anchors.claim("A"), "a");
        assert_eq!(anchors.claim("A"), "a-1");
        assert_eq!(anchors.claim("A 1"), "a-1-1");
    }

    #[test]
    fn test_claim_empty_slug() {
        let mut anchors = AnchorSet::new();
        assert_eq!(anchors.claim("!!!"), "section");
        assert_eq!(anchors.claim("???"), "section-1");
    }
}
