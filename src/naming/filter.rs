//! Character-level sanitization of raw file names.

use std::borrow::Cow;

use crate::config::FdfConfig;

/// Replaces every character outside an allowed set with a single replacement
/// character. The result has the same number of characters as the input.
#[derive(Debug, Clone)]
pub struct NameFilter {
    allowed_punctuation: Vec<char>,
    replacement: char,
}

impl NameFilter {
    /// ASCII alphanumerics are always allowed; `allowed_punctuation` adds to them.
    pub fn new(allowed_punctuation: &str, replacement: char) -> Self {
        Self {
            allowed_punctuation: allowed_punctuation.chars().collect(),
            replacement,
        }
    }

    pub fn from_config(config: &FdfConfig) -> Self {
        Self::new(&config.allowed_punctuation, config.replacement_char)
    }

    pub fn is_allowed(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.allowed_punctuation.contains(&c)
    }

    pub fn replacement(&self) -> char {
        self.replacement
    }

    /// Sanitizes `raw`. Returns `Cow::Borrowed` when nothing had to change, so
    /// callers can tell a clean name from a renamed one.
    pub fn apply<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if raw.chars().all(|c| self.is_allowed(c)) {
            return Cow::Borrowed(raw);
        }
        Cow::Owned(
            raw.chars()
                .map(|c| if self.is_allowed(c) { c } else { self.replacement })
                .collect(),
        )
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::from_config(&FdfConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_is_borrowed() {
        let filter = NameFilter::default();
        let out = filter.apply("price.__categories__.txt");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "price.__categories__.txt");
    }

    #[test]
    fn test_disallowed_chars_are_replaced_in_place() {
        let filter = NameFilter::default();
        let out = filter.apply("test#%x.__categories__.txt");
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(out, "test--x.__categories__.txt");
    }

    #[test]
    fn test_char_count_is_preserved_for_non_ascii() {
        let filter = NameFilter::new("-_.", '_');
        let raw = "größe.txt";
        let out = filter.apply(raw);
        assert_eq!(out, "gr__e.txt");
        assert_eq!(out.chars().count(), raw.chars().count());
    }

    #[test]
    fn test_custom_punctuation() {
        let filter = NameFilter::new("-_.+", '-');
        assert_eq!(filter.apply("a+b.txt"), "a+b.txt");
        assert_eq!(filter.apply("a b.txt"), "a-b.txt");
    }
}
