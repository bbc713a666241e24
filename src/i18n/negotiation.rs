//! Accept-Language style locale negotiation.
//!
//! Preferences are parsed the way HTTP user agents send them
//! (`fr-CA;q=0.9,en;q=0.5,*;q=0.1`) and matched case-insensitively against
//! the supported locales. A supported locale matches an accepted entry when
//! the full tags are equal, when the entry's primary language equals the
//! supported tag, when the entry equals the supported tag's primary
//! language, or when the entry is the `*` wildcard (in that order of
//! specificity).

use regex::Regex;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::OnceLock;

static LANGUAGE_REGEX: OnceLock<Regex> = OnceLock::new();

fn language_regex() -> &'static Regex {
    LANGUAGE_REGEX.get_or_init(|| {
        Regex::new(r"^\s*([^\s\-;]+)(?:-([^\s;]+))?\s*(?:;(.*))?$").expect("Invalid language regex")
    })
}

/// A language preference: one `Accept-Language` value or an ordered list of
/// entries. Lists are joined with `,` before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference<'a>(Cow<'a, str>);

impl<'a> LanguagePreference<'a> {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for LanguagePreference<'a> {
    fn from(value: &'a str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for LanguagePreference<'a> {
    fn from(value: &'a String) -> Self {
        Self(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for LanguagePreference<'static> {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl<'a, S: AsRef<str>> From<&'a [S]> for LanguagePreference<'a> {
    fn from(values: &'a [S]) -> Self {
        Self(Cow::Owned(join(values)))
    }
}

impl<'a, S: AsRef<str>, const N: usize> From<&'a [S; N]> for LanguagePreference<'a> {
    fn from(values: &'a [S; N]) -> Self {
        Self(Cow::Owned(join(values)))
    }
}

impl<'a, S: AsRef<str>> From<&'a Vec<S>> for LanguagePreference<'a> {
    fn from(values: &'a Vec<S>) -> Self {
        Self(Cow::Owned(join(values)))
    }
}

fn join<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// One parsed `Accept-Language` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedLanguage {
    pub prefix: String,
    pub suffix: Option<String>,
    pub full: String,
    pub quality: f32,
    /// Position in the header
    pub index: usize,
}

fn parse_language(entry: &str, index: usize) -> Option<AcceptedLanguage> {
    let captures = language_regex().captures(entry)?;

    let prefix = captures.get(1)?.as_str().to_string();
    let suffix = captures.get(2).map(|m| m.as_str().to_string());
    let full = match &suffix {
        Some(suffix) => format!("{}-{}", prefix, suffix),
        None => prefix.clone(),
    };

    let mut quality = 1.0;
    if let Some(params) = captures.get(3) {
        for param in params.as_str().split(';') {
            let Some((key, value)) = param.trim().split_once('=') else {
                continue;
            };
            if key.trim() == "q" {
                quality = value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|q| q.is_finite())
                    .map_or(0.0, |q| q.clamp(0.0, 1.0));
                break;
            }
        }
    }

    Some(AcceptedLanguage {
        prefix,
        suffix,
        full,
        quality,
        index,
    })
}

/// Parse an `Accept-Language` value. Malformed entries are skipped.
pub fn parse_accept_language(header: &str) -> Vec<AcceptedLanguage> {
    header
        .split(',')
        .enumerate()
        .filter_map(|(index, entry)| parse_language(entry.trim(), index))
        .collect()
}

/// How well a supported locale matches one accepted entry.
#[derive(Debug, Clone, Copy)]
struct Priority {
    /// Position of the supported locale
    locale_index: usize,
    /// Position of the accepted entry, -1 when nothing matched
    order: isize,
    quality: f32,
    specificity: u8,
}

fn specify(locale: &str, accepted: &AcceptedLanguage, locale_index: usize) -> Option<Priority> {
    let parsed = parse_language(locale, 0)?;

    let accepted_full = accepted.full.to_lowercase();
    let locale_full = parsed.full.to_lowercase();

    let specificity = if accepted_full == locale_full {
        4
    } else if accepted.prefix.to_lowercase() == locale_full {
        2
    } else if accepted_full == parsed.prefix.to_lowercase() {
        1
    } else if accepted.full == "*" {
        0
    } else {
        return None;
    };

    Some(Priority {
        locale_index,
        order: accepted.index as isize,
        quality: accepted.quality,
        specificity,
    })
}

fn locale_priority(locale: &str, accepted: &[AcceptedLanguage], locale_index: usize) -> Priority {
    let mut best = Priority {
        locale_index,
        order: -1,
        quality: 0.0,
        specificity: 0,
    };

    for entry in accepted {
        let Some(candidate) = specify(locale, entry, locale_index) else {
            continue;
        };

        let better = match best.specificity.cmp(&candidate.specificity) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => match best.quality.total_cmp(&candidate.quality) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => best.order < candidate.order,
            },
        };
        if better {
            best = candidate;
        }
    }

    best
}

fn compare_priorities(a: &Priority, b: &Priority) -> Ordering {
    b.quality
        .total_cmp(&a.quality)
        .then_with(|| b.specificity.cmp(&a.specificity))
        .then_with(|| a.order.cmp(&b.order))
        .then_with(|| a.locale_index.cmp(&b.locale_index))
}

/// Order `supported` by preference, dropping locales the client does not
/// accept.
pub fn preferred_locales<'s, S: AsRef<str>>(header: &str, supported: &'s [S]) -> Vec<&'s str> {
    let accepted = parse_accept_language(header);

    let mut priorities: Vec<Priority> = supported
        .iter()
        .enumerate()
        .map(|(index, locale)| locale_priority(locale.as_ref(), &accepted, index))
        .filter(|priority| priority.quality > 0.0)
        .collect();
    priorities.sort_by(compare_priorities);

    priorities
        .into_iter()
        .map(|priority| supported[priority.locale_index].as_ref())
        .collect()
}

/// Best supported locale for a preference, `None` when nothing matches.
pub fn negotiate<'p, S: AsRef<str>>(
    preference: impl Into<LanguagePreference<'p>>,
    supported: &[S],
) -> Option<String> {
    let preference = preference.into();
    preferred_locales(preference.as_str(), supported)
        .first()
        .map(|locale| locale.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_simple_header() {
        let accepted = parse_accept_language("en-US,en;q=0.9,fr;q=0.8");

        assert_eq!(accepted.len(), 3);
        assert_eq!(accepted[0].full, "en-US");
        assert_eq!(accepted[0].prefix, "en");
        assert_eq!(accepted[0].suffix.as_deref(), Some("US"));
        assert_eq!(accepted[0].quality, 1.0);
        assert_eq!(accepted[1].full, "en");
        assert_eq!(accepted[1].quality, 0.9);
        assert_eq!(accepted[2].index, 2);
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let accepted = parse_accept_language(",  ,;q=1,de");
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].full, "de");
        assert_eq!(accepted[0].index, 3);
    }

    #[test]
    fn test_parse_invalid_quality_is_zero() {
        let accepted = parse_accept_language("fr;q=abc");
        assert_eq!(accepted[0].quality, 0.0);
    }

    #[test]
    fn test_parse_non_finite_quality_is_zero() {
        for header in ["fr;q=NaN", "fr;q=nan", "fr;q=inf", "fr;q=-inf"] {
            let accepted = parse_accept_language(header);
            assert_eq!(accepted[0].quality, 0.0, "{}", header);
        }
    }

    #[test]
    fn test_parse_quality_is_clamped() {
        assert_eq!(parse_accept_language("fr;q=2")[0].quality, 1.0);
        assert_eq!(parse_accept_language("fr;q=-0.5")[0].quality, 0.0);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_accept_language("").is_empty());
    }

    // ==================== Negotiation Tests ====================

    #[test]
    fn test_region_preference_matches_language() {
        let supported = ["en", "fr"];
        assert_eq!(
            negotiate("fr-CA;q=0.9,en;q=0.5", &supported).as_deref(),
            Some("fr")
        );
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let supported = ["en-GB", "en-US"];
        assert_eq!(negotiate("EN-us", &supported).as_deref(), Some("en-US"));
    }

    #[test]
    fn test_language_preference_matches_regional_locale() {
        let supported = ["pt-BR"];
        assert_eq!(negotiate("pt", &supported).as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_quality_ordering() {
        let supported = ["en", "de", "fr"];
        assert_eq!(
            negotiate("de;q=0.3,fr;q=0.8,en;q=0.5", &supported).as_deref(),
            Some("fr")
        );
    }

    #[test]
    fn test_wildcard_picks_first_supported() {
        let supported = ["es", "en"];
        assert_eq!(negotiate("*", &supported).as_deref(), Some("es"));
    }

    #[test]
    fn test_explicit_match_beats_wildcard() {
        let supported = ["es", "en"];
        assert_eq!(negotiate("*;q=0.5,en", &supported).as_deref(), Some("en"));
    }

    #[test]
    fn test_zero_quality_excludes_locale() {
        let supported = ["en", "fr"];
        assert_eq!(negotiate("en;q=0,fr;q=0.1", &supported).as_deref(), Some("fr"));
        assert_eq!(negotiate("en;q=0", &supported), None);
    }

    #[test]
    fn test_nan_quality_does_not_cancel_valid_entry() {
        let supported = ["en"];
        assert_eq!(negotiate("en,en;q=nan", &supported).as_deref(), Some("en"));
        assert_eq!(negotiate("en;q=nan,en", &supported).as_deref(), Some("en"));
        assert_eq!(negotiate("en;q=nan", &supported), None);
    }

    #[test]
    fn test_empty_list_returns_none() {
        let supported = ["en", "fr"];
        let empty: [&str; 0] = [];
        assert_eq!(negotiate(&empty, &supported), None);
        assert_eq!(negotiate("", &supported), None);
    }

    #[test]
    fn test_unmatched_returns_none() {
        let supported = ["en", "fr"];
        assert_eq!(negotiate(&["xx-unmatched"], &supported), None);
    }

    #[test]
    fn test_list_preference() {
        let supported = vec!["en".to_string(), "fr".to_string()];
        let preferences = vec!["de".to_string(), "fr;q=0.7".to_string(), "en;q=0.2".to_string()];
        assert_eq!(negotiate(&preferences, &supported).as_deref(), Some("fr"));
    }

    #[test]
    fn test_no_supported_locales() {
        let supported: Vec<String> = Vec::new();
        assert_eq!(negotiate("en", &supported), None);
    }

    #[test]
    fn test_preferred_locales_order() {
        let supported = ["en", "fr", "de"];
        assert_eq!(
            preferred_locales("de,fr;q=0.5", &supported),
            vec!["de", "fr"]
        );
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_result_is_supported(header in ".*") {
            let supported = ["en", "fr", "fr-CA", "de"];
            if let Some(locale) = negotiate(header.as_str(), &supported) {
                prop_assert!(supported.contains(&locale.as_str()));
            }
        }
    }
}
