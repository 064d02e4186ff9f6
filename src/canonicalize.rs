//! Text canonicalization: raw reference/hypothesis strings into normalized
//! token sequences.
//!
//! The canonical form is the unit of comparison everywhere downstream, so
//! reference and hypothesis must go through this identical pipeline. Order
//! matters: shorthand expansion has to see the original symbols, apostrophe
//! stripping has to run before punctuation is blanked, and value mapping
//! runs last so fused patterns match the spoken word forms.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([$€£])\s*(\d+(?:\.\d+)?)").expect("valid currency regex"));

static DEGREE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*°\s*([cf])").expect("valid degree regex"));

static APOSTROPHE_JOIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)['’](\w)").expect("valid apostrophe regex"));

/// Multi-word sequences the recognizer commonly splits, fused back into the
/// single token the reference side produces. Matched left-to-right,
/// longest pattern first at each position, so triples are listed before
/// pairs.
const FUSED_PATTERNS: &[(&[&str], &str)] = &[
    (&["should", "n", "t"], "shouldnt"),
    (&["would", "n", "t"], "wouldnt"),
    (&["could", "n", "t"], "couldnt"),
    (&["they", "re"], "theyre"),
    (&["you", "re"], "youre"),
    (&["we", "re"], "were"),
    (&["they", "ve"], "theyve"),
    (&["you", "ve"], "youve"),
    (&["we", "ve"], "weve"),
    (&["they", "ll"], "theyll"),
    (&["you", "ll"], "youll"),
    (&["we", "ll"], "well"),
    (&["i", "m"], "im"),
    (&["i", "ve"], "ive"),
    (&["i", "ll"], "ill"),
    (&["i", "d"], "id"),
    (&["don", "t"], "dont"),
    (&["can", "t"], "cant"),
    (&["won", "t"], "wont"),
    (&["didn", "t"], "didnt"),
    (&["doesn", "t"], "doesnt"),
    (&["isn", "t"], "isnt"),
    (&["aren", "t"], "arent"),
    (&["wasn", "t"], "wasnt"),
    (&["weren", "t"], "werent"),
    (&["hasn", "t"], "hasnt"),
    (&["haven", "t"], "havent"),
    (&["hadn", "t"], "hadnt"),
    (&["couldn", "t"], "couldnt"),
    (&["shouldn", "t"], "shouldnt"),
    (&["wouldn", "t"], "wouldnt"),
    (&["it", "s"], "its"),
    (&["that", "s"], "thats"),
    (&["what", "s"], "whats"),
    (&["there", "s"], "theres"),
    (&["let", "s"], "lets"),
    (&["o", "clock"], "oclock"),
    (&["can", "not"], "cannot"),
    (&["rain", "forest"], "rainforest"),
    (&["ice", "cream"], "icecream"),
    (&["good", "bye"], "goodbye"),
    (&["every", "one"], "everyone"),
    (&["every", "thing"], "everything"),
    (&["some", "one"], "someone"),
    (&["some", "thing"], "something"),
    (&["any", "one"], "anyone"),
    (&["any", "thing"], "anything"),
];

/// Token-level canonical values: spelled-out small numbers, currency words,
/// unit words. Anything absent keeps its surface form.
static CANONICAL_VALUES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("zero", "0"),
        ("one", "1"),
        ("two", "2"),
        ("three", "3"),
        ("four", "4"),
        ("five", "5"),
        ("six", "6"),
        ("seven", "7"),
        ("eight", "8"),
        ("nine", "9"),
        ("ten", "10"),
        ("eleven", "11"),
        ("twelve", "12"),
        ("thirteen", "13"),
        ("fourteen", "14"),
        ("fifteen", "15"),
        ("sixteen", "16"),
        ("seventeen", "17"),
        ("eighteen", "18"),
        ("nineteen", "19"),
        ("twenty", "20"),
        ("thirty", "30"),
        ("forty", "40"),
        ("fifty", "50"),
        ("sixty", "60"),
        ("seventy", "70"),
        ("eighty", "80"),
        ("ninety", "90"),
        ("hundred", "100"),
        ("thousand", "1000"),
        ("dollar", "usd"),
        ("dollars", "usd"),
        ("bucks", "usd"),
        ("euro", "eur"),
        ("euros", "eur"),
        ("pound", "gbp"),
        ("pounds", "gbp"),
        ("degrees", "degree"),
        ("centigrade", "celsius"),
        ("kilometer", "km"),
        ("kilometers", "km"),
        ("kilometre", "km"),
        ("kilometres", "km"),
        ("kilogram", "kg"),
        ("kilograms", "kg"),
    ])
});

/// Turn raw text into its canonical token sequence.
///
/// Lowercases and folds diacritics, expands currency/degree shorthand into
/// word form, strips apostrophe joins, blanks remaining punctuation, splits
/// into words, fuses known multi-word patterns, and maps tokens through the
/// canonical-value table. Empty or whitespace-only input yields an empty
/// sequence.
pub fn canonicalize(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // NFKD first so compatibility forms (℃ and friends) decompose before
    // lowercasing, then drop combining marks to fold diacritics.
    let folded: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = folded.to_lowercase();

    let expanded = CURRENCY_RE.replace_all(&lowered, |caps: &Captures| {
        let unit = match &caps[1] {
            "$" => "usd",
            "€" => "eur",
            _ => "gbp",
        };
        format!("{} {}", &caps[2], unit)
    });
    let expanded = DEGREE_RE.replace_all(&expanded, |caps: &Captures| {
        let scale = if &caps[2] == "c" { "celsius" } else { "fahrenheit" };
        format!("{} degree {}", &caps[1], scale)
    });

    // Apostrophe joins can chain ("y'all's"), so run to a fixed point.
    let mut joined = expanded.into_owned();
    loop {
        let next = APOSTROPHE_JOIN_RE.replace_all(&joined, "$1$2").into_owned();
        if next == joined {
            break;
        }
        joined = next;
    }

    // Hyphen variants and every remaining punctuation/symbol become spaces.
    let spaced: String = joined
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let words: Vec<&str> = spaced.unicode_words().collect();

    fuse(&words)
        .into_iter()
        .map(|token| match CANONICAL_VALUES.get(token.as_str()) {
            Some(mapped) => (*mapped).to_string(),
            None => token,
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Merge known multi-word patterns into single fused tokens, left to right,
/// preferring the longest pattern at each position.
fn fuse(words: &[&str]) -> Vec<String> {
    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let fused = FUSED_PATTERNS.iter().find(|(pattern, _)| {
            words.len() - i >= pattern.len()
                && pattern.iter().zip(&words[i..]).all(|(p, w)| p == w)
        });
        match fused {
            Some((pattern, replacement)) => {
                out.push((*replacement).to_string());
                i += pattern.len();
            }
            None => {
                out.push(words[i].to_string());
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(canonicalize("").is_empty());
        assert!(canonicalize("   \t\n  ").is_empty());
    }

    #[test]
    fn test_lowercase_and_punctuation() {
        assert_eq!(canonicalize("Hello, World!"), vec!["hello", "world"]);
        assert_eq!(canonicalize("...cat..."), vec!["cat"]);
    }

    #[test]
    fn test_diacritics_folded() {
        assert_eq!(canonicalize("Café"), vec!["cafe"]);
        assert_eq!(canonicalize("señor"), vec!["senor"]);
    }

    #[test]
    fn test_contraction_apostrophe() {
        assert_eq!(canonicalize("They're here"), vec!["theyre", "here"]);
        assert_eq!(canonicalize("the cat's toy"), vec!["the", "cats", "toy"]);
    }

    #[test]
    fn test_chained_apostrophes() {
        assert_eq!(canonicalize("y'all's"), vec!["yalls"]);
    }

    #[test]
    fn test_split_contraction_fused() {
        assert_eq!(canonicalize("they re here"), vec!["theyre", "here"]);
        assert_eq!(canonicalize("don t go"), vec!["dont", "go"]);
        assert_eq!(canonicalize("should n t"), vec!["shouldnt"]);
    }

    #[test]
    fn test_compound_fused() {
        assert_eq!(
            canonicalize("The rain forest is lush"),
            vec!["the", "rainforest", "is", "lush"]
        );
        assert_eq!(
            canonicalize("The rainforest is lush"),
            vec!["the", "rainforest", "is", "lush"]
        );
    }

    #[test]
    fn test_hyphens_split() {
        assert_eq!(canonicalize("well-known"), vec!["well", "known"]);
        assert_eq!(canonicalize("state–of–the–art"), vec!["state", "of", "the", "art"]);
    }

    #[test]
    fn test_currency_shorthand() {
        assert_eq!(canonicalize("$5"), vec!["5", "usd"]);
        assert_eq!(canonicalize("it costs €12.50 now"), vec!["it", "costs", "12", "50", "eur", "now"]);
        assert_eq!(canonicalize("five dollars"), vec!["5", "usd"]);
    }

    #[test]
    fn test_degree_shorthand() {
        assert_eq!(canonicalize("25°C"), vec!["25", "degree", "celsius"]);
        assert_eq!(canonicalize("98.6 °F"), vec!["98", "6", "degree", "fahrenheit"]);
        assert_eq!(
            canonicalize("twenty degrees centigrade"),
            vec!["20", "degree", "celsius"]
        );
    }

    #[test]
    fn test_number_words_mapped() {
        assert_eq!(canonicalize("two cats"), vec!["2", "cats"]);
        assert_eq!(canonicalize("ninety nine"), vec!["90", "9"]);
    }

    #[test]
    fn test_unit_words_mapped() {
        assert_eq!(canonicalize("ten kilometers"), vec!["10", "km"]);
    }

    #[test]
    fn test_identical_for_reference_and_hypothesis() {
        // The same surface text always canonicalizes the same way.
        let a = canonicalize("They're going to the rain forest");
        let b = canonicalize("they re going to the rain forest");
        assert_eq!(a, b);
    }
}
