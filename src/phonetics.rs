//! Phonetic key resolution for homophone-tolerant matching.
//!
//! Keys come from a curated homophone-cluster table first (dialectal mergers
//! included), then from a cheap letter-reduction heuristic. Two tokens are
//! phonetically equivalent iff both resolve to the same non-empty key. A
//! token the heuristic cannot reduce gets no key at all — conservative by
//! construction: no key beats a wrong key, because a wrong key silently
//! bridges unrelated words.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::trace;

/// An approximate pronunciation fingerprint for one canonical token.
///
/// Equality of keys is equality of `value`; `confident` records whether the
/// key came from the curated table (confident) or the reduction heuristic
/// (not), and is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneticKey {
    pub value: String,
    pub confident: bool,
}

/// Curated homophone clusters over canonical tokens. Number-word members
/// appear in digit form because the canonicalizer maps them before lookup.
/// Cluster keys are '@'-prefixed so a heuristic reduction (which never
/// produces '@') cannot collide with one.
const HOMOPHONE_CLUSTERS: &[&[&str]] = &[
    &["their", "there", "theyre"],
    &["threw", "through", "thru"],
    &["to", "too", "2"],
    &["for", "fore", "4"],
    &["ate", "8"],
    &["won", "1"],
    &["cot", "caught"],
    &["hear", "here"],
    &["wear", "where", "ware"],
    &["by", "buy", "bye"],
    &["know", "no"],
    &["knight", "night"],
    &["right", "write", "rite"],
    &["sea", "see"],
    &["son", "sun"],
    &["flour", "flower"],
    &["pair", "pear", "pare"],
    &["merry", "marry", "mary"],
    &["whole", "hole"],
    &["your", "youre"],
    &["weather", "whether"],
    &["principal", "principle"],
    &["allowed", "aloud"],
    &["board", "bored"],
    &["brake", "break"],
    &["piece", "peace"],
    &["plain", "plane"],
    &["role", "roll"],
    &["sale", "sail"],
    &["scene", "seen"],
    &["steal", "steel"],
    &["tail", "tale"],
    &["waist", "waste"],
    &["weak", "week"],
    &["which", "witch"],
    &["wood", "would"],
];

static CLUSTER_KEYS: Lazy<HashMap<&'static str, String>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for cluster in HOMOPHONE_CLUSTERS {
        let key = format!("@{}", cluster[0]);
        for word in *cluster {
            map.insert(*word, key.clone());
        }
    }
    map
});

/// Read-through memoization of resolved keys, bounded by observed
/// vocabulary. Concurrent readers are fine; inserts are idempotent, so
/// racing writers converge on the same entry.
static KEY_CACHE: Lazy<RwLock<HashMap<String, Option<PhoneticKey>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Resolve the phonetic key for a canonical token, or `None` when the token
/// has no useful reduction.
pub fn phonetic_key(token: &str) -> Option<PhoneticKey> {
    if let Ok(cache) = KEY_CACHE.read() {
        if let Some(hit) = cache.get(token) {
            return hit.clone();
        }
    }

    let resolved = resolve(token);
    trace!(token, key = ?resolved, "phonetic key resolved");
    if let Ok(mut cache) = KEY_CACHE.write() {
        cache
            .entry(token.to_string())
            .or_insert_with(|| resolved.clone());
    }
    resolved
}

fn resolve(token: &str) -> Option<PhoneticKey> {
    if let Some(key) = CLUSTER_KEYS.get(token) {
        return Some(PhoneticKey {
            value: key.clone(),
            confident: true,
        });
    }
    reduce(token).map(|value| PhoneticKey {
        value,
        confident: false,
    })
}

/// Letter-reduction heuristic: silent-cluster stripping, digraph folding,
/// then first-letter-plus-consonant-skeleton. An approximation of
/// pronunciation, not a phoneme transcription.
fn reduce(token: &str) -> Option<String> {
    let letters: String = token.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }

    let mut s = letters;
    // Silent leading letter: kn- gn- wr- ps- all sound like their second
    // letter alone.
    for prefix in ["kn", "gn", "wr", "ps"] {
        if s.starts_with(prefix) && s.len() > 2 {
            s.remove(0);
            break;
        }
    }
    s = s.replace("ph", "f");
    s = s.replace("ght", "t");
    s = s.replace("gh", "");
    s = s.replace("qu", "kw");
    s = s.replace("ck", "k");
    s = map_c(&s);
    s = s.replace('x', "ks");
    s = s.replace("tion", "shn");
    s = s.replace("sion", "shn");
    s = s.replace("tia", "sh");
    s = s.replace("tio", "sh");
    s = s.replace("dg", "j");
    s = collapse_repeats(&s);

    let mut chars = s.chars();
    let first = chars.next()?;
    let rest: String = chars
        .filter(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .map(|c| if c == 'w' { 'v' } else { c })
        .collect();
    Some(format!("{first}{rest}"))
}

/// 'c' is soft before e/i/y, hard otherwise.
fn map_c(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == 'c' {
            match chars.get(i + 1) {
                Some('e') | Some('i') | Some('y') => out.push('s'),
                _ => out.push('k'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn collapse_repeats(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if out.chars().last() != Some(c) {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(token: &str) -> Option<String> {
        phonetic_key(token).map(|k| k.value)
    }

    #[test]
    fn test_table_clusters_share_keys() {
        assert_eq!(key_of("their"), key_of("there"));
        assert_eq!(key_of("their"), key_of("theyre"));
        assert_eq!(key_of("threw"), key_of("through"));
        assert_eq!(key_of("cot"), key_of("caught"));
    }

    #[test]
    fn test_table_keys_are_confident() {
        assert!(phonetic_key("their").unwrap().confident);
        assert!(!phonetic_key("banana").unwrap().confident);
    }

    #[test]
    fn test_digit_clusters() {
        // The canonicalizer maps "two"/"eight"/"one" to digits before lookup.
        assert_eq!(key_of("2"), key_of("too"));
        assert_eq!(key_of("8"), key_of("ate"));
        assert_eq!(key_of("1"), key_of("won"));
    }

    #[test]
    fn test_no_false_bridge_to_unrelated_word() {
        // "coat" reduces heuristically and must not share the curated
        // cot/caught cluster key.
        assert_ne!(key_of("coat"), key_of("caught"));
        assert_ne!(key_of("coat"), key_of("cot"));
    }

    #[test]
    fn test_unreducible_tokens_have_no_key() {
        assert_eq!(phonetic_key("42"), None);
        assert_eq!(phonetic_key(""), None);
    }

    #[test]
    fn test_silent_leading_clusters() {
        assert_eq!(reduce("pseudo"), reduce("sudo"));
        assert_eq!(reduce("gnome"), reduce("nome"));
    }

    #[test]
    fn test_digraph_folds() {
        assert_eq!(reduce("phone"), reduce("fone"));
        assert_eq!(reduce("quick"), reduce("kwik"));
    }

    #[test]
    fn test_repeated_letters_collapse() {
        assert_eq!(reduce("letter"), reduce("leter"));
    }

    #[test]
    fn test_cache_is_idempotent() {
        let first = phonetic_key("stability");
        let second = phonetic_key("stability");
        assert_eq!(first, second);
    }
}
