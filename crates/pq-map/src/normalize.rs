//! Header text normalization.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const PHASE_FOLDS: [(&str, &str); 3] = [("l1 n", "l1n"), ("l2 n", "l2n"), ("l3 n", "l3n")];

/// Normalizes a raw header for keyword matching.
///
/// Diacritics are stripped (NFKD, combining marks dropped), text is
/// lowercased, every run of characters outside `[a-z0-9]` becomes a single
/// space, the result is trimmed and the phase tokens `l1 n`, `l2 n`, `l3 n`
/// are folded to `l1n`, `l2n`, `l3n`.
///
/// The function is idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let lowered = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);

    let mut key = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in lowered {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            key.push(c);
        } else {
            pending_space = true;
        }
    }

    for (from, to) in PHASE_FOLDS {
        if key.contains(from) {
            key = key.replace(from, to);
        }
    }
    key
}

/// Number of space-separated words in a normalized key.
pub fn word_count(key: &str) -> usize {
    key.split_whitespace().count()
}
