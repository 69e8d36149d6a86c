use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::catalog::ALPHABET;

const COMBINING_TILDE: char = '\u{0303}';

/// Folds text for comparison: lowercase, accents stripped, whitespace collapsed.
/// `ñ` is a letter of its own in Spanish and survives folding.
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    let mut prev: Option<char> = None;

    for c in text.nfd() {
        if is_combining_mark(c) {
            if c == COMBINING_TILDE && prev == Some('n') {
                folded.pop();
                folded.push('ñ');
                prev = Some('ñ');
            }
            continue;
        }
        for lower in c.to_lowercase() {
            folded.push(lower);
            prev = Some(lower);
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Letter group a lemma is filed under, `#` when it starts outside the alphabet.
pub fn letter_for(lemma: &str) -> char {
    normalize(lemma)
        .chars()
        .find(|c| c.is_alphabetic())
        .filter(|c| ALPHABET.contains(c))
        .unwrap_or('#')
}

/// Sort key for already-normalized text that files `ñ` between `n` and `o`.
pub fn collation_key(normalized: &str) -> Vec<u32> {
    normalized
        .chars()
        .map(|c| match c {
            'ñ' => ('n' as u32) * 2 + 1,
            other => (other as u32) * 2,
        })
        .collect()
}
