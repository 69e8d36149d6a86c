use std::cmp::Ordering;

use super::types::MatchTier;
use crate::dictionary::normalize::{collation_key, normalize};
use crate::dictionary::Word;

/// A matched word with its precomputed sort key
pub struct Ranked<'w> {
    pub tier: MatchTier,
    key: Vec<u32>,
    pub word: &'w Word,
}

impl<'w> Ranked<'w> {
    pub fn new(tier: MatchTier, word: &'w Word) -> Self {
        Self { tier, key: collation_key(&normalize(&word.lemma)), word }
    }
}

pub struct FilterOrder;

impl FilterOrder {
    /// Tier first, then dictionary order of the folded lemma, then raw lemma and id for stability.
    pub fn sort(ranked: &mut [Ranked<'_>]) {
        ranked.sort_by(Self::compare);
    }

    fn compare(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
        a.tier
            .cmp(&b.tier)
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.word.lemma.cmp(&b.word.lemma))
            .then_with(|| a.word.id.cmp(&b.word.id))
    }

    /// Dictionary order without ranking, used for letter pages and the daily pick.
    pub fn alphabetical<'w>(words: impl IntoIterator<Item = &'w Word>) -> Vec<&'w Word> {
        let mut ranked: Vec<Ranked<'w>> = words
            .into_iter()
            .map(|w| Ranked::new(MatchTier::Unranked, w))
            .collect();
        Self::sort(&mut ranked);
        ranked.into_iter().map(|r| r.word).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordStatus;
    use chrono::Utc;

    fn word(id: i64, lemma: &str) -> Word {
        Word {
            id,
            lemma: lemma.to_string(),
            root: None,
            letter: '#',
            status: WordStatus::Published,
            created_by: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            meanings: Vec::new(),
        }
    }

    #[test]
    fn dictionary_order_files_enye_after_n() {
        let words = vec![word(1, "oso"), word(2, "Ñandú"), word(3, "nube"), word(4, "zorro")];
        let lemmas: Vec<&str> = FilterOrder::alphabetical(&words).iter().map(|w| w.lemma.as_str()).collect();
        assert_eq!(lemmas, vec!["nube", "Ñandú", "oso", "zorro"]);
    }

    #[test]
    fn ties_fall_back_to_raw_lemma_then_id() {
        let words = vec![word(3, "pololo"), word(1, "Pololo"), word(2, "pololo")];
        let ids: Vec<i64> = FilterOrder::alphabetical(&words).iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn tier_beats_alphabet() {
        let words = [word(1, "año"), word(2, "zapallo")];
        let mut ranked = vec![
            Ranked::new(MatchTier::Meaning, &words[0]),
            Ranked::new(MatchTier::ExactLemma, &words[1]),
        ];
        FilterOrder::sort(&mut ranked);
        assert_eq!(ranked[0].word.id, 2);
    }
}
