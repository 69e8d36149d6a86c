use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use sha2::{Digest, Sha256};

use crate::dictionary::Word;
use crate::filter::filter_order::FilterOrder;

const SEED_PREFIX: &str = "duech:word-of-the-day:";

/// Picks the word of the day among published entries.
/// The pick depends only on the corpus and the date, so every server agrees on it.
pub fn select(words: &[Word], date: NaiveDate) -> Option<&Word> {
    let candidates = FilterOrder::alphabetical(words.iter().filter(|w| w.status.is_public()));
    if candidates.is_empty() {
        return None;
    }
    let index = (seed_for(date) % candidates.len() as u64) as usize;
    Some(candidates[index])
}

pub fn seed_for(date: NaiveDate) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(SEED_PREFIX.as_bytes());
    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

/// Calendar date at the configured offset from UTC.
pub fn today(utc_offset_hours: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
