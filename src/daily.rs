use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

use crate::error::{ConfigurationError, Result, StoreError};
use crate::store::KeyValueStore;
use crate::wordle::Word;
use crate::words::WordList;

/// Wordle itself rotates at midnight US eastern time.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

const DAILY_WORDS_KEY: &str = "dailyWords";
const USED_WORDS_KEY: &str = "usedWords";

/// A civil date in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// The date of `now` as seen in `timezone`.
    pub fn at(now: DateTime<Utc>, timezone: Tz) -> Self {
        DateKey(now.with_timezone(&timezone).date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The digits of the key read as a number, `2026-10-16` is `20261016`.
    pub fn seed(&self) -> u64 {
        let year = u64::from(self.0.year().unsigned_abs());
        year * 10_000 + u64::from(self.0.month()) * 100 + u64::from(self.0.day())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DateKey)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigurationError> {
    name.parse::<Tz>()
        .map_err(|_| ConfigurationError::UnknownTimezone(name.to_string()))
}

/// Which word was picked on which day, and which words have been used in
/// the current cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyUsageRecord {
    pub days: BTreeMap<String, String>,
    pub used: Vec<String>,
}

impl DailyUsageRecord {
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StoreError> {
        let days = match store.get(DAILY_WORDS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => BTreeMap::new(),
        };
        let used = match store.get(USED_WORDS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => vec![],
        };
        Ok(DailyUsageRecord { days, used })
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        store.set(DAILY_WORDS_KEY, &serde_json::to_string(&self.days)?)?;
        store.set(USED_WORDS_KEY, &serde_json::to_string(&self.used)?)?;
        Ok(())
    }
}

/// Pick the word for `date`.
///
/// A word already recorded for the date is returned as is. Otherwise a word
/// that is not yet in `record.used` is drawn with a generator seeded by the
/// date, so every installation with the same history draws the same word.
/// When every word has been used the cycle starts over.
pub fn word_for_date(
    date: DateKey,
    words: &WordList,
    record: &mut DailyUsageRecord,
) -> Result<Word, ConfigurationError> {
    let key = date.to_string();
    if let Some(stored) = record.days.get(&key) {
        match Word::parse(stored) {
            Ok(word) => return Ok(word),
            Err(e) => tracing::warn!(date = %key, stored = %stored, "discarding stored word: {e}"),
        }
    }

    let available: Vec<Word> = {
        let used: FxHashSet<Word> = record
            .used
            .iter()
            .filter_map(|w| Word::parse(w).ok())
            .collect();
        words
            .words()
            .iter()
            .filter(|w| !used.contains(w))
            .copied()
            .collect()
    };

    let available = if available.is_empty() {
        tracing::info!(words = words.len(), "all words used, starting a new cycle");
        record.used.clear();
        words.words().to_vec()
    } else {
        available
    };

    let word = draw(date, &available)?;
    record.used.push(String::from(word));
    record.days.insert(key, String::from(word));
    Ok(word)
}

/// Pick one of `candidates` with a generator seeded by the date.
fn draw(date: DateKey, candidates: &[Word]) -> Result<Word, ConfigurationError> {
    if candidates.is_empty() {
        return Err(ConfigurationError::EmptyWordList);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(date.seed());
    // draw over u64 so 32 and 64 bit builds agree
    let index = rng.gen_range(0..candidates.len() as u64) as usize;
    Ok(candidates[index])
}

/// The first instant of the next civil day in `timezone`.
///
/// Where midnight is skipped by a DST change the first valid full hour
/// after it is used.
pub fn next_rollover(now: DateTime<Utc>, timezone: Tz) -> Option<DateTime<Utc>> {
    let tomorrow = now.with_timezone(&timezone).date_naive().succ_opt()?;
    let midnight = tomorrow.and_hms_opt(0, 0, 0)?;
    (0..3)
        .find_map(|h| {
            timezone
                .from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .map(|t| t.with_timezone(&Utc))
}

pub fn time_until_next_word(now: DateTime<Utc>, timezone: Tz) -> Duration {
    next_rollover(now, timezone)
        .map(|next| next - now)
        .unwrap_or_else(Duration::zero)
}

/// `"5h 07m"`, for the countdown to the next word.
pub fn format_countdown(left: Duration) -> String {
    let minutes = left.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Daily word selection on top of a persistent store.
#[derive(Debug)]
pub struct DailySelector<S> {
    store: S,
    timezone: Tz,
}

impl<S: KeyValueStore> DailySelector<S> {
    pub fn new(store: S, timezone: Tz) -> Self {
        DailySelector { store, timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn date_key(&self, now: DateTime<Utc>) -> DateKey {
        DateKey::at(now, self.timezone)
    }

    pub fn time_until_next_word(&self, now: DateTime<Utc>) -> Duration {
        time_until_next_word(now, self.timezone)
    }

    /// Load the record, pick the word and write the record back if a new
    /// selection was made.
    pub fn word_for(&mut self, date: DateKey, words: &WordList) -> Result<Word> {
        let mut record = DailyUsageRecord::load(&self.store)?;
        let before = record.clone();
        let word = word_for_date(date, words, &mut record)?;
        if record != before {
            record.save(&mut self.store)?;
            tracing::info!(date = %date, used = record.used.len(), "selected daily word");
        }
        Ok(word)
    }

    pub fn today(&mut self, now: DateTime<Utc>, words: &WordList) -> Result<(DateKey, Word)> {
        let date = self.date_key(now);
        let word = self.word_for(date, words)?;
        Ok((date, word))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn small_list() -> WordList {
        WordList::parse("apfel\nbirne\nkiwis\nmango\nfeige\n").unwrap()
    }

    fn new_york() -> Tz {
        parse_timezone(DEFAULT_TIMEZONE).unwrap()
    }

    #[test]
    fn date_key_format_and_seed() {
        let key = date("2026-10-16");
        assert_eq!(key.to_string(), "2026-10-16");
        assert_eq!(key.seed(), 20261016);
        assert_eq!(date("2027-01-02").seed(), 20270102);
    }

    #[test]
    fn date_key_uses_reference_timezone() {
        let tz = new_york();
        // 23:00 the previous evening in New York (EDT)
        assert_eq!(DateKey::at(utc("2026-10-16T03:00:00Z"), tz), date("2026-10-15"));
        assert_eq!(DateKey::at(utc("2026-10-16T04:30:00Z"), tz), date("2026-10-16"));
        // after the switch to EST the offset is five hours
        assert_eq!(DateKey::at(utc("2026-11-10T04:30:00Z"), tz), date("2026-11-09"));
        assert_eq!(DateKey::at(utc("2026-11-10T05:00:00Z"), tz), date("2026-11-10"));
    }

    #[test]
    fn unknown_timezone() {
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(ConfigurationError::UnknownTimezone(_))
        ));
        assert!(parse_timezone("Europe/Berlin").is_ok());
    }

    #[test]
    fn countdown_to_next_word() {
        let tz = new_york();
        assert_eq!(
            time_until_next_word(utc("2026-10-16T04:30:00Z"), tz),
            Duration::minutes(23 * 60 + 30)
        );
        // the day the clocks go back has 25 hours
        assert_eq!(
            time_until_next_word(utc("2026-11-01T04:00:00Z"), tz),
            Duration::hours(25)
        );
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(Duration::minutes(23 * 60 + 30)), "23h 30m");
        assert_eq!(format_countdown(Duration::seconds(59)), "0h 00m");
        assert_eq!(format_countdown(Duration::minutes(-5)), "0h 00m");
    }

    #[test]
    fn countdown_when_midnight_is_skipped() {
        // Brazil started DST at midnight on 2018-11-04
        let tz = parse_timezone("America/Sao_Paulo").unwrap();
        assert_eq!(
            time_until_next_word(utc("2018-11-03T15:00:00Z"), tz),
            Duration::hours(12)
        );
    }

    #[test]
    fn same_date_gives_same_word() {
        let words = small_list();
        let mut record = DailyUsageRecord::default();
        let first = word_for_date(date("2026-10-16"), &words, &mut record).unwrap();
        let after_first = record.clone();

        let second = word_for_date(date("2026-10-16"), &words, &mut record).unwrap();
        assert_eq!(first, second);
        assert_eq!(record, after_first);
        assert_eq!(record.used, vec![String::from(first)]);
    }

    #[test]
    fn installations_agree() {
        let words = WordList::builtin().unwrap();
        for day in ["2026-10-16", "2026-12-24", "2027-03-01"] {
            let a = word_for_date(date(day), &words, &mut DailyUsageRecord::default()).unwrap();
            let b = word_for_date(date(day), &words, &mut DailyUsageRecord::default()).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn no_repeats_until_exhausted() {
        let words = small_list();
        let mut record = DailyUsageRecord::default();
        let mut start = date("2026-10-16").date();
        let mut seen = FxHashSet::default();

        for _ in 0..words.len() {
            let used_before = record.used.clone();
            let word = word_for_date(DateKey::new(start), &words, &mut record).unwrap();
            assert!(!used_before.contains(&String::from(word)));
            assert!(seen.insert(word));
            start = start.succ_opt().unwrap();
        }
        assert_eq!(record.used.len(), words.len());

        // the next day starts a new cycle
        let word = word_for_date(DateKey::new(start), &words, &mut record).unwrap();
        assert!(words.contains(&word));
        assert_eq!(record.used, vec![String::from(word)]);
        assert_eq!(record.days.len(), words.len() + 1);
    }

    #[test]
    fn corrupt_stored_word_is_replaced() {
        let words = small_list();
        let mut record = DailyUsageRecord::default();
        record
            .days
            .insert("2026-10-16".to_string(), "zu lang!".to_string());
        let word = word_for_date(date("2026-10-16"), &words, &mut record).unwrap();
        assert_eq!(record.days["2026-10-16"], String::from(word));
    }

    #[test]
    fn stored_word_outside_the_list_is_kept() {
        let words = small_list();
        let mut record = DailyUsageRecord::default();
        record
            .days
            .insert("2026-10-16".to_string(), "hunde".to_string());
        let word = word_for_date(date("2026-10-16"), &words, &mut record).unwrap();
        assert_eq!(String::from(word), "hunde");
        assert!(!words.contains(&word));
        assert!(record.used.is_empty());
    }

    #[test]
    fn drawing_from_nothing_is_an_error() {
        assert!(matches!(
            draw(date("2026-10-16"), &[]),
            Err(ConfigurationError::EmptyWordList)
        ));
        let words = small_list();
        let word = draw(date("2026-10-16"), words.words()).unwrap();
        assert_eq!(word, draw(date("2026-10-16"), words.words()).unwrap());
    }

    #[test]
    fn selector_persists_selection() {
        let words = small_list();
        let mut selector = DailySelector::new(MemoryStore::new(), new_york());
        let (key, word) = selector
            .today(utc("2026-10-16T12:00:00Z"), &words)
            .unwrap();
        assert_eq!(key, date("2026-10-16"));

        let record = DailyUsageRecord::load(selector.store()).unwrap();
        assert_eq!(record.days.get("2026-10-16"), Some(&String::from(word)));
        assert_eq!(record.used, vec![String::from(word)]);

        // a reload later the same day
        let (_, again) = selector
            .today(utc("2026-10-17T03:59:00Z"), &words)
            .unwrap();
        assert_eq!(word, again);
    }

    #[test]
    fn selector_survives_restart_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let words = WordList::builtin().unwrap();
        let now = utc("2026-10-16T12:00:00Z");

        let store = JsonFileStore::open(&path).unwrap();
        let (_, first) = DailySelector::new(store, new_york()).today(now, &words).unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let (_, second) = DailySelector::new(store, new_york()).today(now, &words).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_record_is_a_store_error() {
        let mut store = MemoryStore::new();
        store.set("usedWords", "{").unwrap();
        let mut selector = DailySelector::new(store, new_york());
        let err = selector
            .word_for(date("2026-10-16"), &small_list())
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Store(StoreError::Json(_))));
    }
}
