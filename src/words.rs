use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use crate::error::ConfigurationError;
use crate::wordle::Word;

const DATA: &str = include_str!("../data/words.txt");

/// The vocabulary: candidates for the daily word and the set of accepted
/// guesses. The order of `words` is the order the daily selector draws from.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<Word>,
    lookup: FxHashSet<Word>,
}

impl WordList {
    /// The list that ships with the game.
    pub fn builtin() -> Result<WordList, ConfigurationError> {
        Self::parse(DATA)
    }

    /// Read a word list from a file with one word per line.
    pub fn from_file(path: &Path) -> Result<WordList> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading word list {}", path.display()))?;
        let list = Self::parse(&content)
            .with_context(|| format!("Error parsing word list {}", path.display()))?;
        Ok(list)
    }

    /// Parse one word per line. Blank lines and `#` comments are skipped,
    /// duplicates keep their first position.
    pub fn parse(content: &str) -> Result<WordList, ConfigurationError> {
        let mut words = vec![];
        let mut lookup = FxHashSet::default();

        for (i, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let word = Word::parse(line).map_err(|source| ConfigurationError::InvalidWord {
                line: i + 1,
                word: line.to_string(),
                source,
            })?;
            if lookup.insert(word) {
                words.push(word);
            }
        }

        Self::from_words(words)
    }

    pub fn from_words(words: Vec<Word>) -> Result<WordList, ConfigurationError> {
        if words.is_empty() {
            return Err(ConfigurationError::EmptyWordList);
        }
        let lookup = words.iter().copied().collect();
        Ok(WordList { words, lookup })
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.lookup.contains(word)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
