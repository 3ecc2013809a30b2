use std::fmt;

use colored::Colorize;

use crate::error::WordError;

pub const NLETTER: usize = 5;
pub const MAX_GUESSES: usize = 6;

/// Letters of the German keyboard: `a`-`z` plus the umlauts.
pub fn is_alphabet(c: char) -> bool {
    c.is_ascii_lowercase() || matches!(c, 'ä' | 'ö' | 'ü')
}

/// Feedback for a single letter of a guess.
///
/// The ordering is the precedence used by the keyboard:
/// `Absent < Present < Correct`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LetterState {
    Absent = 0,
    Present = 1,
    Correct = 2,
}

/// Five lower-case letters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Word {
    pub chars: [char; NLETTER],
}

/// A submitted word together with its evaluation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Guess {
    pub word: Word,
    pub states: [LetterState; NLETTER],
}

impl Word {
    /// Parse a word, lower-casing it on the way.
    ///
    /// # Example
    ///
    /// ```
    /// use wortle::wordle::Word;
    /// let word = Word::parse("Bäume").unwrap();
    /// assert_eq!(word.chars, ['b', 'ä', 'u', 'm', 'e']);
    /// assert!(Word::parse("baum").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Word, WordError> {
        let mut chars = [' '; NLETTER];
        let mut n = 0;
        for c in input.trim().chars().flat_map(char::to_lowercase) {
            if !is_alphabet(c) {
                return Err(WordError::Letter(c));
            }
            if n < NLETTER {
                chars[n] = c;
            }
            n += 1;
        }
        if n != NLETTER {
            return Err(WordError::Length(n));
        }
        Ok(Word { chars })
    }

    /// Compares the word to a guess, and returns the feedback for the
    /// guess. `self` is the solution.
    ///
    /// # Example
    ///
    /// ```
    /// use wortle::wordle::*;
    /// use wortle::wordle::LetterState::*;
    /// let solution = Word::parse("nebel").unwrap();
    /// let guess = Word::parse("leben").unwrap();
    /// let expected = [Present, Correct, Correct, Correct, Present];
    /// assert_eq!(solution.compare(&guess), expected);
    /// ```
    pub fn compare(&self, guess: &Word) -> [LetterState; NLETTER] {
        evaluate(guess, self)
    }

    /// Counts the occurences of a char in a word
    pub fn count_char(&self, char: char) -> usize {
        self.chars.iter().filter(|&&c| c == char).count()
    }
}

/// Two-pass evaluation of `guess` against `target`.
///
/// Exact matches are found first and take their letter out of the pool, so
/// a target letter is never credited to two positions of the guess.
pub fn evaluate(guess: &Word, target: &Word) -> [LetterState; NLETTER] {
    let mut result = [LetterState::Absent; NLETTER];
    let mut pool = target.chars.map(Some);

    // Find all correct letters
    for (i, (g, t)) in guess.chars.iter().zip(&target.chars).enumerate() {
        if g == t {
            result[i] = LetterState::Correct;
            pool[i] = None;
        }
    }

    // Remaining letters consume the pool left to right
    for (i, g) in guess.chars.iter().enumerate() {
        if result[i] == LetterState::Correct {
            continue;
        }
        if let Some(slot) = pool.iter_mut().find(|slot| **slot == Some(*g)) {
            *slot = None;
            result[i] = LetterState::Present;
        }
    }

    result
}

impl Guess {
    pub fn new(word: Word, target: &Word) -> Guess {
        Guess {
            word,
            states: evaluate(&word, target),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.states.iter().all(|s| *s == LetterState::Correct)
    }

    /// Iterate over letters with their feedback.
    pub fn letters(&self) -> impl Iterator<Item = (char, LetterState)> + '_ {
        self.word.chars.iter().copied().zip(self.states)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars {
            write!(f, "{}", c.to_uppercase())?;
        }
        Ok(())
    }
}

impl From<Word> for String {
    fn from(word: Word) -> String {
        word.chars.iter().collect()
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (c, s) in self.letters() {
            let ch = format!(" {} ", c.to_uppercase());
            match s {
                LetterState::Absent => write!(f, "{}", ch.on_black())?,
                LetterState::Present => write!(f, "{}", ch.black().on_yellow())?,
                LetterState::Correct => write!(f, "{}", ch.black().on_green())?,
            }
        }
        Ok(())
    }
}
