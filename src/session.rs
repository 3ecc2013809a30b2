use std::sync::Arc;

use crate::error::SubmitError;
use crate::keyboard::{aggregate, KeyState};
use crate::wordle::{is_alphabet, Guess, Word, MAX_GUESSES, NLETTER};
use crate::words::WordList;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Typing the current row.
    Collecting,
    /// A submitted row is being evaluated.
    Evaluating,
    Won,
    Lost,
}

impl Phase {
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub input: Vec<char>,
    pub history: Vec<Guess>,
    pub phase: Phase,
}

impl SessionState {
    fn new() -> Self {
        SessionState {
            input: Vec::with_capacity(NLETTER),
            history: Vec::with_capacity(MAX_GUESSES),
            phase: Phase::Collecting,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }
}

/// What the frontend needs to draw after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    pub guess: Guess,
    pub keys: KeyState,
    pub message: Option<String>,
}

/// One game against one target word.
#[derive(Debug, Clone)]
pub struct GameSession {
    target: Word,
    words: Arc<WordList>,
    state: SessionState,
    keys: KeyState,
}

impl GameSession {
    pub fn new(target: Word, words: Arc<WordList>) -> Self {
        GameSession {
            target,
            words,
            state: SessionState::new(),
            keys: KeyState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn history(&self) -> &[Guess] {
        &self.state.history
    }

    pub fn input(&self) -> &[char] {
        &self.state.input
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn target(&self) -> Word {
        self.target
    }

    /// Append a letter to the current row. Returns whether it was taken.
    pub fn type_letter(&mut self, letter: char) -> bool {
        if self.state.phase != Phase::Collecting || self.state.input.len() >= NLETTER {
            return false;
        }
        let mut lower = letter.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(c), None) if is_alphabet(c) => {
                self.state.input.push(c);
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        if self.state.phase != Phase::Collecting {
            return false;
        }
        self.state.input.pop().is_some()
    }

    /// Evaluate the current row.
    ///
    /// Only [`SubmitError::Unrecognized`] is worth showing to the player; the
    /// other errors mean nothing happened.
    pub fn submit(&mut self) -> Result<SessionUpdate, SubmitError> {
        if self.state.phase != Phase::Collecting {
            return Err(SubmitError::GameOver);
        }
        if self.state.input.len() != NLETTER {
            return Err(SubmitError::Incomplete);
        }

        let text: String = self.state.input.iter().collect();
        let word = match Word::parse(&text) {
            Ok(word) if word == self.target || self.words.contains(&word) => word,
            _ => {
                tracing::debug!(guess = %text, "rejected unknown word");
                return Err(SubmitError::Unrecognized(text));
            }
        };

        self.state.phase = Phase::Evaluating;
        let guess = Guess::new(word, &self.target);
        self.state.history.push(guess);
        self.state.input.clear();
        self.keys = aggregate(&self.state.history);

        self.state.phase = if guess.is_solved() {
            Phase::Won
        } else if self.state.history.len() >= MAX_GUESSES {
            Phase::Lost
        } else {
            Phase::Collecting
        };
        tracing::debug!(attempt = self.state.history.len(), phase = ?self.state.phase, "guess evaluated");

        Ok(SessionUpdate {
            guess,
            keys: self.keys.clone(),
            message: self.end_message(),
        })
    }

    /// Start over with the same word.
    pub fn restart(&mut self) {
        self.state = SessionState::new();
        self.keys = KeyState::default();
    }

    pub fn end_message(&self) -> Option<String> {
        match self.state.phase {
            Phase::Won => Some(format!("Gewonnen! Das Wort war {}", self.target)),
            Phase::Lost => Some(format!("Verloren! Das Wort war {}", self.target)),
            Phase::Collecting | Phase::Evaluating => None,
        }
    }
}
