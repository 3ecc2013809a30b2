use rustc_hash::FxHashMap;

use crate::wordle::{Guess, LetterState};

/// German QWERTZ layout of the on-screen keyboard.
pub const LAYOUT: [&[Key]; 3] = [
    &[
        Key::Letter('q'),
        Key::Letter('w'),
        Key::Letter('e'),
        Key::Letter('r'),
        Key::Letter('t'),
        Key::Letter('z'),
        Key::Letter('u'),
        Key::Letter('i'),
        Key::Letter('o'),
        Key::Letter('p'),
        Key::Letter('ü'),
    ],
    &[
        Key::Letter('a'),
        Key::Letter('s'),
        Key::Letter('d'),
        Key::Letter('f'),
        Key::Letter('g'),
        Key::Letter('h'),
        Key::Letter('j'),
        Key::Letter('k'),
        Key::Letter('l'),
        Key::Letter('ö'),
        Key::Letter('ä'),
    ],
    &[
        Key::Enter,
        Key::Letter('y'),
        Key::Letter('x'),
        Key::Letter('c'),
        Key::Letter('v'),
        Key::Letter('b'),
        Key::Letter('n'),
        Key::Letter('m'),
        Key::Backspace,
    ],
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Enter,
    Backspace,
}

/// Best known feedback for every letter guessed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    states: FxHashMap<char, LetterState>,
}

impl KeyState {
    pub fn get(&self, letter: char) -> Option<LetterState> {
        self.states.get(&letter).copied()
    }

    /// Record `state` for `letter` unless a better state is already known.
    pub fn observe(&mut self, letter: char, state: LetterState) {
        self.states
            .entry(letter)
            .and_modify(|known| *known = (*known).max(state))
            .or_insert(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Fold the whole history into one state per key.
pub fn aggregate(history: &[Guess]) -> KeyState {
    let mut keys = KeyState::default();
    for guess in history {
        for (letter, state) in guess.letters() {
            keys.observe(letter, state);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::Word;
    use proptest::prelude::*;
    use LetterState::*;

    fn guess(word: &str, target: &str) -> Guess {
        Guess::new(Word::parse(word).unwrap(), &Word::parse(target).unwrap())
    }

    #[test]
    fn layout_covers_the_alphabet() {
        let letters: Vec<char> = LAYOUT
            .iter()
            .flat_map(|row| row.iter())
            .filter_map(|k| match k {
                Key::Letter(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(letters.len(), 29);
        assert!(letters.iter().all(|c| crate::wordle::is_alphabet(*c)));
    }

    #[test]
    fn duplicate_letter_in_one_guess_keeps_best() {
        // first 'e' is absent, second is correct
        let keys = aggregate(&[guess("essen", "opfer")]);
        assert_eq!(keys.get('e'), Some(Correct));
        assert_eq!(keys.get('s'), Some(Absent));
        assert_eq!(keys.get('n'), Some(Absent));
        assert_eq!(keys.get('x'), None);
    }

    #[test]
    fn states_are_never_downgraded() {
        let target = "stern";
        let history = [guess("sonne", target), guess("rosen", target), guess("tasse", target)];

        let keys = aggregate(&history[..1]);
        assert_eq!(keys.get('s'), Some(Correct));
        assert_eq!(keys.get('n'), Some(Present));
        assert_eq!(keys.get('e'), Some(Present));
        assert_eq!(keys.get('o'), Some(Absent));

        // 's' is only present or absent in the later guesses
        let keys = aggregate(&history);
        assert_eq!(keys.get('s'), Some(Correct));
        assert_eq!(keys.get('n'), Some(Correct));
        assert_eq!(keys.get('e'), Some(Present));
        assert_eq!(keys.get('r'), Some(Present));
        assert_eq!(keys.get('t'), Some(Present));
        assert_eq!(keys.get('a'), Some(Absent));
    }

    #[test]
    fn present_is_upgraded_to_correct() {
        let target = "stern";
        let keys = aggregate(&[guess("rosen", target)]);
        assert_eq!(keys.get('r'), Some(Present));
        let keys = aggregate(&[guess("rosen", target), guess("stern", target)]);
        assert_eq!(keys.get('r'), Some(Correct));
    }

    fn arb_history() -> impl Strategy<Value = Vec<Guess>> {
        let letters = vec!['a', 'e', 'n', 'r', 's'];
        let word = proptest::collection::vec(prop::sample::select(letters), 5).prop_map(|c| Word {
            chars: [c[0], c[1], c[2], c[3], c[4]],
        });
        (word.clone(), proptest::collection::vec(word, 1..=6)).prop_map(|(target, words)| {
            words.into_iter().map(|w| Guess::new(w, &target)).collect()
        })
    }

    proptest! {
        #[test]
        fn aggregate_is_monotonic(history in arb_history()) {
            for n in 1..history.len() {
                let before = aggregate(&history[..n]);
                let after = aggregate(&history[..=n]);
                for c in ['a', 'e', 'n', 'r', 's'] {
                    if let Some(state) = before.get(c) {
                        prop_assert!(after.get(c) >= Some(state));
                    }
                }
            }
        }
    }
}
