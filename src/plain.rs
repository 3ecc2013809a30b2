use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use wortle::daily::DateKey;
use wortle::keyboard::{Key, KeyState, LAYOUT};
use wortle::session::GameSession;
use wortle::share::share_text;
use wortle::wordle::{LetterState, MAX_GUESSES, NLETTER};

/// Line based game: one guess per line, `!neu` starts over.
pub struct Plain<'a> {
    pub game_name: &'a str,
    pub share_link: &'a str,
    pub date: DateKey,
}

impl Plain<'_> {
    pub fn run<R: BufRead, W: Write>(
        &self,
        session: &mut GameSession,
        input: R,
        out: &mut W,
    ) -> Result<()> {
        writeln!(
            out,
            "{} {} - {} Versuche, ein Wort pro Zeile",
            self.game_name.bold(),
            self.date,
            MAX_GUESSES
        )?;

        for line in input.lines() {
            let line = line.context("Error reading input")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "!neu" {
                session.restart();
                writeln!(out, "Neues Spiel")?;
                continue;
            }
            if line.chars().count() != NLETTER {
                writeln!(out, "{}", "Das Wort muss 5 Buchstaben haben".red())?;
                continue;
            }

            while session.backspace() {}
            for c in line.chars() {
                session.type_letter(c);
            }

            match session.submit() {
                Ok(update) => {
                    writeln!(out, "{}", update.guess)?;
                    writeln!(out, "{}", keyboard_line(&update.keys))?;
                    if let Some(message) = update.message {
                        writeln!(out, "{}", message.bold())?;
                        let text = share_text(
                            self.game_name,
                            self.date,
                            session.history(),
                            &session.target(),
                            self.share_link,
                        );
                        writeln!(out, "\n{text}")?;
                        break;
                    }
                }
                Err(e) if e.is_user_facing() => writeln!(out, "{}", e.to_string().red())?,
                Err(_) => writeln!(out, "{}", "Ungültige Buchstaben".red())?,
            }
        }
        Ok(())
    }
}

fn keyboard_line(keys: &KeyState) -> String {
    LAYOUT
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|key| match key {
                    Key::Letter(c) => {
                        let label = c.to_uppercase().to_string();
                        Some(match keys.get(*c) {
                            None => label.normal().to_string(),
                            Some(LetterState::Absent) => label.dimmed().to_string(),
                            Some(LetterState::Present) => label.yellow().bold().to_string(),
                            Some(LetterState::Correct) => label.green().bold().to_string(),
                        })
                    }
                    Key::Enter | Key::Backspace => None,
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wortle::wordle::Word;
    use wortle::words::WordList;

    fn play(input: &str) -> String {
        let words = Arc::new(WordList::parse("stern\nsonne\nrosen\nhunde").unwrap());
        let mut session = GameSession::new(Word::parse("stern").unwrap(), words);
        let plain = Plain {
            game_name: "Wörtle",
            share_link: "",
            date: "2026-10-16".parse().unwrap(),
        };
        let mut out = Vec::new();
        plain.run(&mut session, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn win_prints_share_text() {
        let out = play("sonne\nstern\nhunde\n");
        assert!(out.contains("Gewonnen! Das Wort war STERN"));
        assert!(out.contains("Wörtle 2026-10-16 - 2/6"));
        assert!(out.contains("🟩⬛🟨⬛🟨\n🟩🟩🟩🟩🟩"));
    }

    #[test]
    fn bad_input_is_reported() {
        let out = play("xyzzy\nzu\n");
        assert!(out.contains("Wort nicht im Wörterbuch"));
        assert!(out.contains("Das Wort muss 5 Buchstaben haben"));
        assert!(!out.contains("Gewonnen"));
    }
}
