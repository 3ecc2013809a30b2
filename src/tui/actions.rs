use super::*;

use chrono::DateTime;
use wortle::keyboard::{aggregate, KeyState};
use wortle::share::{copy_with_fallback, default_strategies, share_text, CopyOutcome};

pub enum Action {
    Exit,
    Escape,
    Tick,
    EnterChar(char),
    DeleteChar,
    Submit,
    Restart,
    Share,
    Reveal { row: usize, tiles: usize },
    Copied(CopyOutcome),
}

impl<S: KeyValueStore> App<S> {
    pub fn update(&mut self, msg: Option<Action>) {
        if let Some(msg) = msg {
            match msg {
                Action::Exit => {
                    self.token.cancel();
                    self.exit = true;
                }
                Action::Escape => {
                    if self.manual_copy.take().is_none() {
                        self.update(Some(Action::Exit));
                    }
                }
                Action::Tick => {
                    self.tick(Utc::now());
                }
                Action::EnterChar(x) => {
                    if self.session.type_letter(x) {
                        self.message = None;
                    }
                }
                Action::DeleteChar => {
                    if self.session.backspace() {
                        self.message = None;
                    }
                }
                Action::Submit => {
                    if self.manual_copy.take().is_none() {
                        self.submit();
                    }
                }
                Action::Restart => {
                    self.session.restart();
                    self.start_row();
                }
                Action::Share => {
                    self.share();
                }
                Action::Reveal { row, tiles } => {
                    if Some(row) == self.session.history().len().checked_sub(1) {
                        self.revealed = self.revealed.max(tiles);
                    }
                    if self.revealed == NLETTER {
                        self.message = self.session.end_message().or(self.message.take());
                    }
                }
                Action::Copied(outcome) => match outcome {
                    CopyOutcome::Copied(strategy) => {
                        tracing::info!(strategy = %strategy, "result copied");
                        self.message = Some("Ergebnis kopiert!".to_string());
                    }
                    CopyOutcome::Manual(text) => {
                        self.message = Some("Bitte manuell kopieren".to_string());
                        self.manual_copy = Some(text);
                    }
                },
            }
        }
    }

    /// Keyboard colors as far as the reveal has progressed.
    pub fn visible_keys(&self) -> KeyState {
        let history = self.session.history();
        if self.revealed >= NLETTER || history.is_empty() {
            self.session.keys().clone()
        } else {
            aggregate(&history[..history.len() - 1])
        }
    }

    fn start_row(&mut self) {
        if let Some(token) = self.reveal_token.take() {
            token.cancel();
        }
        self.revealed = NLETTER;
        self.message = None;
        self.manual_copy = None;
    }

    fn tick(&mut self, now: DateTime<Utc>) {
        self.countdown = self.selector.time_until_next_word(now);

        let date = self.selector.date_key(now);
        if date == self.date || self.failed_date == Some(date) {
            return;
        }
        match self.selector.word_for(date, &self.words) {
            Ok(target) => {
                tracing::info!(date = %date, "new day, new word");
                self.date = date;
                self.failed_date = None;
                self.session = GameSession::new(target, self.words.clone());
                self.start_row();
            }
            Err(e) => {
                tracing::error!("could not select the word for {date}: {e}");
                self.failed_date = Some(date);
                self.message = Some("Neues Wort konnte nicht geladen werden".to_string());
            }
        }
    }

    fn submit(&mut self) {
        match self.session.submit() {
            Ok(update) => {
                self.message = None;
                self.reveal(self.session.history().len() - 1);
                tracing::debug!(ended = update.message.is_some(), "row submitted");
            }
            Err(e) if e.is_user_facing() => {
                self.message = Some(e.to_string());
            }
            Err(_) => {}
        }
    }

    /// Uncover the tiles of `row` one after the other. The states are
    /// final already, only the number of visible tiles changes.
    fn reveal(&mut self, row: usize) {
        if let Some(token) = self.reveal_token.take() {
            token.cancel();
        }

        let delay = std::time::Duration::from_millis(self.config.reveal_delay_ms);
        if delay.is_zero() {
            self.update(Some(Action::Reveal { row, tiles: NLETTER }));
            return;
        }
        self.revealed = 0;

        let child = self.token.child_token();
        self.reveal_token = Some(child.clone());
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            for tiles in 1..=NLETTER {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                if tx.send(Some(Action::Reveal { row, tiles })).is_err() {
                    return;
                }
            }
        });
    }

    fn share(&mut self) {
        if !self.session.phase().is_over() {
            self.message = Some("Teilen geht erst nach dem Spiel".to_string());
            return;
        }
        let text = share_text(
            &self.config.game_name,
            self.date,
            self.session.history(),
            &self.session.target(),
            &self.config.share_link,
        );
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = copy_with_fallback(&default_strategies(), &text);
            let _ = tx.send(Some(Action::Copied(outcome)));
        });
    }
}
