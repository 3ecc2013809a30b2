use std::io::{self, stdout, Stdout};
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wortle::config::Config;
use wortle::daily::{DailySelector, DateKey};
use wortle::session::GameSession;
use wortle::store::KeyValueStore;
use wortle::wordle::NLETTER;
use wortle::words::WordList;

use actions::Action;

mod actions;
mod events;
mod ui;

/// A type alias for the terminal type used in this application
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn initialize_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

/// Initialize the terminal
pub fn init() -> io::Result<Tui> {
    execute!(stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(stdout()))
}

/// Restore the terminal to its original state
pub fn restore() -> io::Result<()> {
    execute!(stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

pub struct App<S> {
    exit: bool,
    config: Config,
    words: Arc<WordList>,
    selector: DailySelector<S>,
    date: DateKey,
    session: GameSession,
    message: Option<String>,
    /// Tiles of the newest row that are already shown.
    revealed: usize,
    /// Share text the player has to copy by hand.
    manual_copy: Option<String>,
    countdown: Duration,
    action_tx: mpsc::UnboundedSender<Option<Action>>,
    action_rx: mpsc::UnboundedReceiver<Option<Action>>,
    token: CancellationToken,
    reveal_token: Option<CancellationToken>,
    /// Date whose word could not be loaded, so the failure is reported once.
    failed_date: Option<DateKey>,
}

impl<S: KeyValueStore> App<S> {
    pub fn init(config: Config, words: Arc<WordList>, mut selector: DailySelector<S>) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let now = Utc::now();
        let (date, target) = selector.today(now, &words)?;
        let countdown = selector.time_until_next_word(now);
        let session = GameSession::new(target, words.clone());

        Ok(App {
            exit: false,
            config,
            words,
            selector,
            date,
            session,
            message: None,
            revealed: NLETTER,
            manual_copy: None,
            countdown,
            action_tx,
            action_rx,
            token: CancellationToken::new(),
            reveal_token: None,
            failed_date: None,
        })
    }

    /// runs the application's main loop until the user quits
    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let task = self.handle_events();

        while !self.exit {
            terminal.draw(|frame| self.render_frame(frame))?;

            match self.action_rx.recv().await {
                Some(action) => self.update(action),
                None => break,
            }
        }
        self.token.cancel();
        task.abort();
        Ok(())
    }

    fn render_frame(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.size());
    }
}
