use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use wortle::config::{self, Config};
use wortle::daily::{format_countdown, time_until_next_word, DailySelector, DateKey};
use wortle::logging;
use wortle::session::GameSession;
use wortle::store::JsonFileStore;
use wortle::words::WordList;

mod plain;
mod tui;

#[derive(Parser)]
#[command(version, about = "Das tägliche Fünf-Buchstaben-Wort im Terminal")]
struct Cli {
    /// Config file, defaults to config.toml in the config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Where the daily words and logs are kept
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Word list with one word per line
    #[arg(long, global = true)]
    words: Option<PathBuf>,
    /// IANA timezone whose midnight starts a new word
    #[arg(long, global = true)]
    timezone: Option<String>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Default)]
enum Command {
    /// Play in the terminal UI
    #[default]
    Play,
    /// Play line by line on stdin
    Plain,
    /// Show the date key and the time until the next word
    Today,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(words) = &self.words {
            config.word_list = Some(words.clone());
        }
        if let Some(timezone) = &self.timezone {
            config.timezone = timezone.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }

    fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => config::data_dir(),
        }
    }
}

fn selector(config: &Config, data_dir: &Path) -> Result<DailySelector<JsonFileStore>> {
    let store = JsonFileStore::open(config::store_path(data_dir)).context("Error opening store")?;
    Ok(DailySelector::new(store, config.timezone()?))
}

fn words(config: &Config) -> Result<Arc<WordList>> {
    Ok(Arc::new(config.word_list()?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    let data_dir = cli.data_dir()?;

    match cli.command.unwrap_or_default() {
        Command::Play => {
            let _guard = logging::init_file_logging(&config.log_level, &config::log_dir(&data_dir))?;
            let words = words(&config)?;
            let selector = selector(&config, &data_dir)?;
            let mut app = tui::App::init(config, words, selector)?;

            tui::initialize_panic_handler();
            let mut terminal = tui::init()?;
            let app_result = app.run(&mut terminal).await;
            tui::restore()?;
            app_result
        }
        Command::Plain => {
            logging::init_stderr_logging(&config.log_level)?;
            let words = words(&config)?;
            let mut selector = selector(&config, &data_dir)?;
            let (date, target) = selector.today(Utc::now(), &words)?;
            let mut session = GameSession::new(target, words);

            let plain = plain::Plain {
                game_name: &config.game_name,
                share_link: &config.share_link,
                date,
            };
            plain.run(&mut session, io::stdin().lock(), &mut io::stdout().lock())
        }
        Command::Today => {
            logging::init_stderr_logging(&config.log_level)?;
            let now = Utc::now();
            let timezone = config.timezone()?;
            let date = DateKey::at(now, timezone);
            println!("{} {} ({})", config.game_name, date, timezone);
            println!(
                "Nächstes Wort in: {}",
                format_countdown(time_until_next_word(now, timezone))
            );
            Ok(())
        }
    }
}
