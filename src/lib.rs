//! Wörtle: the daily German five-letter word game.
//!
//! The library holds the game itself. Frontends call into [`session::GameSession`]
//! and draw what it reports.

pub mod config;
pub mod daily;
pub mod error;
pub mod keyboard;
pub mod logging;
pub mod session;
pub mod share;
pub mod store;
pub mod wordle;
pub mod words;
