use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

use base64::Engine;

use crate::daily::DateKey;
use crate::error::ClipboardError;
use crate::wordle::{Guess, LetterState, Word, MAX_GUESSES};

pub fn glyph(state: LetterState) -> char {
    match state {
        LetterState::Correct => '🟩',
        LetterState::Present => '🟨',
        LetterState::Absent => '⬛',
    }
}

/// The text a player pastes to show off a result.
///
/// ```text
/// Wörtle 2026-10-16 - 3/6
/// ⬛🟨⬛⬛🟩
/// ...
/// <link>
/// ```
///
/// The score is `X` when the last row is not the target.
pub fn share_text(
    game_name: &str,
    date: DateKey,
    history: &[Guess],
    target: &Word,
    link: &str,
) -> String {
    let solved = history.last().is_some_and(|g| g.word == *target);
    let score = if solved {
        history.len().to_string()
    } else {
        "X".to_string()
    };

    let mut lines = vec![format!("{game_name} {date} - {score}/{MAX_GUESSES}")];
    lines.extend(
        history
            .iter()
            .map(|g| g.states.iter().map(|s| glyph(*s)).collect::<String>()),
    );
    if !link.is_empty() {
        lines.push(link.to_string());
    }
    lines.join("\n")
}

/// One way of getting text into the clipboard.
pub trait CopyStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ClipboardProgram {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Pipes the text into the platform's clipboard program.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    programs: Vec<ClipboardProgram>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        let programs = if cfg!(target_os = "macos") {
            vec![ClipboardProgram {
                program: "pbcopy",
                args: &[],
            }]
        } else if cfg!(windows) {
            vec![ClipboardProgram {
                program: "clip.exe",
                args: &[],
            }]
        } else {
            let mut programs = vec![];
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                programs.push(ClipboardProgram {
                    program: "wl-copy",
                    args: &[],
                });
            }
            programs.push(ClipboardProgram {
                program: "xclip",
                args: &["-selection", "clipboard"],
            });
            programs.push(ClipboardProgram {
                program: "xsel",
                args: &["--clipboard", "--input"],
            });
            // WSL
            programs.push(ClipboardProgram {
                program: "clip.exe",
                args: &[],
            });
            programs
        };
        SystemClipboard { programs }
    }
}

impl SystemClipboard {
    pub fn with_programs(programs: Vec<ClipboardProgram>) -> Self {
        SystemClipboard { programs }
    }

    fn run(program: &ClipboardProgram, text: &str) -> Result<(), ClipboardError> {
        let failed = |reason: String| ClipboardError::Program {
            program: program.program.to_string(),
            reason,
        };

        let mut child = Command::new(program.program)
            .args(program.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| failed(e.to_string()))?;
        }
        let status = child.wait().map_err(|e| failed(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(failed(status.to_string()))
        }
    }
}

impl CopyStrategy for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last = ClipboardError::NoProgram;
        for program in &self.programs {
            match Self::run(program, text) {
                Ok(()) => {
                    tracing::debug!(program = program.program, "copied to clipboard");
                    return Ok(());
                }
                Err(ClipboardError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::debug!(program = program.program, "clipboard program failed: {e}");
                    last = e;
                }
            }
        }
        Err(last)
    }
}

/// The OSC 52 escape sequence asking the terminal to set its clipboard.
pub fn osc52_sequence(text: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{payload}\x07")
}

/// Asks the terminal to take the text. Only tried when stdout is a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osc52;

impl CopyStrategy for Osc52 {
    fn name(&self) -> &str {
        "terminal"
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(ClipboardError::Io(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            )));
        }
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Copied by the named strategy.
    Copied(String),
    /// Nothing worked, the player has to copy this by hand.
    Manual(String),
}

pub fn default_strategies() -> Vec<Box<dyn CopyStrategy>> {
    vec![Box::new(SystemClipboard::default()), Box::new(Osc52)]
}

/// Try each strategy in turn. Failing all of them is not an error, the
/// text is handed back for manual copying.
pub fn copy_with_fallback(strategies: &[Box<dyn CopyStrategy>], text: &str) -> CopyOutcome {
    for strategy in strategies {
        match strategy.copy(text) {
            Ok(()) => return CopyOutcome::Copied(strategy.name().to_string()),
            Err(e) => tracing::warn!(strategy = strategy.name(), "copy failed: {e}"),
        }
    }
    CopyOutcome::Manual(text.to_string())
}
