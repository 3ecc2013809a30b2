use ratatui::{
    prelude::*,
    widgets::{block::*, *},
};
use ratatui::widgets::Clear;

use super::*;
use wortle::daily::format_countdown;
use wortle::keyboard::{Key, KeyState, LAYOUT};
use wortle::wordle::{LetterState, MAX_GUESSES};

const TILE_WIDTH: u16 = 7;
const KEY_WIDTH: u16 = 5;

impl<S: KeyValueStore> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = self.create_border();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(3 * MAX_GUESSES as u16),
                Constraint::Length(2),
                Constraint::Length(3 * LAYOUT.len() as u16),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .split(border.inner(area));

        self.render_board(rows[0], buf);
        self.render_message(rows[1], buf);
        render_keyboard(&self.visible_keys(), rows[2], buf);
        self.render_countdown(rows[4], buf);

        border.render(area, buf);

        if let Some(text) = &self.manual_copy {
            render_manual_copy(text, area, buf);
        }
    }
}

impl<S: KeyValueStore> App<S> {
    fn create_border(&self) -> Block<'_> {
        let title = Title::from(format!(" {} {} ", self.config.game_name, self.date).bold());
        let instructions = Title::from(Line::from(vec![
            " Beenden ".into(),
            "<Esc> ".blue().bold(),
            " Teilen ".into(),
            "<F2> ".blue().bold(),
            " Neustart ".into(),
            "<F5> ".blue().bold(),
        ]));
        Block::default()
            .title(title.alignment(Alignment::Center))
            .title(
                instructions
                    .alignment(Alignment::Center)
                    .position(Position::Bottom),
            )
            .borders(Borders::ALL)
            .border_set(symbols::border::PLAIN)
    }

    fn render_board(&self, area: Rect, buf: &mut Buffer) {
        let word_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); MAX_GUESSES])
            .split(area);

        let history = self.session.history();
        let over = self.session.phase().is_over();

        for (i, row) in word_rows.iter().enumerate() {
            let mut tiles = [Tile::default(); NLETTER];
            if let Some(guess) = history.get(i) {
                let shown = if i + 1 == history.len() {
                    self.revealed
                } else {
                    NLETTER
                };
                for (j, (letter, state)) in guess.letters().enumerate() {
                    tiles[j] = Tile {
                        letter: Some(letter),
                        state: (j < shown).then_some(state),
                        cursor: false,
                    };
                }
            } else if i == history.len() && !over {
                let input = self.session.input();
                for (j, tile) in tiles.iter_mut().enumerate() {
                    tile.letter = input.get(j).copied();
                    tile.cursor = j == input.len();
                }
            }
            render_row(&tiles, *row, buf);
        }
    }

    fn render_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(message) = &self.message {
            Paragraph::new(message.as_str())
                .bold()
                .centered()
                .render(area, buf);
        }
    }

    fn render_countdown(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(vec![
            "Nächstes Wort in: ".into(),
            format_countdown(self.countdown).magenta().bold(),
        ]))
        .centered()
        .render(area, buf);
    }
}

#[derive(Copy, Clone, Default)]
struct Tile {
    letter: Option<char>,
    /// `None` while typing and before the reveal reaches the tile.
    state: Option<LetterState>,
    cursor: bool,
}

fn state_style(state: Option<LetterState>) -> Style {
    match state {
        None => Style::default(),
        Some(LetterState::Absent) => Style::default().bg(Color::DarkGray).fg(Color::White),
        Some(LetterState::Present) => Style::default().bg(Color::Yellow).fg(Color::Black),
        Some(LetterState::Correct) => Style::default().bg(Color::Green).fg(Color::Black),
    }
}

fn render_row(tiles: &[Tile; NLETTER], area: Rect, buf: &mut Buffer) {
    let row_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Length(TILE_WIDTH); NLETTER])
        .flex(layout::Flex::Center)
        .split(area);

    for (tile, cell) in tiles.iter().zip(row_layout.iter()) {
        let block = if tile.cursor {
            Block::new()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
        } else {
            Block::new()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().dark_gray())
        };

        let letter = match tile.letter {
            Some(l) => l.to_uppercase().to_string(),
            None => String::new(),
        };
        Paragraph::new(letter)
            .bold()
            .centered()
            .block(block)
            .style(state_style(tile.state))
            .render(*cell, buf);
    }
}

fn render_keyboard(keys: &KeyState, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); LAYOUT.len()])
        .split(area);

    for (row, rect) in LAYOUT.iter().zip(rows.iter()) {
        let widths: Vec<Constraint> = row
            .iter()
            .map(|key| match key {
                Key::Letter(_) => Constraint::Length(KEY_WIDTH),
                Key::Enter | Key::Backspace => Constraint::Length(2 * KEY_WIDTH),
            })
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .flex(layout::Flex::Center)
            .split(*rect);

        for (key, cell) in row.iter().zip(cells.iter()) {
            let (label, state) = match key {
                Key::Letter(c) => (c.to_uppercase().to_string(), keys.get(*c)),
                Key::Enter => ("Enter".to_string(), None),
                Key::Backspace => ("⌫".to_string(), None),
            };
            Paragraph::new(label)
                .centered()
                .block(Block::new().borders(Borders::ALL).border_type(BorderType::Rounded))
                .style(state_style(state))
                .render(*cell, buf);
        }
    }
}

fn render_manual_copy(text: &str, area: Rect, buf: &mut Buffer) {
    let height = (text.lines().count() as u16 + 4).min(area.height);
    let width = 40.min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    Clear.render(popup, buf);
    Paragraph::new(text)
        .block(
            Block::default()
                .title(Title::from(" Zum Kopieren markieren ".bold()).alignment(Alignment::Center))
                .title(
                    Title::from(" <Esc> schließen ")
                        .alignment(Alignment::Center)
                        .position(Position::Bottom),
                )
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::new(1, 1, 1, 0)),
        )
        .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_styles_follow_state() {
        assert_eq!(state_style(None), Style::default());
        assert_eq!(state_style(Some(LetterState::Correct)).bg, Some(Color::Green));
        assert_eq!(state_style(Some(LetterState::Present)).bg, Some(Color::Yellow));
    }

    #[test]
    fn keyboard_renders_key_states() {
        let mut keys = KeyState::default();
        keys.observe('q', LetterState::Correct);
        let area = Rect::new(0, 0, 80, 9);
        let mut buf = Buffer::empty(area);
        render_keyboard(&keys, area, &mut buf);

        let row: String = (0..area.width)
            .map(|x| buf.get(x, 1).symbol().to_string())
            .collect();
        assert!(row.contains('Q'));
        assert!(row.contains('Ü'));
        let q = (0..area.width).find(|x| buf.get(*x, 1).symbol() == "Q").unwrap();
        assert_eq!(buf.get(q, 1).bg, Color::Green);
    }
}
