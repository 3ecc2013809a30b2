use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;

use super::actions::*;
use super::*;

const TICK_RATE: std::time::Duration = std::time::Duration::from_millis(250);

impl<S: KeyValueStore> App<S> {
    pub fn handle_events(&self) -> tokio::task::JoinHandle<()> {
        let tx = self.action_tx.clone();
        let token = self.token.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(TICK_RATE);
            loop {
                let action = tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tick.tick() => Some(Action::Tick),
                    event = reader.next() => match event {
                        Some(Ok(Event::Key(key))) => handle_key_event(key),
                        // redraw on resize and the like
                        Some(Ok(_)) => None,
                        Some(Err(e)) => {
                            tracing::warn!("terminal event error: {e}");
                            None
                        }
                        None => break,
                    },
                };
                if tx.send(action).is_err() {
                    break;
                }
            }
        })
    }
}

fn handle_key_event(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Exit,
        KeyCode::Esc => Action::Escape,

        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::DeleteChar,
        KeyCode::F(2) => Action::Share,
        KeyCode::F(5) => Action::Restart,

        // Enter words
        KeyCode::Char(x) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::EnterChar(x),
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<Action> {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keys_map_to_actions() {
        assert!(matches!(press(KeyCode::Char('ä')), Some(Action::EnterChar('ä'))));
        assert!(matches!(press(KeyCode::Enter), Some(Action::Submit)));
        assert!(matches!(press(KeyCode::Backspace), Some(Action::DeleteChar)));
        assert!(matches!(press(KeyCode::Esc), Some(Action::Escape)));
        assert!(matches!(press(KeyCode::F(2)), Some(Action::Share)));
        assert!(press(KeyCode::Tab).is_none());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handle_key_event(ctrl_c), Some(Action::Exit)));
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(handle_key_event(key).is_none());
    }
}
