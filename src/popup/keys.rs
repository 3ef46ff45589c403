use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key vocabulary understood by the popups and the inline editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyToken {
    Tab,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    Delete,
    Home,
    End,
    Char(char),
    Ctrl(char),
    Other,
}

impl From<KeyEvent> for KeyToken {
    fn from(key: KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char(c) => KeyToken::Ctrl(c.to_ascii_lowercase()),
                _ => KeyToken::Other,
            };
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return KeyToken::Other;
        }
        match key.code {
            KeyCode::Tab => KeyToken::Tab,
            KeyCode::Up => KeyToken::Up,
            KeyCode::Down => KeyToken::Down,
            KeyCode::Left => KeyToken::Left,
            KeyCode::Right => KeyToken::Right,
            KeyCode::Enter => KeyToken::Enter,
            KeyCode::Esc => KeyToken::Escape,
            KeyCode::Backspace => KeyToken::Backspace,
            KeyCode::Delete => KeyToken::Delete,
            KeyCode::Home => KeyToken::Home,
            KeyCode::End => KeyToken::End,
            KeyCode::Char(c) => KeyToken::Char(c),
            _ => KeyToken::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyToken {
        KeyEvent::new(code, modifiers).into()
    }

    #[test]
    fn plain_keys_map_directly() {
        assert_eq!(key(KeyCode::Tab, KeyModifiers::NONE), KeyToken::Tab);
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), KeyToken::Escape);
        assert_eq!(key(KeyCode::Char('j'), KeyModifiers::NONE), KeyToken::Char('j'));
    }

    #[test]
    fn shifted_letters_keep_their_case() {
        assert_eq!(key(KeyCode::Char('K'), KeyModifiers::SHIFT), KeyToken::Char('K'));
    }

    #[test]
    fn control_chords_are_separate_tokens() {
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::CONTROL), KeyToken::Ctrl('a'));
        assert_eq!(key(KeyCode::Enter, KeyModifiers::CONTROL), KeyToken::Other);
    }

    #[test]
    fn alt_chords_and_unknown_keys_are_inert() {
        assert_eq!(key(KeyCode::Char('q'), KeyModifiers::ALT), KeyToken::Other);
        assert_eq!(key(KeyCode::BackTab, KeyModifiers::SHIFT), KeyToken::Other);
        assert_eq!(key(KeyCode::F(5), KeyModifiers::NONE), KeyToken::Other);
    }
}
