use super::KeyToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    Submit(String),
    Cancel,
}

/// Single-line text buffer with a cursor. `cursor` is a byte offset that
/// always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    content: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the buffer with the cursor at the end.
    pub fn with_content(content: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_content(content);
        input
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Drops everything before the cursor.
    pub fn kill_to_start(&mut self) {
        self.content.replace_range(..self.cursor, "");
        self.cursor = 0;
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.cursor)
    }

    pub fn handle_key(&mut self, key: KeyToken) -> Option<TextInputEvent> {
        match key {
            KeyToken::Enter => return Some(TextInputEvent::Submit(self.content.clone())),
            KeyToken::Escape => return Some(TextInputEvent::Cancel),
            KeyToken::Char(c) => self.insert_char(c),
            KeyToken::Backspace => self.delete_char(),
            KeyToken::Delete => self.delete_forward(),
            KeyToken::Left => self.move_cursor_left(),
            KeyToken::Right => self.move_cursor_right(),
            KeyToken::Home => self.move_cursor_start(),
            KeyToken::End => self.move_cursor_end(),
            KeyToken::Ctrl(c) => match c {
                'a' => self.move_cursor_start(),
                'e' => self.move_cursor_end(),
                'b' => self.move_cursor_left(),
                'f' => self.move_cursor_right(),
                'd' => self.delete_forward(),
                'h' => self.delete_char(),
                'u' => self.kill_to_start(),
                _ => {}
            },
            KeyToken::Tab | KeyToken::Up | KeyToken::Down | KeyToken::Other => {}
        }
        None
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut TextInput, s: &str) {
        for c in s.chars() {
            input.handle_key(KeyToken::Char(c));
        }
    }

    #[test]
    fn text_input_empty_by_default() {
        let input = TextInput::new();
        assert!(input.is_blank());
        assert_eq!(input.content(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn with_content_puts_cursor_at_end() {
        let input = TextInput::with_content("Hello");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut input = TextInput::with_content("Hllo");
        input.move_cursor_start();
        input.move_cursor_right();
        input.insert_char('e');
        assert_eq!(input.content(), "Hello");
    }

    #[test]
    fn backspace_at_start_does_nothing() {
        let mut input = TextInput::with_content("Hello");
        input.move_cursor_start();
        input.handle_key(KeyToken::Backspace);
        assert_eq!(input.content(), "Hello");
    }

    #[test]
    fn multibyte_editing_respects_char_boundaries() {
        let mut input = TextInput::new();
        type_str(&mut input, "héllo日本");

        input.handle_key(KeyToken::Backspace);
        assert_eq!(input.content(), "héllo日");

        input.handle_key(KeyToken::Home);
        input.handle_key(KeyToken::Right);
        input.handle_key(KeyToken::Delete);
        assert_eq!(input.content(), "hllo日");

        input.handle_key(KeyToken::End);
        input.handle_key(KeyToken::Left);
        let (before, after) = input.split_at_cursor();
        assert_eq!(before, "hllo");
        assert_eq!(after, "日");
    }

    #[test]
    fn emacs_chords_move_and_kill() {
        let mut input = TextInput::with_content("one two");
        input.handle_key(KeyToken::Ctrl('a'));
        assert_eq!(input.cursor(), 0);
        input.handle_key(KeyToken::Ctrl('e'));
        assert_eq!(input.cursor(), 7);
        input.handle_key(KeyToken::Ctrl('b'));
        input.handle_key(KeyToken::Ctrl('u'));
        assert_eq!(input.content(), "o");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_submits_current_content() {
        let mut input = TextInput::with_content("draft");
        assert_eq!(
            input.handle_key(KeyToken::Enter),
            Some(TextInputEvent::Submit("draft".to_string()))
        );
    }

    #[test]
    fn escape_cancels() {
        let mut input = TextInput::with_content("draft");
        assert_eq!(input.handle_key(KeyToken::Escape), Some(TextInputEvent::Cancel));
    }

    #[test]
    fn take_empties_buffer() {
        let mut input = TextInput::with_content("send me");
        assert_eq!(input.take(), "send me");
        assert!(input.is_blank());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn whitespace_only_is_blank() {
        let input = TextInput::with_content("   \t  ");
        assert!(input.is_blank());
    }
}
