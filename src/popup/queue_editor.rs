use crate::models::BufferedMessage;
use crate::queue::{Direction, QueueStore};

use super::{KeyToken, PopupWidget, TextInput, TextInputEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    Save(Vec<BufferedMessage>),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    List,
    Edit,
}

/// Reviews and rearranges a private copy of the queue.
///
/// Nothing here touches the live queue: the caller decides what to do with
/// the `Save` payload. While in [`EditorMode::Edit`] every key belongs to the
/// inline text editor.
#[derive(Debug, Clone)]
pub struct QueueEditor {
    items: QueueStore,
    selected: usize,
    mode: EditorMode,
    draft: TextInput,
    /// Only an editor opened on an empty queue treats Escape as a save.
    opened_empty: bool,
}

impl QueueEditor {
    pub fn new(items: Vec<BufferedMessage>) -> Self {
        let opened_empty = items.is_empty();
        Self {
            opened_empty,
            items: QueueStore::from_items(items),
            selected: 0,
            mode: EditorMode::List,
            draft: TextInput::new(),
        }
    }

    pub fn items(&self) -> &[BufferedMessage] {
        self.items.items()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &TextInput {
        &self.draft
    }

    fn handle_list_key(&mut self, key: KeyToken) -> Option<EditorAction> {
        if self.items.is_empty() {
            return match key {
                KeyToken::Enter => Some(EditorAction::Save(Vec::new())),
                KeyToken::Escape if self.opened_empty => Some(EditorAction::Save(Vec::new())),
                KeyToken::Escape => Some(EditorAction::Cancel),
                _ => None,
            };
        }

        match key {
            KeyToken::Up => self.selected = self.selected.saturating_sub(1),
            KeyToken::Down => self.selected = (self.selected + 1).min(self.items.len() - 1),
            KeyToken::Char('j') | KeyToken::Char('J') => self.move_selected(Direction::Down),
            KeyToken::Char('k') | KeyToken::Char('K') => self.move_selected(Direction::Up),
            KeyToken::Tab => {
                if let Some(item) = self.items.get_mut(self.selected) {
                    item.toggle_mode();
                }
            }
            KeyToken::Char('e') => self.start_edit(),
            KeyToken::Char('d') | KeyToken::Delete | KeyToken::Backspace => self.delete_selected(),
            KeyToken::Enter => return Some(EditorAction::Save(self.items.items().to_vec())),
            KeyToken::Escape => return Some(EditorAction::Cancel),
            _ => {}
        }
        None
    }

    fn handle_edit_key(&mut self, key: KeyToken) {
        match self.draft.handle_key(key) {
            Some(TextInputEvent::Submit(text)) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if let Some(item) = self.items.get_mut(self.selected) {
                        item.text = trimmed.to_string();
                    }
                }
                self.finish_edit();
            }
            Some(TextInputEvent::Cancel) => self.finish_edit(),
            None => {}
        }
    }

    fn move_selected(&mut self, direction: Direction) {
        if let Some(target) = self.items.move_adjacent(self.selected, direction) {
            self.selected = target;
        }
    }

    fn start_edit(&mut self) {
        if let Some(item) = self.items.get(self.selected) {
            self.draft = TextInput::with_content(item.text.clone());
            self.mode = EditorMode::Edit;
        }
    }

    fn finish_edit(&mut self) {
        self.draft.clear();
        self.mode = EditorMode::List;
    }

    fn delete_selected(&mut self) {
        self.items.remove(self.selected);
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }
}

impl PopupWidget for QueueEditor {
    type Output = EditorAction;

    fn handle_key(&mut self, key: KeyToken) -> Option<EditorAction> {
        match self.mode {
            EditorMode::List => self.handle_list_key(key),
            EditorMode::Edit => {
                self.handle_edit_key(key);
                None
            }
        }
    }
}
