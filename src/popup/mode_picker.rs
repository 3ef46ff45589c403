use crate::models::DeliveryMode;

use super::{KeyToken, PopupWidget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Select(DeliveryMode),
    Cancel,
}

/// Asks how a submission made while the backend is busy should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePicker {
    selected: DeliveryMode,
    message_text: String,
}

impl ModePicker {
    pub fn new(message_text: impl Into<String>, initial: DeliveryMode) -> Self {
        Self {
            selected: initial,
            message_text: message_text.into(),
        }
    }

    pub fn selected(&self) -> DeliveryMode {
        self.selected
    }

    pub fn message_text(&self) -> &str {
        &self.message_text
    }
}

impl PopupWidget for ModePicker {
    type Output = PickerAction;

    fn handle_key(&mut self, key: KeyToken) -> Option<PickerAction> {
        match key {
            KeyToken::Tab | KeyToken::Up | KeyToken::Down => {
                self.selected = self.selected.toggle();
                None
            }
            KeyToken::Left => {
                self.selected = DeliveryMode::Steer;
                None
            }
            KeyToken::Right => {
                self.selected = DeliveryMode::FollowUp;
                None
            }
            KeyToken::Enter => Some(PickerAction::Select(self.selected)),
            KeyToken::Escape => Some(PickerAction::Cancel),
            _ => None,
        }
    }
}
