//! Input-reducing state machines shown as popups, and the single-resolution
//! signal their callers wait on.

mod completion;
mod keys;
mod mode_picker;
mod queue_editor;
mod text_input;

pub use completion::{completion, Completion, PopupWaiter};
pub use keys::KeyToken;
pub use mode_picker::{ModePicker, PickerAction};
pub use queue_editor::{EditorAction, EditorMode, QueueEditor};
pub use text_input::{TextInput, TextInputEvent};

/// A state machine that consumes key tokens until it produces a terminal
/// output.
pub trait PopupWidget {
    type Output;

    fn handle_key(&mut self, key: KeyToken) -> Option<Self::Output>;
}

/// An open popup: the widget plus the signal that releases whoever is
/// waiting on it. Keys arriving after resolution are ignored.
#[derive(Debug)]
pub struct Popup<W: PopupWidget> {
    widget: W,
    done: Completion<W::Output>,
}

impl<W: PopupWidget> Popup<W> {
    pub fn open(widget: W) -> (Self, PopupWaiter<W::Output>) {
        let (done, waiter) = completion();
        (Self { widget, done }, waiter)
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn is_resolved(&self) -> bool {
        self.done.is_resolved()
    }

    /// Feeds one key. Returns true once the popup has resolved and should be
    /// closed.
    pub fn handle_key(&mut self, key: KeyToken) -> bool {
        if self.done.is_resolved() {
            return true;
        }
        if let Some(output) = self.widget.handle_key(key) {
            self.done.resolve(output);
        }
        self.done.is_resolved()
    }
}
