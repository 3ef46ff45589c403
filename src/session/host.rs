use crate::models::{BackendState, BufferedMessage, DeliveryTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Side effects the session controller asks of its surroundings.
///
/// `dispatch` always receives an explicit delivery tag; the backend state is a
/// separate argument so an implementation never has to guess one from the
/// other.
pub trait Host {
    fn dispatch(&mut self, text: &str, tag: DeliveryTag, backend: BackendState);

    /// Shows the pending queue. Never called with an empty slice.
    fn set_status(&mut self, entries: &[BufferedMessage]);

    fn clear_status(&mut self);

    fn notify(&mut self, message: &str, level: NoticeLevel);

    /// Puts text back into the input surface it was submitted from.
    fn restore_input(&mut self, text: &str);
}
