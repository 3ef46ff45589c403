use tracing::warn;

use crate::models::{BackendState, BufferedMessage, DeliveryTag};
use crate::session::{BackendCommand, BackendHandle, Host, NoticeLevel};

use super::widgets::{QueueStatus, Transcript, TranscriptKind};

/// The tower's side of the session: forwards deliveries to the backend and
/// keeps the surfaces the UI draws from.
pub struct AppHost {
    backend: BackendHandle,
    transcript: Transcript,
    status: QueueStatus,
    notice: Option<(String, NoticeLevel)>,
    restored: Option<String>,
}

impl AppHost {
    pub fn new(backend: BackendHandle, status_max_items: usize) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            status: QueueStatus::new(status_max_items),
            notice: None,
            restored: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn status(&self) -> &QueueStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<(&str, NoticeLevel)> {
        self.notice.as_ref().map(|(text, level)| (text.as_str(), *level))
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Text handed back by a cancelled submission, to be put in the composer.
    pub fn take_restored(&mut self) -> Option<String> {
        self.restored.take()
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.backend.send(BackendCommand::Shutdown) {
            warn!("backend already gone at shutdown: {}", e);
        }
    }
}

impl Host for AppHost {
    fn dispatch(&mut self, text: &str, tag: DeliveryTag, backend: BackendState) {
        let command = match tag {
            DeliveryTag::Default => BackendCommand::Prompt(text.to_string()),
            DeliveryTag::Steer => BackendCommand::Steer(text.to_string()),
            DeliveryTag::FollowUp => BackendCommand::FollowUp(text.to_string()),
        };

        let label = match (tag, backend) {
            (DeliveryTag::Default, BackendState::Idle) => String::new(),
            _ => format!("[{}] ", tag),
        };
        self.transcript
            .push(TranscriptKind::Sent, format!("{}{}", label, text));

        if let Err(e) = self.backend.send(command) {
            warn!(%tag, "failed to deliver message: {}", e);
            self.notify(&format!("Error: {}", e), NoticeLevel::Warning);
        }
    }

    fn set_status(&mut self, entries: &[BufferedMessage]) {
        self.status.set_entries(entries);
    }

    fn clear_status(&mut self) {
        self.status.clear();
    }

    fn notify(&mut self, message: &str, level: NoticeLevel) {
        self.notice = Some((message.to_string(), level));
    }

    fn restore_input(&mut self, text: &str) {
        self.restored = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryMode;

    #[test]
    fn dispatch_maps_tag_to_backend_command() {
        let (handle, mut rx) = BackendHandle::channel();
        let mut host = AppHost::new(handle, 5);

        host.dispatch("a", DeliveryTag::Default, BackendState::Idle);
        host.dispatch("b", DeliveryTag::Steer, BackendState::Busy);
        host.dispatch("c", DeliveryTag::FollowUp, BackendState::Busy);

        assert_eq!(rx.try_recv().unwrap(), BackendCommand::Prompt("a".into()));
        assert_eq!(rx.try_recv().unwrap(), BackendCommand::Steer("b".into()));
        assert_eq!(rx.try_recv().unwrap(), BackendCommand::FollowUp("c".into()));
    }

    #[test]
    fn dispatch_logs_tagged_deliveries() {
        let (handle, _rx) = BackendHandle::channel();
        let mut host = AppHost::new(handle, 5);

        host.dispatch("plain", DeliveryTag::Default, BackendState::Idle);
        host.dispatch("urgent", DeliveryTag::Steer, BackendState::Busy);

        let texts: Vec<&str> = host
            .transcript()
            .lines()
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(texts, vec!["plain", "[steer] urgent"]);
    }

    #[test]
    fn dispatch_to_closed_backend_warns() {
        let (handle, rx) = BackendHandle::channel();
        drop(rx);
        let mut host = AppHost::new(handle, 5);

        host.dispatch("lost", DeliveryTag::Default, BackendState::Idle);

        let (text, level) = host.notice().unwrap();
        assert!(text.starts_with("Error:"));
        assert_eq!(level, NoticeLevel::Warning);
    }

    #[test]
    fn status_and_restore_slots() {
        let (handle, _rx) = BackendHandle::channel();
        let mut host = AppHost::new(handle, 5);

        host.set_status(&[BufferedMessage::new("x", DeliveryMode::FollowUp)]);
        assert_eq!(host.status().len(), 1);
        host.clear_status();
        assert!(host.status().is_empty());

        host.restore_input("draft");
        assert_eq!(host.take_restored().as_deref(), Some("draft"));
        assert_eq!(host.take_restored(), None);
    }
}
