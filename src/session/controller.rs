use tracing::{debug, info};

use crate::config::RoutingPolicy;
use crate::models::{BackendState, BufferedMessage, DeliveryMode, DeliveryTag, InputSource};
use crate::popup::{EditorAction, ModePicker, PickerAction, QueueEditor};
use crate::queue::{Flush, FlushArbiter, QueueStore, Route};
use crate::utils::truncate_str;

use super::{Host, NoticeLevel};

/// Longest message excerpt shown in a notification.
const NOTICE_EXCERPT_CHARS: usize = 60;

/// What the caller should do with a submission after interception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not ours: run the host's default submission handling on this text.
    Continue(String),
    /// Already delivered.
    Handled,
    /// Backend busy: show this picker and report back through
    /// [`SessionController::finish_mode_pick`].
    PickMode(ModePicker),
}

/// Owns the delivery queue for one session and applies the flush policy to
/// lifecycle events, submissions and editor commits.
pub struct SessionController {
    queue: QueueStore,
    arbiter: FlushArbiter,
    policy: RoutingPolicy,
    last_mode: DeliveryMode,
}

impl SessionController {
    pub fn new(policy: RoutingPolicy) -> Self {
        Self {
            queue: QueueStore::new(),
            arbiter: FlushArbiter::new(),
            policy,
            last_mode: DeliveryMode::default(),
        }
    }

    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    pub fn backend(&self) -> BackendState {
        self.arbiter.backend()
    }

    pub fn is_editing(&self) -> bool {
        self.arbiter.is_editing()
    }

    pub fn last_mode(&self) -> DeliveryMode {
        self.last_mode
    }

    pub fn policy(&self) -> RoutingPolicy {
        self.policy
    }

    /// Session start or switch: forget everything session-scoped.
    pub fn on_session_start<H: Host>(&mut self, host: &mut H) {
        debug!(dropped = self.queue.len(), "session reset");
        self.last_mode = DeliveryMode::default();
        self.queue.clear();
        self.arbiter.reset();
        host.clear_status();
    }

    pub fn on_agent_start(&mut self) {
        debug!("backend busy");
        self.arbiter.on_agent_start();
    }

    pub fn on_agent_end<H: Host>(&mut self, host: &mut H) {
        debug!(queued = self.queue.len(), editing = self.is_editing(), "backend idle");
        if let Some(flush) = self.arbiter.on_agent_end(&mut self.queue) {
            self.dispatch_flush(host, flush);
            self.refresh_status(host);
        }
    }

    pub fn handle_input<H: Host>(&mut self, text: String, source: InputSource, host: &mut H) -> InputOutcome {
        match self.arbiter.route(&text, source, self.policy) {
            Route::PassThrough(reason) => {
                debug!(?reason, "submission passes through");
                InputOutcome::Continue(text)
            }
            Route::Deliver => {
                self.dispatch(host, &text, DeliveryTag::Default);
                InputOutcome::Handled
            }
            Route::PickMode => InputOutcome::PickMode(ModePicker::new(text, self.last_mode)),
        }
    }

    /// Completes a busy-time submission once its picker has resolved. The
    /// backend may have finished in the meantime.
    pub fn finish_mode_pick<H: Host>(&mut self, text: String, action: PickerAction, host: &mut H) {
        let mode = match action {
            PickerAction::Cancel => {
                host.restore_input(&text);
                return;
            }
            PickerAction::Select(mode) => mode,
        };
        self.last_mode = mode;

        match mode {
            DeliveryMode::Steer => {
                host.notify(&format!("Steer: {}", excerpt(&text)), NoticeLevel::Info);
                self.dispatch(host, &text, DeliveryTag::Steer);
            }
            DeliveryMode::FollowUp => {
                host.notify(&format!("Queued follow-up: {}", excerpt(&text)), NoticeLevel::Info);
                self.queue.append(BufferedMessage::new(text, DeliveryMode::FollowUp));
                if let Some(flush) = self.arbiter.after_follow_up(&mut self.queue) {
                    debug!("backend went idle while picking; flushing now");
                    self.dispatch_flush(host, flush);
                }
                self.refresh_status(host);
            }
        }
    }

    /// Opens an edit session on a copy of the queue, or explains why not.
    pub fn open_editor<H: Host>(&mut self, host: &mut H) -> Option<QueueEditor> {
        if self.queue.is_empty() {
            host.notify("No queued messages", NoticeLevel::Info);
            return None;
        }
        if self.arbiter.is_editing() {
            host.notify("Queue editor is already open", NoticeLevel::Warning);
            return None;
        }
        self.arbiter.begin_edit();
        Some(QueueEditor::new(self.queue.items().to_vec()))
    }

    pub fn finish_edit<H: Host>(&mut self, action: EditorAction, host: &mut H) {
        match action {
            EditorAction::Cancel => {
                debug!("edit session cancelled");
                self.arbiter.cancel_edit();
            }
            EditorAction::Save(items) => {
                debug!(items = items.len(), "edit session committed");
                if let Some(flush) = self.arbiter.commit_edit(&mut self.queue, items) {
                    if flush.tag == DeliveryTag::Steer {
                        host.notify(&format!("Steer: {}", excerpt(&flush.message.text)), NoticeLevel::Info);
                    }
                    self.dispatch_flush(host, flush);
                }
                self.refresh_status(host);
            }
        }
    }

    fn dispatch_flush<H: Host>(&self, host: &mut H, flush: Flush) {
        self.dispatch(host, &flush.message.text, flush.tag);
    }

    fn dispatch<H: Host>(&self, host: &mut H, text: &str, tag: DeliveryTag) {
        let backend = self.arbiter.backend();
        info!(%tag, %backend, "dispatching message");
        host.dispatch(text, tag, backend);
    }

    fn refresh_status<H: Host>(&self, host: &mut H) {
        if self.queue.is_empty() {
            host.clear_status();
        } else {
            host.set_status(self.queue.items());
        }
    }
}

fn excerpt(text: &str) -> String {
    truncate_str(text.trim(), NOTICE_EXCERPT_CHARS)
}
