use tracing::debug;

use crate::config::RoutingPolicy;
use crate::models::{BackendState, BufferedMessage, DeliveryTag, InputSource};

use super::{is_command_bypass, QueueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// Re-submitted by the program itself, including our own dispatches.
    Programmatic,
    /// Looks like a slash command.
    Command,
    /// Picker disabled or constrained terminal detected.
    Restricted,
}

/// Where a fresh submission goes before any popup is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Hand the text, unmodified, to default submission handling.
    PassThrough(PassReason),
    /// Backend idle: deliver now with the default tag.
    Deliver,
    /// Backend busy: ask the user how to deliver.
    PickMode,
}

/// A message leaving the queue, with the tag it must be dispatched under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flush {
    pub message: BufferedMessage,
    pub tag: DeliveryTag,
}

impl Flush {
    fn idle(message: BufferedMessage) -> Self {
        Self {
            message,
            tag: DeliveryTag::Default,
        }
    }

    fn priority(message: BufferedMessage) -> Self {
        Self {
            message,
            tag: DeliveryTag::Steer,
        }
    }
}

/// Decides which queue entry leaves the queue, and when.
///
/// Tracks the backend's busy/idle state and whether an edit session is open.
/// It never talks to the host; callers dispatch the returned [`Flush`].
#[derive(Debug, Default)]
pub struct FlushArbiter {
    backend: BackendState,
    editing: bool,
}

impl FlushArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(&self) -> BackendState {
        self.backend
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Session start. The backend keeps its own busy/idle state across a
    /// session switch, so only the edit guard is dropped.
    pub fn reset(&mut self) {
        self.editing = false;
    }

    pub fn route(&self, text: &str, source: InputSource, policy: RoutingPolicy) -> Route {
        if source == InputSource::Programmatic {
            return Route::PassThrough(PassReason::Programmatic);
        }
        if is_command_bypass(text) {
            return Route::PassThrough(PassReason::Command);
        }
        if policy.skips_picker() {
            return Route::PassThrough(PassReason::Restricted);
        }
        match self.backend {
            BackendState::Idle => Route::Deliver,
            BackendState::Busy => Route::PickMode,
        }
    }

    pub fn on_agent_start(&mut self) {
        self.backend = BackendState::Busy;
    }

    /// Busy to idle. Releases the head of the queue unless an edit session
    /// holds it; the commit will flush instead.
    pub fn on_agent_end(&mut self, store: &mut QueueStore) -> Option<Flush> {
        self.backend = BackendState::Idle;
        if self.editing {
            debug!("agent_end while editing; deferring flush to commit");
            return None;
        }
        store.pop_front().map(Flush::idle)
    }

    /// Called right after a follow-up was appended. The backend may have gone
    /// idle while the picker was open, in which case nobody else will drain it.
    pub fn after_follow_up(&self, store: &mut QueueStore) -> Option<Flush> {
        if self.backend.is_idle() && !self.editing {
            return store.pop_front().map(Flush::idle);
        }
        None
    }

    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
    }

    /// Replaces the store with the committed items, then flushes at most one
    /// entry: the head when idle, or the first steer-tagged entry when busy.
    pub fn commit_edit(&mut self, store: &mut QueueStore, items: Vec<BufferedMessage>) -> Option<Flush> {
        self.editing = false;
        store.replace_all(items);

        match self.backend {
            BackendState::Idle => store.pop_front().map(Flush::idle),
            BackendState::Busy => store.pop_first(BufferedMessage::is_steer).map(Flush::priority),
        }
    }
}
