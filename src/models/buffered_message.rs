use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// How a buffered message should reach the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Interrupt the running task and redirect it.
    #[default]
    Steer,
    /// Hold until the running task finishes.
    FollowUp,
}

impl DeliveryMode {
    pub fn all() -> &'static [DeliveryMode] {
        &[DeliveryMode::Steer, DeliveryMode::FollowUp]
    }

    pub fn toggle(self) -> Self {
        match self {
            DeliveryMode::Steer => DeliveryMode::FollowUp,
            DeliveryMode::FollowUp => DeliveryMode::Steer,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeliveryMode::Steer => "steer",
            DeliveryMode::FollowUp => "follow-up",
        }
    }

    pub fn is_steer(self) -> bool {
        self == DeliveryMode::Steer
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque identifier assigned once when a message enters the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Timestamp plus a per-process sequence number, so two ids minted in the
    /// same millisecond still differ.
    pub fn generate() -> Self {
        let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        Self(format!("msg-{}-{}", now.format("%Y%m%d-%H%M%S%3f"), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferedMessage {
    pub id: MessageId,
    pub text: String,
    pub mode: DeliveryMode,
}

impl BufferedMessage {
    pub fn new(text: impl Into<String>, mode: DeliveryMode) -> Self {
        Self {
            id: MessageId::generate(),
            text: text.into(),
            mode,
        }
    }

    pub fn is_steer(&self) -> bool {
        self.mode.is_steer()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }
}
