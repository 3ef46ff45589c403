use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker attached to every dispatch. Always explicit, never inferred from
/// whether the backend happens to be busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTag {
    /// Plain delivery, the way an idle backend receives a prompt.
    Default,
    /// Interrupt the running task.
    Steer,
    /// Run after the current task.
    FollowUp,
}

impl fmt::Display for DeliveryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryTag::Default => "default",
            DeliveryTag::Steer => "steer",
            DeliveryTag::FollowUp => "follow-up",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendState {
    #[default]
    Idle,
    Busy,
}

impl BackendState {
    pub fn is_busy(self) -> bool {
        self == BackendState::Busy
    }

    pub fn is_idle(self) -> bool {
        self == BackendState::Idle
    }
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendState::Idle => f.write_str("idle"),
            BackendState::Busy => f.write_str("busy"),
        }
    }
}

/// Where a submission came from. Only interactive input is ever intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Interactive,
    Programmatic,
}
