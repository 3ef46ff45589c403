use super::loader::{is_truthy, RoutingConfig};

/// Variables whose presence means the session runs somewhere a popup is
/// awkward to drive (SSH, Termux).
const LIMITED_TERMINAL_VARS: &[&str] = &["SSH_CONNECTION", "SSH_TTY", "TERMUX_VERSION"];

/// Explicit opt-in for the constrained-terminal path.
const LIMITED_TERMINAL_FLAG: &str = "STEERQ_LIMITED_TERMINAL";

/// Resolved switches that decide whether the mode picker may be shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingPolicy {
    pub disabled: bool,
    pub limited_terminal: bool,
}

impl RoutingPolicy {
    pub fn from_env<F>(config: &RoutingConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let limited_terminal = config.detect_limited_terminal && detect_limited_terminal(&lookup);
        Self {
            disabled: config.disabled,
            limited_terminal,
        }
    }

    pub fn skips_picker(&self) -> bool {
        self.disabled || self.limited_terminal
    }
}

fn detect_limited_terminal<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if lookup(LIMITED_TERMINAL_FLAG).is_some_and(|v| is_truthy(&v)) {
        return true;
    }
    LIMITED_TERMINAL_VARS
        .iter()
        .any(|var| lookup(var).is_some_and(|v| !v.trim().is_empty()))
}
