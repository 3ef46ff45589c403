use regex::Regex;
use std::sync::LazyLock;

static COMMAND_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9:_-]*$").expect("command token pattern is valid"));

/// Returns true when a submission looks like a slash command rather than chat
/// content. Only the leading token is inspected: `/model q` is a command with
/// an argument, while `/tmp/build.log` is a path because its first token
/// carries a second `/`.
pub fn is_command_bypass(text: &str) -> bool {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return false;
    }
    let token = trimmed.split_whitespace().next().unwrap_or(trimmed);
    COMMAND_TOKEN.is_match(token)
}
