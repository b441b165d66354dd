//! Inbound commands to the application service.
//!
//! Text received from the chat transport is parsed here into typed
//! commands that the [`AppService`](super::service::AppService) acts upon.

/// Commands the remote user can send while the monitor is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Acknowledge, then restart the device.
    Reset,
    /// Reply with a status report.
    Status,
}

impl Command {
    /// Parse a message body. Surrounding whitespace is ignored, matching is
    /// case-sensitive and a `@botname` suffix on the command word is
    /// stripped. Anything unrecognised yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let word = word.split_once('@').map_or(word, |(cmd, _bot)| cmd);
        match word {
            "/reset" => Some(Self::Reset),
            "/status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Extract a warmup duration from a provisioning reply.
///
/// Digit runs are scanned anywhere in the text (`"10min"`, `"warmup=5"`);
/// the first one that is positive and fits a `u32` is the answer. A run
/// directly preceded by `-` is negative and skipped, as are zero and
/// overflowing runs. Replies without such a run are rejected.
pub fn parse_warmup_minutes(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if start > 0 && bytes[start - 1] == b'-' {
            continue;
        }
        if let Ok(minutes @ 1..) = text[start..i].parse::<u32>() {
            return Some(minutes);
        }
    }
    None
}
