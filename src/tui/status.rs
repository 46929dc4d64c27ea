//! Transient status messages for the status line.

use std::time::{Duration, Instant};

/// How long non-error messages stay visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// One transient message. Non-errors expire after [`STATUS_TTL`]; errors
/// stay until the next key input clears them.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    shown_at: Instant,
}

impl StatusMessage {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Info)
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Success)
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Error)
    }

    fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
            shown_at: Instant::now(),
        }
    }

    /// Whether the message should be dropped from the status line.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.level != StatusLevel::Error
            && now.duration_since(self.shown_at) >= STATUS_TTL
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_message_is_visible() {
        assert!(!StatusMessage::info("loading").is_expired());
        assert!(!StatusMessage::error("boom").is_expired());
    }

    #[test]
    fn test_non_error_expires_after_ttl() {
        let message = StatusMessage::success("done");
        let later = message.shown_at + STATUS_TTL + Duration::from_millis(1);
        assert!(message.is_expired_at(later));
    }

    #[test]
    fn test_error_never_expires() {
        let message = StatusMessage::error("boom");
        let later = message.shown_at + Duration::from_secs(3600);
        assert!(!message.is_expired_at(later));
    }
}
