//! # Navigation and Notices
//!
//! Flows never print or render. They report where the client should go
//! next as a [`Route`] and push user-facing toasts through a [`Notifier`].

use std::sync::Mutex;
use tracing::{info, warn};

/// Destinations a flow can send the client to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Login screen (no or expired session)
    Login,
    /// Previous screen
    Back,
    /// Cart listing
    Cart,
    /// Hosted payment page at this URL
    PaymentPage(String),
    /// Payment failure screen
    PaymentFailed,
    /// Orders listing (after a successful payment redirect)
    Orders,
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A toast shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Sink for toasts
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(notice = %notice.text, "notice"),
            NoticeLevel::Error => warn!(notice = %notice.text, "notice"),
        }
    }
}

/// Notifier that keeps every notice, for inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let n = RecordingNotifier::new();
        n.notify(Notice::success("ok"));
        n.notify(Notice::error("boom"));
        assert_eq!(n.notices().len(), 2);
        assert_eq!(n.last(), Some(Notice::error("boom")));
    }
}
