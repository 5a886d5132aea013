//! User-facing notifications
//!
//! The engines report problems the user should see through a `Notifier`
//! passed in by the caller. `warn` is for messages that may disappear on
//! their own; `error` is for messages that must stay until dismissed.

use std::cell::RefCell;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

/// Sink for user-visible notifications
pub trait Notifier {
    /// Auto-dismissing warning
    fn warn(&self, message: &str);

    /// Persistent, critical error
    fn error(&self, message: &str);
}

/// Forwards notifications to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "weekly_budget::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "weekly_budget::notify", "{}", message);
    }
}

/// Prints notifications to stderr, for the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn warn(&self, message: &str) {
        eprintln!("warning: {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }
}

/// Keeps every notification in memory, in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notifications
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> Vec<String> {
        self.with_severity(Severity::Critical)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }

    fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Severity::Warning, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push((Severity::Critical, message.to_string()));
    }
}
