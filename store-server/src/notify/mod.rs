//! Notification Module
//!
//! Buyer notifications are fire-and-forget from the caller's perspective: a
//! failed send is logged by the caller and never affects the outcome of the
//! operation that triggered it.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Send failed: {0}")]
    Send(String),
}

/// Notification sender
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

// =============================================================================
// Log Notifier
// =============================================================================

/// Default sender: records the notification in the log stream. The actual
/// mail transport is provisioned outside this core.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            to = %to_email,
            subject = %subject,
            body = %body,
            "Buyer notification dispatched"
        );
        Ok(())
    }
}

// =============================================================================
// Memory Notifier
// =============================================================================

/// A captured notification
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Recording sender with failure injection, for tests
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Everything sent so far
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, to_email: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Send("mail transport unavailable".to_string()));
        }
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(SentNotification {
                to: to_email.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
        Ok(())
    }
}
