use super::{INotifier, NotificationError};
use chime_domain::Channel;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub user_id: i64,
    pub channel: Channel,
    pub message: String,
}

/// In-memory `INotifier` for tests and local runs
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<SentNotification>>,
    should_fail: AtomicBool,
    attempts: AtomicUsize,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_should_fail(true);
        notifier
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or_default()
    }

    /// Every call, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl INotifier for MockNotifier {
    async fn send(&self, user_id: i64, channel: &Channel, message: &str) -> Result<(), NotificationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Rejected("mock notifier failure".into()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentNotification {
                user_id,
                channel: channel.clone(),
                message: message.to_string(),
            });
        }
        Ok(())
    }
}
