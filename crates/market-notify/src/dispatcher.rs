//! Fire-and-forget notification dispatch
//!
//! Events enter a bounded queue and are delivered by a background worker
//! holding at most `max_in_flight` sends at once, each bounded by a
//! timeout. One attempt per event, no retry, no ordering guarantee.
//! Nothing here can fail a request: a full queue drops the event with a
//! log line, and so does a failed or timed-out delivery.

use std::sync::Arc;
use std::time::Duration;

use market_common::NotifierConfig;
use tokio::sync::{mpsc, Semaphore};
use tracing::warn;

use crate::notification::Notification;
use crate::notifier::{build_notifier, Notifier};

/// Handle for enqueueing notifications
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Notification>,
    sender: Arc<str>,
}

impl NotificationDispatcher {
    /// Build a dispatcher from configuration and start its worker.
    ///
    /// Without a configured endpoint the dispatcher degrades to logging
    /// deliveries at debug level.
    pub fn from_config(config: &NotifierConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let notifier = build_notifier(config);

        Self::spawn(
            notifier,
            &config.sender,
            config.queue_capacity,
            config.max_in_flight,
            timeout,
        )
    }

    /// Start the worker with an explicit notifier (used by tests)
    pub fn spawn(
        notifier: Arc<dyn Notifier>,
        sender: &str,
        queue_capacity: usize,
        max_in_flight: usize,
        timeout: Duration,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<Notification>(queue_capacity.max(1));
        let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
        let from: Arc<str> = Arc::from(sender);
        let worker_from = Arc::clone(&from);

        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    // Semaphore closed; worker is shutting down
                    break;
                };
                let notifier = Arc::clone(&notifier);
                let from = Arc::clone(&worker_from);

                tokio::spawn(async move {
                    let message = notification.to_message(&from);
                    let result =
                        tokio::time::timeout(timeout, notifier.send(&message)).await;

                    match result {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => warn!(
                            kind = notification.kind(),
                            to = notification.recipient(),
                            error = %e,
                            "notification delivery failed"
                        ),
                        Err(_) => warn!(
                            kind = notification.kind(),
                            to = notification.recipient(),
                            "notification delivery timed out"
                        ),
                    }
                    drop(permit);
                });
            }
        });

        Self { tx, sender: from }
    }

    /// Enqueue a notification without waiting. A full queue drops the
    /// event; callers never observe the outcome.
    pub fn dispatch(&self, notification: Notification) {
        if let Err(e) = self.tx.try_send(notification) {
            let notification = match e {
                mpsc::error::TrySendError::Full(n) | mpsc::error::TrySendError::Closed(n) => n,
            };
            warn!(
                kind = notification.kind(),
                to = notification.recipient(),
                "notification queue unavailable, dropping event"
            );
        }
    }

    /// Sender address used on outgoing messages
    pub fn sender(&self) -> &str {
        &self.sender
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{EmailMessage, NotifyError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Notifier that records every message it receives
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<EmailMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(message.clone());
            if self.fail {
                Err(NotifyError::Rejected(500))
            } else {
                Ok(())
            }
        }
    }

    fn test_notification() -> Notification {
        Notification::PasswordReset {
            to: "user@example.com".to_string(),
            name: "Ada".to_string(),
            reset_token: "token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_delivers_once() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = NotificationDispatcher::spawn(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            "no-reply@market.local",
            8,
            2,
            Duration::from_secs(1),
        );

        dispatcher.dispatch(test_notification());

        // Give the worker a moment to drain the queue
        tokio::time::sleep(Duration::from_millis(100)).await;

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");
        assert_eq!(sent[0].from, "no-reply@market.local");
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(Vec::new()),
            fail: true,
        });
        let dispatcher = NotificationDispatcher::spawn(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            "no-reply@market.local",
            8,
            2,
            Duration::from_secs(1),
        );

        // Must not panic or propagate anything
        dispatcher.dispatch(test_notification());
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Exactly one attempt was made, no retries
        assert_eq!(notifier.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_never_blocks_on_full_queue() {
        // Notifier that sleeps longer than the test, so the queue fills
        struct SlowNotifier;

        #[async_trait]
        impl Notifier for SlowNotifier {
            async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        }

        let dispatcher = NotificationDispatcher::spawn(
            Arc::new(SlowNotifier),
            "no-reply@market.local",
            1,
            1,
            Duration::from_secs(120),
        );

        // Flood well past the queue capacity; every call must return
        // immediately even though nothing is draining.
        for _ in 0..20 {
            dispatcher.dispatch(test_notification());
        }
    }
}
