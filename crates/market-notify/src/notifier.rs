//! Notification service client
//!
//! The notification service is an external collaborator: it accepts
//! (recipient, subject, body) and answers success or failure, with no
//! delivery guarantee beyond that.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// A rendered, deliverable message
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport error: {0}")]
    Transport(String),

    #[error("notification service rejected the message: HTTP {0}")]
    Rejected(u16),
}

/// Client contract for the notification service
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt delivery of a single message
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// HTTP client for the notification service
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNotifier {
    /// Create a notifier posting to the given endpoint.
    ///
    /// The request timeout bounds a single delivery attempt; the
    /// dispatcher applies the same bound around the whole send.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        debug!(to = %message.to, subject = %message.subject, "notification delivered");
        Ok(())
    }
}

/// Build the configured notifier: HTTP when an endpoint is set, logging
/// fallback otherwise.
pub fn build_notifier(config: &market_common::NotifierConfig) -> std::sync::Arc<dyn Notifier> {
    use std::sync::Arc;
    use tracing::{info, warn};

    let timeout = Duration::from_secs(config.timeout_secs);
    match &config.endpoint {
        Some(endpoint) => match HttpNotifier::new(endpoint.clone(), timeout) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                warn!(error = %e, "failed to build notification client, falling back to logging");
                Arc::new(LogNotifier)
            }
        },
        None => {
            info!("notification endpoint not configured; notifications will be logged only");
            Arc::new(LogNotifier)
        }
    }
}

/// Fallback notifier used when no endpoint is configured: logs the message
/// at debug level and reports success. Mirrors running without an email
/// provider in development.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        debug!(
            to = %message.to,
            subject = %message.subject,
            "notification service not configured; dropping message"
        );
        Ok(())
    }
}
