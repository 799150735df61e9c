//! # market-notify
//!
//! Best-effort notification delivery, decoupled from the request/response
//! cycle. Events are handed to a bounded queue and delivered by a worker
//! with a concurrency cap and a per-attempt timeout. Exactly one delivery
//! attempt is made per event; failures are logged and dropped, never
//! surfaced to the caller.

mod dispatcher;
mod notification;
mod notifier;

pub use dispatcher::NotificationDispatcher;
pub use notification::{Notification, NotificationLine};
pub use notifier::{
    build_notifier, EmailMessage, HttpNotifier, LogNotifier, Notifier, NotifyError,
};
