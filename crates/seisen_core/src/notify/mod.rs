//! Notification payloads, delivery seam and periodic scheduler.
//!
//! # Responsibility
//! - Describe one local notification independently of the OS backend.
//! - Drive best-effort periodic delivery of the current note.
//!
//! # Invariants
//! - Delivery failures are logged and dropped; they never touch session state.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

pub mod scheduler;

/// One local notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Fresh request id per delivery.
    pub id: Uuid,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Delivery failure reported by a notification backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The backend rejected or could not post the request.
    Delivery(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivery(message) => write!(f, "notification delivery failed: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// External notification collaborator.
///
/// Permission handling, display and retry policy belong to the backend.
pub trait Notifier: Send + Sync {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        (**self).deliver(notification)
    }
}
