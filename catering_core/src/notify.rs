//! User-facing feedback after a submit attempt.

use crate::sink::SinkError;
use crate::validation::FieldError;
use parking_lot::Mutex;
use tracing::{info, warn};

/// What went wrong with a submit attempt.
#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    Invalid(&'a [FieldError]),
    SubmissionFailed(&'a SinkError),
}

pub trait NotificationPresenter: Send + Sync {
    fn show_success(&self, message: &str);

    fn show_error(&self, notice: Notice<'_>);
}

/// Writes outcomes to the log. Used by the HTTP handlers, where the
/// response body itself carries the feedback.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl NotificationPresenter for TracingPresenter {
    fn show_success(&self, message: &str) {
        info!(notice = message, "form submitted");
    }

    fn show_error(&self, notice: Notice<'_>) {
        match notice {
            Notice::Invalid(errors) => {
                let fields: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                info!(errors = ?fields, "form has validation errors");
            }
            Notice::SubmissionFailed(err) => {
                warn!(error = %err, "form submission failed, user may retry");
            }
        }
    }
}

/// Owned copy of a notice, as kept by `RecordingPresenter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Invalid(Vec<FieldError>),
    SubmissionFailed(String),
}

/// Keeps every notification in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }
}

impl NotificationPresenter for RecordingPresenter {
    fn show_success(&self, message: &str) {
        self.notifications
            .lock()
            .push(Notification::Success(message.to_string()));
    }

    fn show_error(&self, notice: Notice<'_>) {
        let notification = match notice {
            Notice::Invalid(errors) => Notification::Invalid(errors.to_vec()),
            Notice::SubmissionFailed(err) => Notification::SubmissionFailed(err.to_string()),
        };
        self.notifications.lock().push(notification);
    }
}
