//! Editing -> submitting -> submitted lifecycle shared by both forms.

use crate::notify::{Notice, NotificationPresenter};
use crate::sink::{SinkError, Submission, SubmissionReceipt, SubmissionSink};
use crate::validation::FieldError;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{} field(s) failed validation", .0.len())]
    Validation(Vec<FieldError>),

    #[error("submission failed: {0}")]
    SubmissionFailed(#[source] SinkError),

    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("this form has already been submitted")]
    AlreadySubmitted,
}

impl SubmitError {
    /// True when the same data can simply be sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::SubmissionFailed(_))
    }
}

#[derive(Debug)]
pub(crate) struct SubmissionLatch {
    phase: Mutex<FormPhase>,
}

impl SubmissionLatch {
    pub(crate) fn new() -> Self {
        Self {
            phase: Mutex::new(FormPhase::Editing),
        }
    }

    pub(crate) fn phase(&self) -> FormPhase {
        *self.phase.lock()
    }

    fn begin(&self) -> Result<SubmissionGuard<'_>, SubmitError> {
        let mut phase = self.phase.lock();
        match *phase {
            FormPhase::Submitting => Err(SubmitError::SubmissionInProgress),
            FormPhase::Submitted => Err(SubmitError::AlreadySubmitted),
            FormPhase::Editing => {
                *phase = FormPhase::Submitting;
                Ok(SubmissionGuard {
                    latch: self,
                    completed: false,
                })
            }
        }
    }
}

/// Returns the latch to `Editing` unless the send completed, so a dropped
/// or failed submission never leaves the form stuck.
struct SubmissionGuard<'a> {
    latch: &'a SubmissionLatch,
    completed: bool,
}

impl SubmissionGuard<'_> {
    fn complete(mut self) {
        *self.latch.phase.lock() = FormPhase::Submitted;
        self.completed = true;
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *self.latch.phase.lock() = FormPhase::Editing;
        }
    }
}

pub(crate) async fn run_submission<F>(
    latch: &SubmissionLatch,
    finalize: F,
    sink: &dyn SubmissionSink,
    presenter: &dyn NotificationPresenter,
    success_message: &str,
) -> Result<SubmissionReceipt, SubmitError>
where
    F: FnOnce() -> Result<Submission, Vec<FieldError>>,
{
    let guard = latch.begin()?;

    let submission = match finalize() {
        Ok(submission) => submission,
        Err(errors) => {
            debug!(error_count = errors.len(), "form rejected at validation");
            presenter.show_error(Notice::Invalid(&errors));
            return Err(SubmitError::Validation(errors));
        }
    };

    match sink.send(&submission).await {
        Ok(receipt) => {
            guard.complete();
            info!(
                kind = submission.kind(),
                sink = sink.name(),
                id = %receipt.id,
                "submission delivered"
            );
            presenter.show_success(success_message);
            Ok(receipt)
        }
        Err(err) => {
            warn!(kind = submission.kind(), sink = sink.name(), error = %err, "submission failed");
            presenter.show_error(Notice::SubmissionFailed(&err));
            Err(SubmitError::SubmissionFailed(err))
        }
    }
}
