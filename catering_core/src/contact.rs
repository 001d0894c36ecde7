//! General enquiry form: five fields, no conditional rules.

use crate::notify::NotificationPresenter;
use crate::sink::{Submission, SubmissionReceipt, SubmissionSink};
use crate::submission::{run_submission, FormPhase, SubmissionLatch, SubmitError};
use crate::validation::{is_blank, is_valid_email, normalize_text, Field, FieldError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! We will get back to you within 24 hours.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMessageField {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ContactForm {
    draft: ContactMessage,
    latch: SubmissionLatch,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            draft: ContactMessage::default(),
            latch: SubmissionLatch::new(),
        }
    }

    pub fn draft(&self) -> &ContactMessage {
        &self.draft
    }

    pub fn set_field(&mut self, field: ContactMessageField, value: impl Into<String>) {
        let slot = match field {
            ContactMessageField::Name => &mut self.draft.name,
            ContactMessageField::Email => &mut self.draft.email,
            ContactMessageField::Phone => &mut self.draft.phone,
            ContactMessageField::Subject => &mut self.draft.subject,
            ContactMessageField::Message => &mut self.draft.message,
        };
        *slot = value.into();
    }

    pub fn validate(&self) -> Result<ContactPayload, Vec<FieldError>> {
        let draft = &self.draft;
        let mut errors = Vec::new();

        if is_blank(&draft.name) {
            errors.push(FieldError::missing(Field::Name));
        }
        if is_blank(&draft.email) {
            errors.push(FieldError::missing(Field::Email));
        } else if !is_valid_email(&draft.email) {
            errors.push(FieldError::new(Field::Email, ValidationErrorKind::InvalidEmail));
        }
        if is_blank(&draft.subject) {
            errors.push(FieldError::missing(Field::Subject));
        }
        if is_blank(&draft.message) {
            errors.push(FieldError::missing(Field::Message));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ContactPayload {
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: normalize_text(Some(draft.phone.as_str())),
            subject: draft.subject.trim().to_string(),
            message: draft.message.trim().to_string(),
        })
    }

    pub fn phase(&self) -> FormPhase {
        self.latch.phase()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == FormPhase::Submitting
    }

    pub async fn submit(
        &self,
        sink: &dyn SubmissionSink,
        presenter: &dyn NotificationPresenter,
    ) -> Result<SubmissionReceipt, SubmitError> {
        run_submission(
            &self.latch,
            || self.validate().map(Submission::Contact),
            sink,
            presenter,
            CONTACT_SUCCESS_MESSAGE,
        )
        .await
    }
}
