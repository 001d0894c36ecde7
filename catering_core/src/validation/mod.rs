//! Field-level validation vocabulary shared by the booking and contact forms,
//! plus request-shape checks for incoming DTOs.

pub mod rules;

pub use rules::*;

use crate::error::{AppError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Every form field that can carry a validation error, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Phone,
    EventLocation,
    HogRoastGuestCount,
    PizzaGuestCount,
    BarGuestCount,
    BuffetGuestCount,
    BuffetPackage,
    EventDate,
    Subject,
    Message,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::Email => "Email address",
            Field::Phone => "Phone number",
            Field::EventLocation => "Event location",
            Field::HogRoastGuestCount => "Hog roast guest count",
            Field::PizzaGuestCount => "Pizza guest count",
            Field::BarGuestCount => "Bar guest count",
            Field::BuffetGuestCount => "Buffet guest count",
            Field::BuffetPackage => "Buffet package",
            Field::EventDate => "Event date",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingRequired,
    BelowMinimumGuests { minimum: u32 },
    InvalidEmail,
    InvalidNumber,
}

impl ValidationErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingRequired => "missingRequired",
            ValidationErrorKind::BelowMinimumGuests { .. } => "belowMinimumGuests",
            ValidationErrorKind::InvalidEmail => "invalidEmail",
            ValidationErrorKind::InvalidNumber => "invalidNumber",
        }
    }
}

/// A single problem with a single field, found at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: ValidationErrorKind,
}

impl FieldError {
    pub fn new(field: Field, kind: ValidationErrorKind) -> Self {
        Self { field, kind }
    }

    pub fn missing(field: Field) -> Self {
        Self::new(field, ValidationErrorKind::MissingRequired)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.field.label();
        match self.kind {
            ValidationErrorKind::MissingRequired => write!(f, "{} is required", label),
            ValidationErrorKind::BelowMinimumGuests { minimum } => {
                write!(f, "{} must be at least {}", label, minimum)
            }
            ValidationErrorKind::InvalidEmail => write!(f, "{} is not a valid email address", label),
            ValidationErrorKind::InvalidNumber => write!(f, "{} must be a whole number", label),
        }
    }
}

impl std::error::Error for FieldError {}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("field", &self.field)?;
        map.serialize_entry("kind", self.kind.code())?;
        if let ValidationErrorKind::BelowMinimumGuests { minimum } = self.kind {
            map.serialize_entry("minimum", &minimum)?;
        }
        map.serialize_entry("message", &self.to_string())?;
        map.end()
    }
}

/// Collected request-shape failures reported by the `validator` derive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self::success();

        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Validation failed for field '{}'", field),
                };
                result.add_error(&field, &message);
            }
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Rejects over-long or malformed request bodies before they reach a form.
pub trait Validatable {
    fn validate_request(&self) -> Result<()>;
}

impl<T> Validatable for T
where
    T: Validate,
{
    fn validate_request(&self) -> Result<()> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => {
                let result = ValidationResult::from_validation_errors(errors);
                Err(AppError::BadRequest(result.summary()))
            }
        }
    }
}
