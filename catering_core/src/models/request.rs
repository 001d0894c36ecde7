//! Request and response models

use crate::booking::{
    BookingIntakeForm, BuffetAddOn, BuffetPackage, ContactField, EditError, EventDetail,
    PowerWaterAvailability, Service,
};
use crate::contact::{ContactForm, ContactMessageField};
use crate::error::{AppError, Result};
use crate::sink::BookingStatus;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// Checkbox state for the four services.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceFlags {
    pub hog_roast: bool,
    pub pizza: bool,
    pub bar: bool,
    pub buffet: bool,
}

impl ServiceFlags {
    pub fn is_set(&self, service: Service) -> bool {
        match service {
            Service::HogRoast => self.hog_roast,
            Service::Pizza => self.pizza,
            Service::Bar => self.bar,
            Service::Buffet => self.buffet,
        }
    }
}

/// Guest counts arrive as JSON numbers or as the raw text of an input box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuestCountInput {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl GuestCountInput {
    pub fn as_text(&self) -> String {
        match self {
            GuestCountInput::Whole(n) => n.to_string(),
            GuestCountInput::Fractional(f) if f.fract() == 0.0 && *f >= 0.0 => format!("{:.0}", f),
            GuestCountInput::Fractional(f) => f.to_string(),
            GuestCountInput::Text(text) => text.clone(),
        }
    }
}

/// Service section of the website form, shared by bookings and quotes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceInput {
    pub services: ServiceFlags,
    pub hog_roast_guests: Option<GuestCountInput>,
    pub pizza_guests: Option<GuestCountInput>,
    pub bar_guests: Option<GuestCountInput>,
    pub buffet_guests: Option<GuestCountInput>,
    pub buffet_package: Option<String>,
    pub canapes: bool,
    pub sandwiches: bool,
    pub cakes: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_choice<T>(value: &Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(value)
        .map(|raw| raw.parse::<T>().map_err(|e| AppError::BadRequest(e.to_string())))
        .transpose()
}

fn parse_date(value: &Option<String>) -> Result<Option<NaiveDate>> {
    non_empty(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("Invalid event date '{}'", raw)))
        })
        .transpose()
}

fn parse_time(value: &Option<String>) -> Result<Option<NaiveTime>> {
    non_empty(value)
        .map(|raw| {
            NaiveTime::parse_from_str(raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
                .map_err(|_| AppError::BadRequest(format!("Invalid arrival time '{}'", raw)))
        })
        .transpose()
}

impl ServiceInput {
    fn guests(&self, service: Service) -> Option<&GuestCountInput> {
        match service {
            Service::HogRoast => self.hog_roast_guests.as_ref(),
            Service::Pizza => self.pizza_guests.as_ref(),
            Service::Bar => self.bar_guests.as_ref(),
            Service::Buffet => self.buffet_guests.as_ref(),
        }
    }

    /// Fields of unticked services are ignored, as they are hidden on the page.
    pub fn apply_to(&self, form: &mut BookingIntakeForm) -> Result<()> {
        for service in Service::ALL {
            let selected = self.services.is_set(service);
            form.toggle_service(service, selected);
            if !selected {
                continue;
            }

            if let Some(guests) = self.guests(service) {
                match form.set_service_guest_count(service, &guests.as_text()) {
                    Ok(()) | Err(EditError::InvalidNumber { .. }) => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }

        if self.services.buffet {
            form.set_buffet_package(parse_choice::<BuffetPackage>(&self.buffet_package)?)?;
            for (add_on, selected) in [
                (BuffetAddOn::Canapes, self.canapes),
                (BuffetAddOn::Sandwiches, self.sandwiches),
                (BuffetAddOn::Cakes, self.cakes),
            ] {
                form.toggle_buffet_add_on(add_on, selected)?;
            }
        }

        Ok(())
    }
}

/// JSON body posted by the booking page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingFormInput {
    #[validate(length(max = 255, message = "Name must not exceed 255 characters"))]
    pub name: String,

    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,

    #[validate(length(max = 50, message = "Phone number must not exceed 50 characters"))]
    pub phone: String,

    #[validate(length(max = 255, message = "Location must not exceed 255 characters"))]
    pub location: String,

    #[serde(flatten)]
    pub service_input: ServiceInput,

    pub event_date: Option<String>,

    pub arrival_time: Option<String>,

    pub power_water: Option<String>,

    #[validate(length(max = 2000, message = "Dietary notes must not exceed 2000 characters"))]
    pub dietary_notes: Option<String>,

    #[validate(length(max = 2000, message = "Special requests must not exceed 2000 characters"))]
    pub special_requests: Option<String>,
}

impl BookingFormInput {
    /// Replays the body into the form one tagged update at a time.
    pub fn apply_to(&self, form: &mut BookingIntakeForm) -> Result<()> {
        form.set_contact_field(ContactField::Name, self.name.as_str());
        form.set_contact_field(ContactField::Email, self.email.as_str());
        form.set_contact_field(ContactField::Phone, self.phone.as_str());
        form.set_contact_field(ContactField::EventLocation, self.location.as_str());

        self.service_input.apply_to(form)?;

        form.set_event_detail(EventDetail::EventDate(parse_date(&self.event_date)?));
        form.set_event_detail(EventDetail::ArrivalTime(parse_time(&self.arrival_time)?));
        form.set_event_detail(EventDetail::PowerWaterAvailability(
            parse_choice::<PowerWaterAvailability>(&self.power_water)?,
        ));
        form.set_event_detail(EventDetail::DietaryNotes(self.dietary_notes.clone()));
        form.set_event_detail(EventDetail::SpecialRequests(self.special_requests.clone()));

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactFormInput {
    #[validate(length(max = 255, message = "Name must not exceed 255 characters"))]
    pub name: String,

    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,

    #[validate(length(max = 50, message = "Phone number must not exceed 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 255, message = "Subject must not exceed 255 characters"))]
    pub subject: String,

    #[validate(length(max = 4000, message = "Message must not exceed 4000 characters"))]
    pub message: String,
}

impl ContactFormInput {
    pub fn apply_to(&self, form: &mut ContactForm) {
        form.set_field(ContactMessageField::Name, self.name.as_str());
        form.set_field(ContactMessageField::Email, self.email.as_str());
        form.set_field(ContactMessageField::Phone, self.phone.clone().unwrap_or_default());
        form.set_field(ContactMessageField::Subject, self.subject.as_str());
        form.set_field(ContactMessageField::Message, self.message.as_str());
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<usize>,

    pub offset: Option<usize>,
}

/// Staff update of a stored booking. Only the status can change.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookingStatusInput {
    pub status: BookingStatus,
}

impl ListQuery {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}
