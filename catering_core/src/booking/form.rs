use super::model::{
    BookingRequest, BuffetAddOn, BuffetPackage, ContactField, EventDetail, GuestCountEntry, Service,
};
use super::payload::{BookingContact, BookingPayload};
use super::policy::GuestMinimums;
use crate::notify::NotificationPresenter;
use crate::sink::{Submission, SubmissionReceipt, SubmissionSink};
use crate::submission::{run_submission, FormPhase, SubmissionLatch, SubmitError};
use crate::validation::{is_blank, is_valid_email, normalize_text, Field, FieldError, ValidationErrorKind};
use thiserror::Error;
use tracing::debug;

pub const BOOKING_SUCCESS_MESSAGE: &str =
    "Thank you for your booking request! We will contact you within 24 hours.";

/// A tagged update the form refused to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{0} is not selected")]
    ServiceNotSelected(Service),

    #[error("guest count for {service} must be a whole number")]
    InvalidNumber { service: Service },
}

fn guest_count_field(service: Service) -> Field {
    match service {
        Service::HogRoast => Field::HogRoastGuestCount,
        Service::Pizza => Field::PizzaGuestCount,
        Service::Bar => Field::BarGuestCount,
        Service::Buffet => Field::BuffetGuestCount,
    }
}

/// Booking inquiry form.
///
/// Edits are synchronous and never validate; `validate` checks everything at
/// once and `submit` hands the finalised payload to a sink exactly once.
#[derive(Debug)]
pub struct BookingIntakeForm {
    request: BookingRequest,
    minimums: GuestMinimums,
    latch: SubmissionLatch,
}

impl Default for BookingIntakeForm {
    fn default() -> Self {
        Self::new(GuestMinimums::default())
    }
}

impl BookingIntakeForm {
    pub fn new(minimums: GuestMinimums) -> Self {
        Self {
            request: BookingRequest::default(),
            minimums,
            latch: SubmissionLatch::new(),
        }
    }

    pub fn request(&self) -> &BookingRequest {
        &self.request
    }

    pub fn minimums(&self) -> &GuestMinimums {
        &self.minimums
    }

    pub fn set_contact_field(&mut self, field: ContactField, value: impl Into<String>) {
        let contact = &mut self.request.contact;
        let slot = match field {
            ContactField::Name => &mut contact.name,
            ContactField::Email => &mut contact.email,
            ContactField::Phone => &mut contact.phone,
            ContactField::EventLocation => &mut contact.event_location,
        };
        *slot = value.into();
    }

    /// Deselecting discards the service's guest count (and for buffet the
    /// package and add-ons); reselecting starts from empty.
    pub fn toggle_service(&mut self, service: Service, selected: bool) {
        if self.request.services.is_selected(service) == selected {
            return;
        }
        debug!(%service, selected, "service toggled");
        self.request.services.set_selected(service, selected);
    }

    /// Input that is not a non-negative whole number is remembered only as
    /// invalid and reported as `InvalidNumber` by `validate`.
    pub fn set_service_guest_count(&mut self, service: Service, value: &str) -> Result<(), EditError> {
        let slot = self
            .request
            .services
            .guest_count_mut(service)
            .ok_or(EditError::ServiceNotSelected(service))?;

        let entry = GuestCountEntry::parse(value);
        *slot = entry;

        match entry {
            GuestCountEntry::Invalid => Err(EditError::InvalidNumber { service }),
            _ => Ok(()),
        }
    }

    pub fn set_buffet_package(&mut self, package: Option<BuffetPackage>) -> Result<(), EditError> {
        let buffet = self
            .request
            .services
            .buffet_mut()
            .ok_or(EditError::ServiceNotSelected(Service::Buffet))?;
        buffet.package = package;
        Ok(())
    }

    pub fn toggle_buffet_add_on(&mut self, add_on: BuffetAddOn, selected: bool) -> Result<(), EditError> {
        let buffet = self
            .request
            .services
            .buffet_mut()
            .ok_or(EditError::ServiceNotSelected(Service::Buffet))?;

        if selected {
            buffet.add_ons.insert(add_on);
        } else {
            buffet.add_ons.remove(&add_on);
        }
        Ok(())
    }

    pub fn set_event_detail(&mut self, detail: EventDetail) {
        let event = &mut self.request.event;
        match detail {
            EventDetail::EventDate(date) => event.event_date = date,
            EventDetail::ArrivalTime(time) => event.arrival_time = time,
            EventDetail::PowerWaterAvailability(availability) => event.power_water = availability,
            EventDetail::DietaryNotes(notes) => event.dietary_notes = notes,
            EventDetail::SpecialRequests(requests) => event.special_requests = requests,
        }
    }

    /// Checks every rule and either returns the finalised payload or all
    /// field errors in declaration order, contact fields first.
    pub fn validate(&self) -> Result<BookingPayload, Vec<FieldError>> {
        let mut errors = Vec::new();
        let contact = &self.request.contact;
        let services = &self.request.services;

        if is_blank(&contact.name) {
            errors.push(FieldError::missing(Field::Name));
        }

        if is_blank(&contact.email) {
            errors.push(FieldError::missing(Field::Email));
        } else if !is_valid_email(&contact.email) {
            errors.push(FieldError::new(Field::Email, ValidationErrorKind::InvalidEmail));
        }

        for (field, value) in [
            (Field::Phone, &contact.phone),
            (Field::EventLocation, &contact.event_location),
        ] {
            if is_blank(value) {
                errors.push(FieldError::missing(field));
            }
        }

        let mut counts = [None; 4];
        for (slot, service) in counts.iter_mut().zip(Service::ALL) {
            let Some(entry) = services.guest_count(service) else {
                continue;
            };

            let field = guest_count_field(service);
            let minimum = self.minimums.for_service(service);
            match entry {
                GuestCountEntry::Empty => errors.push(FieldError::missing(field)),
                GuestCountEntry::Invalid => {
                    errors.push(FieldError::new(field, ValidationErrorKind::InvalidNumber))
                }
                GuestCountEntry::Count(count) if count < minimum => errors.push(FieldError::new(
                    field,
                    ValidationErrorKind::BelowMinimumGuests { minimum },
                )),
                GuestCountEntry::Count(count) => *slot = Some(count),
            }
        }

        let buffet = services.buffet();
        if let Some(buffet) = buffet {
            if buffet.package.is_none() {
                errors.push(FieldError::missing(Field::BuffetPackage));
            }
        }

        let event = &self.request.event;
        if event.event_date.is_none() {
            errors.push(FieldError::missing(Field::EventDate));
        }

        let event_date = match event.event_date {
            Some(date) if errors.is_empty() => date,
            _ => return Err(errors),
        };

        let [hog_roast_guest_count, pizza_guest_count, bar_guest_count, buffet_guest_count] = counts;

        Ok(BookingPayload {
            contact: BookingContact {
                name: contact.name.trim().to_string(),
                email: contact.email.trim().to_string(),
                phone: contact.phone.trim().to_string(),
                event_location: contact.event_location.trim().to_string(),
            },
            services: services.selected(),
            hog_roast_guest_count,
            pizza_guest_count,
            bar_guest_count,
            buffet_guest_count,
            buffet_package: buffet.and_then(|buffet| buffet.package),
            buffet_add_ons: buffet.map(|buffet| buffet.add_ons.clone()),
            event_date,
            arrival_time: event.arrival_time,
            power_water_availability: event.power_water,
            dietary_notes: normalize_text(event.dietary_notes.as_deref()),
            special_requests: normalize_text(event.special_requests.as_deref()),
        })
    }

    pub fn phase(&self) -> FormPhase {
        self.latch.phase()
    }

    /// True while a send is outstanding.
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
            || self.validate().map(Submission::Booking),
            sink,
            presenter,
            BOOKING_SUCCESS_MESSAGE,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::PowerWaterAvailability;
    use crate::notify::{Notification, RecordingPresenter};
    use crate::sink::{MemorySink, SinkError};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn fill_contact(form: &mut BookingIntakeForm) {
        form.set_contact_field(ContactField::Name, "Jane Doe");
        form.set_contact_field(ContactField::Email, "jane@example.com");
        form.set_contact_field(ContactField::Phone, "07000000000");
        form.set_contact_field(ContactField::EventLocation, "Portsmouth");
        form.set_event_detail(EventDetail::EventDate(NaiveDate::from_ymd_opt(2025, 6, 1)));
    }

    fn buffet_form() -> BookingIntakeForm {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::Buffet, true);
        form.set_service_guest_count(Service::Buffet, "25").unwrap();
        form.set_buffet_package(Some(BuffetPackage::Package2)).unwrap();
        form
    }

    fn kinds_for(errors: &[FieldError], field: Field) -> Vec<ValidationErrorKind> {
        errors
            .iter()
            .filter(|error| error.field == field)
            .map(|error| error.kind)
            .collect()
    }

    #[test]
    fn test_toggle_off_and_on_resets_guest_count() {
        for service in Service::ALL {
            let mut form = BookingIntakeForm::default();
            form.toggle_service(service, true);
            form.set_service_guest_count(service, "75").unwrap();
            assert_eq!(
                form.request().services.guest_count(service),
                Some(GuestCountEntry::Count(75))
            );

            form.toggle_service(service, false);
            assert_eq!(form.request().services.guest_count(service), None);

            form.toggle_service(service, true);
            assert_eq!(
                form.request().services.guest_count(service),
                Some(GuestCountEntry::Empty),
                "{} kept a stale guest count",
                service
            );
        }
    }

    #[test]
    fn test_toggle_buffet_off_clears_package_and_add_ons() {
        let mut form = buffet_form();
        form.toggle_buffet_add_on(BuffetAddOn::Cakes, true).unwrap();

        form.toggle_service(Service::Buffet, false);
        form.toggle_service(Service::Buffet, true);

        let buffet = form.request().services.buffet().unwrap();
        assert_eq!(buffet.package, None);
        assert!(buffet.add_ons.is_empty());
    }

    #[test]
    fn test_reselecting_selected_service_keeps_its_fields() {
        let mut form = BookingIntakeForm::default();
        form.toggle_service(Service::Pizza, true);
        form.set_service_guest_count(Service::Pizza, "10").unwrap();

        form.toggle_service(Service::Pizza, true);

        assert_eq!(
            form.request().services.guest_count(Service::Pizza),
            Some(GuestCountEntry::Count(10))
        );
    }

    #[test]
    fn test_empty_form_reports_only_core_required_fields() {
        let form = BookingIntakeForm::default();
        let errors = form.validate().unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::missing(Field::Name),
                FieldError::missing(Field::Email),
                FieldError::missing(Field::Phone),
                FieldError::missing(Field::EventLocation),
                FieldError::missing(Field::EventDate),
            ]
        );
    }

    #[test]
    fn test_hog_roast_minimum_guests() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::HogRoast, true);

        form.set_service_guest_count(Service::HogRoast, "49").unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new(
                Field::HogRoastGuestCount,
                ValidationErrorKind::BelowMinimumGuests { minimum: 50 }
            )]
        );

        form.set_service_guest_count(Service::HogRoast, "50").unwrap();
        let payload = form.validate().unwrap();
        assert_eq!(payload.hog_roast_guest_count, Some(50));
    }

    #[test]
    fn test_oversized_guest_count_is_still_a_number() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::HogRoast, true);

        form.set_service_guest_count(Service::HogRoast, "99999999999").unwrap();
        let payload = form.validate().unwrap();
        assert_eq!(payload.hog_roast_guest_count, Some(u32::MAX));
    }

    #[test]
    fn test_minimums_are_configurable() {
        let mut form = BookingIntakeForm::new(GuestMinimums {
            hog_roast: 30,
            ..GuestMinimums::default()
        });
        fill_contact(&mut form);
        form.toggle_service(Service::HogRoast, true);
        form.set_service_guest_count(Service::HogRoast, "35").unwrap();

        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_buffet_requires_package_pizza_does_not() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::Buffet, true);
        form.set_service_guest_count(Service::Buffet, "30").unwrap();

        let errors = form.validate().unwrap_err();
        assert_eq!(
            kinds_for(&errors, Field::BuffetPackage),
            vec![ValidationErrorKind::MissingRequired]
        );

        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::Pizza, true);
        form.set_service_guest_count(Service::Pizza, "10").unwrap();

        let payload = form.validate().unwrap();
        assert_eq!(payload.buffet_package, None);
    }

    #[test]
    fn test_selected_service_without_count_is_missing() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::Bar, true);

        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::missing(Field::BarGuestCount)]);
    }

    #[test]
    fn test_non_numeric_guest_count_is_invalid_number() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::Pizza, true);

        assert_eq!(
            form.set_service_guest_count(Service::Pizza, "lots"),
            Err(EditError::InvalidNumber { service: Service::Pizza })
        );
        assert_eq!(
            form.set_service_guest_count(Service::Pizza, "-3"),
            Err(EditError::InvalidNumber { service: Service::Pizza })
        );
        assert_eq!(
            form.request().services.guest_count(Service::Pizza),
            Some(GuestCountEntry::Invalid)
        );

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new(Field::PizzaGuestCount, ValidationErrorKind::InvalidNumber)]
        );
    }

    #[test]
    fn test_edits_to_unselected_services_are_rejected() {
        let mut form = BookingIntakeForm::default();

        assert_eq!(
            form.set_service_guest_count(Service::HogRoast, "60"),
            Err(EditError::ServiceNotSelected(Service::HogRoast))
        );
        assert_eq!(
            form.set_buffet_package(Some(BuffetPackage::Package1)),
            Err(EditError::ServiceNotSelected(Service::Buffet))
        );
        assert_eq!(
            form.toggle_buffet_add_on(BuffetAddOn::Canapes, true),
            Err(EditError::ServiceNotSelected(Service::Buffet))
        );
        assert_eq!(form.request(), &BookingRequest::default());
    }

    #[test]
    fn test_email_errors() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.set_contact_field(ContactField::Email, "jane.example.com");

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new(Field::Email, ValidationErrorKind::InvalidEmail)]
        );

        form.set_contact_field(ContactField::Email, "   ");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::missing(Field::Email)]);
    }

    #[test]
    fn test_errors_are_collected_in_declaration_order() {
        let mut form = BookingIntakeForm::default();
        form.set_contact_field(ContactField::Email, "nope");
        form.toggle_service(Service::Buffet, true);
        form.toggle_service(Service::HogRoast, true);
        form.set_service_guest_count(Service::HogRoast, "10").unwrap();

        let fields: Vec<Field> = form.validate().unwrap_err().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                Field::Name,
                Field::Email,
                Field::Phone,
                Field::EventLocation,
                Field::HogRoastGuestCount,
                Field::BuffetGuestCount,
                Field::BuffetPackage,
                Field::EventDate,
            ]
        );
    }

    #[test]
    fn test_pizza_only_payload_omits_other_services() {
        let mut form = BookingIntakeForm::default();
        fill_contact(&mut form);
        form.toggle_service(Service::Pizza, true);
        form.set_service_guest_count(Service::Pizza, "10").unwrap();

        let payload = form.validate().unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["pizzaGuestCount"], 10);
        for key in [
            "hogRoastGuestCount",
            "barGuestCount",
            "buffetGuestCount",
            "buffetPackage",
            "buffetAddOns",
        ] {
            assert!(json.get(key).is_none(), "unexpected key {}", key);
        }
    }

    #[test]
    fn test_buffet_booking_end_to_end_payload() {
        let form = buffet_form();
        let payload = form.validate().unwrap();

        assert_eq!(payload.contact.name, "Jane Doe");
        assert_eq!(payload.services, BTreeSet::from([Service::Buffet]));
        assert_eq!(payload.buffet_guest_count, Some(25));
        assert_eq!(payload.buffet_package, Some(BuffetPackage::Package2));
        assert_eq!(payload.event_date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["buffetGuestCount"], 25);
        assert_eq!(json["buffetPackage"], "package2");
        assert_eq!(json["eventDate"], "2025-06-01");
        assert_eq!(json["contact"]["eventLocation"], "Portsmouth");
        for key in ["hogRoastGuestCount", "pizzaGuestCount", "barGuestCount"] {
            assert!(json.get(key).is_none(), "unexpected key {}", key);
        }
    }

    #[test]
    fn test_optional_event_details_are_trimmed() {
        let mut form = buffet_form();
        form.toggle_buffet_add_on(BuffetAddOn::Sandwiches, true).unwrap();
        form.set_event_detail(EventDetail::ArrivalTime(NaiveTime::from_hms_opt(14, 30, 0)));
        form.set_event_detail(EventDetail::PowerWaterAvailability(Some(
            PowerWaterAvailability::Power,
        )));
        form.set_event_detail(EventDetail::DietaryNotes(Some("  3 vegans ".to_string())));
        form.set_event_detail(EventDetail::SpecialRequests(Some("   ".to_string())));

        let payload = form.validate().unwrap();
        assert_eq!(payload.arrival_time, NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(payload.power_water_availability, Some(PowerWaterAvailability::Power));
        assert_eq!(payload.dietary_notes.as_deref(), Some("3 vegans"));
        assert_eq!(payload.special_requests, None);
        assert_eq!(payload.buffet_add_ons, Some(BTreeSet::from([BuffetAddOn::Sandwiches])));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_sink() {
        let form = BookingIntakeForm::default();
        let sink = MemorySink::new();
        let presenter = RecordingPresenter::new();

        let result = form.submit(&sink, &presenter).await;

        assert!(matches!(result, Err(SubmitError::Validation(ref errors)) if errors.len() == 5));
        assert_eq!(sink.booking_count(), 0);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(matches!(
            presenter.notifications().as_slice(),
            [Notification::Invalid(errors)] if errors.len() == 5
        ));
    }

    #[tokio::test]
    async fn test_successful_submit_finalises_form() {
        let form = buffet_form();
        let sink = MemorySink::new();
        let presenter = RecordingPresenter::new();

        form.submit(&sink, &presenter).await.unwrap();

        assert_eq!(sink.booking_count(), 1);
        assert_eq!(form.phase(), FormPhase::Submitted);
        assert_eq!(
            presenter.notifications(),
            vec![Notification::Success(BOOKING_SUCCESS_MESSAGE.to_string())]
        );

        let again = form.submit(&sink, &presenter).await;
        assert!(matches!(again, Err(SubmitError::AlreadySubmitted)));
        assert_eq!(sink.booking_count(), 1);
    }

    struct FailingSink {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SubmissionSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn send(&self, _submission: &Submission) -> Result<SubmissionReceipt, SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SinkError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_sink_failure_is_retryable_and_not_retried() {
        let form = buffet_form();
        let sink = FailingSink {
            calls: AtomicUsize::new(0),
        };
        let presenter = RecordingPresenter::new();

        let err = form.submit(&sink, &presenter).await.unwrap_err();

        assert!(matches!(err, SubmitError::SubmissionFailed(_)));
        assert!(err.is_retryable());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(matches!(
            presenter.notifications().as_slice(),
            [Notification::SubmissionFailed(_)]
        ));

        let _ = form.submit(&sink, &presenter).await;
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    }

    struct GatedSink {
        calls: AtomicUsize,
        entered: Notify,
        gate: Notify,
    }

    #[async_trait]
    impl SubmissionSink for GatedSink {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn send(&self, _submission: &Submission) -> Result<SubmissionReceipt, SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.gate.notified().await;
            Ok(SubmissionReceipt::new())
        }
    }

    #[tokio::test]
    async fn test_double_submit_sends_once() {
        let form = buffet_form();
        let sink = GatedSink {
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            gate: Notify::new(),
        };
        let presenter = RecordingPresenter::new();

        let first = form.submit(&sink, &presenter);
        tokio::pin!(first);

        tokio::select! {
            biased;
            _ = &mut first => panic!("first submission finished before the sink was released"),
            _ = sink.entered.notified() => {}
        }

        assert!(form.is_submitting());
        let second = form.submit(&sink, &presenter).await;
        assert!(matches!(second, Err(SubmitError::SubmissionInProgress)));

        sink.gate.notify_one();
        first.await.unwrap();

        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert!(!form.is_submitting());
        assert_eq!(form.phase(), FormPhase::Submitted);
    }
}
