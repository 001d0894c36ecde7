pub mod form;
pub mod model;
pub mod payload;
pub mod policy;

pub use form::{BookingIntakeForm, EditError, BOOKING_SUCCESS_MESSAGE};
pub use model::{
    BookingRequest, BuffetAddOn, BuffetPackage, BuffetSelection, ContactDetails, ContactField,
    EventDetail, EventDetails, GuestCountEntry, PowerWaterAvailability, Service, ServiceSelection,
    UnknownVariant,
};
pub use payload::{BookingContact, BookingPayload};
pub use policy::GuestMinimums;
