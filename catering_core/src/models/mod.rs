pub mod request;

pub use request::{
    ApiResponse, BookingFormInput, ContactFormInput, GuestCountInput, ListQuery, ServiceFlags,
    ServiceInput,
};
