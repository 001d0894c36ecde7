//! In-process submission sink

use super::{
    BookingStatus, SinkError, StoredBooking, Submission, SubmissionReceipt, SubmissionSink,
    SubmissionStore,
};
use crate::contact::ContactPayload;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemorySink {
    bookings: Arc<RwLock<Vec<StoredBooking>>>,
    contacts: Arc<RwLock<Vec<ContactPayload>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.read().len()
    }

    pub fn contact_messages(&self) -> Vec<ContactPayload> {
        self.contacts.read().clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn send(&self, submission: &Submission) -> Result<SubmissionReceipt, SinkError> {
        let receipt = SubmissionReceipt::new();

        match submission {
            Submission::Booking(booking) => {
                self.bookings.write().push(StoredBooking {
                    id: receipt.id,
                    received_at: receipt.received_at,
                    status: BookingStatus::Pending,
                    booking: booking.clone(),
                });
            }
            Submission::Contact(message) => {
                self.contacts.write().push(message.clone());
            }
        }

        Ok(receipt)
    }
}

#[async_trait]
impl SubmissionStore for MemorySink {
    async fn list_bookings(&self, limit: usize, offset: usize) -> Result<Vec<StoredBooking>, SinkError> {
        let bookings = self.bookings.read();

        Ok(bookings
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<StoredBooking>, SinkError> {
        let bookings = self.bookings.read();
        Ok(bookings.iter().find(|stored| stored.id == id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<StoredBooking>, SinkError> {
        let mut bookings = self.bookings.write();

        Ok(bookings
            .iter_mut()
            .find(|stored| stored.id == id)
            .map(|stored| {
                stored.status = status;
                stored.clone()
            }))
    }
}
