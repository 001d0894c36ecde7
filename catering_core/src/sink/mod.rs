//! Destinations for finished submissions.
//!
//! A `SubmissionSink` accepts a finalised booking or contact message. Sinks
//! that can also read bookings back implement `SubmissionStore`.

pub mod http;
pub mod memory;
pub mod sqlite;

pub use self::http::HttpSink;
pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use crate::booking::{BookingPayload, UnknownVariant};
use crate::config::{SinkConfig, SinkKind};
use crate::contact::ContactPayload;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Submission {
    Booking(BookingPayload),
    Contact(ContactPayload),
}

impl Submission {
    pub fn kind(&self) -> &'static str {
        match self {
            Submission::Booking(_) => "booking",
            Submission::Contact(_) => "contact",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("submission sink unavailable: {0}")]
    Unavailable(String),

    #[error("submission rejected with status {status}")]
    Rejected { status: u16 },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for SinkError {
    fn from(err: sqlx::Error) -> Self {
        SinkError::Storage(err.to_string())
    }
}

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Single attempt; callers decide whether to retry.
    async fn send(&self, submission: &Submission) -> std::result::Result<SubmissionReceipt, SinkError>;

    async fn health_check(&self) -> std::result::Result<(), SinkError> {
        Ok(())
    }
}

/// Where staff have got to with a stored booking request. New bookings
/// always start out `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(UnknownVariant::new("booking status", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBooking {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub booking: BookingPayload,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Newest first.
    async fn list_bookings(&self, limit: usize, offset: usize) -> std::result::Result<Vec<StoredBooking>, SinkError>;

    async fn get_booking(&self, id: Uuid) -> std::result::Result<Option<StoredBooking>, SinkError>;

    /// Returns the updated booking, or `None` when no booking has that id.
    /// The submitted payload itself is never changed.
    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> std::result::Result<Option<StoredBooking>, SinkError>;
}

pub struct SinkSet {
    pub sink: Arc<dyn SubmissionSink>,
    pub store: Option<Arc<dyn SubmissionStore>>,
}

impl SinkSet {
    pub fn memory() -> Self {
        let sink = Arc::new(MemorySink::new());
        Self {
            sink: sink.clone(),
            store: Some(sink),
        }
    }
}

pub async fn build_sinks(config: &SinkConfig) -> Result<SinkSet> {
    match config.kind {
        SinkKind::Memory => {
            info!("Using in-memory submission sink");
            Ok(SinkSet::memory())
        }
        SinkKind::Sqlite => {
            info!("Using SQLite submission sink: {}", config.database_url);
            let sink = Arc::new(SqliteSink::connect(&config.database_url).await?);
            Ok(SinkSet {
                sink: sink.clone(),
                store: Some(sink),
            })
        }
        SinkKind::Http => {
            let sink = HttpSink::new(&config.endpoint, config.timeout_seconds)?;
            info!("Forwarding submissions to {}", sink.endpoint());
            Ok(SinkSet {
                sink: Arc::new(sink),
                store: None,
            })
        }
    }
}
