//! SQLite-backed submission sink with versioned migrations

use super::{
    BookingStatus, SinkError, StoredBooking, Submission, SubmissionReceipt, SubmissionSink,
    SubmissionStore,
};
use crate::booking::BookingPayload;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

struct Migration {
    version: i64,
    name: &'static str,
    sql_statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_bookings_table",
        sql_statements: &[
            r#"
            CREATE TABLE bookings (
                id TEXT PRIMARY KEY,
                received_at TEXT NOT NULL,
                client_name TEXT NOT NULL,
                client_email TEXT NOT NULL,
                client_phone TEXT NOT NULL,
                event_location TEXT NOT NULL,
                event_date TEXT NOT NULL,
                services TEXT NOT NULL DEFAULT '[]',
                payload TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
            )
            "#,
            "CREATE INDEX idx_bookings_received_at ON bookings(received_at)",
            "CREATE INDEX idx_bookings_event_date ON bookings(event_date)",
        ],
    },
    Migration {
        version: 2,
        name: "create_contact_messages_table",
        sql_statements: &[
            r#"
            CREATE TABLE contact_messages (
                id TEXT PRIMARY KEY,
                received_at TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                payload TEXT NOT NULL
            )
            "#,
        ],
    },
];

pub async fn get_database_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .connect(database_url)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    sqlx::query("PRAGMA busy_timeout = 30000")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(AppError::from)?;

    let current_version: i64 = sqlx::query("SELECT COALESCE(MAX(version), 0) AS version FROM _migrations")
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?
        .try_get("version")
        .map_err(AppError::from)?;

    let mut applied_count = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current_version) {
        info!("Applying migration {}: {}", migration.version, migration.name);

        let mut tx = pool.begin().await.map_err(AppError::from)?;
        for statement in migration.sql_statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to execute migration statement: {}", e);
                    AppError::from(e)
                })?;
        }

        sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        applied_count += 1;
    }

    if applied_count > 0 {
        info!("Applied {} migrations successfully", applied_count);
    }

    Ok(())
}

#[derive(Clone)]
pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = get_database_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn contact_message_count(&self) -> std::result::Result<i64, SinkError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_booking(row: &sqlx::sqlite::SqliteRow) -> std::result::Result<StoredBooking, SinkError> {
    let id: String = row.try_get("id")?;
    let received_at: String = row.try_get("received_at")?;
    let status: String = row.try_get("status")?;
    let payload: String = row.try_get("payload")?;

    let id = Uuid::parse_str(&id).map_err(|e| SinkError::Storage(format!("bad booking id '{}': {}", id, e)))?;
    let received_at = DateTime::parse_from_rfc3339(&received_at)
        .map_err(|e| SinkError::Storage(format!("bad timestamp '{}': {}", received_at, e)))?
        .with_timezone(&Utc);
    let status: BookingStatus = status
        .parse()
        .map_err(|e| SinkError::Storage(format!("bad status: {}", e)))?;
    let booking: BookingPayload = serde_json::from_str(&payload)?;

    Ok(StoredBooking {
        id,
        received_at,
        status,
        booking,
    })
}

#[async_trait]
impl SubmissionSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn send(&self, submission: &Submission) -> std::result::Result<SubmissionReceipt, SinkError> {
        let receipt = SubmissionReceipt::new();

        match submission {
            Submission::Booking(booking) => {
                sqlx::query(
                    r#"
                    INSERT INTO bookings (
                        id, received_at, client_name, client_email, client_phone,
                        event_location, event_date, services, payload
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(receipt.id.to_string())
                .bind(timestamp(&receipt.received_at))
                .bind(&booking.contact.name)
                .bind(&booking.contact.email)
                .bind(&booking.contact.phone)
                .bind(&booking.contact.event_location)
                .bind(booking.event_date.to_string())
                .bind(serde_json::to_string(&booking.services)?)
                .bind(serde_json::to_string(booking)?)
                .execute(&self.pool)
                .await?;
            }
            Submission::Contact(message) => {
                sqlx::query(
                    r#"
                    INSERT INTO contact_messages (id, received_at, name, email, subject, payload)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(receipt.id.to_string())
                .bind(timestamp(&receipt.received_at))
                .bind(&message.name)
                .bind(&message.email)
                .bind(&message.subject)
                .bind(serde_json::to_string(message)?)
                .execute(&self.pool)
                .await?;
            }
        }

        Ok(receipt)
    }

    async fn health_check(&self) -> std::result::Result<(), SinkError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for SqliteSink {
    async fn list_bookings(&self, limit: usize, offset: usize) -> std::result::Result<Vec<StoredBooking>, SinkError> {
        // SQLite reads a negative OFFSET as 0, so an offset past i64::MAX must not wrap.
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT id, received_at, status, payload
            FROM bookings
            ORDER BY received_at DESC, rowid DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_booking).collect()
    }

    async fn get_booking(&self, id: Uuid) -> std::result::Result<Option<StoredBooking>, SinkError> {
        let row = sqlx::query("SELECT id, received_at, status, payload FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> std::result::Result<Option<StoredBooking>, SinkError> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!(%id, %status, "booking status updated");
        self.get_booking(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingContact, BuffetPackage, Service};
    use crate::contact::ContactPayload;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use tempfile::NamedTempFile;

    async fn setup_test_sink() -> (SqliteSink, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let sink = SqliteSink::connect(&database_url).await.unwrap();
        (sink, temp_file)
    }

    fn buffet_booking(name: &str) -> BookingPayload {
        BookingPayload {
            contact: BookingContact {
                name: name.to_string(),
                email: "jane@example.com".to_string(),
                phone: "07000000000".to_string(),
                event_location: "Portsmouth".to_string(),
            },
            services: BTreeSet::from([Service::Buffet]),
            hog_roast_guest_count: None,
            pizza_guest_count: None,
            bar_guest_count: None,
            buffet_guest_count: Some(25),
            buffet_package: Some(BuffetPackage::Package2),
            buffet_add_ons: Some(BTreeSet::new()),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            arrival_time: None,
            power_water_availability: None,
            dietary_notes: Some("Two coeliac guests".to_string()),
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_sqlite_sink_round_trips_bookings() {
        let (sink, _file) = setup_test_sink().await;
        sink.health_check().await.unwrap();

        let receipt = sink
            .send(&Submission::Booking(buffet_booking("Jane Doe")))
            .await
            .unwrap();

        let stored = sink.get_booking(receipt.id).await.unwrap().unwrap();
        assert_eq!(stored.id, receipt.id);
        assert_eq!(stored.status, BookingStatus::Pending);
        assert_eq!(stored.booking, buffet_booking("Jane Doe"));

        assert!(sink.get_booking(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_sink_lists_newest_first() {
        let (sink, _file) = setup_test_sink().await;

        sink.send(&Submission::Booking(buffet_booking("Older"))).await.unwrap();
        sink.send(&Submission::Booking(buffet_booking("Newer"))).await.unwrap();

        let listed = sink.list_bookings(10, 0).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].booking.contact.name, "Newer");

        let paged = sink.list_bookings(10, 1).await.unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].booking.contact.name, "Older");
    }

    #[tokio::test]
    async fn test_sqlite_sink_offset_past_end_is_empty() {
        let (sink, _file) = setup_test_sink().await;
        sink.send(&Submission::Booking(buffet_booking("Only"))).await.unwrap();

        assert!(sink.list_bookings(10, 5).await.unwrap().is_empty());
        assert!(sink.list_bookings(10, usize::MAX).await.unwrap().is_empty());
        assert_eq!(sink.list_bookings(usize::MAX, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_sink_update_status() {
        let (sink, _file) = setup_test_sink().await;
        let receipt = sink
            .send(&Submission::Booking(buffet_booking("Jane Doe")))
            .await
            .unwrap();

        let updated = sink
            .update_status(receipt.id, BookingStatus::Confirmed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.booking, buffet_booking("Jane Doe"));

        let listed = sink.list_bookings(10, 0).await.unwrap();
        assert_eq!(listed[0].status, BookingStatus::Confirmed);

        assert!(sink
            .update_status(Uuid::new_v4(), BookingStatus::Cancelled)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_sqlite_sink_stores_contact_messages() {
        let (sink, _file) = setup_test_sink().await;

        let message = ContactPayload {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: Some("07111111111".to_string()),
            subject: "Corporate lunch".to_string(),
            message: "Can you cater for 40 on a weekday?".to_string(),
        };
        sink.send(&Submission::Contact(message)).await.unwrap();

        assert_eq!(sink.contact_message_count().await.unwrap(), 1);
        assert!(sink.list_bookings(10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let (sink, _file) = setup_test_sink().await;

        run_migrations(sink.pool()).await.unwrap();

        let version: i64 = sqlx::query("SELECT MAX(version) AS version FROM _migrations")
            .fetch_one(sink.pool())
            .await
            .unwrap()
            .get("version");
        assert_eq!(version, MIGRATIONS.len() as i64);
    }
}
