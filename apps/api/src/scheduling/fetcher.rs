//! Record fetcher: loads the rows the calendar views aggregate.
//!
//! Every query returns rows sorted ascending by timestamp; the calendar
//! builders rely on that order and never re-sort.
//!
//! `AppState` holds an `Arc<dyn RecordFetcher>`; the Postgres implementation
//! is the only production backend.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::appointment::AppointmentRecord;
use crate::models::lookup::StaffLoadRow;
use crate::models::reminder::ReminderRecord;
use crate::scheduling::scope::StaffScope;

/// Shared SELECT list for appointment reads; callers append WHERE/ORDER BY.
pub(crate) const APPOINTMENT_SELECT: &str = r#"
    SELECT
        a.id,
        a.veterinarian_id AS staff_id,
        v.name AS staff_name,
        p.id AS pet_id,
        p.name AS pet_name,
        o.name AS owner_name,
        t.id AS appointment_type_id,
        t.name AS type_name,
        a.scheduled_at,
        t.price_cents AS base_price_cents,
        a.additional_price_cents,
        t.price_cents + a.additional_price_cents AS total_price_cents,
        a.notes
    FROM appointments a
    INNER JOIN veterinarians v ON v.id = a.veterinarian_id
    INNER JOIN pets p ON p.id = a.pet_id
    INNER JOIN owners o ON o.id = p.owner_id
    INNER JOIN appointment_types t ON t.id = a.appointment_type_id
"#;

/// Shared SELECT list for reminder reads.
pub(crate) const REMINDER_SELECT: &str = r#"
    SELECT
        r.id,
        r.appointment_id,
        r.remind_at,
        r.subject,
        r.message,
        o.name AS owner_name,
        p.name AS pet_name,
        o.phone AS owner_phone,
        o.email AS owner_email
    FROM reminders r
    INNER JOIN appointments a ON a.id = r.appointment_id
    INNER JOIN pets p ON p.id = a.pet_id
    INNER JOIN owners o ON o.id = p.owner_id
"#;

#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Appointments with `start <= scheduled_at < end`, oldest first.
    async fn appointments_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        scope: StaffScope,
    ) -> Result<Vec<AppointmentRecord>, AppError>;

    /// Reminders with `start <= remind_at < end`, oldest first.
    async fn reminders_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        scope: StaffScope,
    ) -> Result<Vec<ReminderRecord>, AppError>;

    /// Every veterinarian, by name, with their appointment count in range.
    async fn staff_load(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StaffLoadRow>, AppError>;
}

pub struct PgRecordFetcher {
    pool: PgPool,
}

impl PgRecordFetcher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordFetcher for PgRecordFetcher {
    async fn appointments_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        scope: StaffScope,
    ) -> Result<Vec<AppointmentRecord>, AppError> {
        let sql = format!(
            "{APPOINTMENT_SELECT}
            WHERE a.scheduled_at >= $1 AND a.scheduled_at < $2
              AND ($3::INT4 IS NULL OR a.veterinarian_id = $3)
            ORDER BY a.scheduled_at, a.id"
        );
        let rows = sqlx::query_as::<_, AppointmentRecord>(&sql)
            .bind(start)
            .bind(end)
            .bind(scope.veterinarian_filter())
            .fetch_all(&self.pool)
            .await?;

        debug!(
            "Fetched {} appointments in [{start}, {end}) for {scope:?}",
            rows.len()
        );
        Ok(rows)
    }

    async fn reminders_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        scope: StaffScope,
    ) -> Result<Vec<ReminderRecord>, AppError> {
        let sql = format!(
            "{REMINDER_SELECT}
            WHERE r.remind_at >= $1 AND r.remind_at < $2
              AND ($3::INT4 IS NULL OR a.veterinarian_id = $3)
            ORDER BY r.remind_at, r.id"
        );
        let rows = sqlx::query_as::<_, ReminderRecord>(&sql)
            .bind(start)
            .bind(end)
            .bind(scope.veterinarian_filter())
            .fetch_all(&self.pool)
            .await?;

        debug!(
            "Fetched {} reminders in [{start}, {end}) for {scope:?}",
            rows.len()
        );
        Ok(rows)
    }

    async fn staff_load(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StaffLoadRow>, AppError> {
        let rows = sqlx::query_as::<_, StaffLoadRow>(
            r#"
            SELECT v.id, v.name, COUNT(a.id) AS appointment_count
            FROM veterinarians v
            LEFT JOIN appointments a
                ON a.veterinarian_id = v.id
               AND a.scheduled_at >= $1
               AND a.scheduled_at < $2
            GROUP BY v.id, v.name
            ORDER BY v.name, v.id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched load for {} veterinarians", rows.len());
        Ok(rows)
    }
}
