use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::reminder::ReminderRecord;
use crate::scheduling::appointments::appointment_owner;
use crate::scheduling::fetcher::REMINDER_SELECT;
use crate::scheduling::scope::StaffScope;
use crate::scheduling::validation::{
    calendar_date, require_text, MESSAGE_MAX_CHARS, SUBJECT_MAX_CHARS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderInput {
    pub appointment_id: i32,
    pub remind_at: NaiveDateTime,
    pub subject: String,
    pub message: String,
}

impl ReminderInput {
    pub fn validate(&self) -> Result<(), AppError> {
        calendar_date("remind_at", self.remind_at.date())?;
        require_text("subject", &self.subject, SUBJECT_MAX_CHARS)?;
        require_text("message", &self.message, MESSAGE_MAX_CHARS)?;
        Ok(())
    }
}

/// Reminders may only hang off appointments the scope can see.
/// Missing appointment: NotFound. Someone else's appointment: Forbidden.
async fn check_appointment_access(
    pool: &PgPool,
    appointment_id: i32,
    scope: StaffScope,
) -> Result<(), AppError> {
    match appointment_owner(pool, appointment_id).await? {
        None => Err(AppError::NotFound(format!(
            "Appointment {appointment_id} not found"
        ))),
        Some(owner) if !scope.permits(owner) => Err(AppError::Forbidden),
        Some(_) => Ok(()),
    }
}

pub async fn fetch_reminder(
    pool: &PgPool,
    id: i32,
    scope: StaffScope,
) -> Result<ReminderRecord, AppError> {
    let sql = format!(
        "{REMINDER_SELECT}
        WHERE r.id = $1 AND ($2::INT4 IS NULL OR a.veterinarian_id = $2)"
    );
    sqlx::query_as::<_, ReminderRecord>(&sql)
        .bind(id)
        .bind(scope.veterinarian_filter())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reminder {id} not found")))
}

/// The next `limit` reminders due at or after `now`, soonest first.
pub async fn fetch_next_reminders(
    pool: &PgPool,
    now: NaiveDateTime,
    limit: i64,
    scope: StaffScope,
) -> Result<Vec<ReminderRecord>, AppError> {
    let sql = format!(
        "{REMINDER_SELECT}
        WHERE r.remind_at >= $1 AND ($2::INT4 IS NULL OR a.veterinarian_id = $2)
        ORDER BY r.remind_at, r.id
        LIMIT $3"
    );
    Ok(sqlx::query_as::<_, ReminderRecord>(&sql)
        .bind(now)
        .bind(scope.veterinarian_filter())
        .bind(limit)
        .fetch_all(pool)
        .await?)
}

pub async fn create_reminder(
    pool: &PgPool,
    scope: StaffScope,
    input: &ReminderInput,
) -> Result<i32, AppError> {
    input.validate()?;
    check_appointment_access(pool, input.appointment_id, scope).await?;

    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO reminders (appointment_id, remind_at, subject, message)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(input.appointment_id)
    .bind(input.remind_at)
    .bind(&input.subject)
    .bind(&input.message)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, "appointment_id"))?;

    info!(
        "Created reminder {id} for appointment {} at {}",
        input.appointment_id, input.remind_at
    );
    Ok(id)
}

pub async fn update_reminder(
    pool: &PgPool,
    id: i32,
    scope: StaffScope,
    input: &ReminderInput,
) -> Result<(), AppError> {
    input.validate()?;
    check_appointment_access(pool, input.appointment_id, scope).await?;

    let result = sqlx::query(
        r#"
        UPDATE reminders r
        SET appointment_id = $2,
            remind_at = $3,
            subject = $4,
            message = $5
        WHERE r.id = $1
          AND ($6::INT4 IS NULL OR EXISTS (
                SELECT 1 FROM appointments a
                WHERE a.id = r.appointment_id AND a.veterinarian_id = $6))
        "#,
    )
    .bind(id)
    .bind(input.appointment_id)
    .bind(input.remind_at)
    .bind(&input.subject)
    .bind(&input.message)
    .bind(scope.veterinarian_filter())
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, "appointment_id"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Reminder {id} not found")));
    }
    info!("Updated reminder {id}");
    Ok(())
}

pub async fn delete_reminder(pool: &PgPool, id: i32, scope: StaffScope) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM reminders r
        WHERE r.id = $1
          AND ($2::INT4 IS NULL OR EXISTS (
                SELECT 1 FROM appointments a
                WHERE a.id = r.appointment_id AND a.veterinarian_id = $2))
        "#,
    )
    .bind(id)
    .bind(scope.veterinarian_filter())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Reminder {id} not found")));
    }
    info!("Deleted reminder {id}");
    Ok(())
}
