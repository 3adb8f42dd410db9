use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::appointment::AppointmentRecord;
use crate::scheduling::fetcher::APPOINTMENT_SELECT;
use crate::scheduling::scope::StaffScope;
use crate::scheduling::validation::{
    calendar_date, limit_text, non_negative_cents, NOTES_MAX_CHARS,
};

const APPOINTMENT_REFERENCES: &str = "veterinarian_id, pet_id or appointment_type_id";

/// Body of appointment create/update requests.
///
/// `veterinarian_id` is ignored inside a veterinarian's scope: they can only
/// book into their own calendar.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentInput {
    pub veterinarian_id: Option<i32>,
    pub pet_id: i32,
    pub appointment_type_id: i32,
    pub scheduled_at: NaiveDateTime,
    #[serde(default)]
    pub additional_price_cents: i64,
    pub notes: Option<String>,
}

impl AppointmentInput {
    pub fn validate(&self) -> Result<(), AppError> {
        calendar_date("scheduled_at", self.scheduled_at.date())?;
        non_negative_cents("additional_price_cents", self.additional_price_cents)?;
        if let Some(notes) = &self.notes {
            limit_text("notes", notes, NOTES_MAX_CHARS)?;
        }
        Ok(())
    }

    /// Veterinarian the appointment is booked for, as allowed by `scope`.
    fn veterinarian_for(&self, scope: StaffScope) -> Option<i32> {
        match scope {
            StaffScope::All => self.veterinarian_id,
            StaffScope::Veterinarian(id) => Some(id),
        }
    }
}

pub async fn fetch_appointment(
    pool: &PgPool,
    id: i32,
    scope: StaffScope,
) -> Result<AppointmentRecord, AppError> {
    let sql = format!(
        "{APPOINTMENT_SELECT}
        WHERE a.id = $1 AND ($2::INT4 IS NULL OR a.veterinarian_id = $2)"
    );
    sqlx::query_as::<_, AppointmentRecord>(&sql)
        .bind(id)
        .bind(scope.veterinarian_filter())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {id} not found")))
}

pub async fn create_appointment(
    pool: &PgPool,
    scope: StaffScope,
    input: &AppointmentInput,
) -> Result<i32, AppError> {
    input.validate()?;
    let veterinarian_id = input
        .veterinarian_for(scope)
        .ok_or_else(|| AppError::Validation("veterinarian_id is required".to_string()))?;

    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO appointments
            (veterinarian_id, pet_id, appointment_type_id, scheduled_at,
             additional_price_cents, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(veterinarian_id)
    .bind(input.pet_id)
    .bind(input.appointment_type_id)
    .bind(input.scheduled_at)
    .bind(input.additional_price_cents)
    .bind(input.notes.as_deref())
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_write(e, APPOINTMENT_REFERENCES))?;

    info!(
        "Created appointment {id} for veterinarian {veterinarian_id} at {}",
        input.scheduled_at
    );
    Ok(id)
}

pub async fn update_appointment(
    pool: &PgPool,
    id: i32,
    scope: StaffScope,
    input: &AppointmentInput,
) -> Result<(), AppError> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE appointments
        SET veterinarian_id = COALESCE($2::INT4, veterinarian_id),
            pet_id = $3,
            appointment_type_id = $4,
            scheduled_at = $5,
            additional_price_cents = $6,
            notes = $7
        WHERE id = $1
          AND ($8::INT4 IS NULL OR veterinarian_id = $8)
        "#,
    )
    .bind(id)
    .bind(input.veterinarian_for(scope))
    .bind(input.pet_id)
    .bind(input.appointment_type_id)
    .bind(input.scheduled_at)
    .bind(input.additional_price_cents)
    .bind(input.notes.as_deref())
    .bind(scope.veterinarian_filter())
    .execute(pool)
    .await
    .map_err(|e| AppError::from_write(e, APPOINTMENT_REFERENCES))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Appointment {id} not found")));
    }
    info!("Updated appointment {id}");
    Ok(())
}

pub async fn delete_appointment(pool: &PgPool, id: i32, scope: StaffScope) -> Result<(), AppError> {
    let result = sqlx::query(
        "DELETE FROM appointments WHERE id = $1 AND ($2::INT4 IS NULL OR veterinarian_id = $2)",
    )
    .bind(id)
    .bind(scope.veterinarian_filter())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Appointment {id} not found")));
    }
    info!("Deleted appointment {id}");
    Ok(())
}

/// Veterinarian owning an appointment, or `None` if it does not exist.
pub(crate) async fn appointment_owner(pool: &PgPool, id: i32) -> Result<Option<i32>, AppError> {
    Ok(
        sqlx::query_scalar::<_, i32>("SELECT veterinarian_id FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input(veterinarian_id: Option<i32>) -> AppointmentInput {
        AppointmentInput {
            veterinarian_id,
            pet_id: 1,
            appointment_type_id: 1,
            scheduled_at: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            additional_price_cents: 0,
            notes: None,
        }
    }

    #[test]
    fn test_vet_scope_forces_own_calendar() {
        let i = input(Some(8));
        assert_eq!(i.veterinarian_for(StaffScope::Veterinarian(3)), Some(3));
        assert_eq!(i.veterinarian_for(StaffScope::All), Some(8));
        assert_eq!(input(None).veterinarian_for(StaffScope::All), None);
    }

    #[test]
    fn test_validate_rejects_negative_surcharge_and_long_notes() {
        let mut i = input(Some(1));
        assert!(i.validate().is_ok());

        i.additional_price_cents = -100;
        assert!(i.validate().is_err());

        i.additional_price_cents = 0;
        i.notes = Some("x".repeat(501));
        assert!(i.validate().is_err());
    }

    #[test]
    fn test_input_deserializes_with_default_surcharge() {
        let i: AppointmentInput = serde_json::from_value(serde_json::json!({
            "pet_id": 2,
            "appointment_type_id": 3,
            "scheduled_at": "2024-03-04T10:30:00"
        }))
        .unwrap();
        assert_eq!(i.additional_price_cents, 0);
        assert_eq!(i.veterinarian_id, None);
        assert!(i.notes.is_none());
    }
}
