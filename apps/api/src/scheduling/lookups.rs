//! Option lists for the appointment and reminder forms.

use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::lookup::{
    AppointmentChoice, AppointmentTypeOption, CatalogOption, OwnerOption, PetOption,
    VeterinarianOption,
};
use crate::scheduling::scope::StaffScope;

pub async fn list_veterinarians(pool: &PgPool) -> Result<Vec<VeterinarianOption>, AppError> {
    Ok(sqlx::query_as::<_, VeterinarianOption>(
        "SELECT id, name FROM veterinarians ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn list_appointment_types(pool: &PgPool) -> Result<Vec<AppointmentTypeOption>, AppError> {
    Ok(sqlx::query_as::<_, AppointmentTypeOption>(
        "SELECT id, name, price_cents FROM appointment_types ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?)
}

/// Appointments from `since` onwards that a reminder can be attached to.
pub async fn list_appointment_choices(
    pool: &PgPool,
    since: NaiveDateTime,
    scope: StaffScope,
) -> Result<Vec<AppointmentChoice>, AppError> {
    Ok(sqlx::query_as::<_, AppointmentChoice>(
        r#"
        SELECT a.id, a.scheduled_at, p.name AS pet_name, o.name AS owner_name
        FROM appointments a
        INNER JOIN pets p ON p.id = a.pet_id
        INNER JOIN owners o ON o.id = p.owner_id
        WHERE a.scheduled_at >= $1
          AND ($2::INT4 IS NULL OR a.veterinarian_id = $2)
        ORDER BY a.scheduled_at, a.id
        "#,
    )
    .bind(since)
    .bind(scope.veterinarian_filter())
    .fetch_all(pool)
    .await?)
}

pub async fn list_owners(pool: &PgPool) -> Result<Vec<OwnerOption>, AppError> {
    Ok(sqlx::query_as::<_, OwnerOption>(
        "SELECT id, name, email, phone FROM owners ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?)
}

/// Pets with their owner's name, optionally only one owner's.
pub async fn list_pets(pool: &PgPool, owner_id: Option<i32>) -> Result<Vec<PetOption>, AppError> {
    Ok(sqlx::query_as::<_, PetOption>(
        r#"
        SELECT p.id, p.name, p.owner_id, o.name AS owner_name, s.name AS species_name
        FROM pets p
        INNER JOIN owners o ON o.id = p.owner_id
        INNER JOIN species s ON s.id = p.species_id
        WHERE ($1::INT4 IS NULL OR p.owner_id = $1)
        ORDER BY p.name, p.id
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_species(pool: &PgPool) -> Result<Vec<CatalogOption>, AppError> {
    Ok(
        sqlx::query_as::<_, CatalogOption>("SELECT id, name FROM species ORDER BY name")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn list_allergies(pool: &PgPool) -> Result<Vec<CatalogOption>, AppError> {
    Ok(
        sqlx::query_as::<_, CatalogOption>("SELECT id, name FROM allergies ORDER BY name")
            .fetch_all(pool)
            .await?,
    )
}
