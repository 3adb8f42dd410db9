//! Axum route handlers for the scheduling API.
//!
//! Every endpoint exists twice: under `/reception` (all veterinarians) and
//! under `/veterinarians/:vet_id` (one veterinarian's own records). The
//! handlers only pick the `StaffScope`; the work is shared.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::{AgendaWindow, WeeklyCalendar};
use crate::errors::AppError;
use crate::models::appointment::AppointmentRecord;
use crate::models::lookup::{
    AppointmentChoice, AppointmentTypeOption, CatalogOption, OwnerOption, PetOption,
    VeterinarianOption,
};
use crate::models::reminder::ReminderRecord;
use crate::scheduling::appointments::{self, AppointmentInput};
use crate::scheduling::patients::{self, OwnerInput, PetInput};
use crate::scheduling::reminders::{self, ReminderInput};
use crate::scheduling::scope::StaffScope;
use crate::scheduling::validation::{calendar_date, reminder_limit};
use crate::scheduling::{lookups, views};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Any day of the wanted week. Defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct NextRemindersQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

type Created = (StatusCode, Json<CreatedResponse>);

fn created(id: i32) -> Created {
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

fn reference_date(state: &AppState, query: &CalendarQuery) -> Result<NaiveDate, AppError> {
    match query.date {
        Some(date) => calendar_date("date", date),
        None => Ok(state.clock.today()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared bodies
// ────────────────────────────────────────────────────────────────────────────

async fn calendar(
    state: &AppState,
    scope: StaffScope,
    query: &CalendarQuery,
) -> Result<Json<WeeklyCalendar<AppointmentRecord>>, AppError> {
    let reference = reference_date(state, query)?;
    Ok(Json(views::weekly_calendar(state, scope, reference).await?))
}

async fn next_reminders(
    state: &AppState,
    scope: StaffScope,
    query: &NextRemindersQuery,
) -> Result<Json<Vec<ReminderRecord>>, AppError> {
    let limit = reminder_limit(query.limit)?;
    let rows =
        reminders::fetch_next_reminders(&state.db, state.clock.now(), limit, scope).await?;
    Ok(Json(rows))
}

// ────────────────────────────────────────────────────────────────────────────
// Reception
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/reception/calendar
pub async fn handle_reception_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<WeeklyCalendar<AppointmentRecord>>, AppError> {
    calendar(&state, StaffScope::All, &query).await
}

/// GET /api/v1/reception/staff
pub async fn handle_reception_staff(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<views::StaffRoster>, AppError> {
    let reference = reference_date(&state, &query)?;
    Ok(Json(views::staff_roster(&state, reference).await?))
}

/// GET /api/v1/reception/appointments/upcoming
pub async fn handle_reception_upcoming_appointments(
    State(state): State<AppState>,
) -> Result<Json<AgendaWindow<AppointmentRecord>>, AppError> {
    Ok(Json(
        views::upcoming_appointments(&state, StaffScope::All).await?,
    ))
}

/// GET /api/v1/reception/appointments/today
pub async fn handle_reception_today(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentRecord>>, AppError> {
    Ok(Json(
        views::todays_appointments(&state, StaffScope::All).await?,
    ))
}

/// POST /api/v1/reception/appointments
pub async fn handle_reception_create_appointment(
    State(state): State<AppState>,
    Json(input): Json<AppointmentInput>,
) -> Result<Created, AppError> {
    let id = appointments::create_appointment(&state.db, StaffScope::All, &input).await?;
    Ok(created(id))
}

/// GET /api/v1/reception/appointments/:id
pub async fn handle_reception_get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AppointmentRecord>, AppError> {
    Ok(Json(
        appointments::fetch_appointment(&state.db, id, StaffScope::All).await?,
    ))
}

/// PUT /api/v1/reception/appointments/:id
pub async fn handle_reception_update_appointment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<AppointmentInput>,
) -> Result<StatusCode, AppError> {
    appointments::update_appointment(&state.db, id, StaffScope::All, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/reception/appointments/:id
pub async fn handle_reception_delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    appointments::delete_appointment(&state.db, id, StaffScope::All).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/reception/reminders/upcoming
pub async fn handle_reception_upcoming_reminders(
    State(state): State<AppState>,
) -> Result<Json<AgendaWindow<ReminderRecord>>, AppError> {
    Ok(Json(
        views::upcoming_reminders(&state, StaffScope::All).await?,
    ))
}

/// GET /api/v1/reception/reminders/next
pub async fn handle_reception_next_reminders(
    State(state): State<AppState>,
    Query(query): Query<NextRemindersQuery>,
) -> Result<Json<Vec<ReminderRecord>>, AppError> {
    next_reminders(&state, StaffScope::All, &query).await
}

/// POST /api/v1/reception/reminders
pub async fn handle_reception_create_reminder(
    State(state): State<AppState>,
    Json(input): Json<ReminderInput>,
) -> Result<Created, AppError> {
    let id = reminders::create_reminder(&state.db, StaffScope::All, &input).await?;
    Ok(created(id))
}

/// GET /api/v1/reception/reminders/:id
pub async fn handle_reception_get_reminder(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ReminderRecord>, AppError> {
    Ok(Json(
        reminders::fetch_reminder(&state.db, id, StaffScope::All).await?,
    ))
}

/// PUT /api/v1/reception/reminders/:id
pub async fn handle_reception_update_reminder(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ReminderInput>,
) -> Result<StatusCode, AppError> {
    reminders::update_reminder(&state.db, id, StaffScope::All, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/reception/reminders/:id
pub async fn handle_reception_delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    reminders::delete_reminder(&state.db, id, StaffScope::All).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Veterinarian
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/veterinarians/:vet_id/calendar
pub async fn handle_vet_calendar(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<WeeklyCalendar<AppointmentRecord>>, AppError> {
    calendar(&state, StaffScope::Veterinarian(vet_id), &query).await
}

/// GET /api/v1/veterinarians/:vet_id/appointments/upcoming
pub async fn handle_vet_upcoming_appointments(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
) -> Result<Json<AgendaWindow<AppointmentRecord>>, AppError> {
    Ok(Json(
        views::upcoming_appointments(&state, StaffScope::Veterinarian(vet_id)).await?,
    ))
}

/// GET /api/v1/veterinarians/:vet_id/appointments/today
pub async fn handle_vet_today(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
) -> Result<Json<Vec<AppointmentRecord>>, AppError> {
    Ok(Json(
        views::todays_appointments(&state, StaffScope::Veterinarian(vet_id)).await?,
    ))
}

/// POST /api/v1/veterinarians/:vet_id/appointments
pub async fn handle_vet_create_appointment(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
    Json(input): Json<AppointmentInput>,
) -> Result<Created, AppError> {
    let id =
        appointments::create_appointment(&state.db, StaffScope::Veterinarian(vet_id), &input)
            .await?;
    Ok(created(id))
}

/// GET /api/v1/veterinarians/:vet_id/appointments/:id
pub async fn handle_vet_get_appointment(
    State(state): State<AppState>,
    Path((vet_id, id)): Path<(i32, i32)>,
) -> Result<Json<AppointmentRecord>, AppError> {
    Ok(Json(
        appointments::fetch_appointment(&state.db, id, StaffScope::Veterinarian(vet_id)).await?,
    ))
}

/// PUT /api/v1/veterinarians/:vet_id/appointments/:id
pub async fn handle_vet_update_appointment(
    State(state): State<AppState>,
    Path((vet_id, id)): Path<(i32, i32)>,
    Json(input): Json<AppointmentInput>,
) -> Result<StatusCode, AppError> {
    appointments::update_appointment(&state.db, id, StaffScope::Veterinarian(vet_id), &input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/veterinarians/:vet_id/appointments/:id
pub async fn handle_vet_delete_appointment(
    State(state): State<AppState>,
    Path((vet_id, id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    appointments::delete_appointment(&state.db, id, StaffScope::Veterinarian(vet_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/veterinarians/:vet_id/reminders/upcoming
pub async fn handle_vet_upcoming_reminders(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
) -> Result<Json<AgendaWindow<ReminderRecord>>, AppError> {
    Ok(Json(
        views::upcoming_reminders(&state, StaffScope::Veterinarian(vet_id)).await?,
    ))
}

/// GET /api/v1/veterinarians/:vet_id/reminders/next
pub async fn handle_vet_next_reminders(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
    Query(query): Query<NextRemindersQuery>,
) -> Result<Json<Vec<ReminderRecord>>, AppError> {
    next_reminders(&state, StaffScope::Veterinarian(vet_id), &query).await
}

/// POST /api/v1/veterinarians/:vet_id/reminders
pub async fn handle_vet_create_reminder(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
    Json(input): Json<ReminderInput>,
) -> Result<Created, AppError> {
    let id =
        reminders::create_reminder(&state.db, StaffScope::Veterinarian(vet_id), &input).await?;
    Ok(created(id))
}

/// GET /api/v1/veterinarians/:vet_id/reminders/:id
pub async fn handle_vet_get_reminder(
    State(state): State<AppState>,
    Path((vet_id, id)): Path<(i32, i32)>,
) -> Result<Json<ReminderRecord>, AppError> {
    Ok(Json(
        reminders::fetch_reminder(&state.db, id, StaffScope::Veterinarian(vet_id)).await?,
    ))
}

/// PUT /api/v1/veterinarians/:vet_id/reminders/:id
pub async fn handle_vet_update_reminder(
    State(state): State<AppState>,
    Path((vet_id, id)): Path<(i32, i32)>,
    Json(input): Json<ReminderInput>,
) -> Result<StatusCode, AppError> {
    reminders::update_reminder(&state.db, id, StaffScope::Veterinarian(vet_id), &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/veterinarians/:vet_id/reminders/:id
pub async fn handle_vet_delete_reminder(
    State(state): State<AppState>,
    Path((vet_id, id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    reminders::delete_reminder(&state.db, id, StaffScope::Veterinarian(vet_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Patients
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reception/owners
pub async fn handle_reception_create_owner(
    State(state): State<AppState>,
    Json(input): Json<OwnerInput>,
) -> Result<Created, AppError> {
    Ok(created(patients::create_owner(&state.db, &input).await?))
}

/// POST /api/v1/reception/pets
pub async fn handle_reception_create_pet(
    State(state): State<AppState>,
    Json(input): Json<PetInput>,
) -> Result<Created, AppError> {
    Ok(created(patients::create_pet(&state.db, &input).await?))
}

/// POST /api/v1/veterinarians/:vet_id/owners
///
/// Owners and pets are clinic-wide; the veterinarian only registers them.
pub async fn handle_vet_create_owner(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
    Json(input): Json<OwnerInput>,
) -> Result<Created, AppError> {
    let id = patients::create_owner(&state.db, &input).await?;
    info!("Owner {id} registered by veterinarian {vet_id}");
    Ok(created(id))
}

/// POST /api/v1/veterinarians/:vet_id/pets
pub async fn handle_vet_create_pet(
    State(state): State<AppState>,
    Path(vet_id): Path<i32>,
    Json(input): Json<PetInput>,
) -> Result<Created, AppError> {
    let id = patients::create_pet(&state.db, &input).await?;
    info!("Pet {id} registered by veterinarian {vet_id}");
    Ok(created(id))
}

// ────────────────────────────────────────────────────────────────────────────
// Lookups
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChoicesQuery {
    pub veterinarian_id: Option<i32>,
}

/// GET /api/v1/lookups/veterinarians
pub async fn handle_lookup_veterinarians(
    State(state): State<AppState>,
) -> Result<Json<Vec<VeterinarianOption>>, AppError> {
    Ok(Json(lookups::list_veterinarians(&state.db).await?))
}

/// GET /api/v1/lookups/appointment-types
pub async fn handle_lookup_appointment_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentTypeOption>>, AppError> {
    Ok(Json(lookups::list_appointment_types(&state.db).await?))
}

/// GET /api/v1/lookups/appointment-choices
///
/// Appointments from today onwards, optionally narrowed to one veterinarian.
pub async fn handle_lookup_appointment_choices(
    State(state): State<AppState>,
    Query(query): Query<ChoicesQuery>,
) -> Result<Json<Vec<AppointmentChoice>>, AppError> {
    let scope = match query.veterinarian_id {
        Some(id) => StaffScope::Veterinarian(id),
        None => StaffScope::All,
    };
    let since = state.clock.today().and_time(chrono::NaiveTime::MIN);
    Ok(Json(
        lookups::list_appointment_choices(&state.db, since, scope).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct PetsQuery {
    pub owner_id: Option<i32>,
}

/// GET /api/v1/lookups/owners
pub async fn handle_lookup_owners(
    State(state): State<AppState>,
) -> Result<Json<Vec<OwnerOption>>, AppError> {
    Ok(Json(lookups::list_owners(&state.db).await?))
}

/// GET /api/v1/lookups/pets
pub async fn handle_lookup_pets(
    State(state): State<AppState>,
    Query(query): Query<PetsQuery>,
) -> Result<Json<Vec<PetOption>>, AppError> {
    Ok(Json(lookups::list_pets(&state.db, query.owner_id).await?))
}

/// GET /api/v1/lookups/species
pub async fn handle_lookup_species(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogOption>>, AppError> {
    Ok(Json(lookups::list_species(&state.db).await?))
}

/// GET /api/v1/lookups/allergies
pub async fn handle_lookup_allergies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogOption>>, AppError> {
    Ok(Json(lookups::list_allergies(&state.db).await?))
}
