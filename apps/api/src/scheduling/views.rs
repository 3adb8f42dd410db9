//! Fetch-then-aggregate pipelines behind the calendar endpoints.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::calendar::{
    agenda_range, build_agenda, build_weekly_calendar, week_range, week_start, AgendaWindow,
    ColorPair, WeeklyCalendar,
};
use crate::errors::AppError;
use crate::models::appointment::AppointmentRecord;
use crate::models::reminder::ReminderRecord;
use crate::scheduling::scope::StaffScope;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct StaffRosterEntry {
    pub id: i32,
    pub name: String,
    pub colors: ColorPair,
    pub appointment_count: i64,
}

/// Calendar legend: every veterinarian, their color, and their load that week.
#[derive(Debug, Clone, Serialize)]
pub struct StaffRoster {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub staff: Vec<StaffRosterEntry>,
}

pub async fn weekly_calendar(
    state: &AppState,
    scope: StaffScope,
    reference: NaiveDate,
) -> Result<WeeklyCalendar<AppointmentRecord>, AppError> {
    let (start, end) = week_range(reference);
    let records = state
        .fetcher
        .appointments_in_range(start, end, scope)
        .await?;

    Ok(build_weekly_calendar(
        reference,
        records,
        scope.color_strategy(&state.palette),
        state.labels.as_ref(),
        state.clock.as_ref(),
    ))
}

pub async fn upcoming_appointments(
    state: &AppState,
    scope: StaffScope,
) -> Result<AgendaWindow<AppointmentRecord>, AppError> {
    let today = state.clock.today();
    let (start, end) = agenda_range(today);
    let records = state
        .fetcher
        .appointments_in_range(start, end, scope)
        .await?;
    Ok(build_agenda(
        today,
        records,
        state.labels.as_ref(),
        state.clock.as_ref(),
    ))
}

pub async fn upcoming_reminders(
    state: &AppState,
    scope: StaffScope,
) -> Result<AgendaWindow<ReminderRecord>, AppError> {
    let today = state.clock.today();
    let (start, end) = agenda_range(today);
    let records = state.fetcher.reminders_in_range(start, end, scope).await?;
    Ok(build_agenda(
        today,
        records,
        state.labels.as_ref(),
        state.clock.as_ref(),
    ))
}

pub async fn todays_appointments(
    state: &AppState,
    scope: StaffScope,
) -> Result<Vec<AppointmentRecord>, AppError> {
    let today = state.clock.today();
    let start = today.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1);
    state.fetcher.appointments_in_range(start, end, scope).await
}

pub async fn staff_roster(state: &AppState, reference: NaiveDate) -> Result<StaffRoster, AppError> {
    let (start, end) = week_range(reference);
    let rows = state.fetcher.staff_load(start, end).await?;
    let week_start = week_start(reference);

    Ok(StaffRoster {
        week_start,
        week_end: week_start + Duration::days(6),
        staff: rows
            .into_iter()
            .map(|row| StaffRosterEntry {
                colors: state.palette.color_for(row.id).clone(),
                id: row.id,
                name: row.name,
                appointment_count: row.appointment_count,
            })
            .collect(),
    })
}
