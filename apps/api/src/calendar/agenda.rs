use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::calendar::labels::DayLabeler;
use crate::calendar::{partition_by_day, Scheduled};
use crate::clock::Clock;

/// Today plus the six following days.
pub const AGENDA_DAYS: usize = 7;

#[derive(Debug, Clone, Serialize)]
pub struct AgendaDay<T> {
    pub date: NaiveDate,
    pub weekday_name: String,
    pub date_label: String,
    pub is_today: bool,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgendaWindow<T> {
    pub days: Vec<AgendaDay<T>>,
}

/// Half-open range `[today 00:00, today+7 00:00)` the fetcher should load.
pub fn agenda_range(today: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (
        today.and_time(NaiveTime::MIN),
        (today + Duration::days(AGENDA_DAYS as i64)).and_time(NaiveTime::MIN),
    )
}

/// Buckets time-ordered records into the seven agenda days starting at
/// `start`, the same date `agenda_range` was called with. Works for any
/// dated record; nothing beyond the timestamp is inspected.
///
/// `clock` only decides `is_today`, so a window fetched just before midnight
/// keeps its rows.
pub fn build_agenda<T: Scheduled>(
    start: NaiveDate,
    records: Vec<T>,
    labels: &dyn DayLabeler,
    clock: &dyn Clock,
) -> AgendaWindow<T> {
    let days = partition_by_day(start, AGENDA_DAYS, records)
        .into_iter()
        .map(|(date, items)| AgendaDay {
            date,
            weekday_name: labels.weekday_name(date),
            date_label: labels.date_label(date),
            is_today: date == clock.today(),
            items,
        })
        .collect();

    AgendaWindow { days }
}
