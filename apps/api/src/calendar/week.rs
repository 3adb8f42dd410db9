use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::calendar::hours::{business_hours, is_business_day};
use crate::calendar::labels::DayLabeler;
use crate::calendar::palette::{ColorPair, ColorStrategy};
use crate::calendar::{partition_by_day, Scheduled, StaffOwned};
use crate::clock::Clock;

pub const DAYS_PER_WEEK: usize = 7;

/// A record placed on the grid together with its staff colors.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEntry<T> {
    #[serde(flatten)]
    pub record: T,
    pub colors: ColorPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBucket<T> {
    pub date: NaiveDate,
    pub header: String,
    pub is_today: bool,
    pub is_business_day: bool,
    pub business_hours: Vec<u32>,
    pub appointments: Vec<CalendarEntry<T>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyCalendar<T> {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub previous_week: NaiveDate,
    pub next_week: NaiveDate,
    pub range_label: String,
    /// Always seven entries, Monday first.
    pub days: Vec<DayBucket<T>>,
}

/// Monday of the week containing `reference`.
///
/// A Sunday closes the week that began six days earlier; it never starts a
/// new one. Request dates reach here already bounded by
/// `validation::calendar_date`.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    let weekday = i64::from(reference.weekday().num_days_from_sunday());
    let offset = if weekday == 0 { -6 } else { -(weekday - 1) };
    reference + Duration::days(offset)
}

/// Half-open timestamp range `[monday 00:00, next monday 00:00)` for the
/// week containing `reference`.
pub fn week_range(reference: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = week_start(reference);
    (
        start.and_time(NaiveTime::MIN),
        (start + Duration::days(DAYS_PER_WEEK as i64)).and_time(NaiveTime::MIN),
    )
}

/// Builds the Monday-to-Sunday grid for the week containing `reference`.
///
/// `records` must already be sorted by time; that order is kept within each
/// day. `is_today` is read from `clock` for every bucket.
pub fn build_weekly_calendar<T>(
    reference: NaiveDate,
    records: Vec<T>,
    colors: ColorStrategy<'_>,
    labels: &dyn DayLabeler,
    clock: &dyn Clock,
) -> WeeklyCalendar<T>
where
    T: Scheduled + StaffOwned,
{
    let start = week_start(reference);
    let end = start + Duration::days(DAYS_PER_WEEK as i64 - 1);

    let days = partition_by_day(start, DAYS_PER_WEEK, records)
        .into_iter()
        .map(|(date, records)| {
            let weekday = date.weekday();
            DayBucket {
                date,
                header: labels.day_header(date),
                is_today: date == clock.today(),
                is_business_day: is_business_day(weekday),
                business_hours: business_hours(weekday),
                appointments: records
                    .into_iter()
                    .map(|record| {
                        let colors = colors.resolve(record.staff_id()).clone();
                        CalendarEntry { record, colors }
                    })
                    .collect(),
            }
        })
        .collect();

    WeeklyCalendar {
        week_start: start,
        week_end: end,
        previous_week: start - Duration::days(DAYS_PER_WEEK as i64),
        next_week: start + Duration::days(DAYS_PER_WEEK as i64),
        range_label: labels.range_label(start, end),
        days,
    }
}
