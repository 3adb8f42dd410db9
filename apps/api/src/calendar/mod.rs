// Calendar aggregation: turns time-ordered appointment/reminder rows into the
// weekly grid and the rolling agenda window. Pure and synchronous; all I/O
// happens in `scheduling` before these functions are called.

pub mod agenda;
pub mod hours;
pub mod labels;
pub mod palette;
pub mod week;

use chrono::{NaiveDate, NaiveDateTime};

pub use agenda::{agenda_range, build_agenda, AgendaWindow};
pub use labels::{DayLabeler, LocaleLabeler};
pub use palette::{ColorPair, ColorStrategy, Palette};
pub use week::{build_weekly_calendar, week_range, week_start, WeeklyCalendar};

/// Anything that sits on the calendar at a point in time.
pub trait Scheduled {
    /// `None` marks a malformed row; such rows never land in a bucket.
    fn scheduled_at(&self) -> Option<NaiveDateTime>;

    fn scheduled_date(&self) -> Option<NaiveDate> {
        self.scheduled_at().map(|t| t.date())
    }
}

/// Rows that belong to a veterinarian, used for color assignment.
pub trait StaffOwned {
    fn staff_id(&self) -> i32;
}

/// Splits `records` into `days` consecutive date buckets starting at `start`.
///
/// Input order is preserved inside each bucket. Records without a date or
/// dated outside the window are dropped.
pub(crate) fn partition_by_day<T: Scheduled>(
    start: NaiveDate,
    days: usize,
    records: Vec<T>,
) -> Vec<(NaiveDate, Vec<T>)> {
    let mut buckets: Vec<(NaiveDate, Vec<T>)> = start
        .iter_days()
        .take(days)
        .map(|date| (date, Vec::new()))
        .collect();

    for record in records {
        let Some(date) = record.scheduled_date() else {
            continue;
        };
        let offset = (date - start).num_days();
        if offset < 0 {
            continue;
        }
        if let Some((_, bucket)) = buckets.get_mut(offset as usize) {
            bucket.push(record);
        }
    }

    buckets
}
