//! Display labels for calendar days. Kept apart from bucketing so the
//! locale can be swapped without touching the aggregation.

use chrono::{Locale, NaiveDate, NaiveTime, TimeZone, Utc};

pub trait DayLabeler: Send + Sync {
    /// Full weekday name, first letter upper-cased ("Miércoles").
    fn weekday_name(&self, date: NaiveDate) -> String;
    /// Day of month plus abbreviated month ("10 mar").
    fn date_label(&self, date: NaiveDate) -> String;
    /// Short upper-case weekday for grid column headers ("MIÉ").
    fn day_header(&self, date: NaiveDate) -> String;
    /// Week span shown above the grid ("04 mar - 10 mar 2024").
    fn range_label(&self, start: NaiveDate, end: NaiveDate) -> String;
}

/// `DayLabeler` backed by chrono's localized strftime tables.
#[derive(Debug, Clone, Copy)]
pub struct LocaleLabeler {
    locale: Locale,
}

impl Default for LocaleLabeler {
    fn default() -> Self {
        Self {
            locale: Locale::es_MX,
        }
    }
}

impl LocaleLabeler {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn format(&self, date: NaiveDate, pattern: &str) -> String {
        Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
            .format_localized(pattern, self.locale)
            .to_string()
    }
}

impl DayLabeler for LocaleLabeler {
    fn weekday_name(&self, date: NaiveDate) -> String {
        capitalize_first(&self.format(date, "%A"))
    }

    fn date_label(&self, date: NaiveDate) -> String {
        self.format(date, "%d %b")
    }

    fn day_header(&self, date: NaiveDate) -> String {
        self.format(date, "%a").trim_end_matches('.').to_uppercase()
    }

    fn range_label(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{} - {}",
            self.format(start, "%d %b"),
            self.format(end, "%d %b %Y")
        )
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
