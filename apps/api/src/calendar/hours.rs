use chrono::Weekday;

/// First bookable hour of any working day.
pub const OPENING_HOUR: u32 = 9;
/// Monday to Friday: 9:00 through the 18:00 slot.
pub const FULL_DAY_SLOTS: u32 = 10;
/// Saturday half day: 9:00 through the 13:00 slot.
pub const HALF_DAY_SLOTS: u32 = 5;

pub fn is_business_day(weekday: Weekday) -> bool {
    weekday != Weekday::Sun
}

/// Hour-of-day rows the weekly grid renders for a day. Empty on Sunday.
pub fn business_hours(weekday: Weekday) -> Vec<u32> {
    let slots = match weekday {
        Weekday::Sun => 0,
        Weekday::Sat => HALF_DAY_SLOTS,
        _ => FULL_DAY_SLOTS,
    };
    (OPENING_HOUR..OPENING_HOUR + slots).collect()
}
