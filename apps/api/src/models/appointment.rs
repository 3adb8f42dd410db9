use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::calendar::{Scheduled, StaffOwned};

/// Appointment row with its display fields already joined.
/// Prices are integer cents.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentRecord {
    pub id: i32,
    pub staff_id: i32,
    pub staff_name: String,
    pub pet_id: i32,
    pub pet_name: String,
    pub owner_name: String,
    pub appointment_type_id: i32,
    pub type_name: String,
    pub scheduled_at: NaiveDateTime,
    pub base_price_cents: i64,
    pub additional_price_cents: i64,
    pub total_price_cents: i64,
    pub notes: Option<String>,
}

impl Scheduled for AppointmentRecord {
    fn scheduled_at(&self) -> Option<NaiveDateTime> {
        Some(self.scheduled_at)
    }
}

impl StaffOwned for AppointmentRecord {
    fn staff_id(&self) -> i32 {
        self.staff_id
    }
}
