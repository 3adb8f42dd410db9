use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::calendar::Scheduled;

/// Owner reminder tied to an appointment, with owner contact details joined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReminderRecord {
    pub id: i32,
    pub appointment_id: i32,
    pub remind_at: NaiveDateTime,
    pub subject: String,
    pub message: String,
    pub owner_name: String,
    pub pet_name: String,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,
}

impl Scheduled for ReminderRecord {
    fn scheduled_at(&self) -> Option<NaiveDateTime> {
        Some(self.remind_at)
    }
}
