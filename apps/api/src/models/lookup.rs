use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VeterinarianOption {
    pub id: i32,
    pub name: String,
}

/// Veterinarian with the number of appointments booked in a date range.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StaffLoadRow {
    pub id: i32,
    pub name: String,
    pub appointment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentTypeOption {
    pub id: i32,
    pub name: String,
    pub price_cents: i64,
}

/// Upcoming appointment offered as a target when creating a reminder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AppointmentChoice {
    pub id: i32,
    pub scheduled_at: NaiveDateTime,
    pub pet_name: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnerOption {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Pet as listed in the appointment form, labelled with its owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PetOption {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub owner_name: String,
    pub species_name: String,
}

/// Row of a plain `(id, name)` catalogue: species, allergies.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogOption {
    pub id: i32,
    pub name: String,
}
