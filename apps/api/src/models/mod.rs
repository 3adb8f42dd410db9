pub mod appointment;
pub mod lookup;
pub mod reminder;
