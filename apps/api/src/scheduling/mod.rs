// Appointment, reminder and patient workflows for reception and veterinarians.
// Reads for the calendar views go through `fetcher::RecordFetcher`; writes and
// single-record reads hit the pool directly.

pub mod appointments;
pub mod fetcher;
pub mod handlers;
pub mod lookups;
pub mod patients;
pub mod reminders;
pub mod scope;
pub mod validation;
pub mod views;
