use std::sync::Arc;

use sqlx::PgPool;

use crate::calendar::{DayLabeler, Palette};
use crate::clock::Clock;
use crate::scheduling::fetcher::RecordFetcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the write paths and lookups.
    pub db: PgPool,
    /// Read side of the calendar views. Default: `PgRecordFetcher` over `db`.
    pub fetcher: Arc<dyn RecordFetcher>,
    /// Staff colors, fixed for the life of the process.
    pub palette: Arc<Palette>,
    pub labels: Arc<dyn DayLabeler>,
    pub clock: Arc<dyn Clock>,
}
