use axum::Router;
use sqlx::SqlitePool;

/// Human-readable application name, used in templates and UI.
/// Change this constant to rename the app across all pages.
pub const APP_NAME: &str = "TaxHub";

/// Shared state available to all handlers via Axum's state extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
}

/// App routes (auth, hub). Merged with site routes in lib.rs.
pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new()
        .merge(features::auth::routes())
        .merge(features::hub::routes())
}

pub mod ability;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod features;
pub mod session;
pub mod single_writer;
