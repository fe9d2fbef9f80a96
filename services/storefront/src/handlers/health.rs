use axum::extract::State;
use axum::http::StatusCode;

use storefront_core::error::AppError;
use storefront_core::health::check_database;

use crate::state::AppState;

/// Handler for `GET /readyz`: 200 once the database answers.
pub async fn readyz(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    check_database(&state.db).await
}
