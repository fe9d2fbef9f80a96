use axum::http::StatusCode;
use sea_orm::DatabaseConnection;

use crate::error::AppError;

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the process is up and the database answers a ping.
pub async fn check_database(db: &DatabaseConnection) -> Result<StatusCode, AppError> {
    db.ping()
        .await
        .map_err(|e| AppError::Unavailable(anyhow::Error::new(e).context("database ping")))?;
    Ok(StatusCode::OK)
}
