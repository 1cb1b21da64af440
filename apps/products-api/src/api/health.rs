//! Readiness check

use axum::{extract::State, response::IntoResponse};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// 200 when the database answers `SELECT 1`, 503 otherwise
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let database: HealthCheckFuture<'_> = Box::pin(async {
        database::postgres::check_health(&state.db)
            .await
            .map_err(|e| e.to_string())
    });

    run_health_checks(vec![("database", database)]).await
}
