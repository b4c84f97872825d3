//! Readiness probe for the front desk deployment.
//!
//! The service is ready once the database answers and every embedded
//! migration has been applied. Anything else is reported as `degraded`
//! with `503 Service Unavailable` so load balancers stop routing to it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `up` or `down`.
    pub database: &'static str,
    /// Embedded migrations missing from the database. `None` when the
    /// database is unreachable.
    pub pending_migrations: Option<usize>,
    /// Today in the property's local time zone, the date every
    /// "today" figure on the dashboard is computed for.
    pub property_date: NaiveDate,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_up = match staybook_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Database unreachable");
            false
        }
    };
    let pending = if db_up {
        staybook_db::pending_migrations(&state.pool)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "Could not read applied migrations"))
            .ok()
    } else {
        None
    };

    let ready = pending == Some(0);
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthResponse {
            status: if ready { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database: if db_up { "up" } else { "down" },
            pending_migrations: pending,
            property_date: state.clock.today(),
        }),
    )
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
