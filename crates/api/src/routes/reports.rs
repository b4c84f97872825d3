//! Route definitions for `/reports`.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /availability                  -> availability
/// GET    /availability/details          -> availability_detail
/// GET    /meals                         -> meals
/// GET    /meals/details                 -> meal_detail
/// GET    /meals/dashboard               -> meal_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/availability", get(report::availability))
        .route("/availability/details", get(report::availability_detail))
        .route("/meals", get(report::meals))
        .route("/meals/details", get(report::meal_detail))
        .route("/meals/dashboard", get(report::meal_dashboard))
}
