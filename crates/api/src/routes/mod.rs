pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod reports;
pub mod rooms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /bookings                                  list, create
/// /bookings/{id}                             get, update, delete
/// /bookings/{id}/status                      status transition (PUT)
/// /bookings/{id}/occupants                   occupants of a booking
/// /bookings/user/{user_id}                   bookings of a user
/// /bookings/occupants                        list, register
/// /bookings/occupants/{id}                   detail, remove
/// /bookings/occupants/{id}/status            check-in / check-out (PUT)
/// /bookings/occupants/{id}/meals             meal plan overwrite (PUT)
///
/// /rooms/available                           coarse availability listing
/// /rooms/search                              interactive search
///
/// /dashboard/stats                           daily figures
/// /dashboard/user-stats/{user_id}            daily figures for one user
///
/// /reports/availability[/details]            occupancy by day / by room
/// /reports/meals[/details|/dashboard]        meal counts and breakdowns
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bookings", bookings::router())
        .nest("/rooms", rooms::router())
        .nest("/dashboard", dashboard::router())
        .nest("/reports", reports::router())
}
