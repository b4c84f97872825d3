//! Route definitions for the `/bookings` resource.
//!
//! Also nests occupant routes under `/bookings/occupants`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{booking, occupant};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                              -> list (filter, date, search, user_id)
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// PUT    /{id}/status                   -> update_status
/// GET    /{id}/occupants                -> list_occupants
/// GET    /user/{user_id}                -> list_by_user
///
/// GET    /occupants                     -> list
/// POST   /occupants                     -> register
/// GET    /occupants/{id}                -> get_by_id
/// DELETE /occupants/{id}                -> delete
/// PUT    /occupants/{id}/status         -> update_status
/// PUT    /occupants/{id}/meals          -> update_meals
/// ```
pub fn router() -> Router<AppState> {
    let occupant_routes = Router::new()
        .route("/", get(occupant::list).post(occupant::register))
        .route("/{id}", get(occupant::get_by_id).delete(occupant::delete))
        .route("/{id}/status", put(occupant::update_status))
        .route("/{id}/meals", put(occupant::update_meals));

    Router::new()
        .route("/", get(booking::list).post(booking::create))
        .route(
            "/{id}",
            get(booking::get_by_id)
                .put(booking::update)
                .delete(booking::delete),
        )
        .route("/{id}/status", put(booking::update_status))
        .route("/{id}/occupants", get(booking::list_occupants))
        .route("/user/{user_id}", get(booking::list_by_user))
        .nest("/occupants", occupant_routes)
}
