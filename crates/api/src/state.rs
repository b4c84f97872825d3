use std::sync::Arc;

use staybook_core::clock::Clock;
use staybook_core::identity::IdentityVault;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: staybook_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Source of "now" and "today" at the property.
    pub clock: Arc<dyn Clock>,
    /// Encrypts identity documents before they are stored.
    pub vault: Arc<IdentityVault>,
}
