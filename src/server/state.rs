/**
 * Application State Management
 *
 * This module defines the application state structure and the `FromRef`
 * implementations for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container:
 * - Optional PostgreSQL pool (the server runs without it, with in-memory
 *   alarms and no account persistence)
 * - The connection registry — the single piece of shared mutable state in
 *   the alarm core, cloned into the dispatcher, the subscription handler,
 *   and the heartbeat supervisor
 * - The alarm store and dispatcher, injected explicitly rather than
 *   reached through a module-level singleton, so tests can swap in doubles
 *
 * # Thread Safety
 *
 * Every field is cheaply cloneable and safe to share across handlers:
 * pools and registries are `Arc`-backed, the dispatcher holds clones of
 * both.
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::alarm::dispatcher::AlarmDispatcher;
use crate::alarm::registry::ConnectionRegistry;
use crate::alarm::store::AlarmStore;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is not configured; handlers that need
    /// the database answer 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Registry of live alarm push channels
    pub registry: ConnectionRegistry,

    /// Durable alarm store behind the injectable trait seam
    pub alarm_store: Arc<dyn AlarmStore>,

    /// Persist-then-push entry point used by the like/comment producers
    pub alarm_dispatcher: AlarmDispatcher,
}

impl AppState {
    /// Assemble the state from its injected parts.
    ///
    /// The dispatcher is built here so it shares the same registry the
    /// subscription endpoint and supervisor observe.
    pub fn new(db_pool: Option<PgPool>, alarm_store: Arc<dyn AlarmStore>) -> Self {
        let registry = ConnectionRegistry::new();
        let alarm_dispatcher = AlarmDispatcher::new(alarm_store.clone(), registry.clone());

        Self {
            db_pool,
            registry,
            alarm_store,
            alarm_dispatcher,
        }
    }
}

/// Allows handlers to extract the optional database pool directly
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allows handlers to extract the connection registry directly
impl FromRef<AppState> for ConnectionRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

/// Allows handlers to extract the alarm dispatcher directly
impl FromRef<AppState> for AlarmDispatcher {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.alarm_dispatcher.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::store::MemoryAlarmStore;

    #[test]
    fn test_dispatcher_shares_the_registry() {
        let state = AppState::new(None, Arc::new(MemoryAlarmStore::new()));

        // A channel registered through the state's registry is visible to
        // the dispatcher's snapshot path.
        let recipient = uuid::Uuid::new_v4();
        let _sub = state.registry.register(recipient);
        assert_eq!(state.registry.channels_for(recipient).len(), 1);
    }
}
