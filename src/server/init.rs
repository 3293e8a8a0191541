/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: state creation, database loading, the heartbeat supervisor, and
 * route configuration.
 *
 * # Initialization Process
 *
 * 1. Load the optional database and pick the alarm store backing it
 * 2. Assemble `AppState` (registry, store, dispatcher)
 * 3. Spawn the alarm heartbeat supervisor
 * 4. Create and configure the router
 */
use std::sync::Arc;

use axum::Router;

use crate::alarm::store::{AlarmStore, MemoryAlarmStore, PgAlarmStore};
use crate::alarm::supervisor::spawn_heartbeat;
use crate::routes::router::create_router;
use crate::server::config::{keepalive_interval, load_database};
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// Resilient by design: a missing database downgrades alarms to the
/// in-memory store instead of refusing to start, so a local run needs no
/// infrastructure.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing xfsocial backend server");

    // Step 1: database and the alarm store on top of it
    let db_pool = load_database().await;

    let alarm_store: Arc<dyn AlarmStore> = match &db_pool {
        Some(pool) => Arc::new(PgAlarmStore::new(pool.clone())),
        None => {
            tracing::warn!("Using in-memory alarm store; alarms will not survive a restart");
            Arc::new(MemoryAlarmStore::new())
        }
    };

    // Step 2: shared state (registry + dispatcher are built inside)
    let app_state = AppState::new(db_pool, alarm_store);

    tracing::info!("Connection registry and alarm dispatcher initialized");

    // Step 3: keep-alive sweep over every registered channel
    spawn_heartbeat(app_state.registry.clone(), keepalive_interval());

    // Step 4: router with all routes and middleware
    create_router(app_state)
}
