//! Alarm Delivery Module
//!
//! Turns a like/comment event into a durable alarm record and pushes it, in
//! near-real-time, to every open connection of the affected user.
//!
//! # Architecture
//!
//! ```text
//! alarm/
//! ├── mod.rs          - Module exports
//! ├── model.rs        - AlarmRecord, AlarmType, AlarmArgs, AlarmPush
//! ├── store.rs        - Durable store trait + Postgres/in-memory impls
//! ├── registry.rs     - recipient -> open push channels
//! ├── dispatcher.rs   - persist-then-push operation
//! ├── supervisor.rs   - keep-alive sweep / dead-channel eviction
//! └── handlers/       - SSE subscription + paginated list endpoints
//! ```
//!
//! # Delivery model
//!
//! Producers call [`AlarmDispatcher::dispatch`], which appends to the store
//! and then pushes best-effort to the registry's snapshot of the
//! recipient's channels. The durable record is the source of truth; a
//! client that missed a push reconciles through the list endpoint. The
//! registry is single-process and in-memory — a multi-instance deployment
//! would need an external pub/sub layer feeding each instance's registry.
//!
//! Ordering: pushes on one channel arrive in dispatcher-arrival order;
//! nothing is guaranteed across channels or recipients.

pub mod dispatcher;
pub mod handlers;
pub mod model;
pub mod registry;
pub mod store;
pub mod supervisor;

pub use dispatcher::AlarmDispatcher;
pub use model::{AlarmArgs, AlarmPush, AlarmRecord, AlarmType};
pub use registry::{Channel, ChannelEvent, ConnectionRegistry, Subscription};
pub use store::{AlarmStore, AlarmStoreError, MemoryAlarmStore, PgAlarmStore};
pub use supervisor::{spawn_heartbeat, DEFAULT_KEEPALIVE_INTERVAL};
