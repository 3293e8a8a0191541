//! Server setup: initialization, configuration, and shared state
//!
//! - **`init`** - application assembly (`create_app`)
//! - **`config`** - environment-driven configuration loading
//! - **`state`** - `AppState` and Axum `FromRef` extraction

pub mod config;
pub mod init;
pub mod state;

pub use init::create_app;
pub use state::AppState;
