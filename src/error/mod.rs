//! API error types and HTTP response conversion
//!
//! - **`types`** - the `ApiError` enum and its status-code mapping
//! - **`conversion`** - `IntoResponse` impl producing JSON error bodies

pub mod conversion;
pub mod types;

pub use types::ApiError;
