//! Route configuration
//!
//! - **`router`** - assembles the full application router
//! - **`api_routes`** - per-domain sub-routers

pub mod api_routes;
pub mod router;

pub use router::create_router;
