//! xfsocial - Main Library
//!
//! xfsocial is a social-posting backend built with Rust: user accounts,
//! posts, comments and likes over an Axum HTTP API, with real-time alarm
//! (notification) delivery over Server-Sent Events.
//!
//! # Overview
//!
//! This library provides:
//! - User registration and JWT-based login
//! - Post, comment, and like endpoints backed by PostgreSQL
//! - The alarm delivery subsystem: durable alarm records plus
//!   near-real-time push to every open connection of the affected user
//!
//! # Module Structure
//!
//! - **`alarm`** - alarm model, durable store, connection registry,
//!   dispatcher, heartbeat supervisor, and the subscribe/list endpoints
//! - **`post`** - posting domain and the like/comment alarm producers
//! - **`auth`** - users, sessions, join/login handlers
//! - **`middleware`** - JWT auth middleware and extractor
//! - **`error`** - API error taxonomy and response conversion
//! - **`server`** - state assembly, configuration, initialization
//! - **`routes`** - router configuration
//!
//! # Delivery model
//!
//! A like or comment first becomes a durable `AlarmRecord`, then is pushed
//! best-effort to the recipient's open SSE channels. The durable list at
//! `GET /api/v1/users/alarm` is the recovery path for anything missed
//! while offline; the registry is single-process by design.

pub mod alarm;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod post;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{create_app, AppState};
