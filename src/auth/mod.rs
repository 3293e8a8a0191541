//! Authentication and user management
//!
//! - **`users`** - user model and database operations
//! - **`sessions`** - JWT token creation and verification
//! - **`handlers`** - join/login endpoints

pub mod handlers;
pub mod sessions;
pub mod users;

pub use users::User;
