//! Auth HTTP handlers (join, login) and their request/response types

pub mod join;
pub mod login;
pub mod types;

pub use join::join;
pub use login::login;
