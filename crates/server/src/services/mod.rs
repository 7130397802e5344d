//! Business logic on top of the repositories.

pub mod auth;
pub mod orders;
pub mod token;
