//! Request handlers.
//!
//! Handlers validate input, delegate to the upstream client held in
//! [`AppState`](crate::state::AppState), and map errors via
//! [`AppError`](crate::error::AppError).

pub mod tmdb;
