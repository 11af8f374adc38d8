//! Domain types shared by the Marquee proxy server and client.
//!
//! This crate has no internal dependencies so the favorites model, the
//! key-value persistence layer, and the display helpers can be used by both
//! the API layer and the interactive client.

pub mod display;
pub mod error;
pub mod favorites;
pub mod storage;
pub mod types;
