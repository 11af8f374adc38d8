//! Marquee client: application state, proxy gateway, and presentation.
//!
//! [`controller::AppController`] owns all client state and is the only place
//! favorites are mutated. Presentation code reads it through [`view`] and
//! dispatches user intents parsed by [`command`].

pub mod command;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod gateway;
pub mod view;
