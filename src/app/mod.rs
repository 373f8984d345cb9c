//! Application module
//!
//! This module contains the session state and its configuration.

pub mod config;
mod state;

pub use config::Config;
pub use state::Session;
