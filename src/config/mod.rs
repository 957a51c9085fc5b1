//! Configuration module
//!
//! Settings for the server endpoint, hits paging defaults, behavior
//! toggles, and display preferences.

pub mod config;
