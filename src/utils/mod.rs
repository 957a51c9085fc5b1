//! Utility functions and helpers
//!
//! Platform paths and logging setup shared by the library and the binary.

pub mod app_paths;
pub mod logging;
