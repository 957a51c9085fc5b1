pub mod api_client;
pub mod args;
pub mod cache;
pub mod config;
pub mod display;
pub mod history;
pub mod smoke;
pub mod utils;
