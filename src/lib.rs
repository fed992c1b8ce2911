pub mod api;
pub mod config;
pub mod matching;
pub mod models;
pub mod pricing;
pub mod render;
pub mod server;
pub mod workers;
