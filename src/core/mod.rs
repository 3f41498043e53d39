pub mod config;
pub mod cost;
pub mod models;
