pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod dates;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod reports;
pub mod server;
pub mod services;
pub mod types;
