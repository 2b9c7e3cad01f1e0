// handlers/public/mod.rs - Endpoints that work without a session

pub mod auth;
