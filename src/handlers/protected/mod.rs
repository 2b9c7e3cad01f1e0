// handlers/protected/mod.rs - Session-required handlers (/api/*)
//
// The session middleware runs before everything here, so AuthUser is
// always present in request extensions.

pub mod accounts;
pub mod auth;
pub mod classes;
pub mod members;
pub mod quarters;
pub mod reports;
pub mod weekly;
