// handlers/protected/auth/mod.rs - Session management for signed-in accounts

pub mod session;

pub use session::{change_password, logout, profile};
