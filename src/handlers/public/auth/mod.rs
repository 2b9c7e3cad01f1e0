// handlers/public/auth/mod.rs - Public authentication endpoints
//
// Token acquisition only; everything else lives behind the session.

pub mod login;
pub mod register;

pub use login::login;
pub use register::register;
