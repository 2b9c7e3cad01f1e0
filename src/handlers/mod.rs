// handlers/mod.rs - HTTP surface, split by security tier
//
// public/    - no session required (register, login)
// protected/ - valid session required; role layers guard mutations

pub mod protected;
pub mod public;
