// handlers/public/mod.rs - endpoints reachable without a token
//
// `authenticated` is the exception: it lives here with the other account
// endpoints but is mounted behind `require_auth`.

pub mod auth;
pub mod base;

pub use auth::{authenticated, login, register};
pub use base::{base, health};
