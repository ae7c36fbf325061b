// handlers/mod.rs - request handlers grouped by access tier
//
// Public (no token) → Portal (any valid token) → Admin (admin token).
// Every handler answers with an `Envelope`; failures never escape as bare
// HTTP errors.

pub mod admin;
pub mod portal;
pub mod public;
pub mod utils;
