// handlers/portal/mod.rs - endpoints for any authenticated user
//
// Mounted under /portal behind `require_auth`.

pub mod branches;
pub mod users;
