// handlers/admin/mod.rs - endpoints for admin users
//
// Mounted under /admin behind `require_auth` and then `require_admin`.

pub mod branches;
