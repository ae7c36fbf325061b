//! Keyset (cursor) pagination over a numeric order column.
//!
//! Callers page backwards through time by passing the smallest order value
//! of the previous page as `last` with `direction=next`.

pub mod keyset;
pub mod types;

pub use keyset::{contains_pattern, keyset_query};
pub use types::*;
