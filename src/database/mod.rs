pub mod manager;
pub mod migration;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod stamp;

pub use manager::{Database, DatabaseError};
pub use query_builder::{Fields, Param, SqlQuery};
pub use stamp::Stamp;
