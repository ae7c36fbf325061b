pub mod migrate;
pub mod statements;
