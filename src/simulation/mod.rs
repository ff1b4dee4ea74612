pub mod comparator;
pub mod config;
pub mod cost;
pub mod engine;
pub mod summary;
