pub mod demand;
pub mod loader;
pub mod reporting;
