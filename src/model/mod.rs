pub mod case;
pub mod plan;
