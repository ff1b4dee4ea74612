pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use error::{PlannerError, PlannerResult};
pub use model::case::{default_case, CaseParameters};
pub use model::plan::{AnnualResult, MonthlyPlan};
pub use simulation::config::PlannerConfig;
pub use strategy::traits::Strategy;
