// src/strategy/traits.rs

use crate::error::PlannerError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

/// The four monthly allocation heuristics, in declaration order. The
/// comparator breaks cost ties by this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Chase,
    Level,
    SubcontractHeavy,
    Hybrid,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Chase,
        Strategy::Level,
        Strategy::SubcontractHeavy,
        Strategy::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Chase => "chase",
            Strategy::Level => "level",
            Strategy::SubcontractHeavy => "subcontract-heavy",
            Strategy::Hybrid => "hybrid",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Chase => "Chase",
            Strategy::Level => "Level",
            Strategy::SubcontractHeavy => "Subcontract-Heavy",
            Strategy::Hybrid => "Hybrid",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Strategy {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "chase" => Ok(Strategy::Chase),
            "level" => Ok(Strategy::Level),
            "subcontract-heavy" | "subcontract" => Ok(Strategy::SubcontractHeavy),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(PlannerError::config(format!("unknown strategy: {}", other))),
        }
    }
}

/// What a policy sees for a single month.
#[derive(Debug, Clone, Copy)]
pub struct MonthContext {
    pub demand: f64,
    /// Standard capacity for the month.
    pub base_capacity: f64,
    /// Hard overtime ceiling for the month.
    pub max_overtime: f64,
    pub production_weeks: u32,
}

/// Units a policy assigns to each source before inventory is settled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthDecision {
    pub standard: f64,
    pub overtime: f64,
    pub subcontract: f64,
}

/// Monthly allocation logic for one strategy.
///
/// Implementations receive the inventory carried in from the previous month
/// and return the production split. The engine settles ending inventory and
/// tops up any remaining deficit through subcontracting.
pub trait AllocationPolicy: Debug + Send + Sync {
    fn allocate_month(&mut self, ctx: &MonthContext, inventory: f64) -> MonthDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("Chase".parse::<Strategy>().unwrap(), Strategy::Chase);
        assert_eq!(
            "subcontract_heavy".parse::<Strategy>().unwrap(),
            Strategy::SubcontractHeavy
        );
        assert_eq!(" HYBRID ".parse::<Strategy>().unwrap(), Strategy::Hybrid);
        assert!("optimal".parse::<Strategy>().is_err());
    }

    #[test]
    fn round_trips_through_as_str() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse::<Strategy>().unwrap(), strategy);
        }
    }
}
