// src/simulation/comparator.rs

use crate::error::PlannerResult;
use crate::model::case::CaseParameters;
use crate::model::plan::AnnualResult;
use crate::simulation::config::{AllocationParams, CostParams, PlannerConfig};
use crate::simulation::engine::{run_strategy, scenario_demand};
use crate::strategy::traits::Strategy;
use serde::Serialize;
use tracing::info;

/// One line of the strategy ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRanking {
    pub strategy: Strategy,
    pub total_cost: f64,
    pub max_inventory: f64,
    pub total_overtime: f64,
    pub total_subcontract: f64,
}

impl From<&AnnualResult> for StrategyRanking {
    fn from(result: &AnnualResult) -> Self {
        Self {
            strategy: result.strategy,
            total_cost: result.total_cost,
            max_inventory: result.max_inventory(),
            total_overtime: result.total_overtime(),
            total_subcontract: result.total_subcontract(),
        }
    }
}

/// Runs every strategy over the same demand and ranks them by ascending total
/// cost. Equal costs keep declaration order (Chase, Level, Subcontract-Heavy,
/// Hybrid) because the sort is stable.
pub fn compare_all(
    demand: &[f64],
    params: &AllocationParams,
    cost: &CostParams,
) -> PlannerResult<Vec<StrategyRanking>> {
    let mut ranking = Strategy::ALL
        .iter()
        .map(|&strategy| {
            run_strategy(demand, params, cost, strategy).map(|r| StrategyRanking::from(&r))
        })
        .collect::<PlannerResult<Vec<_>>>()?;

    ranking.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));

    if let Some(best) = ranking.first() {
        info!(
            best = best.strategy.as_str(),
            total_cost = best.total_cost,
            "strategies ranked"
        );
    }
    Ok(ranking)
}

/// Ranks all strategies for the case under the configured scenario and costs.
pub fn compare_for_config(
    case: &CaseParameters,
    config: &PlannerConfig,
) -> PlannerResult<Vec<StrategyRanking>> {
    let demand = scenario_demand(case, config);
    compare_with_demand(case, config, &demand)
}

/// Ranks all strategies over a demand series drawn beforehand.
pub fn compare_with_demand(
    case: &CaseParameters,
    config: &PlannerConfig,
    demand: &[f64],
) -> PlannerResult<Vec<StrategyRanking>> {
    case.validate()?;
    config.validate()?;
    compare_all(
        demand,
        &config.allocation_params(case),
        &config.cost_params(case),
    )
}
