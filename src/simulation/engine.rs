// src/simulation/engine.rs

use crate::error::{PlannerError, PlannerResult};
use crate::io::demand;
use crate::model::case::CaseParameters;
use crate::model::plan::{AnnualResult, MonthlyPlan};
use crate::simulation::config::{AllocationParams, CostParams, PlannerConfig};
use crate::simulation::cost;
use crate::strategy::implementations::build_policy;
use crate::strategy::traits::{MonthContext, Strategy};
use tracing::{debug, info};

/// Runs one strategy over the demand series, January to December.
///
/// Inventory is the only state carried between months. Whatever the policy
/// leaves uncovered is topped up through subcontracting, so every month ends
/// with non-negative inventory and demand fully met.
pub fn allocate(
    demand: &[f64],
    params: &AllocationParams,
    strategy: Strategy,
) -> PlannerResult<Vec<MonthlyPlan>> {
    if demand.len() != params.production_weeks.len() {
        return Err(PlannerError::config(format!(
            "demand covers {} months but production weeks cover {}",
            demand.len(),
            params.production_weeks.len()
        )));
    }
    if params.opening_inventory < 0.0 {
        return Err(PlannerError::config("opening inventory must be non-negative"));
    }

    let mut policy = build_policy(
        strategy,
        demand,
        &params.production_weeks,
        params.hybrid_overtime_share,
    )?;

    let mut inventory = params.opening_inventory;
    let mut months = Vec::with_capacity(demand.len());

    for (month_index, (&month_demand, &weeks)) in
        demand.iter().zip(params.production_weeks.iter()).enumerate()
    {
        let weeks_f = f64::from(weeks);
        let ctx = MonthContext {
            demand: month_demand,
            base_capacity: weeks_f * params.weekly_base_capacity,
            max_overtime: (weeks_f * params.weekly_overtime_limit).max(0.0),
            production_weeks: weeks,
        };

        let decision = policy.allocate_month(&ctx, inventory);
        let opening = inventory;

        let standard = decision.standard.max(0.0);
        let overtime = decision.overtime.clamp(0.0, ctx.max_overtime);
        let mut subcontract = decision.subcontract.max(0.0);
        let mut ending = opening + standard + overtime + subcontract - month_demand;
        if ending < 0.0 {
            // Emergency top-up: demand is never backlogged.
            subcontract += -ending;
            ending = 0.0;
        }

        let plan = MonthlyPlan {
            month_index,
            demand: month_demand,
            capacity: ctx.base_capacity,
            overtime_limit: ctx.max_overtime,
            opening_inventory: opening,
            standard_units: standard,
            overtime_units: overtime,
            subcontract_units: subcontract,
            ending_inventory: ending,
        };

        debug!(
            strategy = strategy.as_str(),
            month = month_index + 1,
            demand = plan.demand,
            standard = plan.standard_units,
            overtime = plan.overtime_units,
            subcontract = plan.subcontract_units,
            inventory = plan.ending_inventory,
            "month allocated"
        );

        inventory = ending;
        months.push(plan);
    }

    Ok(months)
}

/// Allocates and costs a single strategy over an already adjusted demand series.
pub fn run_strategy(
    demand: &[f64],
    params: &AllocationParams,
    cost_params: &CostParams,
    strategy: Strategy,
) -> PlannerResult<AnnualResult> {
    let months = allocate(demand, params, strategy)?;
    let (monthly_costs, total_cost) = cost::evaluate(&months, cost_params);
    Ok(AnnualResult {
        strategy,
        months,
        monthly_costs,
        total_cost,
    })
}

/// Demand series for the configured scenario.
pub fn scenario_demand(case: &CaseParameters, config: &PlannerConfig) -> Vec<f64> {
    demand::adjust(&case.base_demand(), config.scenario, config.seed)
}

/// Full pipeline for one interaction: validate, adjust demand, allocate with
/// the configured strategy and cost the result.
pub fn simulate(case: &CaseParameters, config: &PlannerConfig) -> PlannerResult<AnnualResult> {
    let demand = scenario_demand(case, config);
    simulate_with_demand(case, config, &demand)
}

/// Same as [`simulate`] over a demand series drawn beforehand, so a report and
/// a ranking can share one volatile draw.
pub fn simulate_with_demand(
    case: &CaseParameters,
    config: &PlannerConfig,
    demand: &[f64],
) -> PlannerResult<AnnualResult> {
    case.validate()?;
    config.validate()?;

    let params = config.allocation_params(case);
    let cost_params = config.cost_params(case);

    let result = run_strategy(demand, &params, &cost_params, config.strategy)?;
    info!(
        scenario = config.scenario.as_str(),
        strategy = config.strategy.as_str(),
        total_cost = result.total_cost,
        "simulation complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::case::default_case;

    const TOL: f64 = 1e-6;

    fn base_params() -> AllocationParams {
        PlannerConfig::default().allocation_params(default_case())
    }

    #[test]
    fn chase_january_breakdown() {
        let demand = default_case().base_demand();
        let months = allocate(&demand, &base_params(), Strategy::Chase).unwrap();
        let jan = &months[0];
        assert_eq!(jan.capacity, 66000.0);
        assert_eq!(jan.standard_units, 66000.0);
        assert_eq!(jan.overtime_units, 5520.0);
        assert_eq!(jan.subcontract_units, 0.0);
        assert_eq!(jan.ending_inventory, 0.0);
    }

    #[test]
    fn chase_builds_inventory_in_slack_months() {
        let demand = default_case().base_demand();
        let months = allocate(&demand, &base_params(), Strategy::Chase).unwrap();
        // June: 4 weeks * 16_500 = 66_000 against 60_000 demand.
        assert_eq!(months[5].ending_inventory, 6000.0);
        // July opens with that surplus: 49_500 + 6_000 leaves 4_500 for overtime.
        assert_eq!(months[6].opening_inventory, 6000.0);
        assert_eq!(months[6].overtime_units, 4500.0);
    }

    #[test]
    fn every_strategy_balances_and_respects_ceiling() {
        let demand = default_case().base_demand();
        let params = base_params();
        for strategy in Strategy::ALL {
            let months = allocate(&demand, &params, strategy).unwrap();
            assert_eq!(months.len(), 12);
            for m in &months {
                assert!(m.balance_error().abs() < TOL, "{:?} month {}", strategy, m.month_index);
                assert!(m.overtime_units <= m.overtime_limit + TOL);
                assert!(m.standard_units >= 0.0);
                assert!(m.overtime_units >= 0.0);
                assert!(m.subcontract_units >= 0.0);
                assert!(m.ending_inventory >= 0.0);
            }
            for pair in months.windows(2) {
                assert_eq!(pair[1].opening_inventory, pair[0].ending_inventory);
            }
        }
    }

    #[test]
    fn level_tops_up_deficits_with_subcontract() {
        let demand = default_case().base_demand();
        let months = allocate(&demand, &base_params(), Strategy::Level).unwrap();
        let rate = 908_110.0 / 47.0;

        // January target exceeds standard capacity; the excess runs on overtime
        // and the surplus over demand is stocked.
        let jan = &months[0];
        assert_eq!(jan.standard_units, 66000.0);
        assert!((jan.overtime_units - (rate * 4.0 - 66000.0)).abs() < TOL);
        assert_eq!(jan.subcontract_units, 0.0);
        assert!((jan.ending_inventory - (rate * 4.0 - 71520.0)).abs() < TOL);

        // February's level output plus stock falls short of demand, so the
        // deficit is subcontracted and inventory resets.
        let feb = &months[1];
        assert!((feb.subcontract_units - (146_960.0 - rate * 7.0)).abs() < TOL);
        assert_eq!(feb.ending_inventory, 0.0);
    }

    #[test]
    fn subcontract_heavy_uses_no_overtime() {
        let demand = default_case().base_demand();
        let months = allocate(&demand, &base_params(), Strategy::SubcontractHeavy).unwrap();
        assert!(months.iter().all(|m| m.overtime_units == 0.0));
        assert_eq!(months[0].subcontract_units, 5520.0);
    }

    #[test]
    fn mismatched_lengths_are_a_configuration_error() {
        let err = allocate(&[1.0, 2.0], &base_params(), Strategy::Chase).unwrap_err();
        assert!(matches!(err, PlannerError::Configuration(_)));
    }

    #[test]
    fn zero_weeks_fail_only_for_level() {
        let params = AllocationParams {
            production_weeks: vec![0; 12],
            ..base_params()
        };
        let demand = vec![100.0; 12];
        assert!(allocate(&demand, &params, Strategy::Level).is_err());
        let chase = allocate(&demand, &params, Strategy::Chase).unwrap();
        assert!(chase.iter().all(|m| m.subcontract_units == 100.0));
    }

    #[test]
    fn opening_inventory_is_consumed_first() {
        let params = AllocationParams {
            opening_inventory: 5520.0,
            ..base_params()
        };
        let demand = default_case().base_demand();
        let months = allocate(&demand, &params, Strategy::Chase).unwrap();
        assert_eq!(months[0].overtime_units, 0.0);
        assert_eq!(months[0].ending_inventory, 0.0);
    }

    #[test]
    fn simulate_is_deterministic_for_seeded_volatility() {
        let config = PlannerConfig {
            scenario: crate::io::demand::Scenario::Volatile,
            strategy: Strategy::Hybrid,
            ..PlannerConfig::default()
        };
        let a = simulate(default_case(), &config).unwrap();
        let b = simulate(default_case(), &config).unwrap();
        assert_eq!(a, b);
    }
}
