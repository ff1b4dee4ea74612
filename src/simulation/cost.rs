// src/simulation/cost.rs

use crate::model::plan::MonthlyPlan;
use crate::simulation::config::CostParams;

/// Relative cost of one unit produced on standard time.
pub const STANDARD_UNIT_COST: f64 = 1.0;

/// Cost of a single month. Holding is charged at one twelfth of the annual
/// rate against the month's ending inventory.
pub fn monthly_cost(plan: &MonthlyPlan, cost: &CostParams) -> f64 {
    plan.standard_units * STANDARD_UNIT_COST
        + plan.overtime_units * cost.overtime_multiplier
        + plan.subcontract_units * cost.subcontract_multiplier
        + plan.ending_inventory * (cost.holding_cost_rate / 12.0)
}

/// Costs every month of a plan and returns the per-month costs with their sum.
pub fn evaluate(plan: &[MonthlyPlan], cost: &CostParams) -> (Vec<f64>, f64) {
    let monthly: Vec<f64> = plan.iter().map(|m| monthly_cost(m, cost)).collect();
    let total = monthly.iter().sum();
    (monthly, total)
}

/// Total cost split by source, in the order standard, overtime, subcontract, holding.
pub fn cost_breakdown(plan: &[MonthlyPlan], cost: &CostParams) -> Vec<(&'static str, f64)> {
    let standard: f64 = plan.iter().map(|m| m.standard_units).sum();
    let overtime: f64 = plan.iter().map(|m| m.overtime_units).sum();
    let subcontract: f64 = plan.iter().map(|m| m.subcontract_units).sum();
    let inventory: f64 = plan.iter().map(|m| m.ending_inventory).sum();

    vec![
        ("Standard", standard * STANDARD_UNIT_COST),
        ("Overtime", overtime * cost.overtime_multiplier),
        ("Subcontract", subcontract * cost.subcontract_multiplier),
        ("Holding", inventory * cost.holding_cost_rate / 12.0),
    ]
}
