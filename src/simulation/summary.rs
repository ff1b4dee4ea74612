// src/simulation/summary.rs

use crate::model::case::CaseParameters;
use crate::model::plan::{AnnualResult, MonthAction};
use serde::Serialize;
use tracing::warn;

/// Headline figures of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub total_demand: f64,
    pub total_capacity: f64,
    /// Sum of the months where demand exceeds standard capacity.
    pub capacity_shortfall: f64,
    pub total_overtime: f64,
    pub total_subcontract: f64,
    pub total_cost: f64,
    pub cost_per_unit: f64,
    pub peak_inventory: f64,
    /// Months whose ending inventory exceeds the warehouse. Reported only.
    pub warehouse_breaches: Vec<String>,
    /// Months per action label, in label order, omitting labels that never occur.
    pub action_counts: Vec<(MonthAction, usize)>,
}

pub fn summarize(result: &AnnualResult, case: &CaseParameters) -> PlanSummary {
    let total_demand = result.total_demand();
    let total_capacity = result.months.iter().map(|m| m.capacity).sum();
    let capacity_shortfall = result
        .months
        .iter()
        .map(|m| m.capacity_gap())
        .filter(|gap| *gap > 0.0)
        .sum();

    let labels = case.month_labels();
    let mut warehouse_breaches = Vec::new();
    for month in &result.months {
        if month.ending_inventory > case.warehouse_capacity {
            let label = labels
                .get(month.month_index)
                .cloned()
                .unwrap_or_else(|| format!("M{}", month.month_index + 1));
            warn!(
                month = label.as_str(),
                inventory = month.ending_inventory,
                warehouse_capacity = case.warehouse_capacity,
                "inventory exceeds warehouse capacity"
            );
            warehouse_breaches.push(label);
        }
    }

    let action_counts = MonthAction::ALL
        .iter()
        .map(|&action| {
            let count = result.months.iter().filter(|m| m.action() == action).count();
            (action, count)
        })
        .filter(|&(_, count)| count > 0)
        .collect();

    let cost_per_unit = if total_demand > 0.0 {
        result.total_cost / total_demand
    } else {
        0.0
    };

    PlanSummary {
        total_demand,
        total_capacity,
        capacity_shortfall,
        total_overtime: result.total_overtime(),
        total_subcontract: result.total_subcontract(),
        total_cost: result.total_cost,
        cost_per_unit,
        peak_inventory: result.max_inventory(),
        warehouse_breaches,
        action_counts,
    }
}
