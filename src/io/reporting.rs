// src/io/reporting.rs

use crate::error::PlannerResult;
use crate::model::plan::AnnualResult;
use crate::simulation::comparator::StrategyRanking;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One exported row of the monthly plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Demand")]
    pub demand: f64,
    #[serde(rename = "Capacity")]
    pub capacity: f64,
    #[serde(rename = "Gap")]
    pub gap: f64,
    #[serde(rename = "Overtime")]
    pub overtime: f64,
    #[serde(rename = "Subcontract")]
    pub subcontract: f64,
    #[serde(rename = "Inventory")]
    pub inventory: f64,
    /// How the month's gap was closed.
    #[serde(rename = "Strategy")]
    pub action: &'static str,
    #[serde(rename = "Cost")]
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize)]
struct RankingRow {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Strategy")]
    strategy: &'static str,
    #[serde(rename = "TotalCost")]
    total_cost: f64,
    #[serde(rename = "MaxInventory")]
    max_inventory: f64,
    #[serde(rename = "TotalOvertime")]
    total_overtime: f64,
    #[serde(rename = "TotalSubcontract")]
    total_subcontract: f64,
}

/// Flattens a result into export rows. Months without a label fall back to `M<n>`.
pub fn plan_rows(result: &AnnualResult, month_labels: &[String]) -> Vec<PlanRow> {
    result
        .months
        .iter()
        .zip(result.monthly_costs.iter())
        .map(|(m, &cost)| PlanRow {
            month: month_labels
                .get(m.month_index)
                .cloned()
                .unwrap_or_else(|| format!("M{}", m.month_index + 1)),
            demand: m.demand,
            capacity: m.capacity,
            gap: m.capacity_gap(),
            overtime: m.overtime_units,
            subcontract: m.subcontract_units,
            inventory: m.ending_inventory,
            action: m.action().label(),
            cost,
        })
        .collect()
}

pub fn write_plan<W: Write>(
    writer: W,
    result: &AnnualResult,
    month_labels: &[String],
) -> PlannerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in plan_rows(result, month_labels) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the monthly plan to a CSV file.
pub fn write_plan_csv(
    file_path: impl AsRef<Path>,
    result: &AnnualResult,
    month_labels: &[String],
) -> PlannerResult<()> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    write_plan(file, result, month_labels)?;
    info!(
        rows = result.months.len(),
        path = %path.display(),
        "plan exported"
    );
    Ok(())
}

pub fn write_ranking<W: Write>(writer: W, ranking: &[StrategyRanking]) -> PlannerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, entry) in ranking.iter().enumerate() {
        wtr.serialize(RankingRow {
            rank: i + 1,
            strategy: entry.strategy.display_name(),
            total_cost: entry.total_cost,
            max_inventory: entry.max_inventory,
            total_overtime: entry.total_overtime,
            total_subcontract: entry.total_subcontract,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the strategy ranking to a CSV file.
pub fn write_ranking_csv(
    file_path: impl AsRef<Path>,
    ranking: &[StrategyRanking],
) -> PlannerResult<()> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    write_ranking(file, ranking)?;
    info!(rows = ranking.len(), path = %path.display(), "ranking exported");
    Ok(())
}
