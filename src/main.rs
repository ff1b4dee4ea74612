use anyhow::Context;
use production_planner::io::{loader, reporting};
use production_planner::logging;
use production_planner::model::case::{default_case, CaseParameters};
use production_planner::simulation::comparator::compare_with_demand;
use production_planner::simulation::config::PlannerConfig;
use production_planner::simulation::cost::cost_breakdown;
use production_planner::simulation::engine::{scenario_demand, simulate_with_demand};
use production_planner::simulation::summary::summarize;
use production_planner::strategy::implementations::LevelPolicy;
use std::env;

fn main() -> anyhow::Result<()> {
    logging::init();

    // 1. CONFIGURATION
    let mut config = PlannerConfig::default();
    let options = config
        .apply_args(env::args().skip(1))
        .context("invalid command line")?;
    config.validate()?;

    // 2. CASE DATA
    let case: CaseParameters = match &options.case_path {
        Some(path) => {
            loader::load_case_with_parameters(path, options.case_params_path.as_deref())
                .with_context(|| format!("failed to load case from {}", path.display()))?
        }
        None => default_case().clone(),
    };
    let labels = case.month_labels();

    println!("=== Production Planning: OATY 3.0 / Mandexor Memory ===");
    println!(
        "Scenario: {} | Strategy: {} | Sunday overtime: {}",
        config.scenario,
        config.strategy,
        if config.include_sunday_overtime { "on" } else { "off" }
    );

    // 3. RUN THE SELECTED STRATEGY
    // One demand draw feeds both the plan and the ranking.
    let demand = scenario_demand(&case, &config);
    let result = simulate_with_demand(&case, &config, &demand)?;

    println!(
        "\n{:<5} {:>10} {:>10} {:>10} {:>10} {:>11} {:>10} {:>12}",
        "Month", "Demand", "Capacity", "Standard", "Overtime", "Subcontract", "Inventory", "Cost"
    );
    for (month, cost) in result.months.iter().zip(result.monthly_costs.iter()) {
        println!(
            "{:<5} {:>10.0} {:>10.0} {:>10.0} {:>10.0} {:>11.0} {:>10.0} {:>12.2}",
            labels.get(month.month_index).map(String::as_str).unwrap_or("?"),
            month.demand,
            month.capacity,
            month.standard_units,
            month.overtime_units,
            month.subcontract_units,
            month.ending_inventory,
            cost
        );
    }

    // 4. SUMMARY
    let summary = summarize(&result, &case);
    println!("\n=== Executive Summary ===");
    println!("Total Demand:        {:>14.0} units", summary.total_demand);
    println!("Capacity Shortfall:  {:>14.0} units", summary.capacity_shortfall);
    println!("Overtime Production: {:>14.0} units", summary.total_overtime);
    println!("Subcontracted:       {:>14.0} units", summary.total_subcontract);
    println!("Peak Inventory:      {:>14.0} units", summary.peak_inventory);
    println!("Total Cost:          {:>14.2}", summary.total_cost);
    println!("Cost per Unit:       {:>14.4}", summary.cost_per_unit);
    let actions: Vec<String> = summary
        .action_counts
        .iter()
        .map(|(action, count)| format!("{} {}", action.label(), count))
        .collect();
    println!("Month Actions:       {}", actions.join(", "));
    if !summary.warehouse_breaches.is_empty() {
        println!(
            "Warehouse capacity ({:.0}) exceeded in: {}",
            case.warehouse_capacity,
            summary.warehouse_breaches.join(", ")
        );
    }

    let level = LevelPolicy::from_series(&demand, &case.production_weeks())?;
    println!("Level Weekly Rate:   {:>14.0} units", level.level_rate());

    if !case.product_mix.is_empty() {
        println!("\n=== Product Mix (weekly average) ===");
        println!(
            "{:<5} {:>10} {:>10} {:>12} {:>10}",
            "Month", "Consumer", "PC", "Professional", "Total"
        );
        for mix in &case.product_mix {
            println!(
                "{:<5} {:>10.0} {:>10.0} {:>12.0} {:>10.0}",
                mix.month,
                mix.consumer,
                mix.pc,
                mix.professional,
                mix.total()
            );
        }
    }

    println!("\n=== Cost Breakdown ===");
    for (source, cost) in cost_breakdown(&result.months, &config.cost_params(&case)) {
        println!("{:<12} {:>14.2}", source, cost);
    }

    // 5. COMPARE ALL STRATEGIES
    let ranking = compare_with_demand(&case, &config, &demand)?;
    println!("\n=== Strategy Ranking ===");
    for (rank, entry) in ranking.iter().enumerate() {
        println!(
            "{}. {:<18} cost {:>14.2} | peak inv {:>8.0} | overtime {:>8.0} | subcontract {:>8.0}",
            rank + 1,
            entry.strategy.display_name(),
            entry.total_cost,
            entry.max_inventory,
            entry.total_overtime,
            entry.total_subcontract
        );
    }

    // 6. EXPORT
    if let Some(path) = &options.plan_out {
        reporting::write_plan_csv(path, &result, &labels)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nPlan written to {}", path.display());
    }
    if let Some(path) = &options.ranking_out {
        reporting::write_ranking_csv(path, &ranking)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Ranking written to {}", path.display());
    }

    Ok(())
}
