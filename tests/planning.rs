use production_planner::io::demand::{adjust, Scenario};
use production_planner::simulation::comparator::{
    compare_all, compare_for_config, compare_with_demand,
};
use production_planner::simulation::config::{AllocationParams, CostParams, PlannerConfig};
use production_planner::simulation::cost::evaluate;
use production_planner::simulation::engine::{
    allocate, scenario_demand, simulate, simulate_with_demand,
};
use production_planner::{default_case, logging, PlannerError, Strategy};

const TOL: f64 = 1e-6;

fn case_params(include_sunday: bool) -> AllocationParams {
    let config = PlannerConfig {
        include_sunday_overtime: include_sunday,
        ..PlannerConfig::default()
    };
    config.allocation_params(default_case())
}

#[test]
fn january_chase_breakdown_matches_case() {
    logging::init_test();
    let demand = vec![
        71520.0, 75440.0, 93500.0, 78400.0, 85750.0, 60000.0, 60000.0, 75000.0, 62000.0, 82500.0,
        68000.0, 96000.0,
    ];
    let params = AllocationParams {
        production_weeks: vec![4, 3, 4, 4, 5, 4, 3, 3, 4, 5, 4, 4],
        weekly_base_capacity: 16500.0,
        weekly_overtime_limit: 7425.0,
        opening_inventory: 0.0,
        hybrid_overtime_share: 0.5,
    };
    let months = allocate(&demand, &params, Strategy::Chase).unwrap();
    let jan = &months[0];
    assert_eq!(jan.capacity, 66000.0);
    assert_eq!(jan.overtime_units, 5520.0);
    assert_eq!(jan.subcontract_units, 0.0);
    assert_eq!(jan.ending_inventory, 0.0);
}

#[test]
fn invariants_hold_for_every_scenario_strategy_and_sunday_setting() {
    logging::init_test();
    let base = default_case().base_demand();
    for scenario in [Scenario::Base, Scenario::Peak, Scenario::Slow, Scenario::Volatile] {
        let demand = adjust(&base, scenario, Some(42));
        for include_sunday in [false, true] {
            let params = case_params(include_sunday);
            for strategy in Strategy::ALL {
                let months = allocate(&demand, &params, strategy).unwrap();
                for (m, &weeks) in months.iter().zip(params.production_weeks.iter()) {
                    let ceiling = f64::from(weeks) * params.weekly_overtime_limit;
                    assert!(m.balance_error().abs() < TOL);
                    assert!(m.overtime_units <= ceiling + TOL);
                    assert!(m.standard_units >= 0.0);
                    assert!(m.overtime_units >= 0.0);
                    assert!(m.subcontract_units >= 0.0);
                    assert!(m.ending_inventory >= 0.0);
                }
            }
        }
    }
}

#[test]
fn sunday_overtime_reduces_subcontracting_for_chase() {
    let demand = adjust(&default_case().base_demand(), Scenario::Peak, None);
    let weekday = allocate(&demand, &case_params(false), Strategy::Chase).unwrap();
    let sunday = allocate(&demand, &case_params(true), Strategy::Chase).unwrap();
    let sub = |months: &[production_planner::MonthlyPlan]| -> f64 {
        months.iter().map(|m| m.subcontract_units).sum()
    };
    assert!(sub(&sunday) <= sub(&weekday));
}

#[test]
fn cost_is_monotone_in_multipliers() {
    let demand = adjust(&default_case().base_demand(), Scenario::Peak, None);
    let params = case_params(false);
    let low = CostParams {
        holding_cost_rate: 0.2,
        overtime_multiplier: 1.0,
        subcontract_multiplier: 1.0,
    };
    for strategy in Strategy::ALL {
        let months = allocate(&demand, &params, strategy).unwrap();
        let mut previous = evaluate(&months, &low).1;
        for step in 1..=4 {
            let raised = CostParams {
                overtime_multiplier: 1.0 + 0.5 * f64::from(step),
                subcontract_multiplier: 1.0 + 0.25 * f64::from(step),
                ..low
            };
            let total = evaluate(&months, &raised).1;
            assert!(total >= previous);
            previous = total;
        }
    }
}

#[test]
fn allocation_is_deterministic() {
    let demand = adjust(&default_case().base_demand(), Scenario::Volatile, Some(7));
    let params = case_params(false);
    for strategy in Strategy::ALL {
        let a = allocate(&demand, &params, strategy).unwrap();
        let b = allocate(&demand, &params, strategy).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn simulate_matches_manual_pipeline() {
    let config = PlannerConfig {
        scenario: Scenario::Slow,
        strategy: Strategy::Hybrid,
        ..PlannerConfig::default()
    };
    let result = simulate(default_case(), &config).unwrap();
    let demand = adjust(&default_case().base_demand(), Scenario::Slow, None);
    let months = allocate(&demand, &config.allocation_params(default_case()), Strategy::Hybrid)
        .unwrap();
    let (monthly, total) = evaluate(&months, &config.cost_params(default_case()));
    assert_eq!(result.months, months);
    assert_eq!(result.monthly_costs, monthly);
    assert_eq!(result.total_cost, total);
    assert_eq!(result.strategy_name(), "Hybrid");
}

#[test]
fn comparator_ranks_ascending_and_repeats() {
    for scenario in [Scenario::Base, Scenario::Peak, Scenario::Slow, Scenario::Volatile] {
        let config = PlannerConfig {
            scenario,
            ..PlannerConfig::default()
        };
        let first = compare_for_config(default_case(), &config).unwrap();
        let second = compare_for_config(default_case(), &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), Strategy::ALL.len());
        assert!(first.windows(2).all(|w| w[0].total_cost <= w[1].total_cost));
    }
}

#[test]
fn comparator_entries_agree_with_individual_runs() {
    let case = default_case();
    let config = PlannerConfig::default();
    let ranking = compare_for_config(case, &config).unwrap();
    for entry in &ranking {
        let result = simulate(
            case,
            &PlannerConfig {
                strategy: entry.strategy,
                ..config.clone()
            },
        )
        .unwrap();
        assert_eq!(entry.total_cost, result.total_cost);
        assert_eq!(entry.max_inventory, result.max_inventory());
        assert_eq!(entry.total_overtime, result.total_overtime());
        assert_eq!(entry.total_subcontract, result.total_subcontract());
    }
}

#[test]
fn level_with_no_production_weeks_is_a_configuration_error() {
    let params = AllocationParams {
        production_weeks: vec![0; 12],
        ..case_params(false)
    };
    let cost = CostParams::from_case(default_case());
    let err = compare_all(&default_case().base_demand(), &params, &cost).unwrap_err();
    assert!(matches!(err, PlannerError::Configuration(_)));
}

#[test]
fn invalid_case_blocks_simulation() {
    let mut case = default_case().clone();
    case.months[3].production_weeks = 0;
    let err = simulate(&case, &PlannerConfig::default()).unwrap_err();
    assert!(matches!(err, PlannerError::Configuration(_)));
}

#[test]
fn unseeded_volatile_report_and_ranking_share_one_draw() {
    logging::init_test();
    let case = default_case();
    for strategy in Strategy::ALL {
        let config = PlannerConfig {
            scenario: Scenario::Volatile,
            seed: None,
            strategy,
            ..PlannerConfig::default()
        };
        let demand = scenario_demand(case, &config);
        let result = simulate_with_demand(case, &config, &demand).unwrap();
        let ranking = compare_with_demand(case, &config, &demand).unwrap();

        let entry = ranking.iter().find(|r| r.strategy == strategy).unwrap();
        assert_eq!(entry.total_cost, result.total_cost);
        assert_eq!(result.total_demand(), demand.iter().sum::<f64>());
    }
}
