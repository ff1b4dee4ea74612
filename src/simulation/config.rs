// src/simulation/config.rs

use crate::error::{PlannerError, PlannerResult};
use crate::io::demand::Scenario;
use crate::model::case::CaseParameters;
use crate::strategy::implementations::HybridPolicy;
use crate::strategy::traits::Strategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HOLDING_COST_RANGE: (f64, f64) = (0.05, 0.50);
pub const OVERTIME_MULTIPLIER_RANGE: (f64, f64) = (1.0, 3.0);
pub const SUBCONTRACT_MULTIPLIER_RANGE: (f64, f64) = (1.0, 2.0);

/// Seed used for the volatile scenario unless another is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Options for one planning run. Cost fields left as `None` fall back to the
/// case's parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub scenario: Scenario,
    pub strategy: Strategy,
    pub seed: Option<u64>,
    pub holding_cost_rate: Option<f64>,
    pub overtime_multiplier: Option<f64>,
    pub subcontract_multiplier: Option<f64>,
    pub include_sunday_overtime: bool,
    pub hybrid_overtime_share: f64,
    pub opening_inventory: Option<f64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scenario: Scenario::Base,
            strategy: Strategy::Chase,
            seed: Some(DEFAULT_SEED),
            holding_cost_rate: None,
            overtime_multiplier: None,
            subcontract_multiplier: None,
            include_sunday_overtime: false,
            hybrid_overtime_share: HybridPolicy::DEFAULT_OVERTIME_SHARE,
            opening_inventory: None,
        }
    }
}

/// Cost inputs of the evaluator, relative to a standard unit cost of 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    pub holding_cost_rate: f64,
    pub overtime_multiplier: f64,
    pub subcontract_multiplier: f64,
}

impl CostParams {
    pub fn from_case(case: &CaseParameters) -> Self {
        Self {
            holding_cost_rate: case.holding_cost_rate,
            overtime_multiplier: case.overtime_multiplier,
            subcontract_multiplier: case.subcontract_multiplier,
        }
    }
}

/// Capacity inputs of the allocation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationParams {
    pub production_weeks: Vec<u32>,
    pub weekly_base_capacity: f64,
    /// Overtime ceiling per production week, Sunday addend included.
    pub weekly_overtime_limit: f64,
    pub opening_inventory: f64,
    pub hybrid_overtime_share: f64,
}

impl PlannerConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> PlannerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: PlannerConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        check_range("holding cost rate", self.holding_cost_rate, HOLDING_COST_RANGE)?;
        check_range(
            "overtime multiplier",
            self.overtime_multiplier,
            OVERTIME_MULTIPLIER_RANGE,
        )?;
        check_range(
            "subcontract multiplier",
            self.subcontract_multiplier,
            SUBCONTRACT_MULTIPLIER_RANGE,
        )?;
        check_range(
            "hybrid overtime share",
            Some(self.hybrid_overtime_share),
            (0.0, 1.0),
        )?;
        if let Some(opening) = self.opening_inventory {
            if !opening.is_finite() || opening < 0.0 {
                return Err(PlannerError::config(format!(
                    "opening inventory must be non-negative, got {}",
                    opening
                )));
            }
        }
        Ok(())
    }

    pub fn cost_params(&self, case: &CaseParameters) -> CostParams {
        let defaults = CostParams::from_case(case);
        CostParams {
            holding_cost_rate: self.holding_cost_rate.unwrap_or(defaults.holding_cost_rate),
            overtime_multiplier: self
                .overtime_multiplier
                .unwrap_or(defaults.overtime_multiplier),
            subcontract_multiplier: self
                .subcontract_multiplier
                .unwrap_or(defaults.subcontract_multiplier),
        }
    }

    pub fn allocation_params(&self, case: &CaseParameters) -> AllocationParams {
        AllocationParams {
            production_weeks: case.production_weeks(),
            weekly_base_capacity: case.weekly_base_capacity,
            weekly_overtime_limit: case.effective_overtime_limit(self.include_sunday_overtime),
            opening_inventory: self.opening_inventory.unwrap_or(case.opening_inventory),
            hybrid_overtime_share: self.hybrid_overtime_share,
        }
    }

    /// Applies command-line flags in order on top of `self`, returning the
    /// input and output paths alongside. `--config` replaces everything set
    /// before it, so it belongs first.
    pub fn apply_args<I>(&mut self, args: I) -> PlannerResult<RunOptions>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = RunOptions::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            if flag == "--sunday" {
                self.include_sunday_overtime = true;
                continue;
            }
            if flag == "--no-sunday" {
                self.include_sunday_overtime = false;
                continue;
            }

            let value = args
                .next()
                .ok_or_else(|| PlannerError::config(format!("missing value for {}", flag)))?;

            match flag.as_str() {
                "--scenario" => self.scenario = value.parse()?,
                "--strategy" => self.strategy = value.parse()?,
                "--seed" => self.seed = Some(parse_number(&flag, &value)?),
                "--holding-cost" => self.holding_cost_rate = Some(parse_number(&flag, &value)?),
                "--overtime-mult" => self.overtime_multiplier = Some(parse_number(&flag, &value)?),
                "--subcontract-mult" => {
                    self.subcontract_multiplier = Some(parse_number(&flag, &value)?)
                }
                "--hybrid-share" => self.hybrid_overtime_share = parse_number(&flag, &value)?,
                "--opening-inventory" => {
                    self.opening_inventory = Some(parse_number(&flag, &value)?)
                }
                "--config" => *self = PlannerConfig::from_json_file(&value)?,
                "--case" => options.case_path = Some(PathBuf::from(value)),
                "--case-params" => options.case_params_path = Some(PathBuf::from(value)),
                "--out" => options.plan_out = Some(PathBuf::from(value)),
                "--ranking-out" => options.ranking_out = Some(PathBuf::from(value)),
                other => {
                    return Err(PlannerError::config(format!("unknown option: {}", other)));
                }
            }
        }

        if options.case_params_path.is_some() && options.case_path.is_none() {
            return Err(PlannerError::config("--case-params requires --case"));
        }
        Ok(options)
    }
}

/// Paths picked up from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub case_path: Option<PathBuf>,
    /// Parameter table for a CSV volume table.
    pub case_params_path: Option<PathBuf>,
    pub plan_out: Option<PathBuf>,
    pub ranking_out: Option<PathBuf>,
}

fn check_range(name: &str, value: Option<f64>, (min, max): (f64, f64)) -> PlannerResult<()> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(PlannerError::config(format!(
            "{} {} outside [{}, {}]",
            name, v, min, max
        ))),
        _ => Ok(()),
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> PlannerResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PlannerError::config(format!("{} expects a number, got '{}'", flag, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::case::default_case;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_are_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.hybrid_overtime_share, 0.5);
    }

    #[test]
    fn out_of_range_options_are_rejected() {
        let config = PlannerConfig {
            holding_cost_rate: Some(0.6),
            ..PlannerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlannerError::Configuration(_))
        ));

        let config = PlannerConfig {
            subcontract_multiplier: Some(2.5),
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PlannerConfig {
            overtime_multiplier: Some(3.0),
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cost_params_fall_back_to_case_table() {
        let config = PlannerConfig {
            overtime_multiplier: Some(2.0),
            ..PlannerConfig::default()
        };
        let cost = config.cost_params(default_case());
        assert_eq!(cost.overtime_multiplier, 2.0);
        assert_eq!(cost.subcontract_multiplier, 1.25);
        assert_eq!(cost.holding_cost_rate, 0.20);
    }

    #[test]
    fn sunday_flag_flows_into_allocation_params() {
        let config = PlannerConfig {
            include_sunday_overtime: true,
            ..PlannerConfig::default()
        };
        let params = config.allocation_params(default_case());
        assert_eq!(params.weekly_overtime_limit, 7425.0 + 3300.0);
        assert_eq!(params.production_weeks.len(), 12);
    }

    #[test]
    fn command_line_flags_override_fields() {
        let mut config = PlannerConfig::default();
        let options = config
            .apply_args(args(&[
                "--scenario",
                "peak",
                "--strategy",
                "level",
                "--sunday",
                "--holding-cost",
                "0.3",
                "--out",
                "plan.csv",
            ]))
            .unwrap();
        assert_eq!(config.scenario, Scenario::Peak);
        assert_eq!(config.strategy, Strategy::Level);
        assert!(config.include_sunday_overtime);
        assert_eq!(config.holding_cost_rate, Some(0.3));
        assert_eq!(options.plan_out, Some(PathBuf::from("plan.csv")));
    }

    #[test]
    fn case_params_flag_needs_a_case() {
        let mut config = PlannerConfig::default();
        let options = config
            .apply_args(args(&[
                "--case",
                "volume.csv",
                "--case-params",
                "params.csv",
            ]))
            .unwrap();
        assert_eq!(options.case_path, Some(PathBuf::from("volume.csv")));
        assert_eq!(options.case_params_path, Some(PathBuf::from("params.csv")));

        assert!(matches!(
            config.apply_args(args(&["--case-params", "params.csv"])),
            Err(PlannerError::Configuration(_))
        ));
    }

    #[test]
    fn unknown_or_incomplete_flags_fail() {
        let mut config = PlannerConfig::default();
        assert!(config.apply_args(args(&["--bogus", "1"])).is_err());
        assert!(config.apply_args(args(&["--seed"])).is_err());
        assert!(config.apply_args(args(&["--seed", "abc"])).is_err());
    }

    #[test]
    fn reads_partial_json_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "scenario": "volatile", "strategy": "subcontract-heavy", "seed": 7 }}"#
        )
        .unwrap();

        let config = PlannerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.scenario, Scenario::Volatile);
        assert_eq!(config.strategy, Strategy::SubcontractHeavy);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.hybrid_overtime_share, 0.5);
    }
}
