// src/model/case.rs

use crate::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MONTHS_PER_YEAR: usize = 12;

/// Overtime ceiling per production week as a share of weekly capacity,
/// used when the parameter table does not state one.
pub const DEFAULT_OVERTIME_SHARE: f64 = 0.45;

/// Sunday shifts add one working day on top of a five-day week.
pub const SUNDAY_SHIFT_DAYS: f64 = 1.0 / 5.0;

/// One row of the volume planning table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: String,
    pub production_weeks: u32,
    pub sales_weeks: u32,
    pub avg_weekly_demand: f64,
    pub total_demand: f64,
}

/// Weekly average demand split by product family. Display data only; the
/// allocator never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMix {
    pub month: String,
    pub consumer: f64,
    pub pc: f64,
    pub professional: f64,
}

impl ProductMix {
    pub fn total(&self) -> f64 {
        self.consumer + self.pc + self.professional
    }
}

/// Static inputs of the planning case. Built once and never mutated; every
/// planning run borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseParameters {
    pub months: Vec<MonthRecord>,
    pub weekly_base_capacity: f64,
    pub weekly_overtime_limit: f64,
    /// Extra overtime per production week unlocked by Sunday shifts.
    pub weekly_sunday_overtime: f64,
    pub holding_cost_rate: f64,
    pub overtime_multiplier: f64,
    pub subcontract_multiplier: f64,
    /// Soft ceiling, reported but not enforced.
    pub warehouse_capacity: f64,
    pub opening_inventory: f64,
    pub product_mix: Vec<ProductMix>,
}

impl CaseParameters {
    /// The OATY 3.0 volume plan for 2000 together with its cost assumptions.
    pub fn oaty_2000() -> Self {
        const LABELS: [&str; MONTHS_PER_YEAR] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        const PRODUCTION_WEEKS: [u32; MONTHS_PER_YEAR] = [4, 3, 4, 4, 5, 4, 3, 3, 4, 5, 4, 4];
        const SALES_WEEKS: [u32; MONTHS_PER_YEAR] = [4, 4, 5, 4, 5, 4, 4, 5, 4, 5, 4, 4];
        const AVG_WEEKLY: [f64; MONTHS_PER_YEAR] = [
            17880.0, 18860.0, 18700.0, 19600.0, 17150.0, 15000.0, 15000.0, 15000.0, 15500.0,
            16500.0, 17000.0, 24000.0,
        ];
        const TOTAL: [f64; MONTHS_PER_YEAR] = [
            71520.0, 75440.0, 93500.0, 78400.0, 85750.0, 60000.0, 60000.0, 75000.0, 62000.0,
            82500.0, 68000.0, 96000.0,
        ];
        const MIX: [(f64, f64, f64); MONTHS_PER_YEAR] = [
            (5960.0, 8940.0, 2980.0),
            (6090.0, 9550.0, 3220.0),
            (6030.0, 9510.0, 3160.0),
            (6540.0, 9770.0, 3290.0),
            (5800.0, 8450.0, 2900.0),
            (5000.0, 7500.0, 2500.0),
            (5000.0, 7500.0, 2500.0),
            (5000.0, 7500.0, 2500.0),
            (5000.0, 8000.0, 2500.0),
            (5500.0, 8200.0, 2800.0),
            (5600.0, 8500.0, 2900.0),
            (8000.0, 12000.0, 4000.0),
        ];

        let months = (0..MONTHS_PER_YEAR)
            .map(|i| MonthRecord {
                month: LABELS[i].to_string(),
                production_weeks: PRODUCTION_WEEKS[i],
                sales_weeks: SALES_WEEKS[i],
                avg_weekly_demand: AVG_WEEKLY[i],
                total_demand: TOTAL[i],
            })
            .collect();

        let product_mix = LABELS
            .iter()
            .zip(MIX.iter())
            .map(|(label, &(consumer, pc, professional))| ProductMix {
                month: label.to_string(),
                consumer,
                pc,
                professional,
            })
            .collect();

        let weekly_base_capacity = 16500.0;
        Self {
            months,
            weekly_base_capacity,
            weekly_overtime_limit: weekly_base_capacity * DEFAULT_OVERTIME_SHARE,
            weekly_sunday_overtime: weekly_base_capacity * SUNDAY_SHIFT_DAYS,
            holding_cost_rate: 0.20,
            overtime_multiplier: 1.50,
            subcontract_multiplier: 1.25,
            warehouse_capacity: 20000.0,
            opening_inventory: 0.0,
            product_mix,
        }
    }

    pub fn month_labels(&self) -> Vec<String> {
        self.months.iter().map(|m| m.month.clone()).collect()
    }

    pub fn base_demand(&self) -> Vec<f64> {
        self.months.iter().map(|m| m.total_demand).collect()
    }

    pub fn production_weeks(&self) -> Vec<u32> {
        self.months.iter().map(|m| m.production_weeks).collect()
    }

    /// Overtime ceiling per production week, with the Sunday addend when enabled.
    pub fn effective_overtime_limit(&self, include_sunday: bool) -> f64 {
        if include_sunday {
            self.weekly_overtime_limit + self.weekly_sunday_overtime
        } else {
            self.weekly_overtime_limit
        }
    }

    /// Rejects tables the allocator cannot run on.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.months.len() != MONTHS_PER_YEAR {
            return Err(PlannerError::config(format!(
                "expected {} monthly rows, found {}",
                MONTHS_PER_YEAR,
                self.months.len()
            )));
        }

        for record in &self.months {
            if record.production_weeks == 0 {
                return Err(PlannerError::config(format!(
                    "{}: production weeks must be positive",
                    record.month
                )));
            }
            if record.sales_weeks == 0 {
                return Err(PlannerError::config(format!(
                    "{}: sales weeks must be positive",
                    record.month
                )));
            }
            if !record.total_demand.is_finite() || record.total_demand < 0.0 {
                return Err(PlannerError::config(format!(
                    "{}: demand must be a non-negative number, got {}",
                    record.month, record.total_demand
                )));
            }
        }

        if !self.weekly_base_capacity.is_finite() || self.weekly_base_capacity <= 0.0 {
            return Err(PlannerError::config("weekly capacity must be positive"));
        }
        let non_negative = [
            ("weekly overtime limit", self.weekly_overtime_limit),
            ("weekly sunday overtime", self.weekly_sunday_overtime),
            ("holding cost rate", self.holding_cost_rate),
            ("overtime multiplier", self.overtime_multiplier),
            ("subcontract multiplier", self.subcontract_multiplier),
            ("opening inventory", self.opening_inventory),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PlannerError::config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

static DEFAULT_CASE: OnceLock<CaseParameters> = OnceLock::new();

/// The built-in case, constructed on first use and shared read-only afterwards.
pub fn default_case() -> &'static CaseParameters {
    DEFAULT_CASE.get_or_init(CaseParameters::oaty_2000)
}
