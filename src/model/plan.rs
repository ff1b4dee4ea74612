// src/model/plan.rs

use crate::strategy::traits::Strategy;
use serde::Serialize;

/// One month of an allocation plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPlan {
    pub month_index: usize,
    pub demand: f64,
    /// Standard capacity: production weeks times weekly base capacity.
    pub capacity: f64,
    /// Overtime ceiling for the month.
    pub overtime_limit: f64,
    pub opening_inventory: f64,
    pub standard_units: f64,
    pub overtime_units: f64,
    pub subcontract_units: f64,
    pub ending_inventory: f64,
}

impl MonthlyPlan {
    pub fn total_supply(&self) -> f64 {
        self.standard_units + self.overtime_units + self.subcontract_units
    }

    /// Demand minus standard capacity; positive means a shortfall.
    pub fn capacity_gap(&self) -> f64 {
        self.demand - self.capacity
    }

    /// Difference between both sides of the material balance. Zero for a
    /// well-formed row, up to floating-point noise.
    pub fn balance_error(&self) -> f64 {
        (self.total_supply() + self.opening_inventory) - (self.demand + self.ending_inventory)
    }

    /// How the month's gap was closed.
    pub fn action(&self) -> MonthAction {
        if self.capacity_gap() <= 0.0 {
            MonthAction::InventoryBuild
        } else if self.subcontract_units > 0.0 && self.overtime_units > 0.0 {
            MonthAction::Mixed
        } else if self.subcontract_units > 0.0 {
            MonthAction::Subcontract
        } else if self.overtime_units > 0.0 {
            MonthAction::Overtime
        } else {
            MonthAction::InventoryDraw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthAction {
    InventoryBuild,
    InventoryDraw,
    Overtime,
    Subcontract,
    Mixed,
}

impl MonthAction {
    pub const ALL: [MonthAction; 5] = [
        MonthAction::InventoryBuild,
        MonthAction::InventoryDraw,
        MonthAction::Overtime,
        MonthAction::Subcontract,
        MonthAction::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MonthAction::InventoryBuild => "Inventory Build",
            MonthAction::InventoryDraw => "Inventory Draw",
            MonthAction::Overtime => "Overtime",
            MonthAction::Subcontract => "Subcontract",
            MonthAction::Mixed => "Mixed",
        }
    }
}

/// A full year of allocations for one strategy, costed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualResult {
    pub strategy: Strategy,
    pub months: Vec<MonthlyPlan>,
    pub monthly_costs: Vec<f64>,
    pub total_cost: f64,
}

impl AnnualResult {
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.display_name()
    }

    pub fn total_demand(&self) -> f64 {
        self.months.iter().map(|m| m.demand).sum()
    }

    pub fn total_overtime(&self) -> f64 {
        self.months.iter().map(|m| m.overtime_units).sum()
    }

    pub fn total_subcontract(&self) -> f64 {
        self.months.iter().map(|m| m.subcontract_units).sum()
    }

    pub fn max_inventory(&self) -> f64 {
        self.months
            .iter()
            .map(|m| m.ending_inventory)
            .fold(0.0, f64::max)
    }
}
