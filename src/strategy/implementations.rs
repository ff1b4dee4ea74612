// src/strategy/implementations.rs

use crate::error::{PlannerError, PlannerResult};
use crate::strategy::traits::{AllocationPolicy, MonthContext, MonthDecision, Strategy};

/// Builds the policy for `strategy`. Level needs the whole demand series up
/// front to derive its constant rate; the others are stateless.
pub fn build_policy(
    strategy: Strategy,
    demand: &[f64],
    production_weeks: &[u32],
    hybrid_overtime_share: f64,
) -> PlannerResult<Box<dyn AllocationPolicy>> {
    let policy: Box<dyn AllocationPolicy> = match strategy {
        Strategy::Chase => Box::new(ChasePolicy::new()),
        Strategy::Level => Box::new(LevelPolicy::from_series(demand, production_weeks)?),
        Strategy::SubcontractHeavy => Box::new(SubcontractHeavyPolicy::new()),
        Strategy::Hybrid => Box::new(HybridPolicy::new(hybrid_overtime_share)),
    };
    Ok(policy)
}

/// Net requirement left after opening stock and standard production.
/// Non-positive means the month ends with a surplus.
fn net_requirement(ctx: &MonthContext, inventory: f64, standard: f64) -> f64 {
    ctx.demand - inventory - standard
}

/// Splits a positive shortfall between overtime (up to `overtime_cap`) and
/// subcontracting.
fn cover_shortfall(standard: f64, net: f64, overtime_cap: f64) -> MonthDecision {
    if net <= 0.0 {
        return MonthDecision {
            standard,
            overtime: 0.0,
            subcontract: 0.0,
        };
    }
    let overtime = net.min(overtime_cap.max(0.0));
    MonthDecision {
        standard,
        overtime,
        subcontract: (net - overtime).max(0.0),
    }
}

// =========================================================================
// 1. Chase
// =========================================================================

/// Runs standard capacity every month and chases the remaining demand with
/// overtime, then subcontracting.
#[derive(Debug, Clone, Default)]
pub struct ChasePolicy;

impl ChasePolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationPolicy for ChasePolicy {
    fn allocate_month(&mut self, ctx: &MonthContext, inventory: f64) -> MonthDecision {
        let standard = ctx.base_capacity;
        let net = net_requirement(ctx, inventory, standard);
        cover_shortfall(standard, net, ctx.max_overtime)
    }
}

// =========================================================================
// 2. Level
// =========================================================================

/// Produces at a constant weekly rate derived from annual demand over annual
/// production weeks. The rate is fixed before the first month and does not
/// react to inventory.
#[derive(Debug, Clone)]
pub struct LevelPolicy {
    level_rate: f64,
}

impl LevelPolicy {
    pub fn new(level_rate: f64) -> Self {
        Self { level_rate }
    }

    pub fn from_series(demand: &[f64], production_weeks: &[u32]) -> PlannerResult<Self> {
        let total_weeks: u32 = production_weeks.iter().sum();
        if total_weeks == 0 {
            return Err(PlannerError::config(
                "total production weeks is zero; level rate is undefined",
            ));
        }
        let total_demand: f64 = demand.iter().sum();
        Ok(Self::new(total_demand / f64::from(total_weeks)))
    }

    pub fn level_rate(&self) -> f64 {
        self.level_rate
    }
}

impl AllocationPolicy for LevelPolicy {
    fn allocate_month(&mut self, ctx: &MonthContext, _inventory: f64) -> MonthDecision {
        let target = (self.level_rate * f64::from(ctx.production_weeks)).max(0.0);

        let standard = target.min(ctx.base_capacity);
        let overtime = (target - standard).min(ctx.max_overtime.max(0.0));
        let subcontract = (target - standard - overtime).max(0.0);

        MonthDecision {
            standard,
            overtime,
            subcontract,
        }
    }
}

// =========================================================================
// 3. Subcontract-Heavy
// =========================================================================

/// Never schedules overtime. Standard capacity runs every month and any
/// shortfall goes straight to the subcontractor.
#[derive(Debug, Clone, Default)]
pub struct SubcontractHeavyPolicy;

impl SubcontractHeavyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationPolicy for SubcontractHeavyPolicy {
    fn allocate_month(&mut self, ctx: &MonthContext, inventory: f64) -> MonthDecision {
        let standard = ctx.base_capacity;
        let net = net_requirement(ctx, inventory, standard);
        cover_shortfall(standard, net, 0.0)
    }
}

// =========================================================================
// 4. Hybrid
// =========================================================================

/// Chase with overtime capped at a share of the monthly ceiling.
#[derive(Debug, Clone)]
pub struct HybridPolicy {
    overtime_share: f64,
}

impl HybridPolicy {
    pub const DEFAULT_OVERTIME_SHARE: f64 = 0.5;

    pub fn new(overtime_share: f64) -> Self {
        Self {
            overtime_share: overtime_share.clamp(0.0, 1.0),
        }
    }
}

impl Default for HybridPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OVERTIME_SHARE)
    }
}

impl AllocationPolicy for HybridPolicy {
    fn allocate_month(&mut self, ctx: &MonthContext, inventory: f64) -> MonthDecision {
        let standard = ctx.base_capacity;
        let net = net_requirement(ctx, inventory, standard);
        cover_shortfall(standard, net, ctx.max_overtime * self.overtime_share)
    }
}
