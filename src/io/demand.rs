// src/io/demand.rs

use crate::error::PlannerError;
use rand::{thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

pub const PEAK_FACTOR: f64 = 1.15;
pub const SLOW_FACTOR: f64 = 0.85;
pub const VOLATILE_LOW: f64 = 0.8;
pub const VOLATILE_HIGH: f64 = 1.2;

/// Demand-scaling policy applied before allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Base,
    Peak,
    Slow,
    Volatile,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Base => "base",
            Scenario::Peak => "peak",
            Scenario::Slow => "slow",
            Scenario::Volatile => "volatile",
        }
    }

    /// Uniform scaling factor, or `None` for the per-month random scenario.
    pub fn factor(&self) -> Option<f64> {
        match self {
            Scenario::Base => Some(1.0),
            Scenario::Peak => Some(PEAK_FACTOR),
            Scenario::Slow => Some(SLOW_FACTOR),
            Scenario::Volatile => None,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Scenario::Base),
            "peak" | "optimistic" => Ok(Scenario::Peak),
            "slow" | "pessimistic" => Ok(Scenario::Slow),
            "volatile" => Ok(Scenario::Volatile),
            other => Err(PlannerError::config(format!("unknown scenario: {}", other))),
        }
    }
}

/// Scales a base demand series according to `scenario`.
///
/// `Volatile` multiplies each month by an independent draw from
/// `[0.8, 1.2]`. With a seed the draws are reproducible for the same seed and
/// series length; without one they come from the thread RNG.
pub fn adjust(base_demand: &[f64], scenario: Scenario, seed: Option<u64>) -> Vec<f64> {
    match scenario.factor() {
        Some(factor) => base_demand.iter().map(|d| d * factor).collect(),
        None => {
            let multipliers = match seed {
                Some(seed) => {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    volatility_multipliers(&mut rng, base_demand.len())
                }
                None => volatility_multipliers(&mut thread_rng(), base_demand.len()),
            };
            debug!(?multipliers, ?seed, "volatile scenario multipliers");
            base_demand
                .iter()
                .zip(multipliers)
                .map(|(d, m)| d * m)
                .collect()
        }
    }
}

/// Draws one multiplier per month from the volatile band.
pub fn volatility_multipliers<R: Rng + ?Sized>(rng: &mut R, months: usize) -> Vec<f64> {
    let band = Uniform::new_inclusive(VOLATILE_LOW, VOLATILE_HIGH);
    (0..months).map(|_| band.sample(rng)).collect()
}
