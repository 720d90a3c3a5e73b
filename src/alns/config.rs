//! Search configuration.

use serde::{Deserialize, Serialize};

use super::destroy::DEFAULT_WORST_BIAS;
use crate::constructive::Construction;

/// Configuration of the destroy/repair search.
///
/// # Removal count
///
/// Each iteration removes `k` customers with `k` uniform in
/// `[min_removal, max(min_removal, floor(customers * max_removal_fraction))]`,
/// clamped to the number of routed customers.
///
/// # Acceptance
///
/// A trial replaces the incumbent only when its objective is strictly
/// lower. With `require_full_coverage` (off by default), a trial that leaves more customers
/// unrouted than the incumbent is discarded whatever its cost.
///
/// # Examples
///
/// ```
/// use u_vrptw::alns::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_max_iterations(2000)
///     .with_removal(2, 0.5)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of destroy/repair iterations.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Lower bound of the removal count.
    pub min_removal: usize,

    /// Upper bound of the removal count as a fraction of the customer count.
    pub max_removal_fraction: f64,

    /// Exponent of the worst removal draw.
    pub worst_bias: f64,

    /// Exponent of the Shaw removal draw; `None` uses the removal count.
    pub shaw_bias: Option<f64>,

    /// Rules drawn by the repair step after the initial construction.
    pub repair_pool: Vec<Construction>,

    /// Discard trials that route fewer customers than the incumbent.
    pub require_full_coverage: bool,

    /// Incumbent cost is sampled every `history_interval` iterations.
    pub history_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            seed: None,
            min_removal: 4,
            max_removal_fraction: 2.0 / 3.0,
            worst_bias: DEFAULT_WORST_BIAS,
            shaw_bias: None,
            repair_pool: vec![Construction::Score, Construction::CheapestDetour],
            require_full_coverage: false,
            history_interval: 100,
        }
    }
}

impl SearchConfig {
    /// Sets the iteration count.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the removal count bounds.
    pub fn with_removal(mut self, min: usize, max_fraction: f64) -> Self {
        self.min_removal = min.max(1);
        self.max_removal_fraction = max_fraction.clamp(0.0, 1.0);
        self
    }

    /// Sets the worst removal exponent.
    pub fn with_worst_bias(mut self, bias: f64) -> Self {
        self.worst_bias = bias;
        self
    }

    /// Sets the Shaw removal exponent.
    pub fn with_shaw_bias(mut self, bias: f64) -> Self {
        self.shaw_bias = Some(bias);
        self
    }

    /// Sets the rules drawn by the repair step.
    pub fn with_repair_pool(mut self, pool: Vec<Construction>) -> Self {
        self.repair_pool = pool;
        self
    }

    /// Enables or disables the coverage guard on acceptance.
    pub fn with_full_coverage(mut self, required: bool) -> Self {
        self.require_full_coverage = required;
        self
    }

    /// Sets the cost history sampling interval.
    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n.max(1);
        self
    }

    /// Removal count bounds `(low, high)` for an instance with
    /// `customers` customers.
    pub fn removal_bounds(&self, customers: usize) -> (usize, usize) {
        let high = (customers as f64 * self.max_removal_fraction).floor() as usize;
        (self.min_removal, high.max(self.min_removal))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_removal == 0 {
            return Err("min_removal must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.max_removal_fraction) {
            return Err(format!(
                "max_removal_fraction must be in [0, 1], got {}",
                self.max_removal_fraction
            ));
        }
        if self.worst_bias <= 0.0 {
            return Err(format!(
                "worst_bias must be positive, got {}",
                self.worst_bias
            ));
        }
        if let Some(bias) = self.shaw_bias {
            if bias <= 0.0 {
                return Err(format!("shaw_bias must be positive, got {bias}"));
            }
        }
        if self.repair_pool.is_empty() {
            return Err("repair_pool must not be empty".into());
        }
        if self
            .repair_pool
            .iter()
            .any(|r| matches!(r, Construction::Regret(k) if *k < 2))
        {
            return Err("regret construction needs k >= 2".into());
        }
        if self.history_interval == 0 {
            return Err("history_interval must be positive".into());
        }
        Ok(())
    }
}
