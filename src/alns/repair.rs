//! Repair operators.
//!
//! - [`InsertionRepair`]: one fixed [`Construction`] rule, usable wherever a
//!   [`RepairOperator`] is expected
//! - [`RepairDispatcher`]: the search's repair step; greedy-ratio on its
//!   first call, a uniform pick from the pool afterwards

use log::debug;
use rand::Rng;
use u_metaheur::alns::RepairOperator;

use crate::constructive::{construct, Construction, ConstructionOutcome};
use crate::models::{Instance, Solution};

/// Repairs a solution with a single insertion rule.
#[derive(Debug, Clone, Copy)]
pub struct InsertionRepair<'a> {
    instance: &'a Instance,
    rule: Construction,
}

impl<'a> InsertionRepair<'a> {
    /// Creates a repair operator applying `rule`.
    pub fn new(instance: &'a Instance, rule: Construction) -> Self {
        Self { instance, rule }
    }

    /// Returns the insertion rule.
    pub fn rule(&self) -> Construction {
        self.rule
    }
}

impl RepairOperator<Solution> for InsertionRepair<'_> {
    fn name(&self) -> &str {
        self.rule.name()
    }

    fn repair<R: Rng>(&self, solution: &Solution, _rng: &mut R) -> Solution {
        let mut sol = solution.clone();
        construct(self.instance, &mut sol, self.rule);
        sol
    }
}

/// Chooses the construction rule of each repair.
///
/// The first call of a dispatcher always uses
/// [`Construction::GreedyRatio`]; later calls draw uniformly from the pool.
#[derive(Debug, Clone)]
pub struct RepairDispatcher {
    pool: Vec<Construction>,
    initialized: bool,
}

impl RepairDispatcher {
    /// Creates a dispatcher; an empty pool falls back to
    /// `{Score, CheapestDetour}`.
    pub fn new(pool: Vec<Construction>) -> Self {
        let pool = if pool.is_empty() {
            vec![Construction::Score, Construction::CheapestDetour]
        } else {
            pool
        };
        Self {
            pool,
            initialized: false,
        }
    }

    /// Returns `true` once the greedy-ratio call has been consumed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the rules drawn after the first call.
    pub fn pool(&self) -> &[Construction] {
        &self.pool
    }

    /// Picks the rule for the next repair.
    pub fn select<R: Rng>(&mut self, rng: &mut R) -> Construction {
        if !self.initialized {
            self.initialized = true;
            return Construction::GreedyRatio;
        }
        self.pool[rng.random_range(0..self.pool.len())]
    }

    /// Repairs `solution` in place with the selected rule.
    pub fn repair<R: Rng>(
        &mut self,
        instance: &Instance,
        solution: &mut Solution,
        rng: &mut R,
    ) -> (Construction, ConstructionOutcome) {
        let rule = self.select(rng);
        let outcome = construct(instance, solution, rule);
        debug!(
            "repair {}: inserted {}, unrouted {}",
            rule.name(),
            outcome.inserted,
            outcome.unrouted
        );
        (rule, outcome)
    }
}

impl Default for RepairDispatcher {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
