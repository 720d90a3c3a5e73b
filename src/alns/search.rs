//! Destroy/repair search controller.
//!
//! Every iteration copies the incumbent, removes `k` customers with a
//! uniformly chosen destroy operator, repairs the copy through the
//! [`RepairDispatcher`], and keeps it only if its objective is strictly
//! lower. There is no temperature, no tabu memory and no operator weight
//! adaptation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::config::SearchConfig;
use super::destroy::{RandomRemoval, ShawRemoval, WorstRemoval};
use super::repair::RepairDispatcher;
use crate::constructive::Construction;
use crate::evaluation::objective;
use crate::models::{Instance, Solution};

/// Call and improvement counts of one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorUsage {
    pub name: &'static str,
    pub calls: usize,
    pub improvements: usize,
}

impl OperatorUsage {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: 0,
            improvements: 0,
        }
    }

    fn record(&mut self, improved: bool) {
        self.calls += 1;
        if improved {
            self.improvements += 1;
        }
    }
}

/// Summary of one destroy/repair iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterationOutcome {
    /// Destroy operator name.
    pub destroy: &'static str,
    /// Repair rule.
    pub repair: Construction,
    /// Customers removed by the destroy step.
    pub removed: usize,
    /// Objective of the repaired trial.
    pub trial_cost: i64,
    /// Whether the trial replaced the incumbent.
    pub accepted: bool,
}

/// Result of a search run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// The best solution found.
    pub best: Solution,

    /// Objective of the best solution.
    pub best_cost: i64,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Number of accepted trials.
    pub improvements: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Incumbent cost sampled at regular intervals.
    pub cost_history: Vec<i64>,

    /// Per destroy operator statistics.
    pub destroy_usage: Vec<OperatorUsage>,

    /// Per repair rule statistics, the initial construction included.
    pub repair_usage: Vec<OperatorUsage>,
}

const DESTROY_OPERATORS: usize = 3;

/// Search state over one instance.
///
/// [`Search::new`] builds the incumbent with the dispatcher's initial
/// greedy-ratio construction; [`Search::iterate`] performs one step and
/// [`Search::run`] the configured number of steps.
///
/// # Examples
///
/// ```
/// use u_vrptw::alns::{Search, SearchConfig};
/// use u_vrptw::models::{Instance, Parameters, Request, TimeWindow};
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(3);
/// travel.set_symmetric(0, 1, Rate::new(5, 5));
/// travel.set_symmetric(0, 2, Rate::new(8, 8));
/// travel.set_symmetric(1, 2, Rate::new(4, 4));
/// let requests = vec![
///     Request::depot(0, 200),
///     Request::new(1, 1, 3, TimeWindow::new(0, 100).unwrap()),
///     Request::new(2, 2, 4, TimeWindow::new(10, 50).unwrap()),
///     Request::depot(0, 200),
/// ];
/// let instance = Instance::new(Parameters::new(2, 3, 200, 10), requests, travel).unwrap();
///
/// let config = SearchConfig::default().with_max_iterations(50).with_seed(42);
/// let search = Search::new(&instance, config).unwrap();
/// assert_eq!(search.incumbent_cost(), 26);
///
/// let result = search.run();
/// assert_eq!(result.best_cost, 17);
/// assert!(result.best.roster().all_routed());
/// ```
pub struct Search<'a> {
    instance: &'a Instance,
    config: SearchConfig,
    rng: StdRng,
    random: RandomRemoval<'a>,
    worst: WorstRemoval<'a>,
    shaw: ShawRemoval<'a>,
    dispatcher: RepairDispatcher,
    incumbent: Solution,
    incumbent_cost: i64,
    iterations: usize,
    improvements: usize,
    destroy_usage: Vec<OperatorUsage>,
    repair_usage: Vec<OperatorUsage>,
}

impl<'a> Search<'a> {
    /// Validates `config`, seeds the generator and constructs the
    /// initial incumbent.
    pub fn new(instance: &'a Instance, config: SearchConfig) -> Result<Self, String> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let shaw = match config.shaw_bias {
            Some(bias) => ShawRemoval::new(instance).with_bias(bias),
            None => ShawRemoval::new(instance),
        };
        let mut dispatcher = RepairDispatcher::new(config.repair_pool.clone());
        let mut incumbent = Solution::new(instance);
        let (rule, outcome) = dispatcher.repair(instance, &mut incumbent, &mut rng);
        let incumbent_cost = objective(instance, &incumbent);
        info!(
            "initial {}: cost {}, {} routed, {} unrouted, {} route(s) used",
            rule.name(),
            incumbent_cost,
            incumbent.num_routed(),
            outcome.unrouted,
            incumbent.num_used_routes()
        );

        let mut initial = OperatorUsage::new(rule.name());
        initial.record(false);

        Ok(Self {
            instance,
            rng,
            random: RandomRemoval::new(instance),
            worst: WorstRemoval::new(instance).with_bias(config.worst_bias),
            shaw,
            dispatcher,
            incumbent,
            incumbent_cost,
            iterations: 0,
            improvements: 0,
            destroy_usage: vec![
                OperatorUsage::new("random_removal"),
                OperatorUsage::new("worst_removal"),
                OperatorUsage::new("shaw_removal"),
            ],
            repair_usage: vec![initial],
            config,
        })
    }

    /// Returns the best solution found so far.
    pub fn incumbent(&self) -> &Solution {
        &self.incumbent
    }

    /// Returns the objective of the incumbent.
    pub fn incumbent_cost(&self) -> i64 {
        self.incumbent_cost
    }

    /// Iterations executed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn removal_count(&mut self, routed: usize) -> usize {
        let (low, high) = self.config.removal_bounds(self.instance.customers().len());
        self.rng.random_range(low..=high).min(routed)
    }

    fn record_repair(&mut self, rule: Construction, improved: bool) {
        let name = rule.name();
        match self.repair_usage.iter_mut().find(|u| u.name == name) {
            Some(usage) => usage.record(improved),
            None => {
                let mut usage = OperatorUsage::new(name);
                usage.record(improved);
                self.repair_usage.push(usage);
            }
        }
    }

    /// Strictly lower cost wins; the coverage guard, when enabled, also
    /// rejects trials with more unrouted customers than the incumbent.
    fn accepts(&self, trial: &Solution, trial_cost: i64) -> bool {
        let covered = !self.config.require_full_coverage
            || trial.num_unrouted() <= self.incumbent.num_unrouted();
        covered && trial_cost < self.incumbent_cost
    }

    /// Performs one destroy/repair step.
    pub fn iterate(&mut self) -> IterationOutcome {
        let mut trial = self.incumbent.clone();
        let count = self.removal_count(trial.num_routed());

        let op = self.rng.random_range(0..DESTROY_OPERATORS);
        let removed = match op {
            0 => self.random.remove(&mut trial, count, &mut self.rng),
            1 => self.worst.remove(&mut trial, count, &mut self.rng),
            _ => self.shaw.remove(&mut trial, count, &mut self.rng),
        };
        let (rule, _) = self
            .dispatcher
            .repair(self.instance, &mut trial, &mut self.rng);

        let trial_cost = objective(self.instance, &trial);
        let accepted = self.accepts(&trial, trial_cost);

        self.iterations += 1;
        self.destroy_usage[op].record(accepted);
        self.record_repair(rule, accepted);

        let destroy = self.destroy_usage[op].name;
        trace!(
            "iteration {}: {} removed {}, {} -> cost {}",
            self.iterations,
            destroy,
            removed.len(),
            rule.name(),
            trial_cost
        );

        if accepted {
            debug!(
                "iteration {}: improved {} -> {} ({} + {})",
                self.iterations,
                self.incumbent_cost,
                trial_cost,
                destroy,
                rule.name()
            );
            self.incumbent = trial;
            self.incumbent_cost = trial_cost;
            self.improvements += 1;
        }

        IterationOutcome {
            destroy,
            repair: rule,
            removed: removed.len(),
            trial_cost,
            accepted,
        }
    }

    /// Runs `max_iterations` iterations.
    pub fn run(self) -> SearchResult {
        self.run_with_cancel(None)
    }

    /// Runs `max_iterations` iterations, stopping early once `cancel` is set.
    pub fn run_with_cancel(mut self, cancel: Option<Arc<AtomicBool>>) -> SearchResult {
        info!(
            "search: {} iterations over {} customer(s), starting cost {}",
            self.config.max_iterations,
            self.instance.customers().len(),
            self.incumbent_cost
        );

        let history_interval = self.config.history_interval.max(1);
        let mut cost_history = vec![self.incumbent_cost];
        let mut cancelled = false;

        for iteration in 0..self.config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            self.iterate();

            if (iteration + 1).is_multiple_of(history_interval) {
                cost_history.push(self.incumbent_cost);
            }
        }

        if cost_history.last() != Some(&self.incumbent_cost) {
            cost_history.push(self.incumbent_cost);
        }

        info!(
            "search done: cost {} after {} iteration(s), {} improvement(s)",
            self.incumbent_cost, self.iterations, self.improvements
        );

        SearchResult {
            best: self.incumbent,
            best_cost: self.incumbent_cost,
            iterations: self.iterations,
            improvements: self.improvements,
            cancelled,
            cost_history,
            destroy_usage: self.destroy_usage,
            repair_usage: self.repair_usage,
        }
    }
}

/// Builds the initial solution and runs the search in one call.
pub fn solve(instance: &Instance, config: SearchConfig) -> Result<SearchResult, String> {
    Ok(Search::new(instance, config)?.run())
}
