//! Destroy operators.
//!
//! # Operators
//!
//! - [`RandomRemoval`]: removes uniformly random customers
//! - [`WorstRemoval`]: removes customers whose detour is most expensive
//! - [`ShawRemoval`]: removes customers related in space, time and demand
//!
//! Every operator batches its removals per route through
//! [`Solution::remove_customers`], so each touched route's schedule is
//! fully recomputed before the operator returns. Counts larger than the
//! number of routed customers are clamped.
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::Rng;
use u_metaheur::alns::DestroyOperator;

use crate::models::{Instance, Solution};

/// Default exponent of the worst removal draw.
pub const DEFAULT_WORST_BIAS: f64 = 2.5;

/// Index `floor(y^bias * len)` with `y` uniform in `[0, 1)`.
///
/// Larger `bias` concentrates the draw near index 0.
fn biased_index<R: Rng>(len: usize, bias: f64, rng: &mut R) -> usize {
    let y: f64 = rng.random();
    ((y.powf(bias) * len as f64).floor() as usize).min(len.saturating_sub(1))
}

/// Number of customers a `degree` in `[0, 1]` addresses.
fn degree_to_count(solution: &Solution, degree: f64) -> usize {
    ((solution.num_routed() as f64 * degree).round() as usize).max(1)
}

/// Removes random customers from the solution.
///
/// # Examples
///
/// ```
/// use u_vrptw::alns::destroy::RandomRemoval;
/// use u_vrptw::constructive::{construct, Construction};
/// use u_vrptw::models::{Instance, Parameters, Request, Solution, TimeWindow};
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(3);
/// travel.set_symmetric(0, 1, Rate::new(5, 5));
/// travel.set_symmetric(0, 2, Rate::new(6, 6));
/// travel.set_symmetric(1, 2, Rate::new(2, 2));
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let requests = vec![
///     Request::depot(0, 200),
///     Request::new(1, 1, 3, tw),
///     Request::new(2, 2, 3, tw),
///     Request::depot(0, 200),
/// ];
/// let instance = Instance::new(Parameters::new(2, 3, 200, 10), requests, travel).unwrap();
/// let mut sol = Solution::new(&instance);
/// construct(&instance, &mut sol, Construction::Score);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let removed = RandomRemoval::new(&instance).remove(&mut sol, 1, &mut rng);
/// assert_eq!(removed.len(), 1);
/// assert_eq!(sol.num_unrouted(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RandomRemoval<'a> {
    instance: &'a Instance,
}

impl<'a> RandomRemoval<'a> {
    /// Creates the operator for `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Removes up to `count` routed customers chosen by a uniform shuffle of
    /// all customer slots. Returns the removed slots.
    pub fn remove<R: Rng>(&self, solution: &mut Solution, count: usize, rng: &mut R) -> Vec<usize> {
        let mut slots: Vec<usize> = (0..self.instance.customers().len()).collect();
        u_numflow::random::shuffle(&mut slots, rng);
        let targets: Vec<usize> = slots
            .into_iter()
            .filter(|&s| solution.roster().is_routed(s))
            .take(count)
            .collect();
        solution.remove_customers(self.instance, &targets)
    }
}

impl DestroyOperator<Solution> for RandomRemoval<'_> {
    fn name(&self) -> &str {
        "random_removal"
    }

    fn destroy<R: Rng>(&self, solution: &Solution, degree: f64, rng: &mut R) -> Solution {
        let mut sol = solution.clone();
        let count = degree_to_count(&sol, degree);
        self.remove(&mut sol, count, rng);
        sol
    }
}

/// Removes customers whose removal saves the most routing cost.
///
/// Gains are recomputed after every removal. The victim is drawn from the
/// gain-sorted pool with [`biased_index`], so a larger `bias` removes the
/// single worst stop more often.
#[derive(Debug, Clone, Copy)]
pub struct WorstRemoval<'a> {
    instance: &'a Instance,
    bias: f64,
}

impl<'a> WorstRemoval<'a> {
    /// Creates the operator with [`DEFAULT_WORST_BIAS`].
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            bias: DEFAULT_WORST_BIAS,
        }
    }

    /// Sets the draw exponent.
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Saving of removing the stop at `pos`:
    /// `cost(prev, cur) + cost(cur, next) - cost(prev, next)`.
    fn removal_gain(&self, stops: &[usize], pos: usize) -> i64 {
        let inst = self.instance;
        let travel = inst.travel();
        let prev = inst.location_of(stops[pos - 1]);
        let cur = inst.location_of(stops[pos]);
        let next = inst.location_of(stops[pos + 1]);
        travel.cost(prev, cur) + travel.cost(cur, next) - travel.cost(prev, next)
    }

    /// Routed stops as `(gain, slot)`, sorted by descending gain.
    fn ranked(&self, solution: &Solution) -> Vec<(i64, usize)> {
        let mut pool: Vec<(i64, usize)> = solution
            .stops()
            .filter_map(|(ri, pos, req)| {
                let slot = self.instance.customer_slot(req)?;
                Some((self.removal_gain(solution.route(ri).stops(), pos), slot))
            })
            .collect();
        pool.sort_by(|a, b| b.0.cmp(&a.0));
        pool
    }

    /// Removes up to `count` customers one at a time. Returns the removed slots.
    pub fn remove<R: Rng>(&self, solution: &mut Solution, count: usize, rng: &mut R) -> Vec<usize> {
        let mut removed = Vec::with_capacity(count);
        while removed.len() < count {
            let pool = self.ranked(solution);
            if pool.is_empty() {
                break;
            }
            let (_, slot) = pool[biased_index(pool.len(), self.bias, rng)];
            removed.extend(solution.remove_customers(self.instance, &[slot]));
        }
        removed
    }
}

impl DestroyOperator<Solution> for WorstRemoval<'_> {
    fn name(&self) -> &str {
        "worst_removal"
    }

    fn destroy<R: Rng>(&self, solution: &Solution, degree: f64, rng: &mut R) -> Solution {
        let mut sol = solution.clone();
        let count = degree_to_count(&sol, degree);
        self.remove(&mut sol, count, rng);
        sol
    }
}

/// Removes related customers using the Shaw (1998) relatedness measure.
///
/// `relatedness(a, b) = distance(a, b) + |start(a) - start(b)| + |demand(a) - demand(b)|`,
/// lower meaning more related. Starting from a random routed stop, each step
/// picks a random already-selected pivot, sorts the remaining routed stops by
/// relatedness to it, and draws the next one with [`biased_index`].
///
/// Without an explicit bias the removal count is used as the exponent.
///
/// # Reference
///
/// Shaw, P. (1998). "Using Constraint Programming and Local Search Methods
/// to Solve Vehicle Routing Problems", *CP-98*, LNCS 1520, 417-431.
#[derive(Debug, Clone, Copy)]
pub struct ShawRemoval<'a> {
    instance: &'a Instance,
    bias: Option<f64>,
}

/// A routed stop seen by the relatedness measure.
#[derive(Debug, Clone, Copy)]
struct Visit {
    slot: usize,
    location: usize,
    start: i64,
    demand: i32,
}

impl<'a> ShawRemoval<'a> {
    /// Creates the operator for `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            bias: None,
        }
    }

    /// Sets the draw exponent.
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = Some(bias);
        self
    }

    fn relatedness(&self, a: &Visit, b: &Visit) -> f64 {
        self.instance.travel().distance(a.location, b.location)
            + (a.start - b.start).abs() as f64
            + (a.demand - b.demand).abs() as f64
    }

    fn visits(&self, solution: &Solution) -> Vec<Visit> {
        let inst = self.instance;
        solution
            .stops()
            .filter_map(|(ri, pos, req)| {
                Some(Visit {
                    slot: inst.customer_slot(req)?,
                    location: inst.location_of(req),
                    start: solution.route(ri).start_times()[pos],
                    demand: inst.request(req).demand(),
                })
            })
            .collect()
    }

    /// Selects up to `count` related customers and removes them in one
    /// batch. Returns the removed slots.
    pub fn remove<R: Rng>(&self, solution: &mut Solution, count: usize, rng: &mut R) -> Vec<usize> {
        let mut pool = self.visits(solution);
        if pool.is_empty() || count == 0 {
            return Vec::new();
        }
        let bias = self.bias.unwrap_or(count as f64);

        let seed = pool.swap_remove(rng.random_range(0..pool.len()));
        let mut selected = vec![seed];
        while selected.len() < count && !pool.is_empty() {
            let pivot = selected[rng.random_range(0..selected.len())];
            pool.sort_by(|a, b| {
                self.relatedness(&pivot, a)
                    .total_cmp(&self.relatedness(&pivot, b))
            });
            let next = pool.remove(biased_index(pool.len(), bias, rng));
            selected.push(next);
        }

        let slots: Vec<usize> = selected.iter().map(|v| v.slot).collect();
        solution.remove_customers(self.instance, &slots)
    }
}

impl DestroyOperator<Solution> for ShawRemoval<'_> {
    fn name(&self) -> &str {
        "shaw_removal"
    }

    fn destroy<R: Rng>(&self, solution: &Solution, degree: f64, rng: &mut R) -> Solution {
        let mut sol = solution.clone();
        let count = degree_to_count(&sol, degree);
        self.remove(&mut sol, count, rng);
        sol
    }
}
