//! Round-based best-insertion construction.
//!
//! Every round scans each (route, position, pending request) triple, keeps
//! the feasible ones, and commits the single best under the selected rule.
//! Rounds repeat until every customer is routed or no feasible triple is
//! left.

use log::warn;
use serde::{Deserialize, Serialize};

use super::regret;
use crate::models::{Instance, Solution};

/// Selection rule of an insertion construction.
///
/// The ratio rules use `cost(prev, req) + cost(req, next)`, the cost of the
/// two edges a splice creates. Cheapest detour additionally subtracts the
/// bridged edge `cost(prev, next)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    /// Minimum of `100 / (shift * edge_cost)`.
    GreedyRatio,
    /// Maximum of `100 / (shift * edge_cost)`.
    Score,
    /// Maximum of `100 / detour_cost`.
    CheapestDetour,
    /// Regret-k on the detour cost per route.
    Regret(usize),
}

impl Construction {
    /// Short stable name, used in usage statistics and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GreedyRatio => "greedy_ratio",
            Self::Score => "score",
            Self::CheapestDetour => "cheapest_detour",
            Self::Regret(_) => "regret",
        }
    }
}

/// Result of one construction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConstructionOutcome {
    /// Customers committed by this pass.
    pub inserted: usize,
    /// Customers still unrouted when the pass stopped.
    pub unrouted: usize,
}

impl ConstructionOutcome {
    /// Returns `true` if the pass left no customer unrouted.
    pub fn is_complete(&self) -> bool {
        self.unrouted == 0
    }
}

/// A feasible insertion of `request` before the stop at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub route: usize,
    pub position: usize,
    pub request: usize,
    pub shift: i64,
}

/// Requests whose customer is still unrouted, in index order.
pub(crate) fn pending_requests(instance: &Instance, solution: &Solution) -> Vec<usize> {
    instance
        .customer_requests()
        .filter(|&r| !solution.is_request_routed(instance, r))
        .collect()
}

/// Visits every feasible insertion of the given requests in
/// route, position, request order.
pub(crate) fn for_each_candidate(
    instance: &Instance,
    solution: &Solution,
    requests: &[usize],
    mut visit: impl FnMut(Candidate),
) {
    for (ri, route) in solution.routes().iter().enumerate() {
        for position in 1..route.len() {
            for &request in requests {
                if let Some(shift) = route.insertion_shift(instance, request, position) {
                    visit(Candidate {
                        route: ri,
                        position,
                        request,
                        shift,
                    });
                }
            }
        }
    }
}

/// Cost of the two edges created by splicing `request` before `position`.
pub(crate) fn edge_cost(instance: &Instance, solution: &Solution, c: &Candidate) -> i64 {
    let stops = solution.route(c.route).stops();
    let travel = instance.travel();
    let prev = instance.location_of(stops[c.position - 1]);
    let next = instance.location_of(stops[c.position]);
    let loc = instance.location_of(c.request);
    travel.cost(prev, loc) + travel.cost(loc, next)
}

/// Added routing cost of splicing `request` before `position`.
pub(crate) fn detour_cost(instance: &Instance, solution: &Solution, c: &Candidate) -> i64 {
    let stops = solution.route(c.route).stops();
    let prev = instance.location_of(stops[c.position - 1]);
    let next = instance.location_of(stops[c.position]);
    edge_cost(instance, solution, c) - instance.travel().cost(prev, next)
}

fn ratio(rule: Construction, instance: &Instance, solution: &Solution, c: &Candidate) -> f64 {
    match rule {
        Construction::CheapestDetour => 100.0 / detour_cost(instance, solution, c) as f64,
        _ => 100.0 / (c.shift as f64 * edge_cost(instance, solution, c) as f64),
    }
}

fn best_candidate(
    rule: Construction,
    instance: &Instance,
    solution: &Solution,
    requests: &[usize],
) -> Option<Candidate> {
    let minimize = rule == Construction::GreedyRatio;
    let mut best: Option<(Candidate, f64)> = None;
    for_each_candidate(instance, solution, requests, |c| {
        let value = ratio(rule, instance, solution, &c);
        let better = match best {
            None => true,
            Some((_, b)) if minimize => value < b,
            Some((_, b)) => value > b,
        };
        if better {
            best = Some((c, value));
        }
    });
    best.map(|(c, _)| c)
}

/// Inserts unrouted customers into `solution` until all are routed or no
/// feasible insertion remains.
///
/// Exhaustion is not an error: the pass logs a warning and returns the
/// partial outcome.
///
/// # Examples
///
/// ```
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
///
/// let mut sol = Solution::new(&instance);
/// let outcome = construct(&instance, &mut sol, Construction::CheapestDetour);
/// assert!(outcome.is_complete());
/// assert_eq!(outcome.inserted, 2);
/// ```
pub fn construct(
    instance: &Instance,
    solution: &mut Solution,
    rule: Construction,
) -> ConstructionOutcome {
    let mut inserted = 0;
    loop {
        let requests = pending_requests(instance, solution);
        if requests.is_empty() {
            break;
        }

        let chosen = match rule {
            Construction::Regret(k) => regret::best_regret(instance, solution, &requests, k),
            _ => best_candidate(rule, instance, solution, &requests),
        };
        let Some(c) = chosen else {
            warn!(
                "{}: insufficient fleet capacity, {} customer(s) left unrouted",
                rule.name(),
                solution.num_unrouted()
            );
            break;
        };
        solution.insert(instance, c.route, c.request, c.position, c.shift);
        inserted += 1;
    }

    ConstructionOutcome {
        inserted,
        unrouted: solution.num_unrouted(),
    }
}
