//! Solution and violation types.

use serde::Serialize;

use super::{Instance, Roster};
use crate::feasibility::Route;

/// A type of constraint violation in a route or solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A stop is reached after its window closes.
    TimeWindowViolated {
        /// Route index in the solution.
        route_index: usize,
        /// Position of the late stop.
        position: usize,
        /// Earliest arrival given the predecessor's start.
        arrival: i64,
        /// Window close of the late stop.
        close: i64,
    },
    /// More than one alternative of a customer is visited.
    CustomerServedTwice {
        /// External customer identifier.
        customer_id: usize,
        /// Number of visits found.
        visits: usize,
    },
    /// The roster disagrees with the route contents.
    RosterMismatch {
        /// External customer identifier.
        customer_id: usize,
        /// Routed flag held by the roster.
        flagged: bool,
    },
    /// Auxiliary sequences or the cached load disagree with the stops.
    ScheduleInconsistent {
        /// Route index in the solution.
        route_index: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A set of technician routes plus the roster of routed customers.
///
/// Cloning copies every route and the roster, so a trial solution can be
/// mutated without any effect on the one it was copied from.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{Instance, Parameters, Request, Solution, TimeWindow};
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(2);
/// travel.set_symmetric(0, 1, Rate::new(5, 5));
/// let requests = vec![
///     Request::depot(0, 100),
///     Request::new(1, 1, 3, TimeWindow::new(0, 50).unwrap()),
///     Request::depot(0, 100),
/// ];
/// let instance = Instance::new(Parameters::new(1, 2, 100, 10), requests, travel).unwrap();
///
/// let mut sol = Solution::new(&instance);
/// let shift = sol.route(0).insertion_shift(&instance, 1, 1).unwrap();
/// sol.insert(&instance, 0, 1, 1, shift);
/// assert!(sol.roster().all_routed());
/// assert_eq!(sol.num_used_routes(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    routes: Vec<Route>,
    roster: Roster,
}

impl Solution {
    /// Creates one depot-only route per vehicle and an empty roster.
    pub fn new(instance: &Instance) -> Self {
        let empty = Route::new(instance);
        Self {
            routes: vec![empty; instance.parameters().fleet_size()],
            roster: Roster::new(instance.customers().len()),
        }
    }

    /// Returns the routes, used or not.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the route at `index`.
    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    #[cfg(test)]
    pub(crate) fn route_mut(&mut self, index: usize) -> &mut Route {
        &mut self.routes[index]
    }

    /// Returns the routed table.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Number of routes (vehicles), used or not.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of routes visiting at least one customer.
    pub fn num_used_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Number of routed customers.
    pub fn num_routed(&self) -> usize {
        self.roster.routed_count()
    }

    /// Number of customers still waiting for a route.
    pub fn num_unrouted(&self) -> usize {
        self.roster.unrouted_count()
    }

    /// Derived per-request routed flag: a request counts as routed when its
    /// customer is, whichever alternative was chosen. Depots are always routed.
    pub fn is_request_routed(&self, instance: &Instance, request: usize) -> bool {
        instance
            .customer_slot(request)
            .is_none_or(|slot| self.roster.is_routed(slot))
    }

    /// Customer stops as `(route, position, request)` triples.
    pub fn stops(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.routes.iter().enumerate().flat_map(|(ri, route)| {
            route
                .customer_stops()
                .iter()
                .enumerate()
                .map(move |(i, &req)| (ri, i + 1, req))
        })
    }

    /// Finds the `(route, position)` serving customer `slot`.
    pub fn locate(&self, instance: &Instance, slot: usize) -> Option<(usize, usize)> {
        self.stops()
            .find(|&(_, _, req)| instance.customer_slot(req) == Some(slot))
            .map(|(ri, pos, _)| (ri, pos))
    }

    /// Commits `request` before the stop at `position` of route `route` and
    /// marks its customer routed.
    ///
    /// `shift` must come from [`Route::insertion_shift`] on the current route.
    pub fn insert(
        &mut self,
        instance: &Instance,
        route: usize,
        request: usize,
        position: usize,
        shift: i64,
    ) {
        self.routes[route].insert(instance, request, position, shift);
        if let Some(slot) = instance.customer_slot(request) {
            debug_assert!(!self.roster.is_routed(slot), "customer routed twice");
            self.roster.mark_routed(slot);
        }
    }

    /// Unroutes every customer in `slots` and recomputes each touched route.
    ///
    /// Returns the slots that were actually removed, in route order.
    pub fn remove_customers(&mut self, instance: &Instance, slots: &[usize]) -> Vec<usize> {
        let mut target = vec![false; instance.customers().len()];
        for &slot in slots {
            target[slot] = true;
        }

        let mut removed = Vec::new();
        for route in &mut self.routes {
            let mut positions: Vec<usize> = route
                .customer_stops()
                .iter()
                .enumerate()
                .filter(|&(_, &req)| instance.customer_slot(req).is_some_and(|s| target[s]))
                .map(|(i, _)| i + 1)
                .collect();
            if positions.is_empty() {
                continue;
            }
            for req in route.remove_positions(instance, &mut positions) {
                if let Some(slot) = instance.customer_slot(req) {
                    self.roster.unmark(slot);
                    removed.push(slot);
                }
            }
        }
        removed
    }

    /// Recomputes the schedule of every route.
    pub fn refresh(&mut self, instance: &Instance) {
        for route in &mut self.routes {
            route.refresh(instance);
        }
    }
}
