//! Routing cost and schedule diagnostics.

use crate::feasibility::Route;
use crate::models::{Instance, Roster, Solution, Violation, ViolationType};

/// Sum of travel cost over consecutive stops of one route.
pub fn route_cost(instance: &Instance, route: &Route) -> i64 {
    let travel = instance.travel();
    route
        .stops()
        .windows(2)
        .map(|w| travel.cost(instance.location_of(w[0]), instance.location_of(w[1])))
        .sum()
}

/// Total routing cost of a solution.
///
/// # Examples
///
/// ```
/// use u_vrptw::evaluation::objective;
/// use u_vrptw::models::{Instance, Parameters, Request, Solution, TimeWindow};
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(2);
/// travel.set_symmetric(0, 1, Rate::new(5, 7));
/// let requests = vec![
///     Request::depot(0, 100),
///     Request::new(1, 1, 3, TimeWindow::new(0, 50).unwrap()),
///     Request::depot(0, 100),
/// ];
/// let instance = Instance::new(Parameters::new(1, 2, 100, 10), requests, travel).unwrap();
///
/// let mut sol = Solution::new(&instance);
/// assert_eq!(objective(&instance, &sol), 0);
/// let shift = sol.route(0).insertion_shift(&instance, 1, 1).unwrap();
/// sol.insert(&instance, 0, 1, 1, shift);
/// assert_eq!(objective(&instance, &sol), 14);
/// ```
pub fn objective(instance: &Instance, solution: &Solution) -> i64 {
    solution
        .routes()
        .iter()
        .map(|r| route_cost(instance, r))
        .sum()
}

/// Re-verifies that every stop is reached before its window closes, using
/// the committed start time of each predecessor.
pub fn check_time_window(instance: &Instance, route: &Route) -> bool {
    first_late_stop(instance, route).is_none()
}

/// Returns `true` when every customer is routed.
pub fn check_all_requests(roster: &Roster) -> bool {
    roster.all_routed()
}

fn first_late_stop(instance: &Instance, route: &Route) -> Option<(usize, i64, i64)> {
    let travel = instance.travel();
    let stops = route.stops();
    let start = route.start_times();
    (0..stops.len() - 1).find_map(|i| {
        let arrival = start[i]
            + travel.time(instance.location_of(stops[i]), instance.location_of(stops[i + 1]));
        let close = instance.request(stops[i + 1]).time_window().close();
        (arrival > close).then_some((i + 1, arrival, close))
    })
}

/// Collects every constraint violation in a solution.
///
/// Covers capacity and lateness per route, auxiliary sequences out of step
/// with the stops, duplicate service of a customer, and disagreement
/// between the roster and the routes.
pub fn verify(instance: &Instance, solution: &Solution) -> Vec<Violation> {
    let mut violations = Vec::new();
    let capacity = instance.parameters().vehicle_capacity();

    for (idx, route) in solution.routes().iter().enumerate() {
        if !route.is_in_step() {
            violations.push(Violation::new(ViolationType::ScheduleInconsistent {
                route_index: idx,
            }));
            continue;
        }
        let load: i32 = route
            .customer_stops()
            .iter()
            .map(|&r| instance.request(r).demand())
            .sum();
        if load != route.used_size() {
            violations.push(Violation::new(ViolationType::ScheduleInconsistent {
                route_index: idx,
            }));
        }
        if load > capacity {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index: idx,
                load,
                capacity,
            }));
        }
        if let Some((position, arrival, close)) = first_late_stop(instance, route) {
            violations.push(Violation::new(ViolationType::TimeWindowViolated {
                route_index: idx,
                position,
                arrival,
                close,
            }));
        }
    }

    let mut visits = vec![0usize; instance.customers().len()];
    for (_, _, req) in solution.stops() {
        if let Some(slot) = instance.customer_slot(req) {
            visits[slot] += 1;
        }
    }
    for (slot, &count) in visits.iter().enumerate() {
        let customer_id = instance.customer(slot).id();
        if count > 1 {
            violations.push(Violation::new(ViolationType::CustomerServedTwice {
                customer_id,
                visits: count,
            }));
        }
        let flagged = solution.roster().is_routed(slot);
        if flagged != (count > 0) {
            violations.push(Violation::new(ViolationType::RosterMismatch {
                customer_id,
                flagged,
            }));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_objective_empty() {
        let inst = testing::two_customers(10);
        let sol = Solution::new(&inst);
        assert_eq!(objective(&inst, &sol), 0);
        assert!(verify(&inst, &sol).is_empty());
    }

    #[test]
    fn test_objective_sums_cost() {
        let inst = testing::two_customers(10);
        let mut sol = Solution::new(&inst);
        sol.insert(&inst, 0, 1, 1, 10);
        let shift = sol.route(0).insertion_shift(&inst, 2, 2).expect("feasible");
        sol.insert(&inst, 0, 2, 2, shift);
        // depot -> A -> B -> depot = 5 + 4 + 8
        assert_eq!(route_cost(&inst, sol.route(0)), 17);
        assert_eq!(objective(&inst, &sol), 17);
        assert!(check_time_window(&inst, sol.route(0)));
        assert!(check_all_requests(sol.roster()));
        assert!(verify(&inst, &sol).is_empty());
    }

    #[test]
    fn test_objective_uses_cost_not_time() {
        let inst = testing::line(2, 10);
        let mut sol = Solution::new(&inst);
        let shift = sol.route(0).insertion_shift(&inst, 2, 1).expect("feasible");
        sol.insert(&inst, 0, 2, 1, shift);
        // depot -> x=2 -> depot, cost is twice the time
        assert_eq!(objective(&inst, &sol), 8);
    }

    #[test]
    fn test_check_all_requests_partial() {
        let inst = testing::two_customers(10);
        let mut sol = Solution::new(&inst);
        sol.insert(&inst, 0, 1, 1, 10);
        assert!(!check_all_requests(sol.roster()));
    }

    #[test]
    fn test_verify_detects_duplicate_service() {
        let inst = testing::alternatives();
        let mut sol = Solution::new(&inst);
        let shift = sol.route(0).insertion_shift(&inst, 1, 1).expect("feasible");
        sol.insert(&inst, 0, 1, 1, shift);
        // bypass the roster to visit the second alternative as well
        let shift = sol.route(1).insertion_shift(&inst, 2, 1).expect("feasible");
        sol.route_mut(1).insert(&inst, 2, 1, shift);
        let violations = verify(&inst, &sol);
        assert!(violations.iter().any(|v| matches!(
            v.kind,
            ViolationType::CustomerServedTwice {
                customer_id: 1,
                visits: 2
            }
        )));
    }
}
