//! Regret-k selection.
//!
//! For each pending customer the cheapest feasible detour is collected per
//! route. The regret is the sum of the gaps between the best route and the
//! next `k - 1`. Customers with fewer than `k` feasible routes go first,
//! fewest options first.

use super::insertion::{detour_cost, for_each_candidate, Candidate};
use crate::models::{Instance, Solution};

/// Best regret-k insertion, or `None` when nothing fits.
pub(crate) fn best_regret(
    instance: &Instance,
    solution: &Solution,
    requests: &[usize],
    k: usize,
) -> Option<Candidate> {
    let k = k.max(2);
    let num_customers = instance.customers().len();
    let num_routes = solution.num_routes();

    // per customer slot, per route: cheapest (detour, candidate)
    let mut table: Vec<Vec<Option<(i64, Candidate)>>> = vec![vec![None; num_routes]; num_customers];
    for_each_candidate(instance, solution, requests, |c| {
        let Some(slot) = instance.customer_slot(c.request) else {
            return;
        };
        let detour = detour_cost(instance, solution, &c);
        let entry = &mut table[slot][c.route];
        if entry.is_none_or(|(d, _)| detour < d) {
            *entry = Some((detour, c));
        }
    });

    // (missing options, regret) compared lexicographically, larger wins
    let mut best: Option<((usize, i64), Candidate)> = None;
    for per_route in &table {
        let mut options: Vec<(i64, Candidate)> = per_route.iter().flatten().copied().collect();
        if options.is_empty() {
            continue;
        }
        // stable: ties keep route order
        options.sort_by_key(|&(d, _)| d);
        let cheapest = options[0].0;
        let regret: i64 = options
            .iter()
            .skip(1)
            .take(k - 1)
            .map(|&(d, _)| d - cheapest)
            .sum();
        let missing = k.saturating_sub(options.len());
        let key = (missing, regret);
        if best.as_ref().is_none_or(|(b, _)| key > *b) {
            best = Some((key, options[0].1));
        }
    }
    best.map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::insertion::pending_requests;
    use crate::testing;

    #[test]
    fn test_regret_prefers_fewer_options() {
        // capacity 10, one vehicle: every customer has exactly one route
        let inst = testing::two_customers_with_fleet(10, 1);
        let sol = Solution::new(&inst);
        let pending = pending_requests(&inst, &sol);
        let c = best_regret(&inst, &sol, &pending, 2).expect("feasible");
        // both customers miss one option; regret ties at 0 so slot order wins
        assert_eq!(c.request, 1);
    }

    #[test]
    fn test_regret_none_when_nothing_fits() {
        let inst = testing::tight_deadline();
        let sol = Solution::new(&inst);
        let pending = pending_requests(&inst, &sol);
        assert!(best_regret(&inst, &sol, &pending, 3).is_none());
    }

    #[test]
    fn test_regret_largest_gap_wins() {
        let inst = testing::two_customers(10);
        let mut sol = Solution::new(&inst);
        // A on route 0: B now costs 7 there, 16 on the empty route 1
        let shift = sol.route(0).insertion_shift(&inst, 1, 1).expect("feasible");
        sol.insert(&inst, 0, 1, 1, shift);
        let pending = pending_requests(&inst, &sol);
        let c = best_regret(&inst, &sol, &pending, 2).expect("feasible");
        assert_eq!((c.route, c.request), (0, 2));
    }
}
