//! [`AlnsProblem`](u_metaheur::alns::AlnsProblem) bridge.
//!
//! Lets the destroy and repair operators run under the adaptive
//! u-metaheur runner instead of [`Search`](super::Search).

use rand::Rng;
use u_metaheur::alns::AlnsProblem;

use crate::constructive::{construct, Construction};
use crate::evaluation::objective;
use crate::models::{Instance, Solution};

/// Cost added per unrouted customer.
pub const UNROUTED_PENALTY: f64 = 10_000.0;

/// ALNS problem over one instance.
///
/// # Examples
///
/// ```
/// use u_metaheur::alns::{AlnsConfig, AlnsRunner};
/// use u_vrptw::alns::destroy::RandomRemoval;
/// use u_vrptw::alns::repair::InsertionRepair;
/// use u_vrptw::alns::VrptwProblem;
/// use u_vrptw::constructive::Construction;
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
/// let problem = VrptwProblem::new(&instance);
/// let destroy_ops = vec![RandomRemoval::new(&instance)];
/// let repair_ops = vec![InsertionRepair::new(&instance, Construction::CheapestDetour)];
/// let config = AlnsConfig::default().with_max_iterations(100).with_seed(42);
///
/// let result = AlnsRunner::run(&problem, &destroy_ops, &repair_ops, &config);
/// assert!(result.best.roster().all_routed());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VrptwProblem<'a> {
    instance: &'a Instance,
}

impl<'a> VrptwProblem<'a> {
    /// Creates a problem over `instance`.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }
}

impl AlnsProblem for VrptwProblem<'_> {
    type Solution = Solution;

    fn initial_solution<R: Rng>(&self, _rng: &mut R) -> Solution {
        let mut sol = Solution::new(self.instance);
        construct(self.instance, &mut sol, Construction::GreedyRatio);
        sol
    }

    fn cost(&self, solution: &Solution) -> f64 {
        objective(self.instance, solution) as f64
            + solution.num_unrouted() as f64 * UNROUTED_PENALTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alns::destroy::{ShawRemoval, WorstRemoval};
    use crate::alns::repair::InsertionRepair;
    use crate::testing;
    use u_metaheur::alns::{AlnsConfig, AlnsRunner};

    #[test]
    fn test_initial_solution() {
        let inst = testing::two_customers(10);
        let problem = VrptwProblem::new(&inst);
        let mut rng = u_numflow::random::create_rng(42);
        let sol = problem.initial_solution(&mut rng);
        assert!(sol.roster().all_routed());
        assert!((problem.cost(&sol) - 26.0).abs() < 1e-10);
    }

    #[test]
    fn test_cost_penalizes_unrouted() {
        let inst = testing::two_customers(10);
        let problem = VrptwProblem::new(&inst);
        let empty = Solution::new(&inst);
        assert!((problem.cost(&empty) - 2.0 * UNROUTED_PENALTY).abs() < 1e-10);
    }

    #[test]
    fn test_alns_runner_worst_removal() {
        let inst = testing::line(5, 2);
        let problem = VrptwProblem::new(&inst);
        let destroy_ops = vec![WorstRemoval::new(&inst)];
        let repair_ops = vec![InsertionRepair::new(&inst, Construction::Score)];
        let config = AlnsConfig::default().with_max_iterations(200).with_seed(42);

        let result = AlnsRunner::run(&problem, &destroy_ops, &repair_ops, &config);
        assert!(result.best.roster().all_routed());
        assert!(result.best_cost < UNROUTED_PENALTY);
    }

    #[test]
    fn test_alns_runner_shaw_regret() {
        let inst = testing::line(5, 2);
        let problem = VrptwProblem::new(&inst);
        let destroy_ops = vec![ShawRemoval::new(&inst)];
        let repair_ops = vec![InsertionRepair::new(&inst, Construction::Regret(2))];
        let config = AlnsConfig::default().with_max_iterations(200).with_seed(42);

        let result = AlnsRunner::run(&problem, &destroy_ops, &repair_ops, &config);
        assert!(result.best.roster().all_routed());
    }
}
