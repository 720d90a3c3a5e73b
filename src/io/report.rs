//! Route reports for display and JSON output.

use std::fmt;

use serde::Serialize;

use super::instance::LoadedInstance;
use crate::evaluation::{check_all_requests, check_time_window, objective, route_cost};
use crate::models::Solution;

/// One visited stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopReport {
    /// Customer name, `None` for the depot sentinels.
    pub customer: Option<String>,
    pub location: String,
    pub arrival: i64,
    pub start: i64,
    pub wait: i64,
}

/// One used route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    /// 1-based vehicle number.
    pub vehicle: usize,
    pub stops: Vec<StopReport>,
    pub cost: i64,
    pub load: i32,
    pub time_windows_ok: bool,
}

/// Human and machine readable summary of a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionReport {
    pub cost: i64,
    pub routes: Vec<RouteReport>,
    /// Names of the customers left unrouted.
    pub unrouted: Vec<String>,
    pub all_routed: bool,
}

impl SolutionReport {
    /// Builds the report of `solution`, skipping unused vehicles.
    pub fn new(loaded: &LoadedInstance, solution: &Solution) -> Self {
        let instance = &loaded.instance;
        let routes = solution
            .routes()
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_empty())
            .map(|(i, route)| RouteReport {
                vehicle: i + 1,
                stops: route
                    .stops()
                    .iter()
                    .enumerate()
                    .map(|(pos, &req)| StopReport {
                        customer: loaded.customer_name(req).map(str::to_string),
                        location: loaded.location_name(req).to_string(),
                        arrival: route.arriving_times()[pos],
                        start: route.start_times()[pos],
                        wait: route.wait_times()[pos],
                    })
                    .collect(),
                cost: route_cost(instance, route),
                load: route.used_size(),
                time_windows_ok: check_time_window(instance, route),
            })
            .collect();

        Self {
            cost: objective(instance, solution),
            routes,
            unrouted: solution
                .roster()
                .unrouted()
                .map(|slot| loaded.customer_names[slot].clone())
                .collect(),
            all_routed: check_all_requests(solution.roster()),
        }
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tRoute for problem:")?;
        for route in &self.routes {
            write!(f, "\t\tRoute {}:", route.vehicle)?;
            for stop in &route.stops {
                let name = stop.customer.as_deref().unwrap_or("depot");
                write!(f, "\t\t{}(id{})", name, stop.location)?;
            }
            write!(f, "\t(cost {}, load {})", route.cost, route.load)?;
            if !route.time_windows_ok {
                write!(f, "\tInvalid time window!")?;
            }
            writeln!(f)?;
        }
        if !self.all_routed {
            writeln!(f, "\tUnrouted: {}", self.unrouted.join(", "))?;
        }
        write!(f, "\twith cost: {}", self.cost)
    }
}
