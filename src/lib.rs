//! # u-vrptw
//!
//! Technician routing with time windows: every customer must be visited by
//! one vehicle within its time window, at one of its alternative service
//! locations, without exceeding vehicle capacity. Solutions are built by
//! insertion construction and improved by destroy/repair search.
//!
//! ## Modules
//!
//! - [`models`]: instance, requests, roster and solution types
//! - [`travel`]: pairwise travel time, cost and distance
//! - [`feasibility`]: route schedule with forward time-slack bookkeeping
//! - [`constructive`]: insertion construction (greedy ratio, score, cheapest detour, regret)
//! - [`alns`]: destroy operators, repair dispatcher and search controller
//! - [`evaluation`]: objective and feasibility diagnostics
//! - [`io`]: instance file loader and solution reports

pub mod alns;
pub mod constructive;
pub mod evaluation;
pub mod feasibility;
pub mod io;
pub mod models;
pub mod travel;

#[cfg(test)]
mod testing;
