//! Objective evaluation and read-only feasibility diagnostics.

mod objective;

pub use objective::{check_all_requests, check_time_window, objective, route_cost, verify};
