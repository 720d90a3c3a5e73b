//! Destroy/repair large neighborhood search.
//!
//! - [`destroy`]: destroy operators (random, worst, Shaw)
//! - [`repair`]: insertion repair and the repair dispatcher
//! - [`SearchConfig`]: iteration budget, removal range, acceptance guard
//! - [`Search`]: the accept-if-improved controller
//! - [`VrptwProblem`]: bridge to the adaptive u-metaheur runner
//!
//! Operators are chosen uniformly; there is no weight adaptation. The
//! destroy and repair operators also implement the
//! [`u_metaheur::alns`] operator traits.

mod config;
pub mod destroy;
mod problem;
pub mod repair;
mod search;

pub use config::SearchConfig;
pub use problem::{VrptwProblem, UNROUTED_PENALTY};
pub use search::{solve, IterationOutcome, OperatorUsage, Search, SearchResult};
