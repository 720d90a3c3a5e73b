//! Insertion construction for building and repairing solutions.
//!
//! - [`Construction::GreedyRatio`]: minimum of `100 / (shift * edge cost)`
//! - [`Construction::Score`]: maximum of the same ratio
//! - [`Construction::CheapestDetour`]: maximum of `100 / detour cost`
//! - [`Construction::Regret`]: regret-k on the detour cost per route
//!
//! All rules share the feasibility test of
//! [`Route::insertion_shift`](crate::feasibility::Route::insertion_shift).

mod insertion;
mod regret;

pub use insertion::{construct, Construction, ConstructionOutcome};
