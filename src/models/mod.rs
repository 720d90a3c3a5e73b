//! Domain model types for technician routing with time windows.
//!
//! Provides the instance-wide parameters, requests with alternative service
//! locations, the immutable [`Instance`], the per-solution [`Roster`] of
//! routed customers, and the [`Solution`] that ties routes and roster
//! together.

mod instance;
mod parameters;
mod request;
mod roster;
mod solution;

pub use instance::{Customer, Instance, InstanceError};
pub use parameters::Parameters;
pub use request::{Coordinate, Request, TimeWindow};
pub use roster::Roster;
pub use solution::{Solution, Violation, ViolationType};
