//! Route feasibility engine.
//!
//! A [`Route`] keeps five auxiliary sequences in lock-step with its stops
//! (arrival, wait, start, shift, max shift) so that the feasibility of an
//! insertion can be decided in constant time, and propagates time shifts
//! forward and slack backward after every structural change.
//!
//! # Reference
//!
//! Savelsbergh, M.W.P. (1992). "The Vehicle Routing Problem with Time
//! Windows: Minimizing Route Duration", *ORSA Journal on Computing* 4(2),
//! 146-154.

mod route;

pub use route::Route;
