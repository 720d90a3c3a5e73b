//! Instance loading and solution reporting.

pub mod instance;
pub mod report;

pub use instance::{load_instance, parse_instance, LoadedInstance, ParseError, ParseErrorKind};
pub use report::{RouteReport, SolutionReport, StopReport};
