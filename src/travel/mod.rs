//! Travel relation between locations.
//!
//! Every ordered location pair carries three independent scalars: travel
//! time (feasibility), travel cost (objective and insertion scoring) and
//! Euclidean distance (relatedness scoring only).

mod relation;

pub use relation::{Rate, TravelRelation};
