//! Problem instance: parameters, request roster template, travel relation.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use super::{Parameters, Request};
use crate::travel::TravelRelation;

/// A customer and the requests that can serve it.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: usize,
    demand: i32,
    alternatives: Vec<usize>,
}

impl Customer {
    /// External customer identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Demand, shared by every alternative.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Request indices of the alternative service locations.
    pub fn alternatives(&self) -> &[usize] {
        &self.alternatives
    }
}

/// Reasons an instance cannot be assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    /// Fewer than the two depot sentinels.
    TooFewRequests { found: usize },
    /// A depot sentinel carries demand.
    DepotDemand { request: usize, demand: i32 },
    /// A request refers to a location outside the travel relation.
    UnknownLocation { request: usize, location: usize },
    /// Alternatives of one customer disagree on demand.
    InconsistentDemand { customer_id: usize },
    /// The declared customer count doesn't match the requests.
    CustomerCountMismatch { declared: usize, found: usize },
    /// Negative capacity or time horizon.
    InvalidParameters(String),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewRequests { found } => {
                write!(f, "expected start and end depot, found {found} request(s)")
            }
            Self::DepotDemand { request, demand } => {
                write!(f, "depot request {request} has demand {demand}")
            }
            Self::UnknownLocation { request, location } => {
                write!(f, "request {request} refers to unknown location {location}")
            }
            Self::InconsistentDemand { customer_id } => {
                write!(f, "alternatives of customer {customer_id} disagree on demand")
            }
            Self::CustomerCountMismatch { declared, found } => {
                write!(f, "declared {declared} customers, found {found}")
            }
            Self::InvalidParameters(msg) => write!(f, "invalid parameters: {msg}"),
        }
    }
}

impl Error for InstanceError {}

/// An immutable problem instance.
///
/// Requests are addressed by index: index 0 is the start depot, the last
/// index is the end depot, everything in between is a candidate customer
/// visit. Customers are addressed by a dense *slot* in `0..customers().len()`.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{Instance, Parameters, Request, TimeWindow};
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(3);
/// travel.set_symmetric(0, 1, Rate::new(5, 5));
/// travel.set_symmetric(0, 2, Rate::new(6, 6));
/// travel.set_symmetric(1, 2, Rate::new(2, 2));
///
/// let tw = TimeWindow::new(0, 100).unwrap();
/// let requests = vec![
///     Request::depot(0, 100),
///     Request::new(1, 1, 3, tw), // customer 1 at location 1
///     Request::new(1, 2, 3, tw), // ... or at location 2
///     Request::depot(0, 100),
/// ];
/// let instance = Instance::new(Parameters::new(1, 3, 100, 10), requests, travel).unwrap();
/// assert_eq!(instance.customers().len(), 1);
/// assert_eq!(instance.customer(0).alternatives(), &[1, 2]);
/// assert_eq!(instance.customer_slot(0), None);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    parameters: Parameters,
    requests: Vec<Request>,
    travel: TravelRelation,
    customers: Vec<Customer>,
    slot_of: Vec<Option<usize>>,
}

impl Instance {
    /// Assembles and validates an instance.
    pub fn new(
        parameters: Parameters,
        requests: Vec<Request>,
        travel: TravelRelation,
    ) -> Result<Self, InstanceError> {
        if requests.len() < 2 {
            return Err(InstanceError::TooFewRequests {
                found: requests.len(),
            });
        }
        if parameters.vehicle_capacity() < 0 {
            return Err(InstanceError::InvalidParameters(format!(
                "vehicle capacity {} is negative",
                parameters.vehicle_capacity()
            )));
        }
        if parameters.time_horizon() < 0 {
            return Err(InstanceError::InvalidParameters(format!(
                "time horizon {} is negative",
                parameters.time_horizon()
            )));
        }

        let last = requests.len() - 1;
        for (idx, req) in requests.iter().enumerate() {
            if req.location_id() >= travel.size() {
                return Err(InstanceError::UnknownLocation {
                    request: idx,
                    location: req.location_id(),
                });
            }
            if (idx == 0 || idx == last) && req.demand() != 0 {
                return Err(InstanceError::DepotDemand {
                    request: idx,
                    demand: req.demand(),
                });
            }
        }

        let mut customers: Vec<Customer> = Vec::new();
        let mut by_id: HashMap<usize, usize> = HashMap::new();
        let mut slot_of = vec![None; requests.len()];
        for (idx, req) in requests.iter().enumerate().take(last).skip(1) {
            let slot = *by_id.entry(req.customer_id()).or_insert_with(|| {
                customers.push(Customer {
                    id: req.customer_id(),
                    demand: req.demand(),
                    alternatives: Vec::new(),
                });
                customers.len() - 1
            });
            if customers[slot].demand != req.demand() {
                return Err(InstanceError::InconsistentDemand {
                    customer_id: req.customer_id(),
                });
            }
            customers[slot].alternatives.push(idx);
            slot_of[idx] = Some(slot);
        }

        if customers.len() != parameters.customer_count() {
            return Err(InstanceError::CustomerCountMismatch {
                declared: parameters.customer_count(),
                found: customers.len(),
            });
        }

        Ok(Self {
            parameters,
            requests,
            travel,
            customers,
            slot_of,
        })
    }

    /// Returns the instance parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the travel relation.
    pub fn travel(&self) -> &TravelRelation {
        &self.travel
    }

    /// All requests, depot sentinels included.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Returns the request at `index`.
    pub fn request(&self, index: usize) -> &Request {
        &self.requests[index]
    }

    /// Location of the request at `index`.
    pub fn location_of(&self, index: usize) -> usize {
        self.requests[index].location_id()
    }

    /// Request index of the start depot.
    pub fn start_depot(&self) -> usize {
        0
    }

    /// Request index of the end depot.
    pub fn end_depot(&self) -> usize {
        self.requests.len() - 1
    }

    /// Request indices that are candidate customer visits.
    pub fn customer_requests(&self) -> std::ops::Range<usize> {
        1..self.requests.len() - 1
    }

    /// Returns the customer table, indexed by slot.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Returns the customer at `slot`.
    pub fn customer(&self, slot: usize) -> &Customer {
        &self.customers[slot]
    }

    /// Customer slot served by the request at `index` (`None` for depots).
    pub fn customer_slot(&self, index: usize) -> Option<usize> {
        self.slot_of[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;
    use crate::travel::TravelRelation;

    fn window() -> TimeWindow {
        TimeWindow::new(0, 100).expect("valid")
    }

    #[test]
    fn test_customer_table() {
        let requests = vec![
            Request::depot(0, 100),
            Request::new(5, 1, 2, window()),
            Request::new(9, 2, 4, window()),
            Request::new(5, 3, 2, window()),
            Request::depot(0, 100),
        ];
        let inst = Instance::new(Parameters::new(2, 4, 100, 10), requests, TravelRelation::new(4))
            .expect("valid");
        assert_eq!(inst.customers().len(), 2);
        assert_eq!(inst.customer(0).id(), 5);
        assert_eq!(inst.customer(0).alternatives(), &[1, 3]);
        assert_eq!(inst.customer(1).demand(), 4);
        assert_eq!(inst.customer_slot(3), Some(0));
        assert_eq!(inst.customer_slot(4), None);
        assert_eq!(inst.customer_requests(), 1..4);
        assert_eq!(inst.end_depot(), 4);
    }

    #[test]
    fn test_too_few_requests() {
        let err = Instance::new(
            Parameters::new(0, 1, 100, 10),
            vec![Request::depot(0, 100)],
            TravelRelation::new(1),
        )
        .unwrap_err();
        assert_eq!(err, InstanceError::TooFewRequests { found: 1 });
    }

    #[test]
    fn test_unknown_location() {
        let requests = vec![
            Request::depot(0, 100),
            Request::new(1, 7, 1, window()),
            Request::depot(0, 100),
        ];
        let err = Instance::new(Parameters::new(1, 2, 100, 10), requests, TravelRelation::new(2))
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::UnknownLocation {
                request: 1,
                location: 7
            }
        );
    }

    #[test]
    fn test_depot_demand() {
        let requests = vec![
            Request::new(0, 0, 3, window()),
            Request::depot(0, 100),
        ];
        let err = Instance::new(Parameters::new(0, 1, 100, 10), requests, TravelRelation::new(1))
            .unwrap_err();
        assert!(matches!(err, InstanceError::DepotDemand { request: 0, .. }));
    }

    #[test]
    fn test_inconsistent_demand() {
        let requests = vec![
            Request::depot(0, 100),
            Request::new(1, 1, 2, window()),
            Request::new(1, 1, 3, window()),
            Request::depot(0, 100),
        ];
        let err = Instance::new(Parameters::new(1, 2, 100, 10), requests, TravelRelation::new(2))
            .unwrap_err();
        assert_eq!(err, InstanceError::InconsistentDemand { customer_id: 1 });
    }

    #[test]
    fn test_customer_count_mismatch() {
        let requests = vec![
            Request::depot(0, 100),
            Request::new(1, 1, 2, window()),
            Request::depot(0, 100),
        ];
        let err = Instance::new(Parameters::new(3, 2, 100, 10), requests, TravelRelation::new(2))
            .unwrap_err();
        assert_eq!(
            err,
            InstanceError::CustomerCountMismatch {
                declared: 3,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "declared 3 customers, found 1");
    }
}
