//! Instance-wide constants.

use serde::{Deserialize, Serialize};

/// Instance-wide constants, immutable after load.
///
/// The fleet size defaults to the customer count: an upper bound that is not
/// meant to be fully used.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::Parameters;
///
/// let p = Parameters::new(25, 40, 480, 100);
/// assert_eq!(p.fleet_size(), 25);
/// assert_eq!(p.with_fleet_size(3).fleet_size(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    customer_count: usize,
    location_count: usize,
    time_horizon: i64,
    vehicle_capacity: i32,
    fleet_size: usize,
}

impl Parameters {
    /// Creates parameters with one vehicle per customer.
    pub fn new(
        customer_count: usize,
        location_count: usize,
        time_horizon: i64,
        vehicle_capacity: i32,
    ) -> Self {
        Self {
            customer_count,
            location_count,
            time_horizon,
            vehicle_capacity,
            fleet_size: customer_count,
        }
    }

    /// Overrides the number of vehicles.
    pub fn with_fleet_size(mut self, fleet_size: usize) -> Self {
        self.fleet_size = fleet_size;
        self
    }

    /// Declared number of customers.
    pub fn customer_count(&self) -> usize {
        self.customer_count
    }

    /// Declared number of locations.
    pub fn location_count(&self) -> usize {
        self.location_count
    }

    /// Global close-of-day deadline.
    pub fn time_horizon(&self) -> i64 {
        self.time_horizon
    }

    /// Capacity of every vehicle.
    pub fn vehicle_capacity(&self) -> i32 {
        self.vehicle_capacity
    }

    /// Number of vehicles.
    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }
}
