//! Request, time window and coordinate types.

use serde::{Deserialize, Serialize};

/// Earliest and latest permissible service start for one request.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::TimeWindow;
///
/// let tw = TimeWindow::new(10, 50).unwrap();
/// assert!(tw.contains(10));
/// assert!(!tw.contains(51));
/// assert!(TimeWindow::new(50, 10).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    open: i64,
    close: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `open > close`.
    pub fn new(open: i64, close: i64) -> Option<Self> {
        if open > close {
            return None;
        }
        Some(Self { open, close })
    }

    /// Earliest service start.
    pub fn open(&self) -> i64 {
        self.open
    }

    /// Latest service start.
    pub fn close(&self) -> i64 {
        self.close
    }

    /// Returns `true` if service may start at `time`.
    pub fn contains(&self, time: i64) -> bool {
        time >= self.open && time <= self.close
    }
}

/// A planar location, used only for relatedness distances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One candidate visit for a customer.
///
/// Several requests may share a `customer_id`: they are alternative service
/// locations for the same customer, and exactly one of them is visited once
/// the customer is routed. Whether a request is routed is tracked per
/// customer by the solution's [`Roster`](super::Roster), not on the request.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::{Request, TimeWindow};
///
/// let r = Request::new(7, 3, 4, TimeWindow::new(0, 60).unwrap());
/// assert_eq!(r.customer_id(), 7);
/// assert_eq!(r.location_id(), 3);
/// assert_eq!(r.demand(), 4);
///
/// let depot = Request::depot(0, 480);
/// assert_eq!(depot.demand(), 0);
/// assert_eq!(depot.time_window().close(), 480);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    customer_id: usize,
    location_id: usize,
    coordinate: Coordinate,
    demand: i32,
    time_window: TimeWindow,
}

impl Request {
    /// Creates a request for `customer_id` served at `location_id`.
    pub fn new(customer_id: usize, location_id: usize, demand: i32, time_window: TimeWindow) -> Self {
        Self {
            customer_id,
            location_id,
            coordinate: Coordinate::default(),
            demand,
            time_window,
        }
    }

    /// Creates a depot sentinel at `location_id` open over `[0, time_horizon]`.
    pub fn depot(location_id: usize, time_horizon: i64) -> Self {
        Self::new(0, location_id, 0, TimeWindow { open: 0, close: time_horizon.max(0) })
    }

    /// Sets the coordinate of this request's location.
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = coordinate;
        self
    }

    /// Sets the customer identity.
    pub fn with_customer_id(mut self, customer_id: usize) -> Self {
        self.customer_id = customer_id;
        self
    }

    /// Returns the external customer identifier.
    pub fn customer_id(&self) -> usize {
        self.customer_id
    }

    /// Returns the location index.
    pub fn location_id(&self) -> usize {
        self.location_id
    }

    /// Returns the coordinate of the location.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Returns the demand.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Returns the service window.
    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_valid() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert_eq!(tw.open(), 10);
        assert_eq!(tw.close(), 20);
    }

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20, 10).is_none());
        assert!(TimeWindow::new(5, 5).is_some());
    }

    #[test]
    fn test_time_window_contains() {
        let tw = TimeWindow::new(10, 20).expect("valid");
        assert!(tw.contains(10));
        assert!(tw.contains(20));
        assert!(!tw.contains(9));
        assert!(!tw.contains(21));
    }

    #[test]
    fn test_coordinate_distance() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_depot_request() {
        let d = Request::depot(2, 300);
        assert_eq!(d.location_id(), 2);
        assert_eq!(d.demand(), 0);
        assert_eq!(d.time_window().open(), 0);
        assert_eq!(d.time_window().close(), 300);
    }

    #[test]
    fn test_request_builder() {
        let r = Request::new(1, 4, 2, TimeWindow::new(0, 9).expect("valid"))
            .with_coordinate(Coordinate::new(1.5, 2.5))
            .with_customer_id(3);
        assert_eq!(r.customer_id(), 3);
        assert_eq!(r.coordinate(), Coordinate::new(1.5, 2.5));
    }
}
