//! Dense travel relation.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

/// Time, cost and distance for one ordered location pair.
///
/// The three fields are unrelated quantities and are never derived from one
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rate {
    /// Travel time.
    pub time: i64,
    /// Travel cost.
    pub cost: i64,
    /// Euclidean distance between the two coordinates.
    pub distance: f64,
}

impl Rate {
    /// Creates a rate with zero distance.
    pub fn new(time: i64, cost: i64) -> Self {
        Self {
            time,
            cost,
            distance: 0.0,
        }
    }
}

/// A dense n×n travel relation stored in row-major order.
///
/// Populated once by the loader and read-only afterwards; components receive
/// it by reference through [`Instance`](crate::models::Instance).
///
/// # Examples
///
/// ```
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(2);
/// travel.set_symmetric(0, 1, Rate::new(5, 7));
/// assert_eq!(travel.time(0, 1), 5);
/// assert_eq!(travel.cost(1, 0), 7);
/// assert_eq!(travel.size(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRelation {
    data: Vec<Rate>,
    size: usize,
}

impl TravelRelation {
    /// Creates a relation over `size` locations, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![Rate::default(); size * size],
            size,
        }
    }

    /// Creates a relation from an explicit n×n grid of rates.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<Rate>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the rate from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> &Rate {
        &self.data[from * self.size + to]
    }

    /// Sets the rate from `from` to `to`, keeping any distance already stored.
    pub fn set(&mut self, from: usize, to: usize, rate: Rate) {
        let slot = &mut self.data[from * self.size + to];
        let distance = slot.distance;
        *slot = rate;
        if rate.distance == 0.0 {
            slot.distance = distance;
        }
    }

    /// Sets the same rate in both directions.
    pub fn set_symmetric(&mut self, a: usize, b: usize, rate: Rate) {
        self.set(a, b, rate);
        self.set(b, a, rate);
    }

    /// Travel time from `from` to `to`.
    pub fn time(&self, from: usize, to: usize) -> i64 {
        self.get(from, to).time
    }

    /// Travel cost from `from` to `to`.
    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.get(from, to).cost
    }

    /// Euclidean distance from `from` to `to`.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).distance
    }

    /// Fills the distance field of every pair from location coordinates.
    ///
    /// `coordinates[i]` is the coordinate of location `i`; extra locations
    /// beyond `coordinates.len()` keep their current distance.
    pub fn fill_distances(&mut self, coordinates: &[Coordinate]) {
        let n = coordinates.len().min(self.size);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = coordinates[i].distance_to(&coordinates[j]);
                self.data[i * self.size + j].distance = d;
                self.data[j * self.size + i].distance = d;
            }
        }
    }

    /// Number of locations in this relation.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if time and cost are symmetric for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a.time != b.time || a.cost != b.cost {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero() {
        let travel = TravelRelation::new(3);
        assert_eq!(travel.size(), 3);
        assert_eq!(travel.time(1, 2), 0);
        assert_eq!(travel.cost(2, 1), 0);
        assert_eq!(travel.distance(0, 2), 0.0);
    }

    #[test]
    fn test_fields_stay_independent() {
        let mut travel = TravelRelation::new(2);
        travel.set(0, 1, Rate::new(5, 11));
        travel.fill_distances(&[Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 4.0)]);
        assert_eq!(travel.time(0, 1), 5);
        assert_eq!(travel.cost(0, 1), 11);
        assert!((travel.distance(0, 1) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_set_keeps_distance() {
        let mut travel = TravelRelation::new(2);
        travel.fill_distances(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)]);
        travel.set(1, 0, Rate::new(3, 3));
        assert!((travel.distance(1, 0) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_from_data() {
        let data = vec![
            Rate::default(),
            Rate::new(4, 6),
            Rate::new(4, 6),
            Rate::default(),
        ];
        let travel = TravelRelation::from_data(2, data).expect("valid");
        assert_eq!(travel.cost(0, 1), 6);
        assert!(travel.is_symmetric());
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(TravelRelation::from_data(2, vec![Rate::default(); 3]).is_none());
    }

    #[test]
    fn test_asymmetric() {
        let mut travel = TravelRelation::new(2);
        travel.set(0, 1, Rate::new(10, 10));
        travel.set(1, 0, Rate::new(15, 10));
        assert!(!travel.is_symmetric());
    }
}
