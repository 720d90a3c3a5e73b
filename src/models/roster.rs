//! Per-solution routed table.

use serde::Serialize;

/// Routed status of every customer, one flag per customer slot.
///
/// All alternatives of a customer share one flag, so routing any alternative
/// marks them all and unrouting clears them all.
///
/// # Examples
///
/// ```
/// use u_vrptw::models::Roster;
///
/// let mut roster = Roster::new(2);
/// roster.mark_routed(1);
/// assert!(roster.is_routed(1));
/// assert!(!roster.all_routed());
/// assert_eq!(roster.unrouted().collect::<Vec<_>>(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    routed: Vec<bool>,
}

impl Roster {
    /// Creates a roster with every customer unrouted.
    pub fn new(num_customers: usize) -> Self {
        Self {
            routed: vec![false; num_customers],
        }
    }

    /// Returns `true` if customer `slot` is routed.
    pub fn is_routed(&self, slot: usize) -> bool {
        self.routed[slot]
    }

    /// Marks customer `slot` routed.
    pub fn mark_routed(&mut self, slot: usize) {
        self.routed[slot] = true;
    }

    /// Marks customer `slot` unrouted.
    pub fn unmark(&mut self, slot: usize) {
        self.routed[slot] = false;
    }

    /// Returns `true` when every customer is routed.
    pub fn all_routed(&self) -> bool {
        self.routed.iter().all(|&r| r)
    }

    /// Number of customers tracked.
    pub fn num_customers(&self) -> usize {
        self.routed.len()
    }

    /// Number of routed customers.
    pub fn routed_count(&self) -> usize {
        self.routed.iter().filter(|&&r| r).count()
    }

    /// Number of unrouted customers.
    pub fn unrouted_count(&self) -> usize {
        self.routed.len() - self.routed_count()
    }

    /// Slots of the customers not yet routed.
    pub fn unrouted(&self) -> impl Iterator<Item = usize> + '_ {
        self.routed
            .iter()
            .enumerate()
            .filter(|(_, &r)| !r)
            .map(|(slot, _)| slot)
    }
}
