//! Route with forward time-slack bookkeeping.

use serde::Serialize;

use crate::models::Instance;

/// An ordered sequence of request visits assigned to one technician.
///
/// Index 0 and index `len() - 1` are the start and end depot sentinels; they
/// are never removed or reordered. Five auxiliary sequences run in lock-step
/// with the stops, one entry per stop:
///
/// - `arriving_time[i]`: arrival at stop `i`
/// - `wait_time[i]`: idle time before the window of stop `i` opens
/// - `start_time[i]`: service start at stop `i`
/// - `shift[i]`: delay being pushed through stop `i` while an insertion
///   propagates; zero on every committed route
/// - `max_shift[i]`: largest delay stop `i` can absorb without breaking any
///   later deadline
///
/// Stops are request indices into the owning [`Instance`].
///
/// # Examples
///
/// ```
/// use u_vrptw::feasibility::Route;
/// use u_vrptw::models::{Instance, Parameters, Request, TimeWindow};
/// use u_vrptw::travel::{Rate, TravelRelation};
///
/// let mut travel = TravelRelation::new(2);
/// travel.set_symmetric(0, 1, Rate::new(5, 5));
/// let requests = vec![
///     Request::depot(0, 100),
///     Request::new(1, 1, 3, TimeWindow::new(0, 50).unwrap()),
///     Request::depot(0, 100),
/// ];
/// let instance = Instance::new(Parameters::new(1, 2, 100, 10), requests, travel).unwrap();
///
/// let route = Route::new(&instance);
/// assert!(route.is_empty());
/// assert_eq!(route.insertion_shift(&instance, 1, 1), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    stops: Vec<usize>,
    arriving_time: Vec<i64>,
    wait_time: Vec<i64>,
    start_time: Vec<i64>,
    shift: Vec<i64>,
    max_shift: Vec<i64>,
    used_size: i32,
}

impl Route {
    /// Creates a depot-only route with a fully computed schedule.
    pub fn new(instance: &Instance) -> Self {
        let mut route = Self {
            stops: vec![instance.start_depot(), instance.end_depot()],
            arriving_time: vec![0; 2],
            wait_time: vec![0; 2],
            start_time: vec![0; 2],
            shift: vec![0; 2],
            max_shift: vec![0; 2],
            used_size: 0,
        };
        route.refresh(instance);
        route
    }

    /// All stops, depot sentinels included.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Stops between the two depot sentinels.
    pub fn customer_stops(&self) -> &[usize] {
        &self.stops[1..self.stops.len() - 1]
    }

    /// Number of stops, depot sentinels included.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Number of non-depot stops.
    pub fn num_customers(&self) -> usize {
        self.stops.len() - 2
    }

    /// Returns `true` if the route only holds its two depot sentinels.
    pub fn is_empty(&self) -> bool {
        self.stops.len() <= 2
    }

    /// Index of the end depot sentinel.
    pub fn last(&self) -> usize {
        self.stops.len() - 1
    }

    /// Cumulative demand of the non-depot stops.
    pub fn used_size(&self) -> i32 {
        self.used_size
    }

    /// Returns the arrival time at every stop.
    pub fn arriving_times(&self) -> &[i64] {
        &self.arriving_time
    }

    /// Returns the wait time at every stop.
    pub fn wait_times(&self) -> &[i64] {
        &self.wait_time
    }

    /// Returns the service start at every stop.
    pub fn start_times(&self) -> &[i64] {
        &self.start_time
    }

    /// Returns the pending shifts (all zero on a committed route).
    pub fn shifts(&self) -> &[i64] {
        &self.shift
    }

    /// Returns the absorbable delay at every stop.
    pub fn max_shifts(&self) -> &[i64] {
        &self.max_shift
    }

    /// Position of `request` in this route, if it is visited.
    pub fn position_of(&self, request: usize) -> Option<usize> {
        self.stops[1..self.last()]
            .iter()
            .position(|&r| r == request)
            .map(|p| p + 1)
    }

    /// Returns `true` if every auxiliary sequence has one entry per stop.
    pub fn is_in_step(&self) -> bool {
        let n = self.stops.len();
        self.arriving_time.len() == n
            && self.wait_time.len() == n
            && self.start_time.len() == n
            && self.shift.len() == n
            && self.max_shift.len() == n
    }

    /// Arrival at `request` if it were inserted before the stop at `pos`.
    pub fn arriving_time_for(&self, instance: &Instance, request: usize, pos: usize) -> i64 {
        let prev = instance.location_of(self.stops[pos - 1]);
        self.start_time[pos - 1] + instance.travel().time(prev, instance.location_of(request))
    }

    /// Wait at `request` if it were inserted before the stop at `pos`.
    pub fn wait_time_for(&self, instance: &Instance, request: usize, pos: usize) -> i64 {
        let open = instance.request(request).time_window().open();
        (open - self.arriving_time_for(instance, request, pos)).max(0)
    }

    /// Service start at `request` if it were inserted before the stop at `pos`.
    pub fn start_time_for(&self, instance: &Instance, request: usize, pos: usize) -> i64 {
        let open = instance.request(request).time_window().open();
        open.max(self.arriving_time_for(instance, request, pos))
    }

    /// Net time the insertion of `request` before the stop at `pos` injects
    /// into the route.
    pub fn shift_for(&self, instance: &Instance, request: usize, pos: usize) -> i64 {
        let travel = instance.travel();
        let prev = instance.location_of(self.stops[pos - 1]);
        let next = instance.location_of(self.stops[pos]);
        let loc = instance.location_of(request);
        travel.time(prev, loc) + self.wait_time_for(instance, request, pos) + travel.time(loc, next)
            - travel.time(prev, next)
    }

    /// Tests inserting `request` before the stop at `pos`.
    ///
    /// Returns the injected shift when the insertion is feasible with respect
    /// to capacity, the request's own deadline, and every downstream deadline.
    /// `pos` must lie in `1..len()`.
    pub fn insertion_shift(&self, instance: &Instance, request: usize, pos: usize) -> Option<i64> {
        debug_assert!(pos >= 1 && pos < self.stops.len());
        let req = instance.request(request);
        if req.demand() + self.used_size > instance.parameters().vehicle_capacity() {
            return None;
        }
        if req.time_window().close() <= self.arriving_time_for(instance, request, pos) {
            return None;
        }
        let shift = self.shift_for(instance, request, pos);
        if shift > self.wait_time[pos] + self.max_shift[pos] {
            return None;
        }
        Some(shift)
    }

    /// Splices `request` in before the stop at `pos` and propagates the
    /// injected `shift` forward and the slack backward.
    ///
    /// The caller updates the roster; see [`Solution::insert`](crate::models::Solution::insert).
    pub(crate) fn insert(&mut self, instance: &Instance, request: usize, pos: usize, shift: i64) {
        let arriving = self.arriving_time_for(instance, request, pos);
        let wait = self.wait_time_for(instance, request, pos);
        let start = self.start_time_for(instance, request, pos);

        self.stops.insert(pos, request);
        self.arriving_time.insert(pos, arriving);
        self.wait_time.insert(pos, wait);
        self.start_time.insert(pos, start);
        self.shift.insert(pos, shift);
        self.max_shift.insert(pos, 0);
        self.used_size += instance.request(request).demand();

        self.propagate_forward(pos);
        self.propagate_backward(instance, pos);
    }

    /// Removes the stops at `positions` and recomputes the whole schedule.
    ///
    /// Positions are deduplicated and removed in descending order; depot
    /// positions are ignored. Returns the removed request indices.
    pub(crate) fn remove_positions(
        &mut self,
        instance: &Instance,
        positions: &mut Vec<usize>,
    ) -> Vec<usize> {
        let last = self.last();
        positions.retain(|&p| p > 0 && p < last);
        positions.sort_unstable_by(|a, b| b.cmp(a));
        positions.dedup();

        let mut removed = Vec::with_capacity(positions.len());
        for &pos in positions.iter() {
            let request = self.stops.remove(pos);
            self.arriving_time.remove(pos);
            self.wait_time.remove(pos);
            self.start_time.remove(pos);
            self.shift.remove(pos);
            self.max_shift.remove(pos);
            self.used_size -= instance.request(request).demand();
            removed.push(request);
        }

        if !removed.is_empty() {
            self.refresh(instance);
        }
        removed
    }

    /// Recomputes every auxiliary sequence from the stop order.
    ///
    /// Forward pass for arrival, start and wait; shifts reset to zero; then a
    /// backward max-shift pass anchored at `time_horizon - start[last]`.
    pub fn refresh(&mut self, instance: &Instance) {
        let travel = instance.travel();
        for i in 1..self.stops.len() {
            let prev = instance.location_of(self.stops[i - 1]);
            let cur = instance.location_of(self.stops[i]);
            let open = instance.request(self.stops[i]).time_window().open();
            let arriving = self.start_time[i - 1] + travel.time(prev, cur);
            self.arriving_time[i] = arriving;
            self.start_time[i] = open.max(arriving);
            self.wait_time[i] = (open - arriving).max(0);
        }
        self.shift.iter_mut().for_each(|s| *s = 0);

        let last = self.last();
        self.max_shift[last] = instance.parameters().time_horizon() - self.start_time[last];
        self.propagate_backward(instance, last - 1);
    }

    /// Pushes the shift injected at `pos` into the following stops until
    /// waiting time absorbs it completely, then clears the touched shifts.
    fn propagate_forward(&mut self, pos: usize) {
        let mut end = self.stops.len() - 1;
        for i in (pos + 1)..self.stops.len() {
            let wait_before = self.wait_time[i];
            let incoming = self.shift[i - 1];
            self.wait_time[i] = (wait_before - incoming).max(0);
            self.arriving_time[i] += incoming;
            self.shift[i] = (incoming - wait_before).max(0);
            if self.shift[i] == 0 {
                end = i;
                break;
            }
            self.start_time[i] += self.shift[i];
            self.max_shift[i] -= self.shift[i];
        }
        self.shift[pos..=end].iter_mut().for_each(|s| *s = 0);
    }

    /// Recomputes `max_shift` from `from` down to the start depot.
    fn propagate_backward(&mut self, instance: &Instance, from: usize) {
        for i in (0..=from).rev() {
            let close = instance.request(self.stops[i]).time_window().close();
            self.max_shift[i] =
                (close - self.start_time[i]).min(self.wait_time[i + 1] + self.max_shift[i + 1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_new_route_schedule() {
        let instance = testing::two_customers(10);
        let route = Route::new(&instance);
        assert_eq!(route.stops(), &[0, 3]);
        assert!(route.is_empty());
        assert!(route.is_in_step());
        assert_eq!(route.start_times(), &[0, 0]);
        // end depot: horizon - start
        assert_eq!(route.max_shifts()[1], 200);
        assert_eq!(route.max_shifts()[0], 200);
    }

    #[test]
    fn test_insertion_primitives() {
        let instance = testing::two_customers(10);
        let route = Route::new(&instance);
        // B: window [10, 50], depot->B time 8
        assert_eq!(route.arriving_time_for(&instance, 2, 1), 8);
        assert_eq!(route.wait_time_for(&instance, 2, 1), 2);
        assert_eq!(route.start_time_for(&instance, 2, 1), 10);
        assert_eq!(route.shift_for(&instance, 2, 1), 18);
        assert_eq!(route.insertion_shift(&instance, 2, 1), Some(18));
    }

    #[test]
    fn test_insert_updates_schedule() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 2, 1, 18);
        assert_eq!(route.stops(), &[0, 2, 3]);
        assert!(route.is_in_step());
        assert_eq!(route.used_size(), 4);
        assert_eq!(route.arriving_times(), &[0, 8, 18]);
        assert_eq!(route.wait_times(), &[0, 2, 0]);
        assert_eq!(route.start_times(), &[0, 10, 18]);
        assert_eq!(route.max_shifts(), &[42, 40, 182]);
    }

    #[test]
    fn test_forward_shift_absorbed_by_wait() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 2, 1, 18);
        // A before B: arrive 5, B now reached at 9 and still waits until 10
        let shift = route.insertion_shift(&instance, 1, 1).expect("feasible");
        assert_eq!(shift, 1);
        route.insert(&instance, 1, 1, shift);
        assert_eq!(route.stops(), &[0, 1, 2, 3]);
        assert_eq!(route.arriving_times(), &[0, 5, 9, 18]);
        assert_eq!(route.wait_times(), &[0, 0, 1, 0]);
        assert_eq!(route.start_times(), &[0, 5, 10, 18]);
        assert_eq!(route.max_shifts()[2], 40);
        assert_eq!(route.max_shifts()[1], 41);
    }

    #[test]
    fn test_forward_shift_reaches_end_depot() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 1, 1, 10);
        // B after A: arrive 9, wait 1, start 10, end depot pushed by 8
        let shift = route.insertion_shift(&instance, 2, 2).expect("feasible");
        assert_eq!(shift, 8);
        route.insert(&instance, 2, 2, shift);
        assert_eq!(route.start_times(), &[0, 5, 10, 18]);
        assert_eq!(route.max_shifts()[3], 182);
        assert_eq!(route.max_shifts()[2], 40);
    }

    #[test]
    fn test_capacity_blocks_insertion() {
        let instance = testing::two_customers(5);
        let mut route = Route::new(&instance);
        route.insert(&instance, 1, 1, 10);
        assert_eq!(route.insertion_shift(&instance, 2, 1), None);
        assert_eq!(route.insertion_shift(&instance, 2, 2), None);
    }

    #[test]
    fn test_deadline_blocks_insertion() {
        let instance = testing::tight_deadline();
        let route = Route::new(&instance);
        // arrival 8 at a stop closing at 8 is rejected
        assert_eq!(route.insertion_shift(&instance, 1, 1), None);
    }

    #[test]
    fn test_downstream_slack_blocks_insertion() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 2, 1, 18);
        // squeeze B's slack so that a detour through A would break its deadline
        route.max_shift[1] = 0;
        route.wait_time[1] = 0;
        assert_eq!(route.insertion_shift(&instance, 1, 1), None);
    }

    #[test]
    fn test_insert_remove_round_trip() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 2, 1, 18);
        let before = route.clone();

        let shift = route.insertion_shift(&instance, 1, 1).expect("feasible");
        route.insert(&instance, 1, 1, shift);
        let removed = route.remove_positions(&instance, &mut vec![1]);
        assert_eq!(removed, vec![1]);
        assert_eq!(route, before);
    }

    #[test]
    fn test_round_trip_after_end_depot_shift() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 1, 1, 10);
        let before = route.clone();

        let shift = route.insertion_shift(&instance, 2, 2).expect("feasible");
        route.insert(&instance, 2, 2, shift);
        assert_eq!(route.shifts(), &[0, 0, 0, 0]);
        route.remove_positions(&instance, &mut vec![2]);
        assert_eq!(route, before);
    }

    #[test]
    fn test_committed_route_matches_refresh() {
        let instance = testing::line(5, 20);
        let mut route = Route::new(&instance);
        for request in instance.customer_requests() {
            let pos = route.last();
            let shift = route.insertion_shift(&instance, request, pos).expect("feasible");
            route.insert(&instance, request, pos, shift);
        }
        let mut refreshed = route.clone();
        refreshed.refresh(&instance);
        assert_eq!(route, refreshed);
    }

    #[test]
    fn test_remove_positions_descending() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 1, 1, 10);
        let shift = route.insertion_shift(&instance, 2, 2).expect("feasible");
        route.insert(&instance, 2, 2, shift);

        let mut positions = vec![1, 2, 2, 0, 3];
        let removed = route.remove_positions(&instance, &mut positions);
        assert_eq!(removed, vec![2, 1]);
        assert_eq!(route, Route::new(&instance));
        assert_eq!(route.used_size(), 0);
    }

    #[test]
    fn test_position_of() {
        let instance = testing::two_customers(10);
        let mut route = Route::new(&instance);
        route.insert(&instance, 2, 1, 18);
        assert_eq!(route.position_of(2), Some(1));
        assert_eq!(route.position_of(1), None);
        assert_eq!(route.position_of(0), None);
    }
}
