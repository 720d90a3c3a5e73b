//! Small hand-computable instances shared by unit tests.

use crate::models::{Coordinate, Instance, Parameters, Request, TimeWindow};
use crate::travel::{Rate, TravelRelation};

fn window(open: i64, close: i64) -> TimeWindow {
    TimeWindow::new(open, close).expect("valid window")
}

/// Depot plus customers A (`[0,100]`, demand 3) and B (`[10,50]`, demand 4).
///
/// Requests: 0 = depot, 1 = A, 2 = B, 3 = end depot. Symmetric travel with
/// time equal to cost: depot↔A 5, depot↔B 8, A↔B 4. Horizon 200, two vehicles.
pub(crate) fn two_customers(capacity: i32) -> Instance {
    two_customers_with_fleet(capacity, 2)
}

/// [`two_customers`] with `fleet` vehicles.
pub(crate) fn two_customers_with_fleet(capacity: i32, fleet: usize) -> Instance {
    let mut travel = TravelRelation::new(3);
    travel.set_symmetric(0, 1, Rate::new(5, 5));
    travel.set_symmetric(0, 2, Rate::new(8, 8));
    travel.set_symmetric(1, 2, Rate::new(4, 4));
    let requests = vec![
        Request::depot(0, 200),
        Request::new(1, 1, 3, window(0, 100)),
        Request::new(2, 2, 4, window(10, 50)),
        Request::depot(0, 200),
    ];
    let params = Parameters::new(2, 3, 200, capacity).with_fleet_size(fleet);
    Instance::new(params, requests, travel).expect("valid instance")
}

/// One customer whose window closes exactly at the earliest arrival.
pub(crate) fn tight_deadline() -> Instance {
    let mut travel = TravelRelation::new(2);
    travel.set_symmetric(0, 1, Rate::new(8, 8));
    let requests = vec![
        Request::depot(0, 100),
        Request::new(1, 1, 1, window(0, 8)),
        Request::depot(0, 100),
    ];
    Instance::new(Parameters::new(1, 2, 100, 10), requests, travel).expect("valid instance")
}

/// Customer 1 can be served at location 1 (request 1) or location 2
/// (request 2); customer 2 only at location 3 (request 3).
pub(crate) fn alternatives() -> Instance {
    let mut travel = TravelRelation::new(4);
    travel.set_symmetric(0, 1, Rate::new(10, 10));
    travel.set_symmetric(0, 2, Rate::new(3, 3));
    travel.set_symmetric(0, 3, Rate::new(6, 6));
    travel.set_symmetric(1, 2, Rate::new(8, 8));
    travel.set_symmetric(1, 3, Rate::new(9, 9));
    travel.set_symmetric(2, 3, Rate::new(4, 4));
    let requests = vec![
        Request::depot(0, 100),
        Request::new(1, 1, 2, window(0, 100)),
        Request::new(1, 2, 2, window(0, 100)),
        Request::new(2, 3, 3, window(0, 100)),
        Request::depot(0, 100),
    ];
    Instance::new(Parameters::new(2, 4, 100, 10), requests, travel).expect("valid instance")
}

/// `n` customers on a line at x = 1..=n with wide windows and unit demand.
///
/// Time and cost equal the rounded Euclidean distance; cost is doubled so
/// the objective and the schedule use different numbers.
pub(crate) fn line(n: usize, capacity: i32) -> Instance {
    let coords: Vec<Coordinate> = (0..=n).map(|i| Coordinate::new(i as f64, 0.0)).collect();
    let mut travel = TravelRelation::new(n + 1);
    for i in 0..=n {
        for j in 0..=n {
            let d = coords[i].distance_to(&coords[j]).round() as i64;
            travel.set(i, j, Rate::new(d, 2 * d));
        }
    }
    travel.fill_distances(&coords);

    let mut requests = vec![Request::depot(0, 1_000).with_coordinate(coords[0])];
    for (i, &c) in coords.iter().enumerate().skip(1) {
        requests.push(Request::new(i, i, 1, window(0, 500)).with_coordinate(c));
    }
    requests.push(Request::depot(0, 1_000).with_coordinate(coords[0]));
    Instance::new(Parameters::new(n, n + 1, 1_000, capacity), requests, travel)
        .expect("valid instance")
}
