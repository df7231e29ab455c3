//! Route: one resource-day itinerary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{Catalog, TaskId};

/// A mutable ordered itinerary for one resource on one day.
///
/// Stops are task or callback ids with parallel per-stop start/end times,
/// plus running aggregates. Two invariants hold after every mutation:
/// `total_time == travel_time + working_time + waiting_time` and
/// `available_time == capacity_time - total_time`.
///
/// # Examples
///
/// ```
/// use field_dispatch::models::Route;
///
/// let mut route = Route::new(100);
/// route.add_stop(1, 0, 0, 0, 20);
/// route.add_stop(2, 8, 5, 0, 15);
/// assert_eq!(route.travel_time(), 5);
/// assert_eq!(route.working_time(), 35);
/// assert_eq!(route.total_time(), 40);
/// assert_eq!(route.available_time(), 60);
/// assert_eq!(route.last_end_time(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    stops: Vec<TaskId>,
    start_times: Vec<i64>,
    end_times: Vec<i64>,

    total_distance: i64,
    total_time: i64,
    working_time: i64,
    travel_time: i64,
    waiting_time: i64,
    available_time: i64,
    capacity_time: i64,

    last_end_time: i64,
    collaborative: bool,
}

impl Route {
    /// Creates an empty route with the given shift capacity in minutes.
    pub fn new(capacity_time: i64) -> Self {
        Self {
            stops: Vec::new(),
            start_times: Vec::new(),
            end_times: Vec::new(),
            total_distance: 0,
            total_time: 0,
            working_time: 0,
            travel_time: 0,
            waiting_time: 0,
            available_time: capacity_time,
            capacity_time,
            last_end_time: 0,
            collaborative: false,
        }
    }

    /// Appends a stop and updates all running aggregates.
    ///
    /// The new stop starts at `last_end_time + travel + wait` and ends
    /// `work` minutes later. No feasibility check is performed here;
    /// callers verify capacity before calling.
    pub fn add_stop(&mut self, id: TaskId, distance: i64, travel: i64, wait: i64, work: i64) {
        self.stops.push(id);
        self.start_times.push(self.last_end_time + travel + wait);
        self.end_times.push(self.last_end_time + travel + wait + work);

        self.total_distance += distance;
        self.travel_time += travel;
        self.waiting_time += wait;
        self.working_time += work;
        self.total_time = self.travel_time + self.working_time + self.waiting_time;
        self.available_time = self.capacity_time - self.total_time;
        self.last_end_time += travel + wait + work;
    }

    /// Returns the stop occupying the given instant.
    ///
    /// A stop owns its `[start, end]` interval and any wait gap after its
    /// end; instants before the first start map to the first stop and
    /// instants after the last end map to the last stop.
    ///
    /// Must not be called on an empty route.
    pub fn task_at_time(&self, time: i64) -> TaskId {
        debug_assert!(!self.stops.is_empty(), "task_at_time on empty route");
        let last = self.stops.len() - 1;
        let mut task = self.stops[0];

        for i in 0..self.start_times.len() {
            if time >= self.start_times[i] && time <= self.end_times[i] {
                task = self.stops[i];
                break;
            } else if time >= self.end_times[last] {
                task = self.stops[last];
                break;
            } else if i + 1 < self.stops.len()
                && time >= self.end_times[i]
                && time <= self.start_times[i + 1]
            {
                task = self.stops[i];
                break;
            } else if time <= self.start_times[0] {
                task = self.stops[0];
                break;
            }
        }

        task
    }

    /// Recomputes all running aggregates from the stop/time sequence,
    /// treating the first `position + 1` stops as settled.
    ///
    /// Used after a direct splice of the stop and time arrays. Durations
    /// and hop metrics are resolved against either id space.
    pub fn recompute_to_position(&mut self, position: usize, catalog: &Catalog) -> Result<()> {
        self.last_end_time = self.end_times[position];
        self.total_time = self.last_end_time;
        self.available_time = (self.capacity_time - self.last_end_time).max(0);

        self.working_time = 0;
        for &stop in &self.stops[..=position] {
            self.working_time += catalog.unit(stop)?.duration();
        }

        self.total_distance = 0;
        self.travel_time = 0;
        for i in 1..=position {
            let from = catalog.unit(self.stops[i - 1])?.location();
            let to = catalog.unit(self.stops[i])?.location();
            self.total_distance += catalog.distance(from, to);
            self.travel_time += catalog.travel_time(from, to);
        }

        self.waiting_time = self.total_time - self.working_time - self.travel_time;
        Ok(())
    }

    /// Drops every stop after the first `len`, leaving the aggregates
    /// stale. Pair with
    /// [`recompute_to_position`](Self::recompute_to_position).
    pub fn truncate(&mut self, len: usize) {
        self.stops.truncate(len);
        self.start_times.truncate(len);
        self.end_times.truncate(len);
    }

    /// Resets the route to its empty state, keeping the capacity.
    pub fn clear(&mut self) {
        self.stops.clear();
        self.start_times.clear();
        self.end_times.clear();
        self.total_distance = 0;
        self.total_time = 0;
        self.working_time = 0;
        self.travel_time = 0;
        self.waiting_time = 0;
        self.available_time = self.capacity_time;
        self.last_end_time = 0;
        self.collaborative = false;
    }

    /// Returns `true` if any stop of this route is a collaboration anchor
    /// whose partner appears among `other`'s stops.
    pub fn is_related(&self, catalog: &Catalog, other: &Route) -> bool {
        self.stops.iter().any(|&stop| {
            catalog
                .partner(stop)
                .is_some_and(|partner| other.stops.contains(&partner))
        })
    }

    /// Ordered stop ids.
    pub fn stops(&self) -> &[TaskId] {
        &self.stops
    }

    /// Per-stop start times, parallel to [`stops`](Self::stops).
    pub fn start_times(&self) -> &[i64] {
        &self.start_times
    }

    /// Per-stop end times, parallel to [`stops`](Self::stops).
    pub fn end_times(&self) -> &[i64] {
        &self.end_times
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Total distance travelled.
    pub fn total_distance(&self) -> i64 {
        self.total_distance
    }

    /// Travel + working + waiting minutes.
    pub fn total_time(&self) -> i64 {
        self.total_time
    }

    /// Minutes spent working on stops.
    pub fn working_time(&self) -> i64 {
        self.working_time
    }

    /// Minutes spent travelling between stops.
    pub fn travel_time(&self) -> i64 {
        self.travel_time
    }

    /// Minutes spent waiting.
    pub fn waiting_time(&self) -> i64 {
        self.waiting_time
    }

    /// Capacity minutes remaining.
    pub fn available_time(&self) -> i64 {
        self.available_time
    }

    /// Shift capacity in minutes.
    pub fn capacity_time(&self) -> i64 {
        self.capacity_time
    }

    /// End time of the last stop appended.
    pub fn last_end_time(&self) -> i64 {
        self.last_end_time
    }

    /// Returns `true` if this route takes part in a collaboration pair.
    pub fn is_collaborative(&self) -> bool {
        self.collaborative
    }

    /// Marks this route as collaborative.
    pub fn set_collaborative(&mut self, collaborative: bool) {
        self.collaborative = collaborative;
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{stop}")?;
        }
        write!(f, "]")
    }
}
