//! Trigger-ordered callback replay.

use tracing::debug;

use crate::construct::InsertionSolver;
use crate::error::{Error, Result};
use crate::models::{Catalog, Route, Solution, Task, TaskId};

/// What happened to one replayed callback.
#[derive(Debug)]
pub struct CallbackOutcome {
    /// The callback that was handled.
    pub callback: TaskId,
    /// Index of the route it was spliced into.
    pub route: usize,
    /// Ordinary tasks pushed out of that route and not re-absorbed by the
    /// forward re-extension.
    pub displaced: Vec<TaskId>,
    /// Displaced tasks that fit no later route and ended up on off-grid
    /// overflow routes.
    pub overflowed: Vec<TaskId>,
}

/// Replays callbacks against a constructed schedule.
///
/// Each callback interrupts the route whose occupant at the trigger
/// minute is closest to it: the route keeps its work up to and including
/// that occupant, the callback goes next, earlier-spliced callbacks stay
/// chained behind it, and the displaced ordinary tasks are re-inserted
/// greedily, relocated to later days of the same resource, or pushed to
/// overflow routes.
///
/// # Examples
///
/// ```
/// use field_dispatch::construct::InsertionSolver;
/// use field_dispatch::models::{Catalog, Resource, Shift, Task};
/// use field_dispatch::reschedule::Rescheduler;
/// use field_dispatch::travel::TravelMatrix;
///
/// let mut travel = TravelMatrix::new(2);
/// travel.set(0, 1, 10, 10);
/// travel.set(1, 0, 10, 10);
///
/// let tasks = vec![Task::new(1, 0, 60, 0)];
/// let callbacks = vec![Task::callback(50, 1, 30, 0, 20)];
/// let resources = vec![Resource::new(1, vec![Shift::new(0, 480, 480)], 1)];
/// let catalog = Catalog::new(travel, tasks, callbacks, resources);
///
/// let mut solution = InsertionSolver::new(&catalog)
///     .solve_by_distance()
///     .expect("solvable")
///     .solution;
///
/// let rescheduler = Rescheduler::new(&catalog);
/// let order = rescheduler.chronological();
/// let outcomes = rescheduler.replay(&mut solution, &order).expect("replayable");
/// assert_eq!(outcomes[0].route, 0);
/// ```
pub struct Rescheduler<'a> {
    catalog: &'a Catalog,
    solver: InsertionSolver<'a>,
}

struct Splice {
    route: usize,
    displaced: Vec<TaskId>,
}

impl<'a> Rescheduler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            solver: InsertionSolver::new(catalog),
        }
    }

    /// Callback ids sorted by trigger minute, id order on ties.
    pub fn chronological(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.catalog.callbacks().map(Task::id).collect();
        ids.sort_by_key(|&id| {
            self.catalog
                .callback(id)
                .and_then(|callback| callback.trigger())
                .unwrap_or(0)
        });
        ids
    }

    /// Handles `callbacks` one by one, mutating `solution` in place.
    ///
    /// Triggers must be non-decreasing along the slice; an earlier trigger
    /// after a later one fails with [`Error::UnorderedCallbacks`] before
    /// touching the schedule further.
    pub fn replay(
        &self,
        solution: &mut Solution,
        callbacks: &[TaskId],
    ) -> Result<Vec<CallbackOutcome>> {
        let mut previous: Option<i64> = None;
        let mut outcomes = Vec::with_capacity(callbacks.len());
        for &id in callbacks {
            let trigger = self.trigger_of(id)?;
            if let Some(prev) = previous {
                if trigger < prev {
                    return Err(Error::UnorderedCallbacks {
                        previous: prev,
                        current: trigger,
                    });
                }
            }
            previous = Some(trigger);
            outcomes.push(self.handle(solution, id, trigger)?);
        }
        Ok(outcomes)
    }

    fn trigger_of(&self, id: TaskId) -> Result<i64> {
        self.catalog
            .callback(id)
            .ok_or(Error::UnknownUnit { id })?
            .trigger()
            .ok_or(Error::MissingTrigger { id })
    }

    fn handle(&self, solution: &mut Solution, id: TaskId, trigger: i64) -> Result<CallbackOutcome> {
        let callback = self
            .catalog
            .callback(id)
            .ok_or(Error::UnknownUnit { id })?
            .clone();
        let day = (trigger / 1440) as usize;
        debug!(callback = id, trigger, day, "handling callback");

        let splice = self.splice(solution, &callback, trigger, day)?;
        let mut pool = splice.displaced;

        // let the interrupted route re-absorb what still fits after the
        // callback
        let route = &mut solution.routes_mut()[splice.route];
        self.solver.extend_forward(route, &mut pool, callback.location())?;
        let displaced = pool.clone();

        let remaining = self.relocate(solution, splice.route, day, pool)?;
        let overflowed = remaining.clone();
        if !remaining.is_empty() {
            self.overflow(solution, remaining)?;
        }

        Ok(CallbackOutcome {
            callback: id,
            route: splice.route,
            displaced,
            overflowed,
        })
    }

    /// Splits the nearest active route at the trigger's occupant and
    /// splices the callback in behind it.
    fn splice(
        &self,
        solution: &mut Solution,
        callback: &Task,
        trigger: i64,
        day: usize,
    ) -> Result<Splice> {
        let candidates: Vec<usize> = solution.routes_by_day(day).to_vec();
        if candidates.is_empty() {
            return Err(Error::NoActiveRoutes { day });
        }

        let mut selected = candidates[0];
        let mut best = i64::MAX;
        for &index in &candidates {
            let occupant = solution.routes()[index].task_at_time(trigger);
            let from = self.catalog.unit(occupant)?.location();
            let hop = self.catalog.travel_time(from, callback.location());
            if hop < best {
                selected = index;
                best = hop;
            }
        }

        let route = &mut solution.routes_mut()[selected];
        let occupant = route.task_at_time(trigger);
        let split_at = route
            .stops()
            .iter()
            .position(|&stop| stop == occupant)
            .expect("occupant comes from this route");
        let old = route.stops().to_vec();
        route.truncate(split_at + 1);
        route.recompute_to_position(split_at, self.catalog)?;

        // earlier callbacks stay chained on the route, ordinary work is
        // pushed out
        let mut displaced = Vec::new();
        for &stop in &old[split_at + 1..] {
            let unit = self.catalog.unit(stop)?;
            if unit.is_callback() {
                let from = self.last_location(route)?;
                route.add_stop(
                    stop,
                    self.catalog.distance(from, unit.location()),
                    self.catalog.travel_time(from, unit.location()),
                    0,
                    unit.duration(),
                );
            } else {
                displaced.push(stop);
            }
        }

        let from = self.last_location(route)?;
        route.add_stop(
            callback.id(),
            self.catalog.distance(from, callback.location()),
            self.catalog.travel_time(from, callback.location()),
            0,
            callback.duration(),
        );
        debug!(route = %route, index = selected, "spliced callback");

        Ok(Splice {
            route: selected,
            displaced,
        })
    }

    fn last_location(&self, route: &Route) -> Result<usize> {
        let last = *route.stops().last().expect("spliced route keeps its occupant");
        Ok(self.catalog.unit(last)?.location())
    }

    /// Appends displaced tasks to later-day routes of the same resource
    /// where they still fit. Returns what found no room.
    fn relocate(
        &self,
        solution: &mut Solution,
        route_index: usize,
        day: usize,
        displaced: Vec<TaskId>,
    ) -> Result<Vec<TaskId>> {
        if displaced.is_empty() {
            return Ok(displaced);
        }

        let rows = solution.grid().len();
        let mut owner = None;
        for row in 0..rows {
            if solution.grid()[row].get(day).copied().flatten() == Some(route_index) {
                owner = Some(row);
                break;
            }
        }
        let Some(row) = owner else { return Ok(displaced) };

        let days = solution.grid()[row].len();
        let mut remaining = displaced;
        for later in (day + 1)..days {
            if remaining.is_empty() {
                break;
            }
            let Some(target) = solution.grid()[row][later] else {
                continue;
            };
            let mut kept = Vec::new();
            for id in remaining {
                let unit = self.catalog.unit(id)?;
                let route = &mut solution.routes_mut()[target];
                let Some(&last) = route.stops().last() else {
                    kept.push(id);
                    continue;
                };
                let from = self.catalog.unit(last)?.location();
                let hop = self.catalog.travel_time(from, unit.location());
                if hop + unit.duration() <= route.available_time() {
                    debug!(task = id, day = later, "relocated displaced task");
                    route.add_stop(
                        id,
                        self.catalog.distance(from, unit.location()),
                        hop,
                        0,
                        unit.duration(),
                    );
                } else {
                    kept.push(id);
                }
            }
            remaining = kept;
        }
        Ok(remaining)
    }

    /// Chains the leftover tasks onto fresh off-grid routes, opening a new
    /// one whenever the shift capacity would be exceeded.
    fn overflow(&self, solution: &mut Solution, remaining: Vec<TaskId>) -> Result<()> {
        let capacity = self.catalog.shift_duration();
        let mut route = Route::new(capacity);
        let mut current = 0usize;

        for id in remaining {
            let unit = self.catalog.unit(id)?;
            if route.is_empty() {
                route.add_stop(id, 0, 0, 0, unit.duration());
            } else {
                let hop = self.catalog.travel_time(current, unit.location());
                if route.total_time() + hop + unit.duration() <= capacity {
                    route.add_stop(
                        id,
                        self.catalog.distance(current, unit.location()),
                        hop,
                        0,
                        unit.duration(),
                    );
                } else {
                    debug!(route = %route, "overflow route full");
                    solution.push_route(std::mem::replace(&mut route, Route::new(capacity)));
                    route.add_stop(id, 0, 0, 0, unit.duration());
                }
            }
            current = unit.location();
        }

        if !route.is_empty() {
            debug!(route = %route, "overflow route opened");
            solution.push_route(route);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::InsertionSolver;
    use crate::models::{Resource, Shift};
    use crate::travel::TravelMatrix;

    fn band_matrix(size: usize) -> TravelMatrix {
        let mut travel = TravelMatrix::new(size);
        for i in 0..size {
            for j in 0..size {
                if i != j {
                    let d = 10 * (i as i64 - j as i64).abs();
                    travel.set(i, j, d, d);
                }
            }
        }
        travel
    }

    fn shifts(days: usize, availability: i64) -> Vec<Shift> {
        (0..days)
            .map(|d| Shift::new(d as i64 * 1440, d as i64 * 1440 + availability, availability))
            .collect()
    }

    /// One resource, two days, capacity 200. Construction yields
    /// route 0 = [1, 2, 3] on day 0 and route 1 = [4] on day 1.
    fn two_day_catalog(callbacks: Vec<Task>) -> Catalog {
        let tasks = vec![
            Task::new(1, 0, 50, 0),
            Task::new(2, 1, 50, 0),
            Task::new(3, 2, 50, 0),
            Task::new(4, 3, 40, 0),
        ];
        let resources = vec![Resource::new(1, shifts(2, 200), 1)];
        Catalog::new(band_matrix(4), tasks, callbacks, resources)
    }

    fn build(catalog: &Catalog) -> Solution {
        let report = InsertionSolver::new(catalog)
            .solve_by_distance()
            .expect("solvable instance");
        let solution = report.solution;
        assert_eq!(solution.routes()[0].stops(), &[1, 2, 3]);
        assert_eq!(solution.routes()[1].stops(), &[4]);
        solution
    }

    #[test]
    fn test_callback_splices_and_relocates_displaced_task() {
        let catalog = two_day_catalog(vec![Task::callback(100, 3, 30, 0, 60)]);
        let mut solution = build(&catalog);

        let rescheduler = Rescheduler::new(&catalog);
        let outcomes = rescheduler
            .replay(&mut solution, &[100])
            .expect("day 0 has an active route");

        let outcome = &outcomes[0];
        assert_eq!(outcome.route, 0);
        assert_eq!(outcome.displaced, vec![2]);
        assert!(outcome.overflowed.is_empty());

        // minute 60 falls in the gap after task 1, so the route keeps
        // task 1, takes the callback, then re-absorbs task 3
        assert_eq!(solution.routes()[0].stops(), &[1, 100, 3]);
        assert_eq!(solution.routes()[0].total_time(), 170);

        // task 2 moved to the same resource's next day
        assert_eq!(solution.routes()[1].stops(), &[4, 2]);
        assert!(solution.off_grid_routes().is_empty());
    }

    #[test]
    fn test_second_callback_keeps_earlier_callback_chained() {
        let catalog = two_day_catalog(vec![
            Task::callback(100, 3, 30, 0, 60),
            Task::callback(101, 1, 20, 0, 90),
        ]);
        let mut solution = build(&catalog);

        let rescheduler = Rescheduler::new(&catalog);
        let order = rescheduler.chronological();
        assert_eq!(order, vec![100, 101]);
        rescheduler
            .replay(&mut solution, &order)
            .expect("day 0 has an active route");

        // callback 100 survives the second splice; task 3 cascades to
        // the day-1 route behind task 2
        assert_eq!(solution.routes()[0].stops(), &[1, 100, 101]);
        assert_eq!(solution.routes()[1].stops(), &[4, 2, 3]);
        assert!(solution.off_grid_routes().is_empty());
    }

    #[test]
    fn test_displaced_without_later_day_goes_to_overflow() {
        let tasks = vec![
            Task::new(1, 0, 50, 0),
            Task::new(2, 1, 50, 0),
            Task::new(3, 2, 50, 0),
        ];
        let callbacks = vec![Task::callback(100, 3, 120, 0, 60)];
        let resources = vec![Resource::new(1, shifts(1, 200), 1)];
        let catalog = Catalog::new(band_matrix(4), tasks, callbacks, resources);

        let mut solution = InsertionSolver::new(&catalog)
            .solve_by_distance()
            .expect("solvable instance")
            .solution;
        assert_eq!(solution.routes()[0].stops(), &[1, 2, 3]);

        let rescheduler = Rescheduler::new(&catalog);
        let outcomes = rescheduler
            .replay(&mut solution, &[100])
            .expect("day 0 has an active route");

        // the long callback leaves no room to re-absorb, and there is no
        // later day to relocate to
        assert_eq!(outcomes[0].displaced, vec![2, 3]);
        assert_eq!(outcomes[0].overflowed, vec![2, 3]);

        let off_grid = solution.off_grid_routes();
        assert_eq!(off_grid.len(), 1);
        let overflow = &solution.routes()[off_grid[0]];
        assert_eq!(overflow.stops(), &[2, 3]);
        assert!(overflow.total_time() <= overflow.capacity_time());
    }

    #[test]
    fn test_out_of_order_triggers_are_rejected() {
        let catalog = two_day_catalog(vec![
            Task::callback(100, 3, 30, 0, 60),
            Task::callback(101, 1, 20, 0, 90),
        ]);
        let mut solution = build(&catalog);

        let err = Rescheduler::new(&catalog)
            .replay(&mut solution, &[101, 100])
            .expect_err("triggers run backwards");
        assert!(matches!(
            err,
            Error::UnorderedCallbacks {
                previous: 90,
                current: 60
            }
        ));
    }

    #[test]
    fn test_callback_on_empty_day_fails() {
        let catalog = two_day_catalog(vec![Task::callback(100, 3, 30, 0, 3000)]);
        let mut solution = build(&catalog);
        // day 2 is past the horizon, nothing is scheduled there
        let err = Rescheduler::new(&catalog)
            .replay(&mut solution, &[100])
            .expect_err("no routes on day 2");
        assert!(matches!(err, Error::NoActiveRoutes { day: 2 }));
    }

    #[test]
    fn test_chronological_breaks_trigger_ties_by_id() {
        let catalog = two_day_catalog(vec![
            Task::callback(102, 1, 20, 0, 60),
            Task::callback(100, 3, 30, 0, 60),
            Task::callback(101, 2, 10, 0, 45),
        ]);
        let order = Rescheduler::new(&catalog).chronological();
        assert_eq!(order, vec![101, 100, 102]);
    }
}
