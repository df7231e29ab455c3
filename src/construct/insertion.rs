//! Nearest-neighbor insertion solver.

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Catalog, Route, Solution, TaskId};
use crate::ordering::TaskOrdering;
use crate::proximity::ProximityIndex;

use super::assign::assign_routes;

/// Output of a construction run.
#[derive(Debug)]
pub struct SolveReport {
    /// The constructed schedule.
    pub solution: Solution,
    /// Seed tasks whose duration alone exceeded the shift capacity.
    /// They are dropped from the schedule rather than looping forever
    /// on an impossible seed.
    pub infeasible_seeds: Vec<TaskId>,
}

/// Greedy insertion solver.
///
/// Builds routes one at a time: seed a fresh route with a task from the
/// busiest unserved location, then repeatedly append the nearest feasible
/// unscheduled task until the shift capacity runs out. Collaboration
/// anchors spawn a synchronized support route for their partner before
/// the main route continues.
///
/// # Examples
///
/// ```
/// use field_dispatch::construct::InsertionSolver;
/// use field_dispatch::models::{Catalog, Resource, Shift, Task};
/// use field_dispatch::travel::TravelMatrix;
///
/// let mut travel = TravelMatrix::new(3);
/// travel.set(0, 1, 4, 10);
/// travel.set(1, 2, 2, 5);
///
/// let tasks = vec![Task::new(1, 1, 20, 0), Task::new(2, 2, 15, 0)];
/// let resources = vec![Resource::new(7, vec![Shift::new(0, 100, 100)], 1)];
/// let catalog = Catalog::new(travel, tasks, Vec::new(), resources);
///
/// let solver = InsertionSolver::new(&catalog);
/// let report = solver.solve_by_distance().expect("valid catalog");
/// assert_eq!(report.solution.num_active_routes(), 1);
/// ```
pub struct InsertionSolver<'a> {
    catalog: &'a Catalog,
    proximity: ProximityIndex,
    ordering: TaskOrdering,
}

impl<'a> InsertionSolver<'a> {
    /// Builds the proximity rankings and task ordering for `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            proximity: ProximityIndex::build(catalog.travel()),
            ordering: TaskOrdering::build(catalog),
        }
    }

    /// Location-driven construction, then grid assignment.
    ///
    /// Seeds are drawn by walking locations in descending demand order;
    /// a route closes when no unscheduled task can still fit. Every
    /// non-empty route ends up placed on the resource×day grid.
    pub fn solve_by_distance(&self) -> Result<SolveReport> {
        let capacity = self.catalog.shift_duration();
        let mandays = self.catalog.mandays();
        let num_locations = self.catalog.num_locations();

        let mut solution = Solution::new();
        let mut pool: Vec<TaskId> = self.ordering.by_duration().to_vec();
        let mut infeasible_seeds = Vec::new();

        let mut used_routes = 0usize;
        let mut cursor = 0usize;
        let mut current = 0usize;
        let mut route = Route::new(capacity);

        while !pool.is_empty() && used_routes <= mandays && cursor < num_locations {
            if route.is_empty() {
                used_routes += 1;

                let mut seed = None;
                while cursor < num_locations {
                    let location = self.ordering.locations_by_demand()[cursor];
                    let found = pool.iter().copied().find(|&id| {
                        self.catalog.task(id).map(|t| t.location()) == Some(location)
                    });
                    if let Some(id) = found {
                        seed = Some(id);
                        break;
                    }
                    cursor += 1;
                }
                let Some(id) = seed else { break };
                let unit = self.catalog.unit(id)?;

                if unit.duration() <= route.available_time() {
                    debug!(task = id, location = unit.location(), "seeding route");
                    route.add_stop(id, 0, 0, 0, unit.duration());
                    current = unit.location();
                    remove(&mut pool, id);
                    if self.catalog.is_collaboration(id) {
                        route.set_collaborative(true);
                        self.spawn_support(&mut solution, &mut pool, id, route.last_end_time())?;
                    }
                } else {
                    warn!(
                        task = id,
                        duration = unit.duration(),
                        capacity,
                        "task cannot fit an empty route, dropping"
                    );
                    remove(&mut pool, id);
                    infeasible_seeds.push(id);
                }
            } else {
                self.extend_collaborative(&mut solution, &mut route, &mut pool, current)?;
                debug!(route = %route, "route closed");
                solution.push_route(std::mem::replace(&mut route, Route::new(capacity)));
            }
        }

        if !route.is_empty() {
            debug!(route = %route, "route closed");
            solution.push_route(route);
        }

        assign_routes(&mut solution, self.catalog)?;

        Ok(SolveReport { solution, infeasible_seeds })
    }

    /// Duration-driven construction: seeds are taken straight from the
    /// descending-duration order, extension appends one nearest feasible
    /// task per step, and no grid assignment is performed.
    pub fn solve_by_duration(&self) -> Result<SolveReport> {
        let capacity = self.catalog.shift_duration();
        let mandays = self.catalog.mandays();

        let mut solution = Solution::new();
        let mut pool: Vec<TaskId> = self.ordering.by_duration().to_vec();
        let mut infeasible_seeds = Vec::new();

        let mut used_routes = 0usize;
        let mut current = 0usize;
        let mut route = Route::new(capacity);

        while !pool.is_empty() && used_routes <= mandays {
            if route.is_empty() {
                used_routes += 1;
                let id = pool[0];
                let unit = self.catalog.unit(id)?;
                if unit.duration() <= route.available_time() {
                    route.add_stop(id, 0, 0, 0, unit.duration());
                    current = unit.location();
                } else {
                    warn!(
                        task = id,
                        duration = unit.duration(),
                        capacity,
                        "task cannot fit an empty route, dropping"
                    );
                    infeasible_seeds.push(id);
                }
                pool.remove(0);
            } else {
                let feasible =
                    self.feasible_successors(&pool, current, route.total_time(), capacity)?;
                if let Some(&id) = feasible.first() {
                    let unit = self.catalog.unit(id)?;
                    route.add_stop(
                        id,
                        self.catalog.distance(current, unit.location()),
                        self.catalog.travel_time(current, unit.location()),
                        0,
                        unit.duration(),
                    );
                    current = unit.location();
                    remove(&mut pool, id);
                } else {
                    solution.push_route(std::mem::replace(&mut route, Route::new(capacity)));
                }
            }
        }

        if !route.is_empty() {
            solution.push_route(route);
        }

        Ok(SolveReport { solution, infeasible_seeds })
    }

    /// Appends nearest feasible tasks from `pool` until none fit.
    ///
    /// Plain extension: collaboration anchors in `pool` are appended
    /// like any other task without spawning support routes. Used when
    /// re-extending a spliced route over displaced tasks.
    pub fn extend_forward(
        &self,
        route: &mut Route,
        pool: &mut Vec<TaskId>,
        mut current: usize,
    ) -> Result<()> {
        loop {
            let feasible =
                self.feasible_successors(pool, current, route.total_time(), route.capacity_time())?;
            let Some(&id) = feasible.first() else { break };
            let unit = self.catalog.unit(id)?;
            route.add_stop(
                id,
                self.catalog.distance(current, unit.location()),
                self.catalog.travel_time(current, unit.location()),
                0,
                unit.duration(),
            );
            current = unit.location();
            remove(pool, id);
        }
        Ok(())
    }

    /// Builds a support route backward from `anchor` so that the anchor
    /// finishes exactly at `deadline`, then extends it forward.
    ///
    /// The backward chain absorbs nearby unscheduled tasks that fit before
    /// the anchor; waiting time on the anchor stop soaks up whatever gap
    /// remains. Other collaboration anchors are never absorbed backward,
    /// they only enter routes through the forward path.
    pub fn complete_backward(
        &self,
        route: &mut Route,
        pool: &mut Vec<TaskId>,
        anchor: TaskId,
        deadline: i64,
    ) -> Result<()> {
        let anchor_unit = self.catalog.unit(anchor)?;

        let mut chain = vec![anchor];
        let mut local_pool = pool.clone();
        remove(&mut local_pool, anchor);

        let mut current = anchor_unit.location();
        let mut duration = anchor_unit.duration();
        let mut end_previous = deadline;

        loop {
            let feasible =
                self.feasible_predecessors(&local_pool, current, end_previous, duration)?;
            let Some(&id) = feasible
                .iter()
                .find(|&&id| !self.catalog.is_collaboration(id))
            else {
                break;
            };
            let unit = self.catalog.unit(id)?;
            end_previous -= duration + self.catalog.travel_time(unit.location(), current);
            duration = unit.duration();
            current = unit.location();
            chain.push(id);
            remove(&mut local_pool, id);
        }

        if chain.len() > 1 {
            let earliest = chain[chain.len() - 1];
            let unit = self.catalog.unit(earliest)?;
            route.add_stop(earliest, 0, 0, 0, unit.duration());
            remove(pool, earliest);

            for i in (1..chain.len() - 1).rev() {
                let from = self.catalog.unit(chain[i + 1])?.location();
                let unit = self.catalog.unit(chain[i])?;
                route.add_stop(
                    chain[i],
                    self.catalog.distance(from, unit.location()),
                    self.catalog.travel_time(from, unit.location()),
                    0,
                    unit.duration(),
                );
                remove(pool, chain[i]);
            }

            let from = self.catalog.unit(chain[1])?.location();
            let hop = self.catalog.travel_time(from, anchor_unit.location());
            let wait = deadline - anchor_unit.duration() - route.last_end_time() - hop;
            route.add_stop(
                anchor,
                self.catalog.distance(from, anchor_unit.location()),
                hop,
                wait,
                anchor_unit.duration(),
            );
        } else {
            let wait = deadline - anchor_unit.duration();
            route.add_stop(anchor, 0, 0, wait, anchor_unit.duration());
        }
        remove(pool, anchor);
        Ok(())
    }

    /// Forward extension that spawns support routes for collaboration
    /// anchors as they are appended.
    fn extend_collaborative(
        &self,
        solution: &mut Solution,
        route: &mut Route,
        pool: &mut Vec<TaskId>,
        mut current: usize,
    ) -> Result<()> {
        loop {
            let feasible =
                self.feasible_successors(pool, current, route.total_time(), route.capacity_time())?;
            let Some(&id) = feasible.first() else { break };
            let unit = self.catalog.unit(id)?;
            route.add_stop(
                id,
                self.catalog.distance(current, unit.location()),
                self.catalog.travel_time(current, unit.location()),
                0,
                unit.duration(),
            );
            current = unit.location();
            remove(pool, id);
            if self.catalog.is_collaboration(id) {
                route.set_collaborative(true);
                self.spawn_support(solution, pool, id, route.last_end_time())?;
            }
        }
        Ok(())
    }

    /// Builds and records the partner's support route for anchor `id`,
    /// synchronized so the partner finishes at `deadline`.
    fn spawn_support(
        &self,
        solution: &mut Solution,
        pool: &mut Vec<TaskId>,
        id: TaskId,
        deadline: i64,
    ) -> Result<()> {
        let Some(partner) = self.catalog.partner(id) else {
            return Ok(());
        };
        debug!(anchor = id, partner, deadline, "spawning support route");
        let mut support = Route::new(self.catalog.shift_duration());
        self.complete_backward(&mut support, pool, partner, deadline)?;
        let start = self.catalog.unit(partner)?.location();
        self.extend_collaborative(solution, &mut support, pool, start)?;
        support.set_collaborative(true);
        solution.push_route(support);
        Ok(())
    }

    /// Pool tasks that can still be appended after `current`, nearest
    /// outgoing-time location first, duration order within a location.
    fn feasible_successors(
        &self,
        pool: &[TaskId],
        current: usize,
        consumed: i64,
        capacity: i64,
    ) -> Result<Vec<TaskId>> {
        let mut feasible = Vec::new();
        for &location in self.proximity.nearest_time_from(current) {
            let hop = self.catalog.travel_time(current, location);
            for &id in self.ordering.at_location(location) {
                if pool.contains(&id) && consumed + hop + self.catalog.unit(id)?.duration() <= capacity
                {
                    feasible.push(id);
                }
            }
        }
        Ok(feasible)
    }

    /// Pool tasks that can be prepended before a stop at `current` that
    /// must start no later than `end_time - duration`, nearest
    /// incoming-time location first.
    fn feasible_predecessors(
        &self,
        pool: &[TaskId],
        current: usize,
        end_time: i64,
        duration: i64,
    ) -> Result<Vec<TaskId>> {
        let availability = end_time - duration;
        let mut feasible = Vec::new();
        for &location in self.proximity.nearest_time_to(current) {
            let hop = self.catalog.travel_time(location, current);
            for &id in self.ordering.at_location(location) {
                if pool.contains(&id) && hop + self.catalog.unit(id)?.duration() <= availability {
                    feasible.push(id);
                }
            }
        }
        Ok(feasible)
    }
}

fn remove(pool: &mut Vec<TaskId>, id: TaskId) {
    if let Some(position) = pool.iter().position(|&t| t == id) {
        pool.remove(position);
    }
}
