//! Solution: routes, assignment grid, and cost accessors.

use serde::{Deserialize, Serialize};

use super::Route;

/// A complete schedule: owned routes plus the resource×day assignment grid.
///
/// Aggregate costs are recomputed from route state on every call, never
/// cached, so they cannot go stale after a mutation.
///
/// # Examples
///
/// ```
/// use field_dispatch::models::{Route, Solution};
///
/// let mut sol = Solution::new();
/// let mut route = Route::new(100);
/// route.add_stop(1, 4, 5, 2, 20);
/// sol.push_route(route);
///
/// assert_eq!(sol.num_active_routes(), 1);
/// assert_eq!(sol.distance_cost(), 4);
/// assert_eq!(sol.total_cost(), 7); // travel + waiting
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    grid: Vec<Vec<Option<usize>>>,
    by_day: Vec<Vec<usize>>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route, returning its index.
    pub fn push_route(&mut self, route: Route) -> usize {
        self.routes.push(route);
        self.routes.len() - 1
    }

    /// All routes, in creation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Mutable access to the routes.
    pub fn routes_mut(&mut self) -> &mut [Route] {
        &mut self.routes
    }

    /// Installs the resource×day assignment grid and its derived
    /// day index. Called by the assignor once construction is done.
    pub fn set_assignment(&mut self, grid: Vec<Vec<Option<usize>>>, by_day: Vec<Vec<usize>>) {
        self.grid = grid;
        self.by_day = by_day;
    }

    /// The resource×day grid: `grid()[row][day]` is the route index
    /// assigned to that cell, or `None`.
    pub fn grid(&self) -> &[Vec<Option<usize>>] {
        &self.grid
    }

    /// Route indices assigned to the given day column, in row order.
    /// Empty for days beyond the grid.
    pub fn routes_by_day(&self, day: usize) -> &[usize] {
        self.by_day.get(day).map_or(&[], |v| v.as_slice())
    }

    /// Route indices that appear on no grid cell.
    ///
    /// Overflow routes created during callback handling land here; they
    /// need a manual resource and must not be merged into grid reporting.
    pub fn off_grid_routes(&self) -> Vec<usize> {
        let mut on_grid = vec![false; self.routes.len()];
        for row in &self.grid {
            for cell in row {
                if let Some(index) = *cell {
                    if index < on_grid.len() {
                        on_grid[index] = true;
                    }
                }
            }
        }
        on_grid
            .iter()
            .enumerate()
            .filter(|&(_, &assigned)| !assigned)
            .map(|(index, _)| index)
            .collect()
    }

    /// Sum of route distances.
    pub fn distance_cost(&self) -> i64 {
        self.routes.iter().map(|r| r.total_distance()).sum()
    }

    /// Sum of route travel times.
    pub fn travel_cost(&self) -> i64 {
        self.routes.iter().map(|r| r.travel_time()).sum()
    }

    /// Sum of route waiting times.
    pub fn waiting_cost(&self) -> i64 {
        self.routes.iter().map(|r| r.waiting_time()).sum()
    }

    /// Sum of route working times.
    pub fn working_time(&self) -> i64 {
        self.routes.iter().map(|r| r.working_time()).sum()
    }

    /// Total cost: travel plus waiting.
    pub fn total_cost(&self) -> i64 {
        self.travel_cost() + self.waiting_cost()
    }

    /// Number of routes with at least one stop.
    pub fn num_active_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_with(travel: i64, wait: i64, work: i64, distance: i64) -> Route {
        let mut r = Route::new(480);
        r.add_stop(1, distance, travel, wait, work);
        r
    }

    #[test]
    fn test_empty_solution() {
        let sol = Solution::new();
        assert_eq!(sol.num_active_routes(), 0);
        assert_eq!(sol.total_cost(), 0);
        assert!(sol.off_grid_routes().is_empty());
        assert!(sol.routes_by_day(3).is_empty());
    }

    #[test]
    fn test_costs_recomputed() {
        let mut sol = Solution::new();
        sol.push_route(route_with(10, 2, 30, 7));
        sol.push_route(route_with(5, 0, 20, 3));

        assert_eq!(sol.distance_cost(), 10);
        assert_eq!(sol.travel_cost(), 15);
        assert_eq!(sol.waiting_cost(), 2);
        assert_eq!(sol.working_time(), 50);
        assert_eq!(sol.total_cost(), 17);

        // A later mutation shows up in the very next read.
        sol.routes_mut()[0].add_stop(2, 1, 4, 0, 5);
        assert_eq!(sol.travel_cost(), 19);
        assert_eq!(sol.total_cost(), 21);
    }

    #[test]
    fn test_active_route_count_skips_empty() {
        let mut sol = Solution::new();
        sol.push_route(route_with(0, 0, 10, 0));
        sol.push_route(Route::new(480));
        assert_eq!(sol.routes().len(), 2);
        assert_eq!(sol.num_active_routes(), 1);
    }

    #[test]
    fn test_assignment_and_day_index() {
        let mut sol = Solution::new();
        sol.push_route(route_with(1, 0, 10, 1));
        sol.push_route(route_with(2, 0, 10, 2));
        sol.push_route(route_with(3, 0, 10, 3));

        let grid = vec![vec![Some(0), Some(2)], vec![Some(1), None]];
        let by_day = vec![vec![0, 1], vec![2]];
        sol.set_assignment(grid, by_day);

        assert_eq!(sol.routes_by_day(0), &[0, 1]);
        assert_eq!(sol.routes_by_day(1), &[2]);
        assert_eq!(sol.grid()[1][1], None);
        assert!(sol.off_grid_routes().is_empty());
    }

    #[test]
    fn test_off_grid_routes() {
        let mut sol = Solution::new();
        sol.push_route(route_with(1, 0, 10, 1));
        sol.push_route(route_with(2, 0, 10, 2));
        sol.set_assignment(vec![vec![Some(0)]], vec![vec![0]]);

        // Route 1 was never placed on the grid.
        assert_eq!(sol.off_grid_routes(), vec![1]);

        // An overflow route appended later is off-grid too.
        sol.push_route(route_with(4, 0, 10, 4));
        assert_eq!(sol.off_grid_routes(), vec![1, 2]);
    }
}
