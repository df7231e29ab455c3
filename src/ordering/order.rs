//! Task and location orderings.

use crate::models::{Catalog, TaskId};

/// Reproducible orderings over the regular task catalog.
///
/// - tasks by descending duration (stable on ties),
/// - task ids grouped per location (catalog id order),
/// - locations by descending task demand (ties to the lowest unused
///   index).
///
/// # Examples
///
/// ```
/// use field_dispatch::models::{Catalog, Resource, Shift, Task};
/// use field_dispatch::ordering::TaskOrdering;
/// use field_dispatch::travel::TravelMatrix;
///
/// let tasks = vec![
///     Task::new(1, 0, 20, 1),
///     Task::new(2, 1, 45, 1),
///     Task::new(3, 1, 45, 1),
/// ];
/// let resources = vec![Resource::new(1, vec![Shift::new(0, 480, 480)], 1)];
/// let catalog = Catalog::new(TravelMatrix::new(2), tasks, Vec::new(), resources);
///
/// let ordering = TaskOrdering::build(&catalog);
/// assert_eq!(ordering.by_duration(), &[2, 3, 1]);
/// assert_eq!(ordering.at_location(1), &[2, 3]);
/// assert_eq!(ordering.locations_by_demand(), &[1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOrdering {
    by_duration: Vec<TaskId>,
    by_location: Vec<Vec<TaskId>>,
    locations_by_demand: Vec<usize>,
}

impl TaskOrdering {
    /// Builds all orderings from the catalog.
    pub fn build(catalog: &Catalog) -> Self {
        let num_locations = catalog.num_locations();

        let mut tasks: Vec<_> = catalog.tasks().collect();
        tasks.sort_by(|a, b| b.duration().cmp(&a.duration()));
        let by_duration = tasks.iter().map(|t| t.id()).collect();

        let mut by_location = vec![Vec::new(); num_locations];
        for task in catalog.tasks() {
            by_location[task.location()].push(task.id());
        }

        let locations_by_demand = rank_locations(&by_location);

        Self {
            by_duration,
            by_location,
            locations_by_demand,
        }
    }

    /// Regular task ids sorted by descending duration.
    pub fn by_duration(&self) -> &[TaskId] {
        &self.by_duration
    }

    /// Task ids located at `location`, in catalog order.
    pub fn at_location(&self, location: usize) -> &[TaskId] {
        &self.by_location[location]
    }

    /// Locations ranked by descending task count.
    pub fn locations_by_demand(&self) -> &[usize] {
        &self.locations_by_demand
    }
}

/// Ranks locations by descending task count; the first-found maximum wins,
/// so equal counts resolve to the lowest unused index.
fn rank_locations(by_location: &[Vec<TaskId>]) -> Vec<usize> {
    let l = by_location.len();
    let mut used = vec![false; l];
    let mut ranking = Vec::with_capacity(l);

    for _ in 0..l {
        let mut best: Option<usize> = None;
        for (j, tasks) in by_location.iter().enumerate() {
            if used[j] {
                continue;
            }
            if best.map_or(true, |b| tasks.len() > by_location[b].len()) {
                best = Some(j);
            }
        }
        let Some(index) = best else { break };
        used[index] = true;
        ranking.push(index);
    }

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Resource, Shift, Task};
    use crate::travel::TravelMatrix;

    fn catalog(tasks: Vec<Task>, locations: usize) -> Catalog {
        let resources = vec![Resource::new(1, vec![Shift::new(0, 480, 480)], 1)];
        Catalog::new(TravelMatrix::new(locations), tasks, Vec::new(), resources)
    }

    #[test]
    fn test_by_duration_descending_stable() {
        let c = catalog(
            vec![
                Task::new(1, 0, 30, 1),
                Task::new(2, 0, 50, 1),
                Task::new(3, 1, 30, 1),
                Task::new(4, 1, 10, 1),
            ],
            2,
        );
        let o = TaskOrdering::build(&c);
        // 50 first, then the two 30s in id order, then 10.
        assert_eq!(o.by_duration(), &[2, 1, 3, 4]);
    }

    #[test]
    fn test_by_location_groups() {
        let c = catalog(
            vec![
                Task::new(1, 2, 10, 1),
                Task::new(2, 0, 10, 1),
                Task::new(3, 2, 10, 1),
            ],
            3,
        );
        let o = TaskOrdering::build(&c);
        assert_eq!(o.at_location(0), &[2]);
        assert!(o.at_location(1).is_empty());
        assert_eq!(o.at_location(2), &[1, 3]);
    }

    #[test]
    fn test_locations_by_demand() {
        let c = catalog(
            vec![
                Task::new(1, 1, 10, 1),
                Task::new(2, 1, 10, 1),
                Task::new(3, 1, 10, 1),
                Task::new(4, 3, 10, 1),
                Task::new(5, 3, 10, 1),
                Task::new(6, 0, 10, 1),
            ],
            4,
        );
        let o = TaskOrdering::build(&c);
        // Counts: loc0=1, loc1=3, loc2=0, loc3=2.
        assert_eq!(o.locations_by_demand(), &[1, 3, 0, 2]);
    }

    #[test]
    fn test_demand_ties_to_lowest_index() {
        let c = catalog(
            vec![
                Task::new(1, 0, 10, 1),
                Task::new(2, 2, 10, 1),
                Task::new(3, 1, 10, 1),
            ],
            3,
        );
        let o = TaskOrdering::build(&c);
        assert_eq!(o.locations_by_demand(), &[0, 1, 2]);
    }

    #[test]
    fn test_empty_catalog() {
        let o = TaskOrdering::build(&catalog(Vec::new(), 2));
        assert!(o.by_duration().is_empty());
        assert_eq!(o.locations_by_demand(), &[0, 1]);
    }
}
