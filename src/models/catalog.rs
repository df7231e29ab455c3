//! The validated in-memory problem catalog.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::travel::TravelMatrix;

use super::{Resource, Task, TaskId, Unit};

/// Immutable problem data handed to the core by the ingestion layer.
///
/// Holds the travel matrices, the task and callback catalogs (two disjoint
/// id spaces), the symmetric collaboration pairing, and the resource list
/// with its derived aggregates.
///
/// # Examples
///
/// ```
/// use field_dispatch::models::{Catalog, Resource, Shift, Task};
/// use field_dispatch::travel::TravelMatrix;
///
/// let tasks = vec![Task::new(1, 0, 30, 1), Task::new(2, 1, 20, 1)];
/// let resources = vec![Resource::new(1, vec![Shift::new(0, 480, 480); 2], 1)];
/// let catalog = Catalog::new(TravelMatrix::new(2), tasks, Vec::new(), resources);
///
/// assert_eq!(catalog.mandays(), 2);
/// assert_eq!(catalog.shift_duration(), 480);
/// assert_eq!(catalog.unit(1).expect("known").duration(), 30);
/// assert!(catalog.unit(99).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    travel: TravelMatrix,
    tasks: BTreeMap<TaskId, Task>,
    callbacks: BTreeMap<TaskId, Task>,
    collaborations: HashMap<TaskId, TaskId>,
    resources: Vec<Resource>,
}

impl Catalog {
    /// Creates a catalog from already-validated data.
    pub fn new(
        travel: TravelMatrix,
        tasks: Vec<Task>,
        callbacks: Vec<Task>,
        resources: Vec<Resource>,
    ) -> Self {
        Self {
            travel,
            tasks: tasks.into_iter().map(|t| (t.id(), t)).collect(),
            callbacks: callbacks.into_iter().map(|t| (t.id(), t)).collect(),
            collaborations: HashMap::new(),
            resources,
        }
    }

    /// Registers a collaboration pair; the mapping is kept symmetric.
    pub fn add_collaboration(&mut self, a: TaskId, b: TaskId) {
        self.collaborations.insert(a, b);
        self.collaborations.insert(b, a);
    }

    /// Number of locations covered by the travel matrix.
    pub fn num_locations(&self) -> usize {
        self.travel.len()
    }

    /// The travel matrix.
    pub fn travel(&self) -> &TravelMatrix {
        &self.travel
    }

    /// Distance from location `from` to location `to`.
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.travel.distance(from, to)
    }

    /// Travel time from location `from` to location `to`.
    pub fn travel_time(&self, from: usize, to: usize) -> i64 {
        self.travel.time(from, to)
    }

    /// The regular task catalog, in ascending id order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Number of regular tasks.
    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Looks up a regular task.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// The callback catalog, in ascending id order.
    pub fn callbacks(&self) -> impl Iterator<Item = &Task> {
        self.callbacks.values()
    }

    /// Looks up a callback.
    pub fn callback(&self, id: TaskId) -> Option<&Task> {
        self.callbacks.get(&id)
    }

    /// Resolves an id against the task catalog first, then the callback
    /// catalog.
    ///
    /// An id found in neither space is a data error and is surfaced as
    /// [`Error::UnknownUnit`] rather than silently defaulted.
    pub fn unit(&self, id: TaskId) -> Result<Unit<'_>> {
        if let Some(task) = self.tasks.get(&id) {
            Ok(Unit::Ordinary(task))
        } else if let Some(callback) = self.callbacks.get(&id) {
            Ok(Unit::Callback(callback))
        } else {
            Err(Error::UnknownUnit { id })
        }
    }

    /// Returns `true` if the id is a collaboration anchor.
    pub fn is_collaboration(&self, id: TaskId) -> bool {
        self.collaborations.contains_key(&id)
    }

    /// The collaboration partner of an anchor, if any.
    pub fn partner(&self, id: TaskId) -> Option<TaskId> {
        self.collaborations.get(&id).copied()
    }

    /// The resource list.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Total count of (resource, day) shift instances.
    pub fn mandays(&self) -> usize {
        self.resources.iter().map(|r| r.num_days()).sum()
    }

    /// Capacity minutes of a single shift, assumed uniform across the
    /// fleet. Zero when there are no resources.
    pub fn shift_duration(&self) -> i64 {
        self.resources
            .first()
            .and_then(|r| r.shifts().first())
            .map_or(0, |s| s.availability)
    }

    /// Number of day columns on the assignment grid.
    pub fn horizon_days(&self) -> usize {
        self.resources.first().map_or(0, |r| r.num_days())
    }

    /// Resource row indices grouped by shift number, groups in ascending
    /// shift order and rows in list order within each group.
    pub fn resources_by_shift(&self) -> BTreeMap<u32, Vec<usize>> {
        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (row, resource) in self.resources.iter().enumerate() {
            groups.entry(resource.shift_group()).or_default().push(row);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Shift;

    fn sample() -> Catalog {
        let tasks = vec![
            Task::new(1, 0, 30, 1),
            Task::new(2, 1, 20, 1),
            Task::new(3, 1, 40, 2),
        ];
        let callbacks = vec![Task::callback(100, 2, 25, 1, 500)];
        let resources = vec![
            Resource::new(1, vec![Shift::new(0, 480, 480); 3], 1),
            Resource::new(2, vec![Shift::new(60, 540, 480); 3], 2),
            Resource::new(3, vec![Shift::new(0, 480, 480); 3], 1),
        ];
        let mut catalog = Catalog::new(TravelMatrix::new(3), tasks, callbacks, resources);
        catalog.add_collaboration(1, 3);
        catalog
    }

    #[test]
    fn test_unit_resolution() {
        let catalog = sample();
        assert!(!catalog.unit(2).expect("task").is_callback());
        assert!(catalog.unit(100).expect("callback").is_callback());
        assert_eq!(
            catalog.unit(77),
            Err(Error::UnknownUnit { id: 77 })
        );
    }

    #[test]
    fn test_collaboration_symmetric() {
        let catalog = sample();
        assert!(catalog.is_collaboration(1));
        assert!(catalog.is_collaboration(3));
        assert!(!catalog.is_collaboration(2));
        assert_eq!(catalog.partner(1), Some(3));
        assert_eq!(catalog.partner(3), Some(1));
    }

    #[test]
    fn test_aggregates() {
        let catalog = sample();
        assert_eq!(catalog.mandays(), 9);
        assert_eq!(catalog.shift_duration(), 480);
        assert_eq!(catalog.horizon_days(), 3);
    }

    #[test]
    fn test_resources_by_shift() {
        let catalog = sample();
        let groups = catalog.resources_by_shift();
        assert_eq!(groups[&1], vec![0, 2]);
        assert_eq!(groups[&2], vec![1]);
    }

    #[test]
    fn test_task_iteration_ordered() {
        let catalog = sample();
        let ids: Vec<_> = catalog.tasks().map(|t| t.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
