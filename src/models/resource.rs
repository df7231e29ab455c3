//! Resource and shift types.

use serde::{Deserialize, Serialize};

/// One bounded working window of a resource on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Start of the window, minutes into the horizon.
    pub start: i64,
    /// End of the window, minutes into the horizon.
    pub end: i64,
    /// Capacity minutes available within the window.
    pub availability: i64,
}

impl Shift {
    /// Creates a shift window.
    pub fn new(start: i64, end: i64, availability: i64) -> Self {
        Self {
            start,
            end,
            availability,
        }
    }
}

/// A field-service resource (technician) with one shift window per day.
///
/// Resources sharing the same first-shift start time belong to the same
/// shift group; the assignment grid keeps group members on adjacent rows.
///
/// # Examples
///
/// ```
/// use field_dispatch::models::{Resource, Shift};
///
/// let r = Resource::new(1, vec![Shift::new(480, 960, 480); 5], 1);
/// assert_eq!(r.num_days(), 5);
/// assert_eq!(r.total_availability(), 2400);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: u32,
    shifts: Vec<Shift>,
    shift_group: u32,
}

impl Resource {
    /// Creates a resource with its per-day shift windows and shift group.
    pub fn new(id: u32, shifts: Vec<Shift>, shift_group: u32) -> Self {
        Self {
            id,
            shifts,
            shift_group,
        }
    }

    /// Resource identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Per-day shift windows.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Number of days this resource works.
    pub fn num_days(&self) -> usize {
        self.shifts.len()
    }

    /// Shift group number (resources with identical first-shift starts).
    pub fn shift_group(&self) -> u32 {
        self.shift_group
    }

    /// Sum of capacity minutes across all shifts.
    pub fn total_availability(&self) -> i64 {
        self.shifts.iter().map(|s| s.availability).sum()
    }
}
