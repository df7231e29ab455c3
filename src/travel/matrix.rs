//! Dense travel matrix.

use serde::{Deserialize, Serialize};

/// A dense n×n travel matrix carrying both distance and travel time,
/// stored in row-major order.
///
/// Entries are asymmetric: `distance(i, j)` need not equal
/// `distance(j, i)`. The matrix is immutable once loaded.
///
/// # Examples
///
/// ```
/// use field_dispatch::travel::TravelMatrix;
///
/// let mut tm = TravelMatrix::new(3);
/// tm.set(0, 1, 12, 10);
/// assert_eq!(tm.distance(0, 1), 12);
/// assert_eq!(tm.time(0, 1), 10);
/// assert_eq!(tm.time(1, 0), 0);
/// assert_eq!(tm.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelMatrix {
    distances: Vec<i64>,
    times: Vec<i64>,
    size: usize,
}

impl TravelMatrix {
    /// Creates a travel matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            distances: vec![0; size * size],
            times: vec![0; size * size],
            size,
        }
    }

    /// Creates a travel matrix from explicit n×n grids.
    ///
    /// Returns `None` if either grid's length doesn't match `size * size`.
    pub fn from_data(size: usize, distances: Vec<i64>, times: Vec<i64>) -> Option<Self> {
        if distances.len() != size * size || times.len() != size * size {
            return None;
        }
        Some(Self {
            distances,
            times,
            size,
        })
    }

    /// Sets the distance and travel time from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: i64, time: i64) {
        self.distances[from * self.size + to] = distance;
        self.times[from * self.size + to] = time;
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.distances[from * self.size + to]
    }

    /// Returns the travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn time(&self, from: usize, to: usize) -> i64 {
        self.times[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix covers no locations.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if travel times are symmetric.
    pub fn is_time_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.time(i, j) != self.time(j, i) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroed() {
        let tm = TravelMatrix::new(4);
        assert_eq!(tm.len(), 4);
        assert!(!tm.is_empty());
        assert_eq!(tm.distance(2, 3), 0);
        assert_eq!(tm.time(3, 2), 0);
    }

    #[test]
    fn test_set_get() {
        let mut tm = TravelMatrix::new(3);
        tm.set(1, 2, 7, 5);
        assert_eq!(tm.distance(1, 2), 7);
        assert_eq!(tm.time(1, 2), 5);
        assert_eq!(tm.distance(2, 1), 0);
    }

    #[test]
    fn test_from_data() {
        let tm = TravelMatrix::from_data(2, vec![0, 3, 4, 0], vec![0, 2, 6, 0]).expect("valid");
        assert_eq!(tm.distance(0, 1), 3);
        assert_eq!(tm.time(1, 0), 6);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(TravelMatrix::from_data(2, vec![0, 1, 2], vec![0; 4]).is_none());
        assert!(TravelMatrix::from_data(2, vec![0; 4], vec![0; 3]).is_none());
    }

    #[test]
    fn test_asymmetry() {
        let mut tm = TravelMatrix::new(2);
        tm.set(0, 1, 10, 8);
        tm.set(1, 0, 10, 9);
        assert!(!tm.is_time_symmetric());
        tm.set(1, 0, 10, 8);
        assert!(tm.is_time_symmetric());
    }
}
