//! Nearest-location rankings.

use crate::travel::TravelMatrix;

/// Per-location rankings of all other locations, strictly ascending by
/// distance, by outgoing travel time, and by incoming travel time.
///
/// Each ranking has length `L - 1`: a location never appears in its own
/// ranking. Ties break to the lowest location index. Construction is
/// O(L³) but runs once; the index is never mutated afterwards.
///
/// # Examples
///
/// ```
/// use field_dispatch::proximity::ProximityIndex;
/// use field_dispatch::travel::TravelMatrix;
///
/// let mut tm = TravelMatrix::new(3);
/// tm.set(0, 1, 9, 9);
/// tm.set(0, 2, 4, 4);
/// let index = ProximityIndex::build(&tm);
/// assert_eq!(index.nearest_time_from(0), &[2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityIndex {
    nearest_distance: Vec<Vec<usize>>,
    nearest_time_from: Vec<Vec<usize>>,
    nearest_time_to: Vec<Vec<usize>>,
}

impl ProximityIndex {
    /// Builds all three rankings from the travel matrix.
    pub fn build(travel: &TravelMatrix) -> Self {
        let l = travel.len();
        let mut nearest_distance = Vec::with_capacity(l);
        let mut nearest_time_from = Vec::with_capacity(l);
        let mut nearest_time_to = Vec::with_capacity(l);

        for i in 0..l {
            nearest_distance.push(rank_by(l, i, |j| travel.distance(i, j)));
            nearest_time_from.push(rank_by(l, i, |j| travel.time(i, j)));
            nearest_time_to.push(rank_by(l, i, |j| travel.time(j, i)));
        }

        Self {
            nearest_distance,
            nearest_time_from,
            nearest_time_to,
        }
    }

    /// Other locations ranked by ascending distance from `i`.
    pub fn nearest_distance(&self, i: usize) -> &[usize] {
        &self.nearest_distance[i]
    }

    /// Other locations ranked by ascending travel time *from* `i`.
    pub fn nearest_time_from(&self, i: usize) -> &[usize] {
        &self.nearest_time_from[i]
    }

    /// Other locations ranked by ascending travel time *to* `j`.
    pub fn nearest_time_to(&self, j: usize) -> &[usize] {
        &self.nearest_time_to[j]
    }

    /// Number of locations the index covers.
    pub fn len(&self) -> usize {
        self.nearest_distance.len()
    }

    /// Returns `true` if the index covers no locations.
    pub fn is_empty(&self) -> bool {
        self.nearest_distance.is_empty()
    }
}

/// One ranking pass: repeatedly find the minimum metric at or above a
/// rising floor among not-yet-picked locations, keeping the first (lowest)
/// index that achieves it.
fn rank_by<F: Fn(usize) -> i64>(l: usize, exclude: usize, metric: F) -> Vec<usize> {
    let mut picked = vec![false; l];
    let mut ranking = Vec::with_capacity(l.saturating_sub(1));
    let mut floor = i64::MIN;

    for _ in 0..l.saturating_sub(1) {
        let mut best: Option<(usize, i64)> = None;
        for j in 0..l {
            if j == exclude || picked[j] {
                continue;
            }
            let value = metric(j);
            if value >= floor && best.map_or(true, |(_, b)| value < b) {
                best = Some((j, value));
            }
        }
        let Some((index, value)) = best else { break };
        floor = value;
        picked[index] = true;
        ranking.push(index);
    }

    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matrix(size: usize, times: &[i64]) -> TravelMatrix {
        TravelMatrix::from_data(size, times.to_vec(), times.to_vec()).expect("square data")
    }

    #[test]
    fn test_rankings_ascending_with_tie_break() {
        // From 0: time to 1 = 7, to 2 = 3, to 3 = 7. Ties (1 vs 3) break
        // to the lower index.
        #[rustfmt::skip]
        let tm = matrix(4, &[
            0, 7, 3, 7,
            7, 0, 5, 1,
            3, 5, 0, 2,
            7, 1, 2, 0,
        ]);
        let index = ProximityIndex::build(&tm);
        assert_eq!(index.nearest_time_from(0), &[2, 1, 3]);
        assert_eq!(index.nearest_time_from(1), &[3, 2, 0]);
        assert_eq!(index.nearest_time_from(3), &[1, 2, 0]);
    }

    #[test]
    fn test_incoming_ranking_uses_columns() {
        // Asymmetric: times into location 2 are the column [9, 1, -, 4].
        #[rustfmt::skip]
        let distances = [
            0, 5, 9, 5,
            5, 0, 1, 5,
            9, 1, 0, 5,
            5, 5, 4, 0,
        ];
        #[rustfmt::skip]
        let times = [
            0, 5, 9, 5,
            5, 0, 1, 5,
            9, 1, 0, 5,
            5, 5, 4, 0,
        ];
        let tm = TravelMatrix::from_data(4, distances.to_vec(), times.to_vec()).expect("square");
        let index = ProximityIndex::build(&tm);
        assert_eq!(index.nearest_time_to(2), &[1, 3, 0]);
    }

    #[test]
    fn test_excludes_self() {
        let tm = matrix(3, &[0, 2, 4, 2, 0, 6, 4, 6, 0]);
        let index = ProximityIndex::build(&tm);
        for i in 0..3 {
            assert_eq!(index.nearest_time_from(i).len(), 2);
            assert!(!index.nearest_time_from(i).contains(&i));
            assert!(!index.nearest_time_to(i).contains(&i));
            assert!(!index.nearest_distance(i).contains(&i));
        }
    }

    #[test]
    fn test_single_location() {
        let index = ProximityIndex::build(&TravelMatrix::new(1));
        assert_eq!(index.len(), 1);
        assert!(index.nearest_time_from(0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_build_is_deterministic(values in prop::collection::vec(0i64..50, 25)) {
            let tm = matrix(5, &values);
            prop_assert_eq!(ProximityIndex::build(&tm), ProximityIndex::build(&tm));
        }

        #[test]
        fn prop_rankings_sorted_and_complete(values in prop::collection::vec(0i64..20, 36)) {
            let tm = matrix(6, &values);
            let index = ProximityIndex::build(&tm);
            for i in 0..6 {
                let ranking = index.nearest_time_from(i);
                prop_assert_eq!(ranking.len(), 5);
                for pair in ranking.windows(2) {
                    let (a, b) = (tm.time(i, pair[0]), tm.time(i, pair[1]));
                    prop_assert!(a < b || (a == b && pair[0] < pair[1]));
                }
            }
        }
    }
}
