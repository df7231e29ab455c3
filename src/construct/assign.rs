//! Placement of constructed routes onto the resource×day grid.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Catalog, Solution};

/// Assigns every route in `solution` to a resource×day cell.
///
/// Rows are visited grouped by shift group, days left to right, and each
/// route takes the first free cell. A collaborative route pulls every
/// transitively related pending route into the rows immediately below it
/// in the same day column, so paired crews work the same day side by side.
///
/// Fails with [`Error::AssignmentOverflow`] when the grid runs out of
/// cells, or when a related route has no free row directly below its
/// partner.
pub fn assign_routes(solution: &mut Solution, catalog: &Catalog) -> Result<()> {
    let rows = catalog.resources().len();
    let days = catalog.horizon_days();
    let cells = rows * days;

    let mut grid = vec![vec![None; days]; rows];
    let row_order: Vec<usize> = catalog.resources_by_shift().into_values().flatten().collect();

    let mut pending: Vec<usize> = (0..solution.routes().len()).collect();

    while let Some(&route_index) = pending.first() {
        let mut placed = None;
        'scan: for &row in &row_order {
            for day in 0..days {
                if grid[row][day].is_none() {
                    placed = Some((row, day));
                    break 'scan;
                }
            }
        }
        let Some((row, day)) = placed else {
            return Err(Error::AssignmentOverflow {
                routes: solution.routes().len(),
                cells,
            });
        };
        debug!(route = route_index, row, day, "assigned route");
        grid[row][day] = Some(route_index);
        remove(&mut pending, route_index);

        if solution.routes()[route_index].is_collaborative() {
            let related = related_closure(solution, catalog, route_index, &pending);
            for (offset, &rel) in related.iter().enumerate() {
                let below = row + 1 + offset;
                if below >= rows || grid[below][day].is_some() {
                    return Err(Error::AssignmentOverflow {
                        routes: solution.routes().len(),
                        cells,
                    });
                }
                debug!(route = rel, row = below, day, "assigned related route");
                grid[below][day] = Some(rel);
                remove(&mut pending, rel);
            }
        }
    }

    let mut by_day = vec![Vec::new(); days];
    for (day, indices) in by_day.iter_mut().enumerate() {
        for row in grid.iter() {
            if let Some(index) = row[day] {
                indices.push(index);
            }
        }
    }

    solution.set_assignment(grid, by_day);
    Ok(())
}

/// Pending routes transitively related to `seed` through collaboration
/// pairs, in discovery order.
fn related_closure(
    solution: &Solution,
    catalog: &Catalog,
    seed: usize,
    pending: &[usize],
) -> Vec<usize> {
    let routes = solution.routes();
    let mut related: Vec<usize> = pending
        .iter()
        .copied()
        .filter(|&index| routes[seed].is_related(catalog, &routes[index]))
        .collect();

    let mut i = 0;
    while i < related.len() {
        let anchor = related[i];
        for &candidate in pending {
            if !related.contains(&candidate)
                && routes[anchor].is_related(catalog, &routes[candidate])
            {
                related.push(candidate);
            }
        }
        i += 1;
    }
    related
}

fn remove(pending: &mut Vec<usize>, index: usize) {
    if let Some(position) = pending.iter().position(|&p| p == index) {
        pending.remove(position);
    }
}
