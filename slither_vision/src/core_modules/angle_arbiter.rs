// THEORY:
// The `AngleArbiter` is the decision layer. It reads the fully labelled grid
// and produces the one number the rest of the system acts on: the next heading.
//
// Decision steps:
// 1.  **Sighting**: Rings are scanned innermost first and, within a ring, in ray
//     order. The first Predator and the first Food cell seen are remembered.
//     The first predator ends the scan, since nothing further out can matter
//     more than the closest threat.
// 2.  **Priority**: A predator always wins; the target is directly away from
//     it. Otherwise the target is the nearest food. With nothing in sight the
//     agent holds its course.
// 3.  **Rate Clamp**: The turn toward the target is measured the short way
//     round the circle and limited to `max_turn_per_cycle`. The output is
//     always within that many degrees of the input and always in `[0, 360)`.

use crate::core_modules::cell::Cell;
use crate::core_modules::heading::{angular_difference, normalize_degrees, ray_angle};
use crate::core_modules::occupancy_grid::OccupancyGrid;

/// What the scan found, as ray indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sighting {
    pub predator_ray: Option<usize>,
    pub food_ray: Option<usize>,
}

/// Nearest-ring-first scan for the first predator and first food.
pub fn scan(grid: &OccupancyGrid) -> Sighting {
    let mut sighting = Sighting::default();

    for sample in 0..grid.samples() {
        for ray in 0..grid.rays() {
            match grid.get(ray, sample) {
                Cell::Predator => {
                    sighting.predator_ray = Some(ray);
                    return sighting;
                }
                Cell::Food if sighting.food_ray.is_none() => {
                    sighting.food_ray = Some(ray);
                }
                _ => {}
            }
        }
    }

    sighting
}

/// Heading the agent would like to take, before the turn-rate clamp.
pub fn target_heading(sighting: &Sighting, rays: usize, current_heading: f64) -> f64 {
    match (sighting.predator_ray, sighting.food_ray) {
        (Some(predator), _) => normalize_degrees(ray_angle(predator, rays) + 180.0),
        (None, Some(food)) => ray_angle(food, rays),
        (None, None) => normalize_degrees(current_heading),
    }
}

/// Moves `current` toward `target` by at most `max_turn` degrees.
pub fn clamp_turn(current: f64, target: f64, max_turn: f64) -> f64 {
    let current = normalize_degrees(current);
    let difference = angular_difference(current, target);
    if difference.abs() > max_turn {
        normalize_degrees(current + max_turn.copysign(difference))
    } else {
        normalize_degrees(target)
    }
}

/// Picks this cycle's heading from a classified, filtered grid.
pub fn choose_heading(grid: &OccupancyGrid, current_heading: f64, max_turn: f64) -> f64 {
    let sighting = scan(grid);
    let target = target_heading(&sighting, grid.rays(), current_heading);
    clamp_turn(current_heading, target, max_turn)
}
