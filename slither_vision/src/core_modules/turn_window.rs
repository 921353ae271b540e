// THEORY:
// The `TurnWindowFilter` keeps the agent from chasing food it cannot reach.
// The agent turns at most a few degrees per cycle, so food far off to the side
// or behind it would pull the heading back and forth without ever being eaten.
//
// The reachable window is centered on the ray nearest the current heading and
// spans `ray_count / divisor` rays to either side, so it holds
// `2 * (ray_count / divisor) + 1` rays. Every other ray forms the suppressed
// arc. The suppression tapers with distance from the agent: the innermost ring
// suppresses the whole arc, and each further ring trims one ray from both ends,
// until `taper_rings` rings have been processed. Only Food is ever relabelled
// (to Ignore); predators and the agent's own body always stay visible.

use crate::config::TurnWindowConfig;
use crate::core_modules::cell::Cell;
use crate::core_modules::heading::ray_for_heading;
use crate::core_modules::occupancy_grid::OccupancyGrid;

/// Ray indices outside the reachable window, walking forward from the window's
/// leading edge to its trailing edge.
pub fn suppressed_arc(rays: usize, heading: f64, window: &TurnWindowConfig) -> Vec<usize> {
    let center = ray_for_heading(heading, rays);
    let half = rays / window.divisor;
    if half == 0 {
        return Vec::new();
    }
    let start = center + half + 1;
    let len = rays.saturating_sub(2 * half + 1);
    (0..len).map(|i| (start + i) % rays).collect()
}

/// Relabels unreachable Food as Ignore. Returns how many cells were changed.
pub fn suppress_unreachable(
    grid: &mut OccupancyGrid,
    heading: f64,
    window: &TurnWindowConfig,
) -> usize {
    let arc = suppressed_arc(grid.rays(), heading, window);
    let rings = window.taper_rings.min(grid.samples());
    let mut suppressed = 0;

    for ring in 0..rings {
        if 2 * ring >= arc.len() {
            break;
        }
        for &ray in &arc[ring..arc.len() - ring] {
            if grid.get(ray, ring) == Cell::Food {
                grid.set(ray, ring, Cell::Ignore);
                suppressed += 1;
            }
        }
    }

    suppressed
}
