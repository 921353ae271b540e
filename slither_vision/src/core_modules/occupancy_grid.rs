// THEORY:
// The `OccupancyGrid` is the polar picture of the world for a single cycle.
// Rows are rays (a full circle, so the first and last rows are neighbours) and
// columns are samples running outward from the agent. Storage is one flat
// vector in ray-major order, like the chunk status map in the grid manager of
// a chunked vision pipeline, with `[ray][sample]` addressing layered on top.
//
// The grid is rebuilt from scratch every cycle and owned exclusively by the
// pipeline while the stages mutate it in place. Only the ray axis wraps; the
// sample axis is bounded by the agent on one side and the ray end on the other.

use crate::core_modules::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A (ray, sample) coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub ray: usize,
    pub sample: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct OccupancyGrid {
    rays: usize,
    samples: usize,
    cells: Vec<Cell>,
}

/// Unchecked wire shape of a grid; only reachable through `TryFrom`.
#[derive(Deserialize)]
struct RawGrid {
    rays: usize,
    samples: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for OccupancyGrid {
    type Error = String;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        if raw.rays == 0 || raw.samples == 0 {
            return Err(format!(
                "grid must have at least one ray and one sample, got {}x{}",
                raw.rays, raw.samples
            ));
        }
        let expected = raw.rays.checked_mul(raw.samples);
        if expected != Some(raw.cells.len()) {
            return Err(format!(
                "{}x{} grid holds {} cells",
                raw.rays,
                raw.samples,
                raw.cells.len()
            ));
        }
        Ok(Self {
            rays: raw.rays,
            samples: raw.samples,
            cells: raw.cells,
        })
    }
}

impl OccupancyGrid {
    /// Creates a grid with every cell set to `fill`.
    pub fn filled(rays: usize, samples: usize, fill: Cell) -> Self {
        Self {
            rays,
            samples,
            cells: vec![fill; rays * samples],
        }
    }

    pub fn empty(rays: usize, samples: usize) -> Self {
        Self::filled(rays, samples, Cell::Empty)
    }

    pub fn rays(&self) -> usize {
        self.rays
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    fn index(&self, ray: usize, sample: usize) -> usize {
        debug_assert!(ray < self.rays && sample < self.samples);
        ray * self.samples + sample
    }

    pub fn get(&self, ray: usize, sample: usize) -> Cell {
        self.cells[self.index(ray, sample)]
    }

    pub fn set(&mut self, ray: usize, sample: usize, cell: Cell) {
        let index = self.index(ray, sample);
        self.cells[index] = cell;
    }

    /// Maps any signed ray offset back onto `[0, rays)`.
    pub fn wrap_ray(&self, ray: isize) -> usize {
        ray.rem_euclid(self.rays as isize) as usize
    }

    /// All cells of one ray, innermost sample first.
    pub fn ray(&self, ray: usize) -> &[Cell] {
        let start = ray * self.samples;
        &self.cells[start..start + self.samples]
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            (
                GridPoint {
                    ray: i / self.samples,
                    sample: i % self.samples,
                },
                *cell,
            )
        })
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|c| **c == kind).count()
    }

    /// One line per ray, one glyph per sample.
    pub fn text_dump(&self) -> String {
        let mut out = String::with_capacity(self.rays * (self.samples + 8));
        for ray in 0..self.rays {
            let _ = write!(out, "{ray:>4} ");
            out.extend(self.ray(ray).iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}
