// THEORY:
// The `RayCaster` is the perception layer. It turns a raw RGB frame into the
// polar `OccupancyGrid` every later stage reasons over.
//
// Key architectural principles:
// 1.  **Fixed Geometry**: The sampling geometry never changes for the life of
//     the process, so every sample's pixel coordinate is computed once, at
//     construction. A cycle is then one brightness test per cell.
// 2.  **Quadrant Composition**: Rays are laid out quadrant by quadrant. The
//     second and fourth quadrants walk their rays in reverse and each quadrant
//     flips the sign of x and/or y, so the four quadrants join into one
//     continuous sweep. Because image rows grow downward, ray 0 points toward
//     the bottom of the screen and indices increase counter-clockwise.
// 3.  **Single-Pixel Test**: A sample is occupied when the sum of its three
//     channels exceeds the configured threshold. No neighbourhood, no history.
// 4.  **Loud Geometry Errors**: A sample outside the frame is a mismatch
//     between config and capture. It is reported, never clamped, because a
//     clamped sample would silently produce wrong vision data.

use crate::config::SteeringConfig;
use crate::core_modules::cell::Cell;
use crate::core_modules::occupancy_grid::OccupancyGrid;
use crate::error::{Result, VisionError};
use image::RgbImage;

/// Builds an RGB frame from a raw, tightly packed 3-channel buffer
/// (origin top-left, rows growing downward).
pub fn frame_from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<RgbImage> {
    let expected = width as usize * height as usize * 3;
    let actual = bytes.len();
    if actual != expected {
        return Err(VisionError::FrameSize { expected, actual });
    }
    RgbImage::from_raw(width, height, bytes).ok_or(VisionError::FrameSize { expected, actual })
}

pub struct RayCaster {
    rays: usize,
    samples: usize,
    color_threshold: u32,
    debug: bool,
    /// Pixel coordinate of every cell, ray-major like the grid itself.
    sample_points: Vec<(i64, i64)>,
}

impl RayCaster {
    pub fn new(config: &SteeringConfig) -> Result<Self> {
        config.validate()?;

        let rays = config.ray_count();
        let samples = config.sample_count();
        let rays_per_quadrant = config.rays_per_quadrant();
        let mut sample_points = vec![(0, 0); rays * samples];

        for quadrant in 0..4 {
            for ray in 0..rays_per_quadrant {
                let ray_index = quadrant * rays_per_quadrant + ray;
                let mirrored = quadrant == 1 || quadrant == 3;
                let ray_actual = if mirrored { rays_per_quadrant - ray } else { ray };
                let radians = ((ray_actual as u32 * config.degrees_per_ray) as f64).to_radians();

                for sample in 0..samples {
                    let distance = config.sample_distance(sample);
                    // `as` truncates toward zero, matching integer pixel snapping.
                    let mut x = (radians.sin() * distance) as i64;
                    let mut y = (radians.cos() * distance) as i64;
                    if quadrant == 2 || quadrant == 3 {
                        x = -x;
                    }
                    if quadrant == 1 || quadrant == 2 {
                        y = -y;
                    }
                    sample_points[ray_index * samples + sample] =
                        (x + config.center_point.x, y + config.center_point.y);
                }
            }
        }

        Ok(Self {
            rays,
            samples,
            color_threshold: config.color_threshold,
            debug: config.debug,
            sample_points,
        })
    }

    pub fn rays(&self) -> usize {
        self.rays
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Absolute pixel coordinate examined for the given cell.
    pub fn sample_point(&self, ray: usize, sample: usize) -> (i64, i64) {
        self.sample_points[ray * self.samples + sample]
    }

    /// Samples the frame at every grid position.
    pub fn cast(&self, frame: &RgbImage) -> Result<OccupancyGrid> {
        if self.debug {
            return Ok(OccupancyGrid::filled(self.rays, self.samples, Cell::Active));
        }

        let (width, height) = frame.dimensions();
        let mut grid = OccupancyGrid::empty(self.rays, self.samples);

        for ray in 0..self.rays {
            for sample in 0..self.samples {
                let (x, y) = self.sample_point(ray, sample);
                if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
                    return Err(VisionError::SampleOutOfBounds {
                        ray,
                        sample,
                        x,
                        y,
                        width,
                        height,
                    });
                }

                let [r, g, b] = frame.get_pixel(x as u32, y as u32).0;
                let total = r as u32 + g as u32 + b as u32;
                if total > self.color_threshold {
                    grid.set(ray, sample, Cell::Active);
                }
            }
        }

        Ok(grid)
    }
}
