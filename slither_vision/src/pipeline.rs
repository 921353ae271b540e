// THEORY:
// The `pipeline` module is the top-level API of the vision core. It wires the
// four stages into one call per cycle:
//
//   RayCaster -> ClusterClassifier -> TurnWindowFilter -> AngleArbiter
//
// The pipeline is a pure function of (frame, heading, config). It owns the
// validated config and the precomputed sampling geometry, but nothing that
// changes from one cycle to the next. The caller passes the previous heading
// in and keeps the returned one; the grid produced along the way is handed
// back for recording and then dropped.

use crate::config::SteeringConfig;
use crate::core_modules::angle_arbiter::choose_heading;
use crate::core_modules::cell::Cell;
use crate::core_modules::cluster_classifier::{classify, Cluster};
use crate::core_modules::occupancy_grid::OccupancyGrid;
use crate::core_modules::ray_caster::RayCaster;
use crate::core_modules::turn_window::suppress_unreachable;
use crate::error::Result;
use image::RgbImage;
use tracing::debug;

/// Everything a single cycle produced.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// The fully labelled grid, after turn-window suppression.
    pub grid: OccupancyGrid,
    pub clusters: Vec<Cluster>,
    /// Food cells relabelled as unreachable this cycle.
    pub suppressed: usize,
    /// The new heading in `[0, 360)`.
    pub heading: f64,
}

pub struct SteeringPipeline {
    config: SteeringConfig,
    ray_caster: RayCaster,
}

impl SteeringPipeline {
    /// Validates the config and precomputes the sampling geometry.
    pub fn new(config: SteeringConfig) -> Result<Self> {
        let ray_caster = RayCaster::new(&config)?;
        Ok(Self { config, ray_caster })
    }

    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    pub fn ray_caster(&self) -> &RayCaster {
        &self.ray_caster
    }

    /// Runs one full perception-and-decision cycle on a frame.
    pub fn cycle(&self, frame: &RgbImage, current_heading: f64) -> Result<CycleOutcome> {
        let grid = self.ray_caster.cast(frame)?;
        Ok(self.decide(grid, current_heading))
    }

    /// Runs every stage after ray casting on an already sampled grid.
    pub fn decide(&self, mut grid: OccupancyGrid, current_heading: f64) -> CycleOutcome {
        let clusters = classify(&mut grid, &self.config);
        let suppressed = suppress_unreachable(&mut grid, current_heading, &self.config.turn_window);
        let heading = choose_heading(&grid, current_heading, self.config.max_turn_per_cycle);

        debug!(
            clusters = clusters.len(),
            food = grid.count(Cell::Food),
            predator = grid.count(Cell::Predator),
            suppressed,
            from = current_heading,
            to = heading,
            "cycle complete"
        );

        CycleOutcome {
            grid,
            clusters,
            suppressed,
            heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::cluster_classifier::ClusterKind;
    use crate::error::VisionError;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn paint_disk(frame: &mut RgbImage, cx: i64, cy: i64, radius: i64) {
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                if (x - cx).pow(2) + (y - cy).pow(2) <= radius.pow(2) {
                    frame.put_pixel(x as u32, y as u32, WHITE);
                }
            }
        }
    }

    #[test]
    fn invalid_config_fails_at_construction() {
        let config = SteeringConfig {
            degrees_per_ray: 7,
            ..SteeringConfig::default()
        };
        assert!(matches!(
            SteeringPipeline::new(config),
            Err(VisionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn single_pellet_ahead_is_steered_toward() {
        let pipeline = SteeringPipeline::new(SteeringConfig::default()).unwrap();
        let mut frame = RgbImage::new(1280, 800);
        let (x, y) = pipeline.ray_caster().sample_point(2, 3);
        frame.put_pixel(x as u32, y as u32, WHITE);

        let outcome = pipeline.cycle(&frame, 0.0).unwrap();
        assert_eq!(outcome.clusters.len(), 1);
        assert_eq!(outcome.clusters[0].kind, ClusterKind::Food);
        assert_eq!(outcome.heading, 10.0);
    }

    #[test]
    fn pellet_behind_is_ignored() {
        let pipeline = SteeringPipeline::new(SteeringConfig::default()).unwrap();
        let mut frame = RgbImage::new(1280, 800);
        let (x, y) = pipeline.ray_caster().sample_point(36, 0);
        frame.put_pixel(x as u32, y as u32, WHITE);

        let outcome = pipeline.cycle(&frame, 0.0).unwrap();
        assert_eq!(outcome.suppressed, 1);
        assert_eq!(outcome.grid.get(36, 0), Cell::Ignore);
        assert_eq!(outcome.heading, 0.0);
    }

    #[test]
    fn large_mass_to_the_side_is_fled_from() {
        let pipeline = SteeringPipeline::new(SteeringConfig::default()).unwrap();
        let mut frame = RgbImage::new(1280, 800);
        // 180 px out along ray 18 (90 degrees).
        paint_disk(&mut frame, 820, 436, 60);

        let outcome = pipeline.cycle(&frame, 0.0).unwrap();
        assert!(outcome.grid.count(Cell::Predator) > 0);
        assert!(outcome.clusters.iter().any(|c| c.kind == ClusterKind::Predator));
        // Target is 270; one cycle turns 12 degrees toward it.
        assert_eq!(outcome.heading, 348.0);
    }

    #[test]
    fn own_body_at_the_center_is_not_a_threat() {
        let pipeline = SteeringPipeline::new(SteeringConfig::default()).unwrap();
        let mut frame = RgbImage::new(1280, 800);
        paint_disk(&mut frame, 640, 436, 80);

        let outcome = pipeline.cycle(&frame, 200.0).unwrap();
        assert_eq!(outcome.grid.count(Cell::Predator), 0);
        assert!(outcome.grid.count(Cell::SelfBody) > 0);
        assert_eq!(outcome.heading, 200.0);
    }

    #[test]
    fn debug_mode_reads_as_own_body() {
        let config = SteeringConfig {
            debug: true,
            ..SteeringConfig::default()
        };
        let pipeline = SteeringPipeline::new(config).unwrap();
        let outcome = pipeline.cycle(&RgbImage::new(1, 1), 33.0).unwrap();
        assert_eq!(outcome.clusters.len(), 1);
        assert_eq!(outcome.heading, 33.0);
    }

    #[test]
    fn undersized_frame_is_reported() {
        let pipeline = SteeringPipeline::new(SteeringConfig::default()).unwrap();
        let result = pipeline.cycle(&RgbImage::new(640, 480), 0.0);
        assert!(matches!(result, Err(VisionError::SampleOutOfBounds { .. })));
    }
}
