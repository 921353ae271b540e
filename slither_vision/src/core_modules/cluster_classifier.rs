// THEORY:
// The `ClusterClassifier` is the spatial grouping layer. It takes the raw
// Active/Empty grid from the `RayCaster` and answers "what is each bright
// thing?" by grouping touching cells into clusters and sizing them.
//
// Algorithm steps:
// 1.  **Seeding**: Cells are scanned ring by ring, innermost first. The first
//     Active cell of an unclaimed cluster becomes its seed. The scan order only
//     picks the seed; the cluster it grows into is the same either way.
// 2.  **Region Growing**: An explicit stack-based traversal claims every Active
//     cell reachable through the 8 neighbours. The ray axis wraps (ray 0 and the
//     last ray touch), the sample axis does not. Claimed cells are marked
//     `Clustered` so they are never visited twice.
// 3.  **Sizing**: A member at radius r covers roughly `tan(step) * r` pixels of
//     arc, where `step` is the angle between rays. The cluster's size score is
//     the sum over all members, so far-away cells weigh more than near ones,
//     compensating for the rays fanning apart.
// 4.  **Labelling**: Small clusters are food. Large clusters are predators,
//     unless they reach the innermost ring, in which case they are assumed to be
//     the agent's own body (subject to `SelfBodyPolicy`).
// 5.  **Stateless Utility**: Each call works on a single cycle's grid and keeps
//     nothing afterwards.

use crate::config::{SelfBodyPolicy, SteeringConfig};
use crate::core_modules::cell::Cell;
use crate::core_modules::occupancy_grid::{GridPoint, OccupancyGrid};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterKind {
    Food,
    Predator,
    SelfBody,
}

impl ClusterKind {
    pub fn cell(self) -> Cell {
        match self {
            ClusterKind::Food => Cell::Food,
            ClusterKind::Predator => Cell::Predator,
            ClusterKind::SelfBody => Cell::SelfBody,
        }
    }
}

/// A single connected group of occupied cells found in one cycle.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Identifier for this cycle only, in seed discovery order.
    pub id: usize,
    /// Every grid coordinate belonging to the cluster, seed first.
    pub members: Vec<GridPoint>,
    /// Summed arc length in pixels subtended by all members.
    pub size_score: f64,
    /// Smallest sample index among the members; 0 means it touches the agent.
    pub min_sample: usize,
    pub kind: ClusterKind,
}

/// Groups every Active cell into clusters and writes each cluster's label back
/// into the grid. Returns the clusters in discovery order.
pub fn classify(grid: &mut OccupancyGrid, config: &SteeringConfig) -> Vec<Cluster> {
    let arc_per_pixel = (360.0 / grid.rays() as f64).to_radians().tan();
    let mut clusters = Vec::new();

    for sample in 0..grid.samples() {
        for ray in 0..grid.rays() {
            if grid.get(ray, sample) != Cell::Active {
                continue;
            }

            let members = grow_cluster(grid, GridPoint { ray, sample });
            let size_score: f64 = members
                .iter()
                .map(|p| arc_per_pixel * config.sample_distance(p.sample))
                .sum();
            let min_sample = members.iter().map(|p| p.sample).min().unwrap_or(sample);
            let kind = label(size_score, min_sample, config);

            for point in &members {
                grid.set(point.ray, point.sample, kind.cell());
            }

            trace!(
                id = clusters.len(),
                cells = members.len(),
                size_score,
                min_sample,
                ?kind,
                "classified cluster"
            );

            clusters.push(Cluster {
                id: clusters.len(),
                members,
                size_score,
                min_sample,
                kind,
            });
        }
    }

    clusters
}

fn label(size_score: f64, min_sample: usize, config: &SteeringConfig) -> ClusterKind {
    if size_score <= config.predator_min_arc_size {
        return ClusterKind::Food;
    }
    match config.self_body_policy {
        SelfBodyPolicy::InnermostRing if min_sample == 0 => ClusterKind::SelfBody,
        _ => ClusterKind::Predator,
    }
}

/// Depth-first traversal from `seed` over Active cells, marking each one
/// `Clustered` as it is claimed.
fn grow_cluster(grid: &mut OccupancyGrid, seed: GridPoint) -> Vec<GridPoint> {
    let samples = grid.samples() as isize;
    let mut members = Vec::new();
    let mut stack = vec![seed];
    grid.set(seed.ray, seed.sample, Cell::Clustered);

    while let Some(current) = stack.pop() {
        members.push(current);

        for d_ray in -1isize..=1 {
            for d_sample in -1isize..=1 {
                if d_ray == 0 && d_sample == 0 {
                    continue;
                }

                let sample = current.sample as isize + d_sample;
                if sample < 0 || sample >= samples {
                    continue;
                }
                let sample = sample as usize;
                let ray = grid.wrap_ray(current.ray as isize + d_ray);

                if grid.get(ray, sample) == Cell::Active {
                    grid.set(ray, sample, Cell::Clustered);
                    stack.push(GridPoint { ray, sample });
                }
            }
        }
    }

    members
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(config: &SteeringConfig, active: &[(usize, usize)]) -> OccupancyGrid {
        let mut grid = OccupancyGrid::empty(config.ray_count(), config.sample_count());
        for &(ray, sample) in active {
            grid.set(ray, sample, Cell::Active);
        }
        grid
    }

    /// Default geometry (72 rays) with a threshold that three cells at sample 5
    /// exceed but a single one does not.
    fn small_threshold() -> SteeringConfig {
        SteeringConfig {
            predator_min_arc_size: 20.0,
            ..SteeringConfig::default()
        }
    }

    #[test]
    fn isolated_small_cell_is_food() {
        let config = small_threshold();
        let mut grid = grid_with(&config, &[(10, 5)]);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].kind, ClusterKind::Food);
        assert!(clusters[0].size_score <= config.predator_min_arc_size);
        assert_eq!(grid.get(10, 5), Cell::Food);
    }

    #[test]
    fn enlarging_past_threshold_makes_a_predator() {
        let config = small_threshold();
        let mut grid = grid_with(&config, &[(10, 5), (11, 5), (12, 5)]);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].kind, ClusterKind::Predator);
        assert!(clusters[0].size_score > config.predator_min_arc_size);
        assert_eq!(grid.count(Cell::Predator), 3);
    }

    #[test]
    fn large_cluster_touching_innermost_ring_is_self() {
        let config = SteeringConfig {
            predator_min_arc_size: 10.0,
            ..SteeringConfig::default()
        };
        let body = [(3, 0), (3, 1), (3, 2), (3, 3)];

        let mut grid = grid_with(&config, &body);
        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters[0].kind, ClusterKind::SelfBody);
        assert_eq!(clusters[0].min_sample, 0);
        assert_eq!(grid.count(Cell::SelfBody), 4);

        let disabled = SteeringConfig {
            self_body_policy: SelfBodyPolicy::Disabled,
            ..config
        };
        let mut grid = grid_with(&disabled, &body);
        let clusters = classify(&mut grid, &disabled);
        assert_eq!(clusters[0].kind, ClusterKind::Predator);
    }

    #[test]
    fn size_score_sums_arc_length_per_member() {
        let config = SteeringConfig::default();
        let mut grid = grid_with(&config, &[(0, 0), (0, 1)]);

        let clusters = classify(&mut grid, &config);
        let step = 5f64.to_radians().tan();
        let expected = step * 30.0 + step * 40.0;
        assert!((clusters[0].size_score - expected).abs() < 1e-9);
    }

    #[test]
    fn first_and_last_rays_are_neighbours() {
        let config = SteeringConfig::default();
        let last = config.ray_count() - 1;
        let mut grid = grid_with(&config, &[(0, 4), (last, 4)]);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 2);
    }

    #[test]
    fn sample_axis_does_not_wrap() {
        let config = SteeringConfig::default();
        let last = config.sample_count() - 1;
        let mut grid = grid_with(&config, &[(7, 0), (7, last)]);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn diagonal_cells_join() {
        let config = SteeringConfig::default();
        let mut grid = grid_with(&config, &[(5, 5), (6, 6), (7, 7)]);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 3);
    }

    #[test]
    fn min_sample_tracks_the_innermost_member() {
        let config = SteeringConfig::default();
        let mut grid = grid_with(&config, &[(20, 3), (21, 3), (22, 2)]);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].min_sample, 2);
    }

    #[test]
    fn every_active_cell_ends_up_labelled() {
        let config = small_threshold();
        let mut grid = grid_with(
            &config,
            &[(1, 1), (30, 8), (31, 8), (32, 8), (33, 9), (60, 12)],
        );

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 3);
        assert_eq!(grid.count(Cell::Active), 0);
        assert_eq!(grid.count(Cell::Clustered), 0);

        let kinds: Vec<_> = clusters.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ClusterKind::Food, ClusterKind::Predator, ClusterKind::Food]
        );
    }

    #[test]
    fn dense_frame_does_not_exhaust_the_stack() {
        let config = SteeringConfig {
            degrees_per_ray: 1,
            ray_length: 1030,
            ..SteeringConfig::default()
        };
        let mut grid = OccupancyGrid::filled(config.ray_count(), config.sample_count(), Cell::Active);

        let clusters = classify(&mut grid, &config);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 360 * 100);
        assert_eq!(clusters[0].kind, ClusterKind::SelfBody);
    }
}
