pub mod angle_arbiter;
pub mod cell;
pub mod cluster_classifier;
pub mod heading;
pub mod occupancy_grid;
pub mod ray_caster;
pub mod turn_window;
