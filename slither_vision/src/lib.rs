// THEORY:
// This file is the entry point for the `slither_vision` library crate.
// It exposes the `SteeringPipeline` and its supporting types (`SteeringConfig`,
// `CycleOutcome`, `CycleRecord`, etc.) as the high-level interface of the
// perception-and-decision core. The individual stages live in `core_modules`
// and stay usable on their own, which is how the tests drive them.
//
// Data flows one way, once per cycle:
//   frame -> RayCaster -> ClusterClassifier -> TurnWindowFilter -> AngleArbiter -> heading
// The only thing carried from one cycle to the next is the heading, and the
// caller carries it.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod record;

pub use config::{CenterPoint, SelfBodyPolicy, SteeringConfig, TurnWindowConfig};
pub use core_modules::cell::Cell;
pub use core_modules::heading::pointer_target;
pub use core_modules::occupancy_grid::{GridPoint, OccupancyGrid};
pub use core_modules::ray_caster::frame_from_raw;
pub use error::{Result, VisionError};
pub use pipeline::{CycleOutcome, SteeringPipeline};
pub use record::CycleRecord;
