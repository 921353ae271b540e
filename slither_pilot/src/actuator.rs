// THEORY:
// An `Actuator` turns the chosen heading into an action in the game. The
// pointer actuator aims the cursor a fixed distance from the agent's head along
// the heading; it owns no game state beyond the last target it aimed at.

use anyhow::Result;
use slither_vision::{CenterPoint, pointer_target};
use tracing::debug;

pub const DEFAULT_POINTER_RADIUS: f64 = 100.0;

pub trait Actuator {
    fn steer(&mut self, heading: f64) -> Result<()>;
}

pub struct PointerActuator {
    center: CenterPoint,
    radius: f64,
    last_target: Option<(i64, i64)>,
}

impl PointerActuator {
    pub fn new(center: CenterPoint, radius: f64) -> Self {
        Self {
            center,
            radius,
            last_target: None,
        }
    }

    pub fn last_target(&self) -> Option<(i64, i64)> {
        self.last_target
    }
}

impl Actuator for PointerActuator {
    fn steer(&mut self, heading: f64) -> Result<()> {
        let (x, y) = pointer_target(heading, self.radius, self.center);
        debug!(heading, x, y, "pointer target");
        self.last_target = Some((x, y));
        Ok(())
    }
}
