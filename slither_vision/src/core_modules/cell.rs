// THEORY:
// A `Cell` is the value held at one (ray, sample) position of the occupancy grid.
// It is a closed set: a raw sensor reading (`Empty`, `Active`), a transient
// traversal mark (`Clustered`), or a final classification (`Food`, `Predator`,
// `SelfBody`, `Ignore`). Keeping these as distinct variants means a stage can
// never confuse "something is here" with "something was classified here".
//
// Lifecycle of a cell within one cycle:
//   RayCaster          -> Empty | Active
//   ClusterClassifier  -> Active becomes Clustered, then Food | Predator | SelfBody
//   TurnWindowFilter   -> some Food becomes Ignore
//   AngleArbiter       reads Food and Predator only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// Nothing bright enough at this sample.
    #[default]
    Empty,
    /// Bright enough to be something, not yet grouped.
    Active,
    /// Claimed by a cluster traversal, classification pending.
    Clustered,
    Food,
    Predator,
    /// Part of the agent's own body.
    SelfBody,
    /// Food the agent cannot turn toward this cycle.
    Ignore,
}

impl Cell {
    /// Single character used by the text dump of a grid.
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Active => '#',
            Cell::Clustered => '*',
            Cell::Food => 'f',
            Cell::Predator => 'P',
            Cell::SelfBody => 's',
            Cell::Ignore => 'x',
        }
    }
}
