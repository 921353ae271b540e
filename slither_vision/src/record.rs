// THEORY:
// A `CycleRecord` is what leaves the core for offline debugging: the fully
// labelled grid plus the heading chosen from it. The core never reads one back;
// the visualizer does. JSON keeps the files inspectable by hand.

use crate::core_modules::occupancy_grid::OccupancyGrid;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// File name of the frame captured alongside record `index`.
pub fn frame_file_name(index: u64) -> String {
    format!("frame{index}.png")
}

pub fn record_file_name(index: u64) -> String {
    format!("record{index}.json")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub frame_index: u64,
    pub heading: f64,
    pub grid: OccupancyGrid,
}

impl CycleRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
