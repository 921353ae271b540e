// THEORY:
// `SteeringConfig` is the single immutable description of how the agent looks at
// the screen and how fast it may turn. It is supplied once, validated once, and
// then owned by the pipeline for the life of the process.
//
// The sampling geometry is a set of concentric rings cut by evenly spaced rays.
// A ray count is only meaningful when the four 90 degree quadrants split into a
// whole number of rays, which is why `degrees_per_ray` must divide 90. The
// remaining parameters either shape the rings (start, length, spacing), decide
// what counts as "something is there" (color threshold), or tune the decision
// layer (turn rate, predator size, turn window).

use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_TOML: &str = include_str!("../default.toml");

/// Pixel position of the agent's head in the captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterPoint {
    pub x: i64,
    pub y: i64,
}

/// How a large cluster touching the innermost ring is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfBodyPolicy {
    /// A large cluster that reaches sample index 0 is the agent's own body.
    #[default]
    InnermostRing,
    /// Never label anything as the agent's body; every large cluster is a predator.
    Disabled,
}

/// Tunables for suppressing food the agent cannot reach this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnWindowConfig {
    /// The reachable window spans `ray_count / divisor` rays on each side of the heading.
    pub divisor: usize,
    /// Number of inner sample rings subject to suppression. Each further ring
    /// trims one ray from both ends of the suppressed arc.
    pub taper_rings: usize,
}

impl Default for TurnWindowConfig {
    fn default() -> Self {
        Self {
            divisor: 15,
            taper_rings: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteeringConfig {
    pub degrees_per_ray: u32,
    /// Distance in pixels from the center to the first sample of every ray.
    pub ray_starting_distance: u32,
    /// Distance in pixels from the center to the end of every ray.
    pub ray_length: u32,
    /// Pixels between consecutive samples on a ray.
    pub ray_sample_spacing: u32,
    pub center_point: CenterPoint,
    /// A pixel is occupied when `r + g + b` exceeds this.
    pub color_threshold: u32,
    /// Largest heading change, in degrees, allowed in a single cycle.
    pub max_turn_per_cycle: f64,
    /// Clusters whose summed arc length exceeds this are predators (or self).
    pub predator_min_arc_size: f64,
    /// Skip sampling and report every cell as occupied.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub self_body_policy: SelfBodyPolicy,
    #[serde(default)]
    pub turn_window: TurnWindowConfig,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG_TOML).expect("embedded default.toml must deserialize")
    }
}

impl SteeringConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Checks every invariant the pipeline relies on. Called by each constructor
    /// that accepts a config, so a bad config never reaches a cycle.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(VisionError::InvalidConfig(msg));

        if self.degrees_per_ray == 0 || 90 % self.degrees_per_ray != 0 {
            return invalid(format!(
                "degrees_per_ray must be a factor of 90 but is {}",
                self.degrees_per_ray
            ));
        }
        if self.ray_sample_spacing == 0 {
            return invalid("ray_sample_spacing must be greater than zero".to_owned());
        }
        if self.ray_length <= self.ray_starting_distance {
            return invalid(format!(
                "ray_length ({}) must be greater than ray_starting_distance ({})",
                self.ray_length, self.ray_starting_distance
            ));
        }
        if self.sample_count() == 0 {
            return invalid(format!(
                "ray of {} px with spacing {} px holds no samples",
                self.ray_length - self.ray_starting_distance,
                self.ray_sample_spacing
            ));
        }
        if !self.max_turn_per_cycle.is_finite() || self.max_turn_per_cycle < 0.0 {
            return invalid("max_turn_per_cycle must be finite and >= 0".to_owned());
        }
        if !self.predator_min_arc_size.is_finite() {
            return invalid("predator_min_arc_size must be finite".to_owned());
        }
        if self.turn_window.divisor == 0 {
            return invalid("turn_window.divisor must be greater than zero".to_owned());
        }
        Ok(())
    }

    pub fn rays_per_quadrant(&self) -> usize {
        (90 / self.degrees_per_ray) as usize
    }

    pub fn ray_count(&self) -> usize {
        (360 / self.degrees_per_ray) as usize
    }

    pub fn sample_count(&self) -> usize {
        (self.ray_length.saturating_sub(self.ray_starting_distance) / self.ray_sample_spacing)
            as usize
    }

    /// Radial distance in pixels of the given sample index.
    pub fn sample_distance(&self, sample: usize) -> f64 {
        self.ray_starting_distance as f64 + (sample as f64) * self.ray_sample_spacing as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_has_stock_tuning() {
        let config = SteeringConfig::default();
        assert_eq!(config.degrees_per_ray, 5);
        assert_eq!(config.ray_count(), 72);
        assert_eq!(config.rays_per_quadrant(), 18);
        assert_eq!(config.sample_count(), 27);
        assert_eq!(config.center_point, CenterPoint { x: 640, y: 436 });
        assert_eq!(config.max_turn_per_cycle, 12.0);
        assert_eq!(config.self_body_policy, SelfBodyPolicy::InnermostRing);
        assert_eq!(config.turn_window, TurnWindowConfig::default());
    }

    #[test]
    fn every_factor_of_ninety_is_accepted() {
        for degrees in [1, 2, 3, 5, 6, 9, 10, 15, 18, 30, 45, 90] {
            let config = SteeringConfig {
                degrees_per_ray: degrees,
                ..SteeringConfig::default()
            };
            assert!(config.validate().is_ok(), "{degrees} should be valid");
            assert_eq!(config.ray_count(), (360 / degrees) as usize);
        }
    }

    #[test]
    fn non_factor_of_ninety_fails_fast() {
        for degrees in [0, 4, 7, 12, 20, 60] {
            let config = SteeringConfig {
                degrees_per_ray: degrees,
                ..SteeringConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(VisionError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn degenerate_ray_geometry_is_rejected() {
        let inverted = SteeringConfig {
            ray_length: 20,
            ray_starting_distance: 30,
            ..SteeringConfig::default()
        };
        assert!(inverted.validate().is_err());

        let too_sparse = SteeringConfig {
            ray_length: 35,
            ray_starting_distance: 30,
            ray_sample_spacing: 10,
            ..SteeringConfig::default()
        };
        assert!(too_sparse.validate().is_err());

        let negative_turn = SteeringConfig {
            max_turn_per_cycle: -1.0,
            ..SteeringConfig::default()
        };
        assert!(negative_turn.validate().is_err());
    }

    #[test]
    fn toml_omitting_optional_sections_uses_defaults() {
        let raw = r#"
            degrees_per_ray = 10
            ray_starting_distance = 20
            ray_length = 120
            ray_sample_spacing = 20
            color_threshold = 150
            max_turn_per_cycle = 30.0
            predator_min_arc_size = 50.0

            [center_point]
            x = 100
            y = 100
        "#;
        let config = SteeringConfig::from_toml_str(raw).expect("config should parse");
        assert_eq!(config.ray_count(), 36);
        assert_eq!(config.sample_count(), 5);
        assert!(!config.debug);
        assert_eq!(config.self_body_policy, SelfBodyPolicy::InnermostRing);
        assert_eq!(config.turn_window.divisor, 15);
    }

    #[test]
    fn toml_with_bad_degrees_is_an_invalid_config() {
        let raw = DEFAULT_CONFIG_TOML.replace("degrees_per_ray = 5", "degrees_per_ray = 7");
        assert!(matches!(
            SteeringConfig::from_toml_str(&raw),
            Err(VisionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn disabled_self_policy_parses() {
        let raw = DEFAULT_CONFIG_TOML.replace("\"innermost_ring\"", "\"disabled\"");
        let config = SteeringConfig::from_toml_str(&raw).expect("config should parse");
        assert_eq!(config.self_body_policy, SelfBodyPolicy::Disabled);
    }
}
