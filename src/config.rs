use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the bounding-volume sampler picks its fixed walking height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsHeight {
    /// Top of the terrain box
    MaxY,
    /// One downward ray at the horizontal center, top of the box on a miss
    CenterRay,
}

/// Walkable-height strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SamplerConfig {
    /// Downward ray per movement step
    Ray,
    /// Terrain box cached at activation
    Bounds {
        height: BoundsHeight,
        /// Full size of the occupant box used for the ground-contact test
        occupant_size: Vec3,
    },
}

impl SamplerConfig {
    pub fn bounds() -> Self {
        SamplerConfig::Bounds {
            height: BoundsHeight::MaxY,
            occupant_size: Vec3::new(1.0, 2.0, 1.0),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::bounds()
    }
}

/// Tunables for the first-person walker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// World units per second
    pub walk_speed: f32,
    pub turn_speed: f32,
    /// Radians per mouse unit at turn_speed 1
    pub mouse_sensitivity: f32,
    /// Eye height above the walkable surface
    pub elevation_offset: f32,
    /// Exponential smoothing factor for position, (0, 1]
    pub smoothing_factor: f32,
    /// Weight of the previous frame's move vector
    pub move_blend: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    /// Per-frame bob multiplier while standing still
    pub bob_decay: f32,
    /// Per-frame multiplier of the residual move vector while standing still
    pub residual_decay: f32,
    /// Horizontal distance at which a waypoint counts as reached
    pub arrival_threshold: f32,
    /// Max absolute pitch in radians
    pub pitch_limit: f32,
    pub pointer_capture_delay_ms: u64,
    /// Wrap to the first waypoint after the last one, otherwise stop following
    pub loop_path: bool,
    pub sampler: SamplerConfig,
    /// Start height of downward rays above the terrain top
    pub ray_headroom: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 250.0,
            turn_speed: 1.0,
            mouse_sensitivity: 0.002,
            elevation_offset: 1.0,
            smoothing_factor: 0.5,
            move_blend: 0.2,
            bob_frequency: 8.0,
            bob_amplitude: 0.15,
            bob_decay: 0.9,
            residual_decay: 0.7,
            arrival_threshold: 2.0,
            pitch_limit: 0.45 * std::f32::consts::PI,
            pointer_capture_delay_ms: 100,
            loop_path: true,
            sampler: SamplerConfig::default(),
            ray_headroom: 1000.0,
        }
    }
}

impl ControllerConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Self =
            serde_json::from_str(&text).with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate().with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(field: &'static str, range: &'static str, value: f32, ok: bool) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange { field, range, value })
            }
        }

        let s = self.smoothing_factor;
        check("smoothing_factor", "(0, 1]", s, s > 0.0 && s <= 1.0)?;
        check("walk_speed", "(0, inf)", self.walk_speed, self.walk_speed > 0.0)?;
        check(
            "arrival_threshold",
            "(0, inf)",
            self.arrival_threshold,
            self.arrival_threshold > 0.0,
        )?;
        let p = self.pitch_limit;
        check("pitch_limit", "(0, pi/2)", p, p > 0.0 && p < FRAC_PI_2)?;
        let b = self.move_blend;
        check("move_blend", "[0, 1)", b, (0.0..1.0).contains(&b))?;
        check("bob_decay", "[0, 1]", self.bob_decay, (0.0..=1.0).contains(&self.bob_decay))?;
        check(
            "residual_decay",
            "[0, 1]",
            self.residual_decay,
            (0.0..=1.0).contains(&self.residual_decay),
        )?;
        check("ray_headroom", "(0, inf)", self.ray_headroom, self.ray_headroom > 0.0)?;
        Ok(())
    }

    pub fn pointer_capture_delay_secs(&self) -> f32 {
        self.pointer_capture_delay_ms as f32 / 1000.0
    }
}
