// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation settings shared by the scene, the CLI, and persisted prefs.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::spawn::SPAWN_MARGIN;

/// Fewest shapes the count control allows.
pub const MIN_SHAPES: usize = 5;
/// Most shapes the count control allows.
pub const MAX_SHAPES: usize = 200;
/// Upper bound of the speed multiplier.
pub const MAX_SPEED_MULT: f32 = 3.0;

/// Which strategy produces the per-frame candidate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BroadPhaseMode {
    /// Dual-tree self query over the rebuilt BVH.
    #[default]
    Bvh,
    /// Exhaustive `O(n^2)` sweep.
    BruteForce,
}

impl BroadPhaseMode {
    /// The other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Bvh => Self::BruteForce,
            Self::BruteForce => Self::Bvh,
        }
    }
}

/// Tunables for a [`crate::Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World width in world units.
    pub world_width: f32,
    /// World height in world units.
    pub world_height: f32,
    /// Shape count the world is grown/truncated to every frame.
    pub target_count: usize,
    /// Multiplier applied to the frame delta before integration.
    pub speed_mult: f32,
    /// Frame deltas above this are clamped (seconds).
    pub max_frame_dt: f32,
    /// Seed for shape spawning.
    pub seed: u64,
    /// Broad-phase strategy.
    pub mode: BroadPhaseMode,
    /// Also run brute force every frame and flag disagreements.
    pub compare_brute_force: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: 1400.0,
            world_height: 800.0,
            target_count: 30,
            speed_mult: 1.0,
            max_frame_dt: 0.1,
            seed: 1,
            mode: BroadPhaseMode::Bvh,
            compare_brute_force: false,
        }
    }
}

impl SimConfig {
    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), SimError> {
        let min_side = 2.0 * SPAWN_MARGIN;
        if !(self.world_width.is_finite() && self.world_width > min_side) {
            return Err(SimError::InvalidConfig(format!(
                "world_width must exceed {min_side}, got {}",
                self.world_width
            )));
        }
        if !(self.world_height.is_finite() && self.world_height > min_side) {
            return Err(SimError::InvalidConfig(format!(
                "world_height must exceed {min_side}, got {}",
                self.world_height
            )));
        }
        if !(MIN_SHAPES..=MAX_SHAPES).contains(&self.target_count) {
            return Err(SimError::InvalidConfig(format!(
                "target_count must be in {MIN_SHAPES}..={MAX_SHAPES}, got {}",
                self.target_count
            )));
        }
        if !(0.0..=MAX_SPEED_MULT).contains(&self.speed_mult) {
            return Err(SimError::InvalidConfig(format!(
                "speed_mult must be in 0..={MAX_SPEED_MULT}, got {}",
                self.speed_mult
            )));
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "max_frame_dt must be positive, got {}",
                self.max_frame_dt
            )));
        }
        Ok(())
    }

    /// Clamps a requested shape count into the allowed range.
    pub fn clamp_count(count: usize) -> usize {
        count.clamp(MIN_SHAPES, MAX_SHAPES)
    }

    /// Clamps a requested speed multiplier into the allowed range.
    pub fn clamp_speed(speed: f32) -> f32 {
        speed.clamp(0.0, MAX_SPEED_MULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let tiny = SimConfig {
            world_width: 100.0,
            ..SimConfig::default()
        };
        assert!(matches!(tiny.validate(), Err(SimError::InvalidConfig(_))));

        let crowded = SimConfig {
            target_count: MAX_SHAPES + 1,
            ..SimConfig::default()
        };
        assert!(crowded.validate().is_err());

        let fast = SimConfig {
            speed_mult: 3.5,
            ..SimConfig::default()
        };
        assert!(fast.validate().is_err());

        let frozen_dt = SimConfig {
            max_frame_dt: 0.0,
            ..SimConfig::default()
        };
        assert!(frozen_dt.validate().is_err());
    }

    #[test]
    fn clamps_controls() {
        assert_eq!(SimConfig::clamp_count(0), MIN_SHAPES);
        assert_eq!(SimConfig::clamp_count(1000), MAX_SHAPES);
        assert!((SimConfig::clamp_speed(9.0) - MAX_SPEED_MULT).abs() < f32::EPSILON);
    }

    #[test]
    fn mode_serializes_kebab_case() {
        let json = serde_json::to_string(&BroadPhaseMode::BruteForce).unwrap_or_default();
        assert_eq!(json, "\"brute-force\"");
        let partial: SimConfig =
            serde_json::from_str(r#"{"target_count": 12, "mode": "brute-force"}"#)
                .unwrap_or_default();
        assert_eq!(partial.target_count, 12);
        assert_eq!(partial.mode, BroadPhaseMode::BruteForce);
        assert!((partial.world_width - 1400.0).abs() < f32::EPSILON);
    }
}
