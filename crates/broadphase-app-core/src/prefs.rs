// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted demo preferences (simulation settings + overlay toggles).

use broadphase_sim::{SimConfig, SimError};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigService, ConfigStore};

/// Key the prefs are stored under.
pub const PREFS_KEY: &str = "demo_prefs";

/// Saved preferences for a demo front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoPrefs {
    /// Simulation settings.
    pub sim: SimConfig,
    /// Which overlays are drawn.
    pub layers: LayerToggles,
}

impl DemoPrefs {
    /// Loads the saved prefs, or defaults if none were saved.
    ///
    /// Stored prefs that fail validation are reported as [`ConfigError::Other`]
    /// so a hand-edited file cannot start a broken scene.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        let prefs: Self = service.load_or_default(PREFS_KEY)?;
        prefs
            .sim
            .validate()
            .map_err(|e: SimError| ConfigError::Other(e.to_string()))?;
        Ok(prefs)
    }

    /// Persists these prefs.
    pub fn save<S: ConfigStore>(&self, service: &ConfigService<S>) -> Result<(), ConfigError> {
        service.save(PREFS_KEY, self)
    }
}

/// Overlay toggles; each maps to a number key in an interactive front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerToggles {
    /// Draw every shape's AABB.
    pub aabb_overlay: bool,
    /// Draw the BVH node boxes, colored by depth.
    pub bvh_tree: bool,
    /// Draw the selected shape's traversal.
    pub query_trace: bool,
    /// Show brute-force comparison counts.
    pub brute_compare: bool,
    /// Highlight narrow-phase results.
    pub narrow_phase: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            aabb_overlay: true,
            bvh_tree: true,
            query_trace: true,
            brute_compare: false,
            narrow_phase: true,
        }
    }
}

impl LayerToggles {
    /// Flips layer `n` (1-based, in field order). Returns the new state, or
    /// `None` when `n` names no layer.
    pub fn toggle(&mut self, n: u8) -> Option<bool> {
        let flag = match n {
            1 => &mut self.aabb_overlay,
            2 => &mut self.bvh_tree,
            3 => &mut self.query_trace,
            4 => &mut self.brute_compare,
            5 => &mut self.narrow_phase,
            _ => return None,
        };
        *flag = !*flag;
        Some(*flag)
    }
}
