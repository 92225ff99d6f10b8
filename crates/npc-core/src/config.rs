//! Engine tunables.
//!
//! Typically built with `EngineConfig::default()` and adjusted field by
//! field, or deserialized from JSON by the application (feature `serde`).

use crate::{NpcError, NpcResult};

/// Distances are in world units, times in seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Seconds of simulated time per tick.
    pub tick_secs: f32,
    /// Master RNG seed; identical seeds replay identically.
    pub seed: u64,

    // ── Senses ────────────────────────────────────────────────────────────
    /// Half-extent of the box scanned by the look pass.
    pub look_distance: f32,
    /// Multiplier applied to stimulus volume when testing audibility.
    pub hearing_sensitivity: f32,
    /// An unseen, unoccluded enemy closer than this still updates the LKP.
    pub sense_nearby_enemy: f32,
    /// Enemies farther than this set `ENEMY_TOO_FAR`.
    pub enemy_too_far: f32,

    // ── Movement ──────────────────────────────────────────────────────────
    /// Maximum lookahead re-validated by the local mover each interval.
    pub lookahead: f32,
    /// Advance to the next waypoint once this close to the current one.
    pub corner_cut_distance: f32,
    /// Step length used by the local move check and the mover.
    pub local_step: f32,
    /// Highest ledge a ground agent can step up.
    pub step_height: f32,
    /// Goals further above/below than this skip triangulation.
    pub max_vertical_delta: f32,
    /// Probe rings tried by triangulation before giving up.
    pub triangulation_rings: u32,
    /// Pause applied when blocked by another moving agent.
    pub move_wait_secs: f32,
    /// Refresh a chase route once the enemy LKP drifts this far from its goal.
    pub enemy_drift_tolerance: f32,

    // ── Cover ─────────────────────────────────────────────────────────────
    pub cover_min_distance: f32,
    pub cover_max_distance: f32,
    /// Graph nodes examined per cover search.
    pub cover_node_budget: usize,

    // ── Squads ────────────────────────────────────────────────────────────
    pub recruit_radius: f32,
    /// Total squad size including the leader.
    pub max_squad_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_secs:             0.1,
            seed:                  0,
            look_distance:         2048.0,
            hearing_sensitivity:   1.0,
            sense_nearby_enemy:    256.0,
            enemy_too_far:         1024.0,
            lookahead:             200.0,
            corner_cut_distance:   32.0,
            local_step:            16.0,
            step_height:           18.0,
            max_vertical_delta:    64.0,
            triangulation_rings:   8,
            move_wait_secs:        0.5,
            enemy_drift_tolerance: 80.0,
            cover_min_distance:    0.0,
            cover_max_distance:    784.0,
            cover_node_budget:     64,
            recruit_radius:        1024.0,
            max_squad_size:        5,
        }
    }
}

impl EngineConfig {
    /// Hard ceiling on squad size; the leader's member array is sized by it.
    pub const SQUAD_CAPACITY: usize = 5;

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> NpcResult<()> {
        if !(self.tick_secs > 0.0) {
            return Err(NpcError::Config(format!("tick_secs must be positive, got {}", self.tick_secs)));
        }
        if self.local_step <= 1.0 {
            return Err(NpcError::Config(format!("local_step must exceed 1, got {}", self.local_step)));
        }
        if self.triangulation_rings == 0 || self.triangulation_rings > 8 {
            return Err(NpcError::Config(format!(
                "triangulation_rings must be in 1..=8, got {}",
                self.triangulation_rings
            )));
        }
        if self.max_squad_size > Self::SQUAD_CAPACITY {
            return Err(NpcError::Config(format!(
                "max_squad_size {} exceeds capacity {}",
                self.max_squad_size,
                Self::SQUAD_CAPACITY
            )));
        }
        if self.cover_max_distance < self.cover_min_distance {
            return Err(NpcError::Config("cover_max_distance below cover_min_distance".into()));
        }
        Ok(())
    }
}
