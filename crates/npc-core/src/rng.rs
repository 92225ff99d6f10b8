//! Deterministic per-agent RNG.
//!
//! Each agent owns a `SmallRng` seeded from the run seed mixed with its slot
//! index and generation:
//!
//!   seed = global_seed XOR ((index << 32 | generation) * MIXING_CONSTANT)
//!
//! The golden-ratio constant spreads neighbouring handles across the seed
//! space, so two agents never share a stream and a respawned slot does not
//! replay its predecessor's rolls.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG, used for randomised waits and LKP trailing.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let key  = ((agent.index as u64) << 32) | agent.generation as u64;
        let seed = global_seed ^ key.wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform float in `[lo, hi)`; returns `lo` when the range is empty.
    #[inline]
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo { lo } else { self.0.gen_range(lo..hi) }
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
