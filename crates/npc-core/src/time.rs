//! Simulation time model.
//!
//! The canonical time unit is the integer [`Tick`].  Agent logic needs
//! continuous time for waits, move-wait windows and animation lengths, so
//! [`SimClock`] maps ticks onto seconds:
//!
//!   now_secs = tick * tick_secs
//!
//! The default think interval is a tenth of a second.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and converts it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Seconds of simulated time per tick.
    pub tick_secs:    f32,
    /// Advanced by [`SimClock::advance`] once per tick.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_secs: f32) -> Self {
        Self { tick_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds at the current tick.
    #[inline]
    pub fn now_secs(&self) -> f32 {
        self.secs_at(self.current_tick)
    }

    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f32 {
        (tick.0 as f64 * self.tick_secs as f64) as f32
    }

    /// How many ticks span `secs` seconds (rounded up, at least one).
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if self.tick_secs <= 0.0 {
            return 1;
        }
        ((secs / self.tick_secs).ceil() as u64).max(1)
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}s)", self.current_tick, self.now_secs())
    }
}
