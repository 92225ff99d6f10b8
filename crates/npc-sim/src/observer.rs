//! Observer hooks for logging, metrics and tests.

use npc_agent::AgentArena;
use npc_behavior::{Attack, BrainEvent};
use npc_core::{AgentId, Tick};

/// Callbacks invoked by [`Sim::step`][crate::Sim::step].
///
/// Every method defaults to a no-op.
///
/// ```rust,ignore
/// struct Transitions(Vec<String>);
///
/// impl SimObserver for Transitions {
///     fn on_event(&mut self, _tick: Tick, event: &BrainEvent) {
///         if let BrainEvent::ScheduleChanged { to, .. } = event {
///             self.0.push(to.clone());
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// `thought` is how many agents ran a think this tick.
    fn on_tick_end(&mut self, _tick: Tick, _thought: usize) {}

    /// A decision reported by one agent's think, in think order.
    fn on_event(&mut self, _tick: Tick, _event: &BrainEvent) {}

    /// An attack was resolved; `dealt` is the damage actually applied.
    fn on_attack(&mut self, _tick: Tick, _attack: &Attack, _dealt: f32) {}

    fn on_death(&mut self, _tick: Tick, _agent: AgentId) {}

    /// Read-only view of every agent after the tick's world requests.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentArena) {}
}

/// A [`SimObserver`] that ignores everything.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
