//! `ThinkQueue`: which agents think on which tick.
//!
//! Every live, non-player agent re-queues itself for the following tick
//! after each think, so in steady state the queue holds one tick's worth of
//! handles.  Agents that are finished dying drop out of it.

use std::collections::BTreeMap;

use npc_core::{AgentId, Tick};

/// Ticks mapped to the agents due to think on them.
#[derive(Debug, Default)]
pub struct ThinkQueue {
    inner: BTreeMap<Tick, Vec<AgentId>>,
    total: usize,
}

impl ThinkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` to think at `tick`.
    pub fn push(&mut self, tick: Tick, agent: AgentId) {
        self.inner.entry(tick).or_default().push(agent);
        self.total += 1;
    }

    /// Remove every agent due at or before `tick`, in ascending handle
    /// order with duplicates dropped.
    pub fn drain_due(&mut self, tick: Tick) -> Vec<AgentId> {
        let later = self.inner.split_off(&Tick(tick.0 + 1));
        let due = std::mem::replace(&mut self.inner, later);

        let mut agents: Vec<AgentId> = due.into_values().flatten().collect();
        self.total -= agents.len();
        agents.sort_unstable();
        agents.dedup();
        agents
    }

    /// The earliest tick with a queued agent.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
