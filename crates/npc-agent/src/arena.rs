//! Generational slot arena for agents.
//!
//! Slots are reused after removal; every removal bumps the slot's
//! generation so outstanding [`AgentId`]s (squad links, remembered enemies,
//! targets) stop resolving instead of aliasing the new occupant.
//!
//! Iteration is always in ascending slot order, which is the order the tick
//! loop updates agents in.

use npc_core::{AgentId, NpcError, NpcResult};

use crate::agent::Agent;

struct Slot {
    generation: u32,
    agent:      Option<Agent>,
}

#[derive(Default)]
pub struct AgentArena {
    slots: Vec<Slot>,
    /// Vacant slot indices, reused lowest-first.
    free:  Vec<u32>,
    live:  usize,
}

impl AgentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the next insertion will receive.
    pub fn next_id(&self) -> AgentId {
        match self.free.iter().min() {
            Some(&index) => AgentId::new(index, self.slots[index as usize].generation),
            None => AgentId::new(self.slots.len() as u32, 0),
        }
    }

    /// Store an agent built for `next_id()`.  The agent's `id` is overwritten
    /// with the handle actually assigned.
    pub fn insert(&mut self, mut agent: Agent) -> AgentId {
        let id = self.next_id();
        agent.id = id;
        if let Some(pos) = self.free.iter().position(|&i| i == id.index) {
            self.free.swap_remove(pos);
            self.slots[id.slot()].agent = Some(agent);
        } else {
            self.slots.push(Slot { generation: 0, agent: Some(agent) });
        }
        self.live += 1;
        id
    }

    /// Free the slot.  Returns the agent when `id` was current.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation || slot.agent.is_none() {
            return None;
        }
        let agent = slot.agent.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        agent
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.slots
            .get(id.slot())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.agent.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.slots
            .get_mut(id.slot())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.agent.as_mut())
    }

    /// Like [`get`](Self::get) but distinguishes a stale handle from an
    /// unknown one.
    pub fn try_get(&self, id: AgentId) -> NpcResult<&Agent> {
        match self.slots.get(id.slot()) {
            None => Err(NpcError::AgentNotFound(id)),
            Some(s) if s.generation != id.generation => Err(NpcError::StaleHandle(id)),
            Some(s) => s.agent.as_ref().ok_or(NpcError::AgentNotFound(id)),
        }
    }

    pub fn try_get_mut(&mut self, id: AgentId) -> NpcResult<&mut Agent> {
        match self.slots.get_mut(id.slot()) {
            None => Err(NpcError::AgentNotFound(id)),
            Some(s) if s.generation != id.generation => Err(NpcError::StaleHandle(id)),
            Some(s) => s.agent.as_mut().ok_or(NpcError::AgentNotFound(id)),
        }
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    /// `true` when `id` resolves to a living agent.
    pub fn is_alive(&self, id: AgentId) -> bool {
        self.get(id).is_some_and(Agent::is_alive)
    }

    /// Two distinct agents mutably at once.
    pub fn pair_mut(&mut self, a: AgentId, b: AgentId) -> Option<(&mut Agent, &mut Agent)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index { (a, b, false) } else { (b, a, true) };
        let (left, right) = self.slots.split_at_mut(hi.slot());
        let lo_agent = left[lo.slot()].agent.as_mut()?;
        let hi_agent = right[0].agent.as_mut()?;
        Some(if swapped { (hi_agent, lo_agent) } else { (lo_agent, hi_agent) })
    }

    /// Live handles in ascending slot order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.iter().map(|a| a.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.slots.iter().filter_map(|s| s.agent.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.slots.iter_mut().filter_map(|s| s.agent.as_mut())
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
