//! Tactical slot arbitration.
//!
//! The leader's `slots` mask records which slots are claimed across the
//! squad; each agent remembers its own claim in `my_slot`.  An agent holds
//! at most one slot, so claiming releases whatever it held before.

use npc_agent::{AgentArena, SquadSlots};
use npc_core::AgentId;
use tracing::trace;

use crate::roster::{leader_of, members};

/// `true` when some squad member is fighting an enemy other than the
/// leader's.
pub fn squad_enemy_split(arena: &AgentArena, id: AgentId) -> bool {
    let Some(leader) = leader_of(arena, id) else {
        return false;
    };
    let leader_enemy = arena.get(leader).and_then(|a| a.enemy);
    members(arena, id)
        .into_iter()
        .filter_map(|m| arena.get(m).and_then(|a| a.enemy))
        .any(|enemy| Some(enemy) != leader_enemy)
}

/// Claim the lowest free slot in `desired`.
///
/// Always succeeds outside a squad.  While the squad's enemies are split,
/// contention is suspended: the agent records [`SquadSlots::SQUAD_SPLIT`]
/// and succeeds.
pub fn occupy_slot(arena: &mut AgentArena, id: AgentId, desired: SquadSlots) -> bool {
    let Some(leader) = leader_of(arena, id) else {
        return true;
    };

    if squad_enemy_split(arena, id) {
        vacate_slot(arena, id);
        if let Some(state) = arena.get_mut(id).and_then(|a| a.squad.as_mut()) {
            state.my_slot = SquadSlots::SQUAD_SPLIT;
        }
        trace!(agent = %id, "slot contention suspended, enemies split");
        return true;
    }

    vacate_slot(arena, id);
    let Some(taken) = arena.get(leader).and_then(|a| a.squad.as_ref()).map(|s| s.slots) else {
        return false;
    };
    let free = (desired - taken).bits();
    if free == 0 {
        trace!(agent = %id, ?desired, "no free slot");
        return false;
    }
    let claim = SquadSlots::from_bits_retain(free & free.wrapping_neg());

    if let Some(state) = arena.get_mut(leader).and_then(|a| a.squad.as_mut()) {
        state.slots |= claim;
    }
    if let Some(state) = arena.get_mut(id).and_then(|a| a.squad.as_mut()) {
        state.my_slot = claim;
    }
    trace!(agent = %id, slot = ?claim, "slot claimed");
    true
}

/// Release `id`'s slot.  A no-op when it holds none.
pub fn vacate_slot(arena: &mut AgentArena, id: AgentId) {
    let Some(agent) = arena.get_mut(id) else {
        return;
    };
    let Some(state) = agent.squad.as_mut() else {
        return;
    };
    let held = std::mem::take(&mut state.my_slot);
    let Some(leader) = state.leader else {
        return;
    };
    if held.is_empty() {
        return;
    }
    if let Some(lead_state) = arena.get_mut(leader).and_then(|a| a.squad.as_mut()) {
        lead_state.slots -= held;
    }
    trace!(agent = %id, slot = ?held, "slot vacated");
}
