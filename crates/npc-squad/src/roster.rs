//! Squad membership.

use npc_agent::{AgentArena, SquadSlots, MAX_SQUAD_MEMBERS};
use npc_core::AgentId;
use tracing::debug;

/// The leader of `id`'s squad, if `id` is alive in the arena and squadded.
pub fn leader_of(arena: &AgentArena, id: AgentId) -> Option<AgentId> {
    arena.get(id)?.squad_leader()
}

/// Everyone in `id`'s squad, leader first, then members in slot order.
/// Empty when `id` is not in a squad.
pub fn members(arena: &AgentArena, id: AgentId) -> Vec<AgentId> {
    let Some(leader) = leader_of(arena, id) else {
        return Vec::new();
    };
    let Some(state) = arena.get(leader).and_then(|a| a.squad.as_ref()) else {
        return Vec::new();
    };
    std::iter::once(leader)
        .chain(state.members.iter().flatten().copied())
        .filter(|&m| arena.contains(m))
        .collect()
}

/// Squad size including the leader; zero when not squadded.
pub fn squad_count(arena: &AgentArena, id: AgentId) -> usize {
    members(arena, id).len()
}

/// Link `recruit` into `leader`'s squad.  Returns `false` when the member
/// array is full or `recruit` cannot join a squad.
pub fn squad_add(arena: &mut AgentArena, leader: AgentId, recruit: AgentId) -> bool {
    debug_assert_ne!(leader, recruit, "a leader is never its own member");
    let Some((lead, new)) = arena.pair_mut(leader, recruit) else {
        return false;
    };
    debug_assert!(lead.is_leader(), "squad_add on {leader}, which is not a leader");
    debug_assert!(!new.in_squad(), "squad_add of {recruit}, already squadded");

    let (Some(lead_state), Some(new_state)) = (lead.squad.as_mut(), new.squad.as_mut()) else {
        return false;
    };
    let Some(free) = lead_state.members.iter_mut().find(|m| m.is_none()) else {
        return false;
    };
    *free = Some(recruit);
    new_state.leader = Some(leader);
    new_state.recruited = true;
    debug!(%leader, member = %recruit, "squad add");
    true
}

/// Take `id` out of its squad, releasing any slot it holds.  Removing the
/// leader dissolves the squad.
pub fn squad_remove(arena: &mut AgentArena, id: AgentId) {
    let Some(leader) = leader_of(arena, id) else {
        return;
    };
    crate::slots::vacate_slot(arena, id);

    if leader == id {
        let freed: Vec<AgentId> = arena
            .get(id)
            .and_then(|a| a.squad.as_ref())
            .map(|s| s.members.iter().flatten().copied().collect())
            .unwrap_or_default();
        for member in &freed {
            if let Some(state) = arena.get_mut(*member).and_then(|a| a.squad.as_mut()) {
                state.leader = None;
                state.my_slot = SquadSlots::empty();
            }
        }
        debug!(leader = %id, members = freed.len(), "squad dissolved");
    } else if let Some(state) = arena.get_mut(leader).and_then(|a| a.squad.as_mut()) {
        if let Some(slot) = state.members.iter_mut().find(|m| **m == Some(id)) {
            *slot = None;
        }
        debug!(%leader, member = %id, "squad remove");
    }

    if let Some(state) = arena.get_mut(id).and_then(|a| a.squad.as_mut()) {
        state.reset();
    }
}

/// Handle slots still free on a leader.
pub(crate) fn free_member_slots(arena: &AgentArena, leader: AgentId) -> usize {
    arena
        .get(leader)
        .and_then(|a| a.squad.as_ref())
        .map_or(0, |s| MAX_SQUAD_MEMBERS - s.member_count())
}
