//! Squad formation.

use npc_agent::{Agent, AgentArena};
use npc_core::{AgentId, Classification, EngineConfig};
use npc_spatial::WorldQuery;
use tracing::debug;

use crate::roster::{free_member_slots, squad_add, squad_remove};

/// Form a squad led by `leader`.
///
/// A leader with a group name takes every squad-capable agent of its
/// classification sharing that name, wherever it stands.  An unnamed leader
/// takes unnamed agents of its classification within `radius` whose eyes it
/// can trace to unobstructed.  Alien monsters also require the same species.
/// Candidates are visited in ascending handle order and the squad stops
/// growing at `max_size` agents (leader included).
///
/// Returns the squad size, or 0 when no one joined and the leader was left
/// unsquadded.
pub fn recruit(
    arena:    &mut AgentArena,
    world:    &dyn WorldQuery,
    leader:   AgentId,
    radius:   f32,
    max_size: usize,
) -> usize {
    let Some(me) = arena.get(leader) else {
        return 0;
    };
    debug_assert!(!me.in_squad(), "recruit by {leader}, already in a squad");
    if me.in_squad() || me.squad.is_none() {
        return 0;
    }
    let max_size = max_size.min(EngineConfig::SQUAD_CAPACITY);
    if max_size < 2 {
        return 0;
    }

    let candidates: Vec<AgentId> = arena
        .iter()
        .filter(|other| is_candidate(me, other, world, radius))
        .map(|other| other.id)
        .collect();

    if let Some(state) = arena.get_mut(leader).and_then(|a| a.squad.as_mut()) {
        state.leader = Some(leader);
        state.recruited = true;
    }

    let mut size = 1;
    for id in candidates {
        if size >= max_size || free_member_slots(arena, leader) == 0 {
            break;
        }
        if squad_add(arena, leader, id) {
            size += 1;
        }
    }

    if size == 1 {
        squad_remove(arena, leader);
        if let Some(state) = arena.get_mut(leader).and_then(|a| a.squad.as_mut()) {
            state.recruited = true;
        }
        debug!(%leader, "nobody to recruit");
        return 0;
    }
    debug!(%leader, size, "squad formed");
    size
}

fn is_candidate(me: &Agent, other: &Agent, world: &dyn WorldQuery, radius: f32) -> bool {
    if other.id == me.id
        || !other.is_alive()
        || other.squad.is_none()
        || other.in_squad()
        || other.script.is_some()
        || other.classification != me.classification
    {
        return false;
    }

    match &me.group_name {
        Some(name) => other.group_name.as_deref() == Some(name.as_str()),
        None => {
            other.group_name.is_none()
                && (me.classification != Classification::AlienMonster || other.species == me.species)
                && me.origin.distance(other.origin) <= radius
                && world.trace_line(me.eye_position(), other.eye_position()).is_clear()
        }
    }
}
