//! Shared enemy knowledge.

use npc_agent::AgentArena;
use npc_core::{AgentId, Conditions};
use tracing::debug;

use crate::roster::{leader_of, members};

/// Give `enemy` to every squad mate of `id` that is not already fighting
/// something it can see.  A mate's previous enemy is remembered first.
pub fn squad_make_enemy(arena: &mut AgentArena, id: AgentId, enemy: AgentId) {
    let Some(enemy_pos) = arena.get(enemy).map(|e| e.origin) else {
        return;
    };
    let mut told = 0;
    for member in members(arena, id) {
        let Some(agent) = arena.get_mut(member) else {
            continue;
        };
        if agent.enemy == Some(enemy) || agent.has_conditions(Conditions::SEE_ENEMY) {
            continue;
        }
        if let Some(previous) = agent.enemy {
            agent.old_enemies.push(previous, agent.enemy_lkp);
        }
        agent.enemy = Some(enemy);
        agent.enemy_lkp = enemy_pos;
        agent.set_conditions(Conditions::NEW_ENEMY);
        told += 1;
    }
    if told > 0 {
        debug!(agent = %id, %enemy, told, "squad enemy");
    }
}

/// Publish `id`'s last known enemy position to its leader.
pub fn paste_enemy_info(arena: &mut AgentArena, id: AgentId) {
    let (Some(leader), Some(lkp)) = (leader_of(arena, id), arena.get(id).map(|a| a.enemy_lkp)) else {
        return;
    };
    if let Some(lead) = arena.get_mut(leader) {
        lead.enemy_lkp = lkp;
    }
}

/// Adopt the leader's last known enemy position.
pub fn copy_enemy_info(arena: &mut AgentArena, id: AgentId) {
    let Some(lkp) = leader_of(arena, id).and_then(|l| arena.get(l)).map(|l| l.enemy_lkp) else {
        return;
    };
    if let Some(me) = arena.get_mut(id) {
        me.enemy_lkp = lkp;
    }
}
