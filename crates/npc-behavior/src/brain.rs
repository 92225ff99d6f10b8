//! One agent's think: sense, evaluate, select, execute.

use npc_agent::AgentArena;
use npc_core::{AgentId, Capabilities, Conditions, Memory, MonsterState, SoundTypes, Vec3};
use npc_sense::{listen, look};
use npc_squad::members;
use tracing::trace;

use crate::conditions::update_ideal_state;
use crate::context::ThinkContext;
use crate::enemy::{check_enemy, get_enemy};
use crate::event::ThinkOutput;
use crate::executor::maintain_schedule;

/// Run one think for `id`.
///
/// Agents that are dead and have finished dying are skipped.  Sensing is
/// skipped before the first think and while prone or dead.  Only agents
/// with `Capabilities::HEAR` pick up sounds and scents.  Damage
/// conditions are consumed by the end of the think.
pub fn think(arena: &mut AgentArena, id: AgentId, cx: &ThinkContext<'_>, out: &mut ThinkOutput) {
    let Some(agent) = arena.get_mut(id) else {
        return;
    };
    if agent.state == MonsterState::Dead && agent.has_memory(Memory::KILLED) {
        return;
    }
    trace!(agent = %id, state = ?agent.state, schedule = agent.schedule_name().unwrap_or("-"), "think");

    if !matches!(agent.state, MonsterState::None | MonsterState::Prone | MonsterState::Dead) {
        let species = cx.species;
        look(agent, cx.perceivables, cx.world, cx.config.look_distance, |me, other| {
            species.relationship(me, other.classification)
        });

        // Deaf agents still run the pass so stale sounds are cleared.
        let species_mask = if agent.capabilities.contains(Capabilities::HEAR) {
            species.sound_mask(agent)
        } else {
            SoundTypes::empty()
        };
        let schedule_mask = agent.schedule.as_deref().map(|s| s.sounds());
        listen(agent, cx.stimuli, species_mask, schedule_mask, cx.config.hearing_sensitivity);

        let ignored = species.ignore_conditions(agent);
        agent.clear_conditions(ignored);

        get_enemy(arena, id, cx, out);
    }

    if arena.get(id).is_some_and(|a| a.enemy.is_some()) {
        check_enemy(arena, id, cx);
    }

    let mates: Vec<Vec3> = members(arena, id)
        .into_iter()
        .filter(|&m| m != id)
        .filter_map(|m| arena.get(m))
        .filter(|m| m.is_alive())
        .map(|m| m.origin)
        .collect();

    if let Some(agent) = arena.get_mut(id) {
        update_ideal_state(agent);
    }
    maintain_schedule(arena, id, cx, &mates, out);

    if let Some(agent) = arena.get_mut(id) {
        agent.clear_conditions(Conditions::ANY_DAMAGE);
    }
}
