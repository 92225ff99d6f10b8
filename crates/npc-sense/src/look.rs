//! The look pass.

use npc_agent::Agent;
use npc_core::{Conditions, Relationship, SpawnFlags};
use npc_spatial::WorldQuery;
use tracing::trace;

use crate::perceive::Perceivable;

/// Rebuild `agent.senses.visible` and the `SEE_*` conditions.
///
/// A candidate is seen when it is alive, not a prisoner, targetable, inside
/// the axis-aligned box of half-extent `distance`, regarded with some
/// relationship other than `None`, inside the agent's view cone, and
/// reachable by a clear eye-to-eye trace.
///
/// With `SpawnFlags::WAIT_TILL_SEEN` set, players are ignored until one of
/// them has the agent in its own view cone; the flag is then cleared for
/// good.
///
/// Returns the number of entities seen.
pub fn look(
    agent:    &mut Agent,
    others:   &[Perceivable],
    world:    &dyn WorldQuery,
    distance: f32,
    relate:   impl Fn(&Agent, &Perceivable) -> Relationship,
) -> usize {
    agent.clear_conditions(Conditions::ALL_SEE);
    agent.senses.visible.clear();

    if agent.spawn_flags.contains(SpawnFlags::PRISONER) {
        return 0;
    }

    let eye = agent.eye_position();
    let mut seen = Conditions::empty();

    for other in others {
        if other.id == agent.id || !other.alive || other.prisoner || other.no_target {
            continue;
        }
        let d = other.origin - agent.origin;
        if d.x.abs() > distance || d.y.abs() > distance || d.z.abs() > distance {
            continue;
        }
        let rel = relate(&*agent, other);
        if rel == Relationship::None {
            continue;
        }
        if !crate::in_view_cone(agent.origin, agent.yaw, agent.fov, other.origin) {
            continue;
        }
        if !world.trace_line(eye, other.eye_position()).is_clear() {
            continue;
        }

        if other.is_player {
            if agent.spawn_flags.contains(SpawnFlags::WAIT_TILL_SEEN) {
                if !other.sees_point(agent.origin) {
                    continue;
                }
                agent.spawn_flags.remove(SpawnFlags::WAIT_TILL_SEEN);
                trace!(agent = %agent.id, player = %other.id, "seen by player");
            }
            seen |= Conditions::SEE_CLIENT;
        }

        agent.senses.visible.push(other.id);

        if agent.enemy == Some(other.id) {
            seen |= Conditions::SEE_ENEMY;
        }
        seen |= match rel {
            Relationship::Nemesis => Conditions::SEE_NEMESIS,
            Relationship::Hate    => Conditions::SEE_HATE,
            Relationship::Dislike => Conditions::SEE_DISLIKE,
            Relationship::Fear    => Conditions::SEE_FEAR,
            _                     => Conditions::empty(),
        };
    }

    agent.set_conditions(seen);
    agent.senses.visible.len()
}
