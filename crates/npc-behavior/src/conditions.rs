//! Interrupt evaluation and the ideal-state machine.

use npc_agent::Agent;
use npc_core::{Conditions, MonsterState, SoundTypes, Vec3};
use npc_schedule::Schedule;
use npc_sense::best_sound;
use tracing::trace;

/// `true` when `conditions` should abandon `schedule`.
///
/// `HEAR_SOUND` only counts when the heard classes overlap the schedule's
/// sound mask.  `SCHEDULE_DONE` and `TASK_FAILED` always interrupt.
pub fn must_interrupt(conditions: Conditions, sound_types: SoundTypes, schedule: &Schedule) -> bool {
    let mut live = conditions;
    if !sound_types.intersects(schedule.sounds()) {
        live.remove(Conditions::HEAR_SOUND);
    }
    live.intersects(schedule.interrupts() | Conditions::SCHEDULE_DONE | Conditions::TASK_FAILED)
}

/// Recompute `agent.ideal_state` from its conditions and return it.
///
/// The ideal state only moves when one of the triggers below matches; it is
/// never reset to the current state.  While a schedule is running only the
/// conditions it listens for are considered.
///
/// | State          | Trigger                              | Ideal     |
/// |----------------|--------------------------------------|-----------|
/// | Idle           | `NEW_ENEMY`                          | Combat    |
/// | Idle           | damage, combat/danger sound, smell   | Alert     |
/// | Alert / Hunt   | `NEW_ENEMY` or `SEE_ENEMY`           | Combat    |
/// | Combat         | no enemy                             | Alert     |
/// | Script         | failure or damage, if interruptible  | Alert     |
pub fn update_ideal_state(agent: &mut Agent) -> MonsterState {
    let cond = match agent.schedule.as_deref() {
        Some(s) => agent.conditions & (s.interrupts() | Conditions::TASK_FAILED),
        None    => agent.conditions,
    };
    let before = agent.ideal_state;

    match agent.state {
        MonsterState::Idle => {
            if cond.contains(Conditions::NEW_ENEMY) {
                agent.ideal_state = MonsterState::Combat;
            } else if cond.intersects(Conditions::ANY_DAMAGE) {
                let from = agent.last_damage_origin.unwrap_or(agent.enemy_lkp);
                face(agent, from);
                agent.ideal_state = MonsterState::Alert;
            } else if cond.contains(Conditions::HEAR_SOUND) {
                if let Some(sound) = best_sound(agent).copied() {
                    face(agent, sound.origin);
                    if sound.kind.intersects(SoundTypes::COMBAT | SoundTypes::DANGER) {
                        agent.ideal_state = MonsterState::Alert;
                    }
                }
            } else if cond.intersects(Conditions::SMELL | Conditions::SMELL_FOOD) {
                agent.ideal_state = MonsterState::Alert;
            }
        }
        MonsterState::Alert | MonsterState::Hunt => {
            if cond.intersects(Conditions::NEW_ENEMY | Conditions::SEE_ENEMY) {
                agent.ideal_state = MonsterState::Combat;
            } else if cond.contains(Conditions::HEAR_SOUND) {
                if let Some(sound) = best_sound(agent).copied() {
                    face(agent, sound.origin);
                }
            }
        }
        MonsterState::Combat => {
            if agent.enemy.is_none() {
                agent.ideal_state = MonsterState::Alert;
            }
        }
        MonsterState::Script => {
            let raw = agent.conditions;
            let interruptible = agent.script.as_ref().is_some_and(|s| s.interruptible);
            if interruptible && raw.intersects(Conditions::TASK_FAILED | Conditions::ANY_DAMAGE) {
                agent.script = None;
                agent.ideal_state = MonsterState::Alert;
            }
        }
        MonsterState::None | MonsterState::Prone | MonsterState::Dead => {}
    }

    if agent.ideal_state != before {
        trace!(agent = %agent.id, from = ?before, to = ?agent.ideal_state, "ideal state");
    }
    agent.ideal_state
}

/// Point `ideal_yaw` at `pos` (plan view).
pub(crate) fn face(agent: &mut Agent, pos: Vec3) {
    let d = (pos - agent.origin).flat();
    if !d.is_zero() {
        agent.ideal_yaw = d.to_yaw();
    }
}
