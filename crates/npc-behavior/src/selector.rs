//! Schedule selection.
//!
//! Selection is a pure decision over the agent's state and conditions,
//! except that combat rules may claim squad slots and the dead-enemy rule
//! may swap in a remembered enemy or drop the agent to `Alert`.

use npc_agent::{Agent, AgentArena, SquadSlots};
use npc_core::{geo::yaw_delta, AgentId, Conditions, MonsterState, SoundTypes};
use npc_schedule::{ScheduleRef, ScheduleType};
use npc_sense::best_sound;
use npc_squad::occupy_slot;
use tracing::debug;

use crate::context::ThinkContext;
use crate::event::{BrainEvent, ThinkOutput};

/// One decision in the combat priority list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombatRule {
    /// Enemy died: take up a remembered enemy or stand down.
    EnemyDead,
    /// Just acquired an enemy.
    NewEnemy,
    MeleeAttack,
    HeavyDamage,
    /// Needs an `ENGAGE` squad slot.
    RangeAttack,
    /// Needs a `CHASE` squad slot.
    Chase,
    Standoff,
}

/// Combat rules in the order they are tried.  The first rule that yields a
/// schedule wins.
pub const COMBAT_PRIORITY: [CombatRule; 7] = [
    CombatRule::EnemyDead,
    CombatRule::NewEnemy,
    CombatRule::MeleeAttack,
    CombatRule::HeavyDamage,
    CombatRule::RangeAttack,
    CombatRule::Chase,
    CombatRule::Standoff,
];

/// Pick and resolve the next schedule for `id`.
pub fn select_schedule(
    arena: &mut AgentArena,
    id:    AgentId,
    cx:    &ThinkContext<'_>,
    out:   &mut ThinkOutput,
) -> ScheduleRef {
    let ty = select_type(arena, id, out);
    match arena.get(id) {
        Some(agent) => schedule_of_type(agent, ty, cx),
        None => cx.catalog.fallback(),
    }
}

/// The schedule type the agent's state and conditions call for.
pub fn select_type(arena: &mut AgentArena, id: AgentId, out: &mut ThinkOutput) -> ScheduleType {
    let Some(agent) = arena.get(id) else {
        return ScheduleType::IdleStand;
    };
    match agent.state {
        MonsterState::None => ScheduleType::IdleStand,
        MonsterState::Prone => ScheduleType::VictimGrab,
        MonsterState::Dead => ScheduleType::Die,
        MonsterState::Script => ScheduleType::AiScript,
        MonsterState::Idle => idle_type(agent),
        MonsterState::Alert | MonsterState::Hunt => alert_type(agent),
        MonsterState::Combat => combat_type(arena, id, out),
    }
}

/// Species override first, then the catalog's resolution chain.
pub fn schedule_of_type(agent: &Agent, ty: ScheduleType, cx: &ThinkContext<'_>) -> ScheduleRef {
    cx.species
        .schedule_of_type(agent, ty, cx.catalog)
        .unwrap_or_else(|| cx.catalog.resolve(agent.species, ty))
}

/// Fail schedule for the agent's current schedule: the `SetFailSchedule`
/// override, then the catalog's registered fail schedule, then `Fail`.
pub fn fail_schedule(agent: &Agent, cx: &ThinkContext<'_>) -> ScheduleRef {
    let ty = agent
        .fail_schedule
        .or_else(|| agent.schedule_name().and_then(|n| cx.catalog.fail_for(n)))
        .unwrap_or(ScheduleType::Fail);
    schedule_of_type(agent, ty, cx)
}

/// Move the agent into `state` now.  Leaving for `Idle` drops the enemy.
pub fn set_state(agent: &mut Agent, state: MonsterState, out: &mut ThinkOutput) {
    if state == MonsterState::Idle {
        agent.enemy = None;
    }
    if agent.state != state {
        debug!(agent = %agent.id, from = ?agent.state, to = ?state, "state");
        out.events.push(BrainEvent::StateChanged { agent: agent.id, from: agent.state, to: state });
    }
    agent.state = state;
    agent.ideal_state = state;
}

// ── Per-state rules ───────────────────────────────────────────────────────────

fn idle_type(agent: &Agent) -> ScheduleType {
    if agent.has_conditions(Conditions::HEAR_SOUND) {
        ScheduleType::AlertFace
    } else if !agent.patrol.is_empty() {
        ScheduleType::Patrol
    } else {
        ScheduleType::IdleStand
    }
}

fn alert_type(agent: &Agent) -> ScheduleType {
    if agent.has_conditions(Conditions::ENEMY_DEAD) {
        return ScheduleType::VictoryDance;
    }
    if agent.has_conditions(Conditions::ANY_DAMAGE) {
        // Already roughly facing the attacker: get out of the line of fire.
        let tolerance = (1.0 - agent.fov) * 60.0;
        return if yaw_delta(agent.yaw, agent.ideal_yaw).abs() < tolerance {
            ScheduleType::TakeCoverFromOrigin
        } else {
            ScheduleType::AlertSmallFlinch
        };
    }
    if agent.has_conditions(Conditions::HEAR_SOUND) {
        let danger = best_sound(agent).is_some_and(|s| s.kind.intersects(SoundTypes::DANGER));
        return if danger { ScheduleType::TakeCoverFromBestSound } else { ScheduleType::InvestigateSound };
    }
    ScheduleType::AlertStand
}

fn combat_type(arena: &mut AgentArena, id: AgentId, out: &mut ThinkOutput) -> ScheduleType {
    for rule in COMBAT_PRIORITY {
        if let Some(ty) = apply_rule(rule, arena, id, out) {
            return ty;
        }
    }
    ScheduleType::Standoff
}

fn apply_rule(rule: CombatRule, arena: &mut AgentArena, id: AgentId, out: &mut ThinkOutput) -> Option<ScheduleType> {
    let cond = arena.get(id)?.conditions;
    let has = |c: Conditions| cond.contains(c);

    match rule {
        CombatRule::EnemyDead => has(Conditions::ENEMY_DEAD).then(|| enemy_dead(arena, id, out)),
        CombatRule::NewEnemy => has(Conditions::NEW_ENEMY).then_some(ScheduleType::WakeAngry),
        CombatRule::MeleeAttack => {
            if has(Conditions::CAN_MELEE_ATTACK1) {
                Some(ScheduleType::MeleeAttack1)
            } else if has(Conditions::CAN_MELEE_ATTACK2) {
                Some(ScheduleType::MeleeAttack2)
            } else {
                None
            }
        }
        CombatRule::HeavyDamage => has(Conditions::HEAVY_DAMAGE).then_some(ScheduleType::SmallFlinch),
        CombatRule::RangeAttack => {
            let ty = if has(Conditions::CAN_RANGE_ATTACK1) {
                ScheduleType::RangeAttack1
            } else if has(Conditions::CAN_RANGE_ATTACK2) {
                ScheduleType::RangeAttack2
            } else {
                return None;
            };
            occupy_slot(arena, id, SquadSlots::ENGAGE).then_some(ty)
        }
        CombatRule::Chase => occupy_slot(arena, id, SquadSlots::CHASE).then_some(ScheduleType::ChaseEnemy),
        CombatRule::Standoff => Some(ScheduleType::Standoff),
    }
}

fn enemy_dead(arena: &mut AgentArena, id: AgentId, out: &mut ThinkOutput) -> ScheduleType {
    let alive: Vec<AgentId> = arena.iter().filter(|a| a.is_alive()).map(|a| a.id).collect();
    let Some(agent) = arena.get_mut(id) else {
        return ScheduleType::IdleStand;
    };
    agent.enemy = None;
    match agent.old_enemies.pop(|e| alive.contains(&e)) {
        Some((enemy, lkp)) => {
            debug!(agent = %id, %enemy, "resuming remembered enemy");
            agent.enemy = Some(enemy);
            agent.enemy_lkp = lkp;
            agent.clear_conditions(Conditions::ENEMY_DEAD);
            agent.set_conditions(Conditions::NEW_ENEMY);
            ScheduleType::WakeAngry
        }
        None => {
            set_state(agent, MonsterState::Alert, out);
            alert_type(agent)
        }
    }
}
