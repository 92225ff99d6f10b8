//! Enemy acquisition and per-tick enemy checks.

use npc_agent::{Agent, AgentArena};
use npc_core::{AgentId, Capabilities, Conditions, Vec3};
use npc_sense::Perceivable;
use npc_spatial::WaypointFlags;
use npc_squad::{copy_enemy_info, no_friendly_fire, paste_enemy_info, squad_make_enemy};
use tracing::{debug, trace};

use crate::context::ThinkContext;
use crate::event::{BrainEvent, ThinkOutput};

/// Pick up a new enemy from what the agent sees, or fall back on a
/// remembered one.  Returns `true` when the agent ends up with an enemy.
///
/// A better visible enemy only replaces the current one while the running
/// schedule is interruptible by `NEW_ENEMY`.
pub fn get_enemy(arena: &mut AgentArena, id: AgentId, cx: &ThinkContext<'_>, out: &mut ThinkOutput) -> bool {
    let Some(agent) = arena.get_mut(id) else {
        return false;
    };
    let mut adopted = None;

    if agent.has_conditions(Conditions::SEE_HATE | Conditions::SEE_DISLIKE | Conditions::SEE_NEMESIS) {
        if let Some(best) = best_visible_enemy(agent, cx) {
            if agent.enemy != Some(best.id) && accepts_new_enemy(agent) {
                if let Some(old) = agent.enemy {
                    agent.old_enemies.push(old, agent.enemy_lkp);
                }
                agent.enemy = Some(best.id);
                agent.enemy_lkp = best.origin;
                agent.set_conditions(Conditions::NEW_ENEMY);
                adopted = Some(best.id);
            }
        }
    }

    if agent.enemy.is_none() {
        let alive = |e: AgentId| cx.perceivable(e).is_some_and(|p| p.alive);
        if let Some((enemy, lkp)) = agent.old_enemies.pop(alive) {
            agent.enemy = Some(enemy);
            agent.enemy_lkp = lkp;
            if accepts_new_enemy(agent) {
                agent.set_conditions(Conditions::NEW_ENEMY);
            }
            trace!(agent = %id, %enemy, "remembered enemy");
        }
    }

    let has_enemy = agent.enemy.is_some();
    if let Some(enemy) = adopted {
        debug!(agent = %id, %enemy, "new enemy");
        out.events.push(BrainEvent::EnemyAcquired { agent: id, enemy });
        squad_make_enemy(arena, id, enemy);
    }
    has_enemy
}

fn accepts_new_enemy(agent: &Agent) -> bool {
    agent.schedule.as_deref().is_none_or(|s| s.interrupted_by(Conditions::NEW_ENEMY))
}

/// Best candidate among the entities seen this tick: strongest hostile
/// relationship first, then the closest.
pub fn best_visible_enemy<'a>(agent: &Agent, cx: &ThinkContext<'a>) -> Option<&'a Perceivable> {
    agent
        .senses
        .visible
        .iter()
        .filter_map(|&id| cx.perceivable(id))
        .filter(|p| p.alive && !p.no_target)
        .map(|p| (cx.species.relationship(agent, p.classification), p))
        .filter(|(rel, _)| rel.is_hostile())
        .max_by(|(ra, a), (rb, b)| {
            ra.cmp(rb).then_with(|| {
                // Closer wins, so compare in reverse.
                b.origin.distance(agent.origin).total_cmp(&a.origin.distance(agent.origin))
            })
        })
        .map(|(_, p)| p)
}

/// Refresh everything the agent knows about its enemy.  Returns `true`
/// when the last known position was updated.
///
/// Sets or clears `SEE_ENEMY`, `ENEMY_OCCLUDED`, `ENEMY_DEAD`,
/// `ENEMY_FACING_ME`, `ENEMY_TOO_FAR` and the four `CAN_*_ATTACK` bits.
/// Attack bits are only produced for capabilities the agent has, and a
/// squad member only gets `CAN_RANGE_ATTACK1` with a clear line of fire.
pub fn check_enemy(arena: &mut AgentArena, id: AgentId, cx: &ThinkContext<'_>) -> bool {
    let clear_shot = arena.get(id).is_some_and(|a| a.in_squad()) && no_friendly_fire(arena, id);

    let Some(agent) = arena.get_mut(id) else {
        return false;
    };
    let Some(enemy_id) = agent.enemy else {
        return false;
    };

    let enemy = cx.perceivable(enemy_id).filter(|p| p.alive);
    let Some(enemy) = enemy else {
        agent.set_conditions(Conditions::ENEMY_DEAD);
        agent.clear_conditions(Conditions::SEE_ENEMY | Conditions::ENEMY_OCCLUDED | Conditions::CAN_ATTACK);
        debug!(agent = %id, enemy = %enemy_id, "enemy dead");
        return false;
    };

    let visible = cx.world.trace_line(agent.eye_position(), enemy.eye_position()).is_clear();
    agent.set_conditions_to(Conditions::ENEMY_OCCLUDED, !visible);

    let dist = enemy.origin.distance(agent.origin).min(enemy.eye_position().distance(agent.origin));
    let mut updated = false;
    if agent.has_conditions(Conditions::SEE_ENEMY) {
        agent.enemy_lkp = enemy.origin;
        updated = true;
        agent.set_conditions_to(Conditions::ENEMY_FACING_ME, enemy.sees_point(agent.origin));
    } else {
        agent.clear_conditions(Conditions::ENEMY_FACING_ME);
        if visible && dist <= cx.config.sense_nearby_enemy {
            // Close enough to sense without seeing.
            agent.enemy_lkp = enemy.origin;
            updated = true;
        }
    }

    agent.set_conditions_to(Conditions::ENEMY_TOO_FAR, dist > cx.config.enemy_too_far);
    agent.clear_conditions(Conditions::CAN_ATTACK);
    if agent.has_conditions(Conditions::SEE_ENEMY) && !agent.has_conditions(Conditions::ENEMY_TOO_FAR) {
        let attacks = attack_conditions(agent, enemy.origin, dist, cx);
        let attacks = if agent.in_squad() && !clear_shot {
            attacks - Conditions::CAN_RANGE_ATTACK1
        } else {
            attacks
        };
        agent.set_conditions(attacks);
    }

    drift_refresh(agent, cx);

    let in_squad = agent.in_squad();
    let shares_enemy = in_squad && shares_leader_enemy(arena, id, enemy_id);
    if shares_enemy {
        if updated {
            paste_enemy_info(arena, id);
        } else {
            copy_enemy_info(arena, id);
        }
    }
    updated
}

/// Attack conditions the species' checks allow, gated by capabilities.
pub fn attack_conditions(agent: &Agent, target: Vec3, dist: f32, cx: &ThinkContext<'_>) -> Conditions {
    let los = (target - agent.origin).flat().normalize();
    let dot = los.dot_2d(agent.forward());
    let species = cx.species;
    let caps = agent.capabilities;

    let mut c = Conditions::empty();
    if caps.contains(Capabilities::RANGE_ATTACK1) && species.check_range_attack1(agent, dot, dist) {
        c |= Conditions::CAN_RANGE_ATTACK1;
    }
    if caps.contains(Capabilities::RANGE_ATTACK2) && species.check_range_attack2(agent, dot, dist) {
        c |= Conditions::CAN_RANGE_ATTACK2;
    }
    if caps.contains(Capabilities::MELEE_ATTACK1) && species.check_melee_attack1(agent, dot, dist) {
        c |= Conditions::CAN_MELEE_ATTACK1;
    }
    if caps.contains(Capabilities::MELEE_ATTACK2) && species.check_melee_attack2(agent, dot, dist) {
        c |= Conditions::CAN_MELEE_ATTACK2;
    }
    c
}

/// Rebuild an enemy-bound route whose goal has fallen behind the LKP.
fn drift_refresh(agent: &mut Agent, cx: &ThinkContext<'_>) {
    let Some(goal) = agent.route.goal else {
        return;
    };
    if goal.kind != WaypointFlags::TO_ENEMY || agent.route.is_clear() {
        return;
    }
    if goal.pos.distance(agent.enemy_lkp) <= cx.config.enemy_drift_tolerance {
        return;
    }
    let mut router = cx.router();
    if let Err(err) = router.refresh_route(agent) {
        debug!(agent = %agent.id, %err, "chase refresh failed");
    }
}

fn shares_leader_enemy(arena: &AgentArena, id: AgentId, enemy: AgentId) -> bool {
    arena
        .get(id)
        .and_then(|a| a.squad_leader())
        .and_then(|l| arena.get(l))
        .is_some_and(|leader| leader.enemy == Some(enemy))
}
