//! Standard task implementations.
//!
//! `start_task` runs once when a task begins; tasks that finish instantly
//! complete there.  `run_task` is called every tick while the task is
//! running.  Failures never propagate: they set `TASK_FAILED` and the
//! executor switches to a fail schedule.

use npc_agent::{Agent, Stimulus, TaskStatus};
use npc_core::geo::{angle_mod, yaw_delta};
use npc_core::{AgentId, Conditions, EntityRef, Memory, MonsterState, SoundTypes, SpawnFlags, Vec3};
use npc_mobility::{change_yaw, move_agent, MoveStatus, RouteResult, Router};
use npc_schedule::{Activity, Task, TaskKind};
use npc_sense::{best_scent, best_sound};
use npc_spatial::WaypointFlags;
use tracing::{debug, trace};

use crate::conditions::face;
use crate::context::TaskEnv;
use crate::cover::find_cover;
use crate::event::{Attack, AttackKind, BrainEvent};
use crate::selector::schedule_of_type;

/// Turning stops once within this many degrees of the ideal yaw.
pub const FACE_TOLERANCE: f32 = 1.0;

/// Audible radius of a ranged attack.
const GUNFIRE_VOLUME: f32 = 600.0;
const COMBAT_SOUND_SECS: f32 = 0.5;

/// Shortest random wait.
const MIN_RANDOM_WAIT: f32 = 0.1;

// ── Start ─────────────────────────────────────────────────────────────────────

pub fn start_task(agent: &mut Agent, task: &Task, env: &mut TaskEnv<'_, '_>) {
    use TaskKind as K;
    let now = env.cx.now;

    match task.kind {
        K::Wait => agent.wait_until = now + task.seconds(),
        K::WaitFaceEnemy => {
            agent.wait_until = now + task.seconds();
            let lkp = agent.enemy_lkp;
            face(agent, lkp);
        }
        K::WaitRandom => {
            let secs = agent.rng.range_f32(MIN_RANDOM_WAIT, task.seconds());
            agent.wait_until = now + secs;
        }
        K::WaitIndefinite => {}
        K::StopMoving => {
            stop_moving(agent, now);
            agent.task_complete();
        }
        K::SetActivity | K::PlayActivity => {
            let Some(activity) = task.activity() else {
                debug!(agent = %agent.id, param = task.param, "unknown activity");
                agent.task_fail();
                return;
            };
            let duration = env.cx.species.activity_duration(agent, activity);
            agent.set_activity(activity, now, duration);
            if task.kind == K::SetActivity {
                agent.task_complete();
            }
        }

        // Facing tasks set the ideal yaw here and turn in `run_task`.
        K::FaceIdeal => {}
        K::FaceEnemy => {
            let lkp = agent.enemy_lkp;
            face(agent, lkp);
        }
        K::FaceTarget => match target_position(agent, env) {
            Some(pos) => face(agent, pos),
            None => agent.task_fail(),
        },
        K::FaceLastPosition => match agent.last_position {
            Some(pos) => face(agent, pos),
            None => agent.task_complete(),
        },
        K::TurnLeft => agent.ideal_yaw = angle_mod(agent.yaw + task.param),
        K::TurnRight => agent.ideal_yaw = angle_mod(agent.yaw - task.param),

        K::Remember | K::Forget => {
            if let Some(bit) = task.memory() {
                if task.kind == K::Remember {
                    agent.remember(bit);
                } else {
                    agent.forget(bit);
                }
            }
            agent.task_complete();
        }
        K::SetFailSchedule => {
            agent.fail_schedule = task.schedule_type();
            agent.task_complete();
        }
        K::SetSchedule => {
            match task.schedule_type() {
                Some(ty) => env.switch_to = Some(schedule_of_type(agent, ty, env.cx)),
                None => agent.task_fail(),
            }
        }
        K::SuggestState => {
            if let Some(state) = task.state() {
                agent.ideal_state = state;
            }
            agent.task_complete();
        }
        K::StoreLastPosition => {
            agent.last_position = Some(agent.origin);
            agent.task_complete();
        }
        K::ClearLastPosition => {
            agent.last_position = None;
            agent.task_complete();
        }

        // ── Paths ─────────────────────────────────────────────────────────
        K::GetPathToEnemy => match agent.enemy.and_then(|e| env.cx.perceivable(e)) {
            Some(enemy) => {
                let target = Some(EntityRef::Agent(enemy.id));
                path_to(agent, env, enemy.origin, WaypointFlags::TO_ENEMY, target);
            }
            None => agent.task_fail(),
        },
        K::GetPathToEnemyLkp => {
            if agent.enemy.is_none() {
                agent.task_fail();
            } else {
                let lkp = agent.enemy_lkp;
                path_to(agent, env, lkp, WaypointFlags::TO_LOCATION, None);
            }
        }
        K::GetPathToTarget => match agent.target.zip(target_position(agent, env)) {
            Some((id, pos)) => path_to(agent, env, pos, WaypointFlags::TO_TARGET, Some(EntityRef::Agent(id))),
            None => agent.task_fail(),
        },
        K::GetPathToSpot => {
            let spot = agent.move_spot;
            path_to_opt(agent, env, spot);
        }
        K::GetPathToLastPosition => {
            let spot = agent.last_position;
            path_to_opt(agent, env, spot);
        }
        K::GetPathToBestSound => {
            let spot = best_sound(agent).map(|s| s.origin);
            path_to_opt(agent, env, spot);
        }
        K::GetPathToBestScent => {
            let spot = best_scent(agent).map(|s| s.origin);
            path_to_opt(agent, env, spot);
        }
        K::GetPathToPatrol => {
            let mut router = env.cx.router();
            let built = router.build_patrol_route(agent);
            finish_path(agent, env, &mut router, built);
        }
        K::GetPathToScriptMark => match agent.script.as_ref().map(|s| s.mark) {
            Some(Some(mark)) => path_to(agent, env, mark, WaypointFlags::TO_LOCATION, None),
            Some(None) => agent.task_complete(),
            None => agent.task_fail(),
        },

        // ── Cover ─────────────────────────────────────────────────────────
        K::FindCoverFromEnemy => {
            let threat = agent
                .enemy
                .and_then(|e| env.cx.perceivable(e))
                .map_or(agent.enemy_lkp, |p| p.eye_position());
            cover_from(agent, task, threat, env);
        }
        K::FindCoverFromOrigin => {
            let threat = agent.eye_position();
            cover_from(agent, task, threat, env);
        }
        K::FindCoverFromBestSound => match best_sound(agent).map(|s| s.origin) {
            Some(threat) => cover_from(agent, task, threat, env),
            None => agent.task_fail(),
        },

        // ── Movement ──────────────────────────────────────────────────────
        K::WalkPath | K::RunPath => {
            let (activity, speed) = movement_activity(agent, task.kind == K::RunPath);
            agent.ground_speed = speed;
            agent.set_activity(activity, now, 0.0);
            agent.task_complete();
        }
        K::WaitForMovement => {
            if agent.route.is_clear() && agent.route.goal.is_none() {
                agent.task_complete();
            }
        }
        K::MoveToTargetRange => match agent.target.zip(target_position(agent, env)) {
            Some((_, pos)) if pos.distance(agent.origin) <= task.param => agent.task_complete(),
            Some((id, pos)) => {
                let mut router = env.cx.router();
                let built = router.build_route(agent, pos, WaypointFlags::TO_TARGET, Some(EntityRef::Agent(id)));
                env.absorb(&mut router);
                match built {
                    Ok(()) => {
                        let (activity, speed) = movement_activity(agent, false);
                        agent.ground_speed = speed;
                        agent.set_activity(activity, now, 0.0);
                    }
                    Err(err) => {
                        debug!(agent = %agent.id, %err, "no route to target");
                        agent.task_fail();
                    }
                }
            }
            None => agent.task_fail(),
        },

        // ── Combat ────────────────────────────────────────────────────────
        K::RangeAttack1 => attack(agent, AttackKind::Range1, Activity::RangeAttack1, env),
        K::RangeAttack2 => attack(agent, AttackKind::Range2, Activity::RangeAttack2, env),
        K::MeleeAttack1 => attack(agent, AttackKind::Melee1, Activity::MeleeAttack1, env),
        K::MeleeAttack2 => attack(agent, AttackKind::Melee2, Activity::MeleeAttack2, env),
        K::Reload => play(agent, Activity::Reload, env),
        K::SmallFlinch => {
            stop_moving(agent, now);
            play(agent, Activity::SmallFlinch, env);
        }
        K::BigFlinch => {
            stop_moving(agent, now);
            play(agent, Activity::BigFlinch, env);
        }
        K::Vocalize => {
            if !agent.spawn_flags.contains(SpawnFlags::GAG) {
                env.out.events.push(BrainEvent::Vocalize { agent: agent.id, voice: task.param });
            }
            agent.task_complete();
        }

        // ── Scripts and death ─────────────────────────────────────────────
        K::PlayScript => {
            let Some(script) = agent.script.as_mut() else {
                agent.task_fail();
                return;
            };
            script.started_at = Some(now);
            let (activity, duration) = (script.activity, script.duration);
            agent.set_activity(activity, now, duration);
        }
        K::EndScript => {
            agent.script = None;
            agent.ideal_state = MonsterState::Idle;
            agent.task_complete();
        }
        K::Die => {
            stop_moving(agent, now);
            play(agent, Activity::Die, env);
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

pub fn run_task(agent: &mut Agent, task: &Task, env: &mut TaskEnv<'_, '_>) {
    use TaskKind as K;
    let now = env.cx.now;

    match task.kind {
        K::Wait | K::WaitRandom => {
            if now >= agent.wait_until {
                agent.task_complete();
            }
        }
        K::WaitFaceEnemy => {
            let lkp = agent.enemy_lkp;
            face(agent, lkp);
            change_yaw(agent, env.cx.dt);
            if now >= agent.wait_until {
                agent.task_complete();
            }
        }
        K::WaitIndefinite => {}

        K::FaceEnemy => {
            let lkp = agent.enemy_lkp;
            face(agent, lkp);
            turn(agent, env);
        }
        K::FaceTarget => match target_position(agent, env) {
            Some(pos) => {
                face(agent, pos);
                turn(agent, env);
            }
            None => agent.task_fail(),
        },
        K::FaceIdeal | K::FaceLastPosition | K::TurnLeft | K::TurnRight => turn(agent, env),

        // Movement tasks follow the route until it runs out, then get one
        // `RunningTask` update on the next tick.
        K::WaitForMovement => match agent.task_status {
            TaskStatus::RunningMovement => follow_route(agent, env),
            _ => agent.task_complete(),
        },
        K::MoveToTargetRange => match target_position(agent, env) {
            Some(pos) if pos.distance(agent.origin) <= task.param => {
                stop_moving(agent, now);
                agent.task_complete();
            }
            Some(_) if agent.task_status == TaskStatus::RunningMovement => follow_route(agent, env),
            Some(_) => agent.task_complete(),
            None => agent.task_fail(),
        },

        K::RangeAttack1 | K::RangeAttack2 | K::MeleeAttack1 | K::MeleeAttack2 => {
            let lkp = agent.enemy_lkp;
            face(agent, lkp);
            change_yaw(agent, env.cx.dt);
            finish_when_played(agent, env);
        }
        K::Reload => {
            if agent.sequence_finished(now) {
                agent.clear_conditions(Conditions::NO_AMMO_LOADED);
            }
            finish_when_played(agent, env);
        }
        K::PlayActivity | K::SmallFlinch | K::BigFlinch => finish_when_played(agent, env),
        K::PlayScript => {
            if agent.script.as_ref().is_none_or(|s| s.finished(now)) {
                agent.task_complete();
            }
        }
        K::Die => {
            if agent.sequence_finished(now) {
                agent.remember(Memory::KILLED);
            }
            finish_when_played(agent, env);
        }

        // Everything else finishes in `start_task`.
        _ => agent.task_complete(),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn stop_moving(agent: &mut Agent, now: f32) {
    agent.route.clear();
    agent.velocity = Vec3::ZERO;
    if agent.activity.is_movement() {
        agent.set_activity(Activity::Idle, now, 0.0);
    }
}

fn movement_activity(agent: &Agent, run: bool) -> (Activity, f32) {
    let speed = if run { agent.run_speed } else { agent.walk_speed };
    let activity = match (agent.is_flying(), run) {
        (true, _) => Activity::Fly,
        (false, true) => Activity::Run,
        (false, false) => Activity::Walk,
    };
    (activity, speed)
}

/// Turn toward the ideal yaw; complete once facing it.
fn turn(agent: &mut Agent, env: &TaskEnv<'_, '_>) {
    change_yaw(agent, env.cx.dt);
    if yaw_delta(agent.yaw, agent.ideal_yaw).abs() <= FACE_TOLERANCE {
        agent.task_complete();
    }
}

fn target_position(agent: &Agent, env: &TaskEnv<'_, '_>) -> Option<Vec3> {
    agent.target.and_then(|t| env.cx.perceivable(t)).filter(|p| p.alive).map(|p| p.origin)
}

fn path_to(agent: &mut Agent, env: &mut TaskEnv<'_, '_>, goal: Vec3, kind: WaypointFlags, target: Option<EntityRef>) {
    let mut router = env.cx.router();
    let built = router.build_route(agent, goal, kind, target);
    finish_path(agent, env, &mut router, built);
}

fn path_to_opt(agent: &mut Agent, env: &mut TaskEnv<'_, '_>, spot: Option<Vec3>) {
    match spot {
        Some(pos) => path_to(agent, env, pos, WaypointFlags::TO_LOCATION, None),
        None => agent.task_fail(),
    }
}

fn finish_path(agent: &mut Agent, env: &mut TaskEnv<'_, '_>, router: &mut Router<'_>, built: RouteResult<()>) {
    env.absorb(router);
    match built {
        Ok(()) => agent.task_complete(),
        Err(err) => {
            debug!(agent = %agent.id, %err, "path task failed");
            agent.task_fail();
        }
    }
}

/// A zero radius means the configured maximum.
fn cover_from(agent: &mut Agent, task: &Task, threat: Vec3, env: &mut TaskEnv<'_, '_>) {
    let config = env.cx.config;
    let max = if task.param > 0.0 { task.param } else { config.cover_max_distance };
    match find_cover(agent, threat, config.cover_min_distance, max, env) {
        Some(_) => agent.task_complete(),
        None => agent.task_fail(),
    }
}

/// Drive the local mover one tick and translate the outcome.
fn follow_route(agent: &mut Agent, env: &mut TaskEnv<'_, '_>) {
    let mut router = env.cx.router();
    let outcome = move_agent(&mut router, agent, env.cx.dt);
    env.absorb(&mut router);

    if let Some(by) = outcome.blocker {
        env.cx.species.blocked(agent, by);
        env.out.events.push(BrainEvent::Blocked { agent: agent.id, by });
    }
    match outcome.status {
        MoveStatus::Arrived => {
            agent.velocity = Vec3::ZERO;
            agent.task_status = TaskStatus::RunningTask;
        }
        MoveStatus::Failed(err) => {
            debug!(agent = %agent.id, %err, "movement failed");
            agent.task_fail();
        }
        MoveStatus::Moving | MoveStatus::Waiting => {}
    }
}

fn play(agent: &mut Agent, activity: Activity, env: &TaskEnv<'_, '_>) {
    let duration = env.cx.species.activity_duration(agent, activity);
    agent.set_activity(activity, env.cx.now, duration);
}

/// Complete once the current activity has played out, firing its event.
fn finish_when_played(agent: &mut Agent, env: &mut TaskEnv<'_, '_>) {
    if !agent.sequence_finished(env.cx.now) {
        return;
    }
    let activity = agent.activity;
    env.cx.species.handle_anim_event(agent, activity, env.out);
    env.out.events.push(BrainEvent::AnimEvent { agent: agent.id, activity });
    agent.task_complete();
}

/// Start the attack animation and resolve the attack against the enemy.
fn attack(agent: &mut Agent, kind: AttackKind, activity: Activity, env: &mut TaskEnv<'_, '_>) {
    let Some(target) = agent.enemy else {
        agent.task_fail();
        return;
    };
    let lkp = agent.enemy_lkp;
    face(agent, lkp);
    play(agent, activity, env);

    let damage = env.cx.species.attack(agent, kind);
    trace!(agent = %agent.id, %target, ?kind, damage, "attack");
    env.out.attacks.push(Attack { attacker: agent.id, target, kind, damage });
    if matches!(kind, AttackKind::Range1 | AttackKind::Range2) {
        env.out.sounds.push(gunfire(agent.id, agent.origin, env.cx.now));
    }
}

fn gunfire(source: AgentId, origin: Vec3, now: f32) -> Stimulus {
    Stimulus {
        origin,
        kind: SoundTypes::COMBAT,
        volume: GUNFIRE_VOLUME,
        expires_at: now + COMBAT_SOUND_SECS,
        source: Some(source),
    }
}
