//! The per-tick schedule executor.

use npc_agent::{AgentArena, TaskStatus};
use npc_core::{AgentId, Conditions, Memory, MonsterState, Vec3};
use npc_schedule::ScheduleRef;
use npc_squad::vacate_slot;
use tracing::{debug, trace};

use crate::conditions::{must_interrupt, update_ideal_state};
use crate::context::{TaskEnv, ThinkContext};
use crate::event::{BrainEvent, ThinkOutput};
use crate::selector::{fail_schedule, select_schedule, set_state};
use crate::tasks;

/// Schedule changes and instant tasks handled in one think before the
/// executor gives up for the tick.
pub const MAX_SCHEDULE_ITERATIONS: usize = 10;

/// Advance `id`'s schedule for one tick.
///
/// Completed tasks are stepped past, invalid schedules replaced, and new
/// tasks started until one is left running (or the iteration bound is hit).
/// The running task then gets its `run_task` call.
pub fn maintain_schedule(
    arena: &mut AgentArena,
    id:    AgentId,
    cx:    &ThinkContext<'_>,
    mates: &[Vec3],
    out:   &mut ThinkOutput,
) {
    for _ in 0..MAX_SCHEDULE_ITERATIONS {
        let Some(agent) = arena.get_mut(id) else {
            return;
        };
        if agent.state == MonsterState::Dead && agent.has_memory(Memory::KILLED) {
            return;
        }

        if agent.schedule.is_some() && agent.task_status == TaskStatus::Complete && agent.next_scheduled_task() {
            let schedule = agent.schedule_name().unwrap_or_default().to_owned();
            debug!(agent = %id, %schedule, "schedule complete");
            out.events.push(BrainEvent::ScheduleCompleted { agent: id, schedule });
        }

        let valid = agent
            .schedule
            .as_deref()
            .is_some_and(|s| !must_interrupt(agent.conditions, agent.sound_types(), s));
        if !valid || agent.state != agent.ideal_state {
            if agent.has_conditions(Conditions::TASK_FAILED) {
                if let Some(task) = agent.task().copied() {
                    let mut env = TaskEnv::new(cx, out, mates);
                    cx.species.task_failed(agent, &task, &mut env);
                }
            }
            change_schedule(arena, id, cx, out);
        }

        let Some(agent) = arena.get_mut(id) else {
            return;
        };
        if agent.task_status == TaskStatus::New {
            let Some(task) = agent.task().copied() else {
                // Only reachable with an empty schedule; let the fail chain replace it.
                agent.task_fail();
                continue;
            };
            agent.task_status = if task.kind.is_movement() {
                TaskStatus::RunningMovement
            } else {
                TaskStatus::RunningTask
            };
            trace!(agent = %id, %task, "start task");

            let mut env = TaskEnv::new(cx, out, mates);
            if !cx.species.start_task(agent, &task, &mut env) {
                tasks::start_task(agent, &task, &mut env);
            }
            if let Some(next) = env.switch_to.take() {
                vacate_slot(arena, id);
                install(arena, id, next, out);
                continue;
            }
        }

        let Some(agent) = arena.get(id) else {
            return;
        };
        let settled = agent.task_is_running() && !agent.has_conditions(Conditions::TASK_FAILED);
        if settled {
            break;
        }
    }

    let Some(agent) = arena.get_mut(id) else {
        return;
    };
    if agent.task_is_running() && !agent.has_conditions(Conditions::TASK_FAILED) {
        if let Some(task) = agent.task().copied() {
            let mut env = TaskEnv::new(cx, out, mates);
            if !cx.species.run_task(agent, &task, &mut env) {
                tasks::run_task(agent, &task, &mut env);
            }
            if let Some(next) = env.switch_to.take() {
                vacate_slot(arena, id);
                install(arena, id, next, out);
            }
        }
    }
}

/// Replace the running schedule.
///
/// The squad slot is released first.  The ideal state is recomputed when
/// conditions are pending, when the schedule asked for it, or when a
/// combatant has lost its enemy.  A failed task in a stable state picks a
/// fail schedule; otherwise the state is brought in line with the ideal and
/// a fresh schedule is selected.
pub fn change_schedule(arena: &mut AgentArena, id: AgentId, cx: &ThinkContext<'_>, out: &mut ThinkOutput) {
    vacate_slot(arena, id);

    let Some(agent) = arena.get_mut(id) else {
        return;
    };
    let (state, ideal) = (agent.state, agent.ideal_state);
    if ideal != MonsterState::Dead && (ideal != MonsterState::Script || ideal == state) {
        let pending = !agent.conditions.is_empty() && !agent.has_conditions(Conditions::SCHEDULE_DONE);
        let wants_recompute = agent
            .schedule
            .as_deref()
            .is_some_and(|s| s.interrupted_by(Conditions::SCHEDULE_DONE));
        let lost_enemy = state == MonsterState::Combat && agent.enemy.is_none();
        if pending || wants_recompute || lost_enemy {
            update_ideal_state(agent);
        }
    }

    let next = if agent.has_conditions(Conditions::TASK_FAILED) && agent.state == agent.ideal_state {
        let schedule = agent.schedule_name().unwrap_or_default().to_owned();
        let task = agent.task().copied();
        debug!(agent = %id, %schedule, task = ?task, "task failed");
        out.events.push(BrainEvent::TaskFailed { agent: id, schedule, task });
        fail_schedule(agent, cx)
    } else {
        let ideal = agent.ideal_state;
        set_state(agent, ideal, out);
        select_schedule(arena, id, cx, out)
    };
    install(arena, id, next, out);
}

fn install(arena: &mut AgentArena, id: AgentId, next: ScheduleRef, out: &mut ThinkOutput) {
    let Some(agent) = arena.get_mut(id) else {
        return;
    };
    let from = agent.schedule_name().map(str::to_owned);
    let to = next.name().to_owned();
    debug!(agent = %id, from = from.as_deref().unwrap_or("-"), to = %to, "schedule");
    agent.change_schedule(next);
    out.events.push(BrainEvent::ScheduleChanged { agent: id, from, to });
}
