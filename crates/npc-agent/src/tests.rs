//! Unit tests for npc-agent.

use std::sync::Arc;

use npc_core::{AgentId, Capabilities, Classification, Conditions, NpcError, SpeciesId, Vec3};
use npc_schedule::{Activity, Schedule, ScheduleType, Task, TaskKind};

use crate::{AgentArena, AgentBuilder, RememberedEnemies, TaskStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn grunt() -> AgentBuilder {
    AgentBuilder::new(SpeciesId(0), Classification::HumanMilitary)
}

fn two_task_schedule() -> Arc<Schedule> {
    Arc::new(
        Schedule::new(
            "Two",
            vec![Task::of(TaskKind::StopMoving), Task::wait(1.0)],
            Conditions::NEW_ENEMY,
            Default::default(),
        )
        .unwrap(),
    )
}

// ── Arena ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arena {
    use super::*;

    #[test]
    fn insert_assigns_ascending_handles() {
        let mut arena = AgentArena::new();
        let a = arena.spawn(grunt(), 1);
        let b = arena.spawn(grunt(), 1);
        assert_eq!(a, AgentId::new(0, 0));
        assert_eq!(b, AgentId::new(1, 0));
        assert_eq!(arena.get(b).unwrap().id, b);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut arena = AgentArena::new();
        let a = arena.spawn(grunt(), 1);
        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert!(arena.get(a).is_none());

        let reused = arena.spawn(grunt(), 1);
        assert_eq!(reused.index, a.index);
        assert_ne!(reused.generation, a.generation);
        assert!(matches!(arena.try_get(a), Err(NpcError::StaleHandle(_))));
        assert!(matches!(arena.try_get(AgentId::new(9, 0)), Err(NpcError::AgentNotFound(_))));
    }

    #[test]
    fn pair_mut_in_either_order() {
        let mut arena = AgentArena::new();
        let a = arena.spawn(grunt(), 1);
        let b = arena.spawn(grunt().origin(Vec3::new(5.0, 0.0, 0.0)), 1);
        {
            let (pb, pa) = arena.pair_mut(b, a).unwrap();
            assert_eq!(pb.id, b);
            assert_eq!(pa.id, a);
            pa.health = 1.0;
        }
        assert_eq!(arena.get(a).unwrap().health, 1.0);
        assert!(arena.pair_mut(a, a).is_none());
    }

    #[test]
    fn iteration_is_slot_ordered() {
        let mut arena = AgentArena::new();
        let ids: Vec<_> = (0..4).map(|_| arena.spawn(grunt(), 7)).collect();
        arena.remove(ids[1]);
        assert_eq!(arena.ids(), vec![ids[0], ids[2], ids[3]]);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn squad_component_follows_capability() {
        let mut arena = AgentArena::new();
        let lone = arena.spawn(grunt(), 0);
        let squaddie = arena.spawn(grunt().capabilities(Capabilities::SQUAD), 0);
        assert!(arena.get(lone).unwrap().squad.is_none());
        assert!(arena.get(squaddie).unwrap().squad.is_some());
    }

    #[test]
    fn fov_is_stored_as_cosine() {
        let mut arena = AgentArena::new();
        let id = arena.spawn(grunt().fov_degrees(180.0), 0);
        assert!(arena.get(id).unwrap().fov.abs() < 1e-5);
    }

    #[test]
    fn flyers_start_airborne() {
        let mut arena = AgentArena::new();
        let id = arena.spawn(grunt().capabilities(Capabilities::FLY), 0);
        let a = arena.get(id).unwrap();
        assert!(a.is_flying());
        assert!(!a.on_ground);
    }
}

// ── Schedule bookkeeping ──────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;

    #[test]
    fn change_schedule_clears_conditions_and_override() {
        let mut arena = AgentArena::new();
        let id = arena.spawn(grunt(), 0);
        let a = arena.get_mut(id).unwrap();
        a.conditions = Conditions::HEAR_SOUND | Conditions::TASK_FAILED;
        a.fail_schedule = Some(ScheduleType::Cower);
        a.change_schedule(two_task_schedule());
        assert!(a.conditions.is_empty());
        assert!(a.fail_schedule.is_none());
        assert_eq!(a.schedule_name(), Some("Two"));
        assert_eq!(a.task_status, TaskStatus::New);
    }

    #[test]
    fn completion_is_reported_exactly_once() {
        let mut arena = AgentArena::new();
        let id = arena.spawn(grunt(), 0);
        let a = arena.get_mut(id).unwrap();
        a.change_schedule(two_task_schedule());

        assert!(!a.next_scheduled_task());
        assert_eq!(a.task().unwrap().kind, TaskKind::Wait);
        assert!(a.next_scheduled_task());
        assert!(a.has_conditions(Conditions::SCHEDULE_DONE));
        assert!(a.task().is_none());
        assert!(!a.next_scheduled_task());
        assert_eq!(a.task_index, 2);
        assert!(!a.schedule_valid());
    }

    #[test]
    fn movement_activities_never_finish() {
        let mut arena = AgentArena::new();
        let id = arena.spawn(grunt(), 0);
        let a = arena.get_mut(id).unwrap();
        a.set_activity(Activity::SmallFlinch, 10.0, 0.5);
        assert!(!a.sequence_finished(10.2));
        assert!(a.sequence_finished(10.5));
        a.set_activity(Activity::Run, 10.0, 0.5);
        assert!(!a.sequence_finished(1_000.0));
    }
}

// ── Remembered enemies ────────────────────────────────────────────────────────

#[cfg(test)]
mod old_enemies {
    use super::*;

    fn id(n: u32) -> AgentId {
        AgentId::new(n, 0)
    }

    #[test]
    fn duplicates_are_ignored() {
        let mut ring = RememberedEnemies::default();
        ring.push(id(1), Vec3::ZERO);
        ring.push(id(1), Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn full_ring_overwrites_oldest() {
        let mut ring = RememberedEnemies::default();
        for n in 1..=5 {
            ring.push(id(n), Vec3::ZERO);
        }
        assert_eq!(ring.len(), 4);
        assert!(!ring.contains(id(1)));
        assert!(ring.contains(id(5)));
    }

    #[test]
    fn pop_returns_most_recent_usable() {
        let mut ring = RememberedEnemies::default();
        ring.push(id(1), Vec3::new(1.0, 0.0, 0.0));
        ring.push(id(2), Vec3::new(2.0, 0.0, 0.0));
        ring.push(id(3), Vec3::new(3.0, 0.0, 0.0));
        // 3 is dead: discarded, 2 returned.
        let got = ring.pop(|e| e != id(3));
        assert_eq!(got, Some((id(2), Vec3::new(2.0, 0.0, 0.0))));
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.pop(|_| true).map(|(e, _)| e), Some(id(1)));
        assert!(ring.pop(|_| true).is_none());
    }
}
