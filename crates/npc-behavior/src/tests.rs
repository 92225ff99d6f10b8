//! Unit tests for npc-behavior.
//!
//! Most tests drive real thinks through a small [`helpers::Harness`] over an
//! open `BoxWorld` with the default schedule catalog.

#[cfg(test)]
mod helpers {
    use npc_agent::{AgentArena, AgentBuilder, Stimulus};
    use npc_core::{AgentId, Capabilities, Classification, EngineConfig, MonsterState, SpeciesId, Vec3};
    use npc_schedule::ScheduleCatalog;
    use npc_sense::gather;
    use npc_spatial::{BoxWorld, Occupant};

    use crate::{think, BrainEvent, GenericSpecies, Species, ThinkContext, ThinkOutput};

    pub fn v(x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    pub fn soldier(x: f32, y: f32) -> AgentBuilder {
        AgentBuilder::new(SpeciesId(0), Classification::HumanMilitary)
            .origin(v(x, y))
            .capabilities(Capabilities::RANGE_ATTACK1)
    }

    pub fn alien(x: f32, y: f32) -> AgentBuilder {
        AgentBuilder::new(SpeciesId(0), Classification::AlienMilitary).origin(v(x, y)).yaw(180.0)
    }

    pub struct Harness {
        pub world:   BoxWorld,
        pub catalog: ScheduleCatalog,
        pub species: Box<dyn Species>,
        pub config:  EngineConfig,
        pub arena:   AgentArena,
        pub stimuli: Vec<Stimulus>,
        pub now:     f32,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_world(BoxWorld::new(v(-1024.0, -1024.0), v(1024.0, 1024.0)))
        }

        pub fn with_world(world: BoxWorld) -> Self {
            Self {
                world,
                catalog: ScheduleCatalog::with_defaults(),
                species: Box::new(GenericSpecies),
                config:  EngineConfig::default(),
                arena:   AgentArena::new(),
                stimuli: Vec::new(),
                now:     0.0,
            }
        }

        pub fn spawn(&mut self, b: AgentBuilder) -> AgentId {
            self.arena.spawn(b, 11)
        }

        /// Spawn already awake, skipping the first (sense-less) think.
        pub fn spawn_idle(&mut self, b: AgentBuilder) -> AgentId {
            let id = self.spawn(b);
            let a = self.arena.get_mut(id).unwrap();
            a.state = MonsterState::Idle;
            a.ideal_state = MonsterState::Idle;
            id
        }

        /// Run `f` with a context built the way a think would see it.
        pub fn with_cx<R>(&mut self, f: impl FnOnce(&mut AgentArena, &ThinkContext<'_>) -> R) -> R {
            let perceivables = gather(&self.arena);
            let occupants: Vec<Occupant> = self.arena.iter().map(|a| a.occupant()).collect();
            let cx = ThinkContext {
                world:        &self.world,
                catalog:      &self.catalog,
                species:      &*self.species,
                config:       &self.config,
                now:          self.now,
                dt:           self.config.tick_secs,
                perceivables: &perceivables,
                stimuli:      &self.stimuli,
                occupants:    &occupants,
            };
            f(&mut self.arena, &cx)
        }

        pub fn think(&mut self, id: AgentId) -> ThinkOutput {
            self.with_cx(|arena, cx| {
                let mut out = ThinkOutput::default();
                think(arena, id, cx, &mut out);
                out
            })
        }

        /// Think and advance the clock `ticks` times, collecting output.
        pub fn run(&mut self, id: AgentId, ticks: usize) -> ThinkOutput {
            let mut all = ThinkOutput::default();
            for _ in 0..ticks {
                let out = self.think(id);
                all.events.extend(out.events);
                all.sounds.extend(out.sounds);
                all.barriers.extend(out.barriers);
                all.attacks.extend(out.attacks);
                self.now += self.config.tick_secs;
            }
            all
        }

        pub fn schedule_name(&self, id: AgentId) -> String {
            self.arena.get(id).and_then(|a| a.schedule_name()).unwrap_or("-").to_owned()
        }
    }

    pub fn changed_to(events: &[BrainEvent], name: &str) -> bool {
        events.iter().any(|e| matches!(e, BrainEvent::ScheduleChanged { to, .. } if to == name))
    }
}

// ── Interrupts and ideal state ────────────────────────────────────────────────

#[cfg(test)]
mod conditions {
    use npc_agent::ScriptState;
    use npc_core::{Conditions as C, MonsterState, SoundTypes as S};
    use npc_schedule::{Activity, Schedule, Task};

    use super::helpers::*;
    use crate::{must_interrupt, update_ideal_state};

    fn listening(sounds: S) -> Schedule {
        Schedule::new("Listen", vec![Task::wait(1.0)], C::HEAR_SOUND, sounds).unwrap()
    }

    #[test]
    fn heard_sound_only_interrupts_matching_mask() {
        let s = listening(S::DANGER);
        assert!(!must_interrupt(C::HEAR_SOUND, S::COMBAT, &s));
        assert!(must_interrupt(C::HEAR_SOUND, S::DANGER | S::WORLD, &s));
        assert!(!must_interrupt(C::HEAR_SOUND, S::empty(), &s));
    }

    #[test]
    fn failure_and_completion_always_interrupt() {
        let s = Schedule::new("Deaf", vec![Task::wait(1.0)], C::empty(), S::empty()).unwrap();
        assert!(!must_interrupt(C::SEE_ENEMY | C::ANY_DAMAGE, S::ALL_SOUNDS, &s));
        assert!(must_interrupt(C::TASK_FAILED, S::empty(), &s));
        assert!(must_interrupt(C::SCHEDULE_DONE, S::empty(), &s));
    }

    #[test]
    fn idle_reacts_to_enemy_and_damage() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();

        a.set_conditions(C::NEW_ENEMY);
        assert_eq!(update_ideal_state(a), MonsterState::Combat);

        a.ideal_state = MonsterState::Idle;
        a.conditions = C::LIGHT_DAMAGE;
        a.last_damage_origin = Some(v(0.0, 100.0));
        assert_eq!(update_ideal_state(a), MonsterState::Alert);
        assert!((a.ideal_yaw - 90.0).abs() < 0.01);
    }

    #[test]
    fn ideal_state_never_reset_without_trigger() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();
        a.ideal_state = MonsterState::Alert;
        assert_eq!(update_ideal_state(a), MonsterState::Alert);
    }

    #[test]
    fn combat_without_enemy_goes_alert() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();
        a.state = MonsterState::Combat;
        a.ideal_state = MonsterState::Combat;
        assert_eq!(update_ideal_state(a), MonsterState::Alert);
    }

    #[test]
    fn interruptible_script_ends_on_damage() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();
        a.state = MonsterState::Script;
        a.ideal_state = MonsterState::Script;
        a.script = Some(ScriptState { interruptible: false, ..ScriptState::new(Activity::Eat, 3.0) });
        a.set_conditions(C::HEAVY_DAMAGE);
        assert_eq!(update_ideal_state(a), MonsterState::Script);

        a.script = Some(ScriptState::new(Activity::Eat, 3.0));
        assert_eq!(update_ideal_state(a), MonsterState::Alert);
        assert!(a.script.is_none());
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selector {
    use npc_agent::SquadSlots;
    use npc_core::{Capabilities, Conditions as C, MonsterState};
    use npc_schedule::ScheduleType as T;
    use npc_spatial::BoxWorld;
    use npc_squad::{occupy_slot, recruit};

    use super::helpers::*;
    use crate::{select_type, BrainEvent, ThinkOutput};

    fn in_combat(h: &mut Harness, conds: C) -> npc_core::AgentId {
        let id = h.spawn(soldier(0.0, 0.0));
        let foe = h.spawn(alien(300.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();
        a.state = MonsterState::Combat;
        a.ideal_state = MonsterState::Combat;
        a.enemy = Some(foe);
        a.conditions = conds;
        id
    }

    fn pick(h: &mut Harness, id: npc_core::AgentId) -> T {
        select_type(&mut h.arena, id, &mut ThinkOutput::default())
    }

    #[test]
    fn combat_priority_order() {
        let mut h = Harness::new();
        let all = C::NEW_ENEMY | C::CAN_MELEE_ATTACK1 | C::HEAVY_DAMAGE | C::CAN_RANGE_ATTACK1;
        let id = in_combat(&mut h, all);
        assert_eq!(pick(&mut h, id), T::WakeAngry);

        h.arena.get_mut(id).unwrap().clear_conditions(C::NEW_ENEMY);
        assert_eq!(pick(&mut h, id), T::MeleeAttack1);

        h.arena.get_mut(id).unwrap().clear_conditions(C::CAN_MELEE_ATTACK1);
        assert_eq!(pick(&mut h, id), T::SmallFlinch);

        h.arena.get_mut(id).unwrap().clear_conditions(C::HEAVY_DAMAGE);
        assert_eq!(pick(&mut h, id), T::RangeAttack1);

        h.arena.get_mut(id).unwrap().clear_conditions(C::CAN_RANGE_ATTACK1);
        assert_eq!(pick(&mut h, id), T::ChaseEnemy);
    }

    #[test]
    fn dead_enemy_without_memory_stands_down() {
        let mut h = Harness::new();
        let id = in_combat(&mut h, C::ENEMY_DEAD);
        let mut out = ThinkOutput::default();

        assert_eq!(select_type(&mut h.arena, id, &mut out), T::VictoryDance);
        let a = h.arena.get(id).unwrap();
        assert_eq!(a.state, MonsterState::Alert);
        assert!(a.enemy.is_none());
        assert!(out.events.iter().any(|e| matches!(
            e,
            BrainEvent::StateChanged { from: MonsterState::Combat, to: MonsterState::Alert, .. }
        )));
    }

    #[test]
    fn dead_enemy_resumes_remembered_one() {
        let mut h = Harness::new();
        let id = in_combat(&mut h, C::ENEMY_DEAD);
        let other = h.spawn(alien(-300.0, 0.0));
        h.arena.get_mut(id).unwrap().old_enemies.push(other, v(-300.0, 0.0));

        assert_eq!(pick(&mut h, id), T::WakeAngry);
        let a = h.arena.get(id).unwrap();
        assert_eq!(a.enemy, Some(other));
        assert_eq!(a.state, MonsterState::Combat);
        assert!(!a.has_conditions(C::ENEMY_DEAD));
    }

    #[test]
    fn range_attack_needs_engage_slot() {
        let mut h = Harness::with_world(BoxWorld::new(v(-2048.0, -2048.0), v(2048.0, 2048.0)));
        let squad = Capabilities::SQUAD | Capabilities::RANGE_ATTACK1;
        let lead = h.spawn(soldier(0.0, 0.0).capabilities(squad));
        let m1 = h.spawn(soldier(0.0, 64.0).capabilities(squad));
        let m2 = h.spawn(soldier(0.0, 128.0).capabilities(squad));
        assert_eq!(recruit(&mut h.arena, &h.world, lead, 1024.0, 5), 3);

        assert!(occupy_slot(&mut h.arena, m1, SquadSlots::ENGAGE));
        assert!(occupy_slot(&mut h.arena, m2, SquadSlots::ENGAGE));

        let a = h.arena.get_mut(lead).unwrap();
        a.state = MonsterState::Combat;
        a.conditions = C::CAN_RANGE_ATTACK1;
        assert_eq!(pick(&mut h, lead), T::ChaseEnemy);
        let slot = h.arena.get(lead).unwrap().squad.as_ref().unwrap().my_slot;
        assert!(SquadSlots::CHASE.contains(slot) && !slot.is_empty());
    }

    #[test]
    fn idle_prefers_sound_then_patrol() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0).patrol(vec![v(100.0, 0.0), v(100.0, 100.0)]));
        assert_eq!(pick(&mut h, id), T::Patrol);

        h.arena.get_mut(id).unwrap().set_conditions(C::HEAR_SOUND);
        assert_eq!(pick(&mut h, id), T::AlertFace);

        let plain = h.spawn_idle(soldier(50.0, 50.0));
        assert_eq!(pick(&mut h, plain), T::IdleStand);
    }

    #[test]
    fn alert_damage_takes_cover_only_when_facing() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();
        a.state = MonsterState::Alert;
        a.set_conditions(C::LIGHT_DAMAGE);
        a.ideal_yaw = a.yaw;
        assert_eq!(pick(&mut h, id), T::TakeCoverFromOrigin);

        h.arena.get_mut(id).unwrap().ideal_yaw = 180.0;
        assert_eq!(pick(&mut h, id), T::AlertSmallFlinch);

        let a = h.arena.get_mut(id).unwrap();
        a.conditions = C::empty();
        assert_eq!(pick(&mut h, id), T::AlertStand);
    }
}

// ── Executor ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod executor {
    use std::sync::Arc;

    use npc_agent::{Agent, TaskStatus};
    use npc_core::{Conditions as C, MonsterState, SoundTypes as S};
    use npc_schedule::{Schedule, ScheduleType as T, Task, TaskKind as K};
    use npc_spatial::WaypointFlags;

    use super::helpers::*;
    use crate::{fail_schedule, BrainEvent, Species, TaskEnv};

    #[test]
    fn schedule_completes_exactly_once() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));

        let mut completions = 0;
        for _ in 0..70 {
            let out = h.think(id);
            completions += out
                .events
                .iter()
                .filter(|e| matches!(e, BrainEvent::ScheduleCompleted { schedule, .. } if schedule == "IdleStand"))
                .count();
            let a = h.arena.get(id).unwrap();
            assert!(a.task_index < a.schedule.as_ref().unwrap().len());
            h.now += h.config.tick_secs;
        }
        assert_eq!(completions, 1);
        assert_eq!(h.schedule_name(id), "IdleStand");
    }

    #[test]
    fn first_think_wakes_into_idle() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));
        let out = h.think(id);

        assert_eq!(h.arena.get(id).unwrap().state, MonsterState::Idle);
        assert!(changed_to(&out.events, "IdleStand"));
        assert!(out.events.iter().any(|e| matches!(
            e,
            BrainEvent::StateChanged { from: MonsterState::None, to: MonsterState::Idle, .. }
        )));
    }

    #[test]
    fn fail_chain_override_then_registered_then_generic() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let chase = h.catalog.generic(T::ChaseEnemy).unwrap();
        let idle = h.catalog.generic(T::IdleStand).unwrap();

        h.with_cx(|arena, cx| {
            let a = arena.get_mut(id).unwrap();
            a.change_schedule(chase);
            a.fail_schedule = Some(T::Cower);
            assert_eq!(fail_schedule(a, cx).name(), "Cower");

            a.fail_schedule = None;
            assert_eq!(fail_schedule(a, cx).name(), "ChaseEnemyFailed");

            a.change_schedule(idle);
            assert_eq!(fail_schedule(a, cx).name(), "Fail");
        });
    }

    #[test]
    fn failed_task_switches_to_fail_schedule() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let wander = Schedule::new("Wander", vec![Task::of(K::GetPathToSpot)], C::empty(), S::empty()).unwrap();
        h.arena.get_mut(id).unwrap().change_schedule(Arc::new(wander));

        let out = h.think(id);
        assert!(out.events.iter().any(|e| matches!(
            e,
            BrainEvent::TaskFailed { schedule, task: Some(t), .. } if schedule == "Wander" && t.kind == K::GetPathToSpot
        )));
        assert_eq!(h.schedule_name(id), "Fail");
        assert!(!h.arena.get(id).unwrap().has_conditions(C::TASK_FAILED));
    }

    #[test]
    fn set_schedule_task_replaces_schedule() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let hop = Schedule::new("Hop", vec![Task::set_schedule(T::Cower)], C::empty(), S::empty()).unwrap();
        h.arena.get_mut(id).unwrap().change_schedule(Arc::new(hop));

        let out = h.think(id);
        assert!(changed_to(&out.events, "Cower"));
        assert_eq!(h.schedule_name(id), "Cower");
    }

    #[test]
    fn ideal_state_change_reselects() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));
        h.think(id);
        h.arena.get_mut(id).unwrap().ideal_state = MonsterState::Alert;

        h.think(id);
        assert_eq!(h.arena.get(id).unwrap().state, MonsterState::Alert);
        assert_eq!(h.schedule_name(id), "AlertStand");
    }

    #[test]
    fn instant_tasks_are_bounded_per_tick() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let spin = Schedule::new(
            "Spin",
            vec![Task::of(K::StoreLastPosition), Task::set_schedule(T::Custom1)],
            C::empty(),
            S::empty(),
        )
        .unwrap();
        let spin = Arc::new(spin);
        h.catalog.insert_generic(T::Custom1, Arc::clone(&spin));
        h.arena.get_mut(id).unwrap().change_schedule(spin);

        // Spin re-installs itself forever; the think must still return.
        let out = h.think(id);
        assert!(out.events.iter().filter(|e| matches!(e, BrainEvent::ScheduleChanged { .. })).count() <= 10);
    }

    #[test]
    fn movement_task_runs_once_more_after_arrival() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let walk = Schedule::new(
            "Walk",
            vec![Task::of(K::WalkPath), Task::of(K::WaitForMovement), Task::wait(5.0)],
            C::empty(),
            S::empty(),
        )
        .unwrap();
        h.arena.get_mut(id).unwrap().change_schedule(Arc::new(walk));
        h.with_cx(|arena, cx| {
            let a = arena.get_mut(id).unwrap();
            cx.router().build_route(a, v(120.0, 0.0), WaypointFlags::TO_LOCATION, None).unwrap();
        });

        let mut trace = Vec::new();
        for _ in 0..40 {
            h.think(id);
            h.now += h.config.tick_secs;
            assert_eq!(h.schedule_name(id), "Walk");
            let a = h.arena.get(id).unwrap();
            trace.push((a.task_index, a.task_status));
        }

        let last_step = trace
            .iter()
            .rposition(|&t| t == (1, TaskStatus::RunningMovement))
            .expect("WaitForMovement never moved");
        assert_eq!(trace[last_step + 1], (1, TaskStatus::RunningTask));
        assert_eq!(trace[last_step + 2].0, 2);
        assert!(h.arena.get(id).unwrap().origin.distance(v(120.0, 0.0)) < 32.0);
    }

    struct Redirecting;

    impl Species for Redirecting {
        fn name(&self) -> &str {
            "redirecting"
        }

        fn task_failed(&self, agent: &mut Agent, task: &Task, _env: &mut TaskEnv<'_, '_>) {
            if task.kind == K::GetPathToSpot {
                agent.fail_schedule = Some(T::Cower);
            }
        }
    }

    #[test]
    fn species_hears_failure_before_fail_schedule() {
        let mut h = Harness::new();
        h.species = Box::new(Redirecting);
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let wander = Schedule::new("Wander", vec![Task::of(K::GetPathToSpot)], C::empty(), S::empty()).unwrap();
        h.arena.get_mut(id).unwrap().change_schedule(Arc::new(wander));

        let out = h.think(id);
        assert!(out.events.iter().any(|e| matches!(e, BrainEvent::TaskFailed { schedule, .. } if schedule == "Wander")));
        assert_eq!(h.schedule_name(id), "Cower");
    }
}

// ── Scripts ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scripts {
    use npc_agent::ScriptState;
    use npc_core::{Conditions as C, MonsterState};
    use npc_schedule::Activity;

    use super::helpers::*;
    use crate::BrainEvent;

    fn scripted(h: &mut Harness) -> npc_core::AgentId {
        let id = h.spawn(soldier(0.0, 0.0));
        let a = h.arena.get_mut(id).unwrap();
        a.script = Some(ScriptState::new(Activity::Eat, 1.0));
        a.state = MonsterState::Script;
        a.ideal_state = MonsterState::Script;
        id
    }

    #[test]
    fn script_plays_then_returns_to_idle() {
        let mut h = Harness::new();
        let id = scripted(&mut h);

        let out = h.run(id, 20);
        assert!(out.events.iter().any(|e| matches!(
            e,
            BrainEvent::ScheduleCompleted { schedule, .. } if schedule == "AiScript"
        )));
        let a = h.arena.get(id).unwrap();
        assert!(a.script.is_none());
        assert_eq!(a.state, MonsterState::Idle);
    }

    #[test]
    fn damage_cuts_script_short() {
        let mut h = Harness::new();
        let id = scripted(&mut h);
        h.run(id, 2);
        assert_eq!(h.schedule_name(id), "AiScript");

        h.arena.get_mut(id).unwrap().set_conditions(C::LIGHT_DAMAGE);
        h.think(id);
        let a = h.arena.get(id).unwrap();
        assert!(a.script.is_none());
        assert_eq!(a.state, MonsterState::Alert);
        assert_ne!(h.schedule_name(id), "AiScript");
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod enemy {
    use npc_core::{Capabilities, Conditions as C, MonsterState};
    use npc_schedule::ScheduleType as T;
    use npc_spatial::BoxWorld;
    use npc_squad::recruit;

    use super::helpers::*;
    use crate::{check_enemy, get_enemy, AttackKind, BrainEvent, ThinkOutput};

    /// Arm `id` against `foe` as if the look pass had just seen it.
    fn seeing(h: &mut Harness, id: npc_core::AgentId, foe: npc_core::AgentId) {
        let a = h.arena.get_mut(id).unwrap();
        a.enemy = Some(foe);
        a.set_conditions(C::SEE_ENEMY);
    }

    #[test]
    fn attack_conditions_follow_capabilities() {
        let mut h = Harness::new();
        let melee_only = h.spawn_idle(soldier(0.0, 0.0).capabilities(Capabilities::MELEE_ATTACK1));
        let ranged = h.spawn_idle(soldier(0.0, 200.0));
        let foe = h.spawn(alien(300.0, 0.0));
        let far_foe = h.spawn(alien(300.0, 200.0));
        seeing(&mut h, melee_only, foe);
        seeing(&mut h, ranged, far_foe);

        h.with_cx(|arena, cx| {
            check_enemy(arena, melee_only, cx);
            check_enemy(arena, ranged, cx);
        });

        let m = h.arena.get(melee_only).unwrap();
        assert!(!m.has_conditions(C::CAN_RANGE_ATTACK1 | C::CAN_RANGE_ATTACK2));
        assert!(!m.has_conditions(C::CAN_MELEE_ATTACK1), "out of melee reach");
        assert!(h.arena.get(ranged).unwrap().has_conditions(C::CAN_RANGE_ATTACK1));
    }

    #[test]
    fn dead_enemy_is_flagged() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let foe = h.spawn(alien(300.0, 0.0));
        seeing(&mut h, id, foe);
        h.arena.get_mut(foe).unwrap().health = 0.0;

        h.with_cx(|arena, cx| check_enemy(arena, id, cx));
        let a = h.arena.get(id).unwrap();
        assert!(a.has_conditions(C::ENEMY_DEAD));
        assert!(!a.has_conditions(C::SEE_ENEMY | C::CAN_ATTACK));
    }

    #[test]
    fn hated_beats_closer_disliked() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let disliked = h.spawn(npc_agent::AgentBuilder::new(
            npc_core::SpeciesId(0),
            npc_core::Classification::AlienPrey,
        ).origin(v(100.0, 0.0)));
        let hated = h.spawn(alien(500.0, 0.0));

        h.with_cx(|arena, cx| {
            let a = arena.get_mut(id).unwrap();
            a.senses.visible = vec![disliked, hated];
            a.set_conditions(C::SEE_HATE | C::SEE_DISLIKE);
            let mut out = ThinkOutput::default();
            assert!(get_enemy(arena, id, cx, &mut out));
            assert!(out.events.contains(&BrainEvent::EnemyAcquired { agent: id, enemy: hated }));
        });
        let a = h.arena.get(id).unwrap();
        assert_eq!(a.enemy, Some(hated));
        assert!(a.has_conditions(C::NEW_ENEMY));
    }

    #[test]
    fn busy_schedule_keeps_current_enemy() {
        let mut h = Harness::new();
        let id = h.spawn_idle(soldier(0.0, 0.0));
        let first = h.spawn(alien(600.0, 0.0));
        let second = h.spawn(alien(200.0, 0.0));
        let dance = h.catalog.generic(T::VictoryDance).unwrap();

        h.with_cx(|arena, cx| {
            let a = arena.get_mut(id).unwrap();
            a.change_schedule(dance);
            a.enemy = Some(first);
            a.senses.visible = vec![second];
            a.set_conditions(C::SEE_HATE);
            get_enemy(arena, id, cx, &mut ThinkOutput::default());
        });
        assert_eq!(h.arena.get(id).unwrap().enemy, Some(first));
    }

    #[test]
    fn squad_mate_in_the_way_blocks_ranged_attack() {
        let mut h = Harness::with_world(BoxWorld::new(v(-2048.0, -2048.0), v(2048.0, 2048.0)));
        let caps = Capabilities::SQUAD | Capabilities::RANGE_ATTACK1;
        let lead = h.spawn_idle(soldier(0.0, 0.0).capabilities(caps));
        let mate = h.spawn_idle(soldier(150.0, 0.0).capabilities(caps));
        let foe = h.spawn(alien(400.0, 0.0));
        assert_eq!(recruit(&mut h.arena, &h.world, lead, 1024.0, 5), 2);
        seeing(&mut h, lead, foe);

        h.with_cx(|arena, cx| check_enemy(arena, lead, cx));
        assert!(!h.arena.get(lead).unwrap().has_conditions(C::CAN_RANGE_ATTACK1));

        h.arena.get_mut(mate).unwrap().origin = v(0.0, 300.0);
        h.with_cx(|arena, cx| check_enemy(arena, lead, cx));
        assert!(h.arena.get(lead).unwrap().has_conditions(C::CAN_RANGE_ATTACK1));
    }

    #[test]
    fn soldier_spots_and_shoots_enemy() {
        let mut h = Harness::new();
        let id = h.spawn(soldier(0.0, 0.0));
        let foe = h.spawn(alien(400.0, 0.0));

        let out = h.run(id, 10);
        assert!(out.events.contains(&BrainEvent::EnemyAcquired { agent: id, enemy: foe }));
        assert!(out.events.iter().any(|e| matches!(e, BrainEvent::Vocalize { .. })));
        assert!(out.attacks.iter().any(|a| a.target == foe && a.kind == AttackKind::Range1));
        assert!(out.sounds.iter().all(|s| s.source == Some(id)));
        assert_eq!(h.arena.get(id).unwrap().state, MonsterState::Combat);
    }
}

// ── Cover ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cover {
    use npc_core::Vec3;
    use npc_spatial::{BoxWorld, NodeGraphBuilder};

    use super::helpers::*;
    use crate::{find_cover, TaskEnv, ThinkOutput};

    /// Threat far to the -x side, a wall at x = 100..120 hiding only the
    /// node directly behind it.
    fn covered_world() -> BoxWorld {
        let mut g = NodeGraphBuilder::new();
        let exposed = g.add_node(v(50.0, 0.0));
        let side = g.add_node(v(110.0, 200.0));
        let hidden = g.add_node(v(200.0, 0.0));
        g.add_link(exposed, side);
        g.add_link(side, hidden);

        let mut w = BoxWorld::new(v(-1024.0, -1024.0), v(1024.0, 1024.0)).with_graph(g.build());
        w.add_box(Vec3::new(100.0, -100.0, 0.0), Vec3::new(120.0, 100.0, 128.0));
        w
    }

    fn threat() -> Vec3 {
        Vec3::new(-400.0, 0.0, 64.0)
    }

    #[test]
    fn picks_the_hidden_node() {
        let mut h = Harness::with_world(covered_world());
        let id = h.spawn_idle(soldier(0.0, 0.0));

        let found = h.with_cx(|arena, cx| {
            let mut out = ThinkOutput::default();
            let mut env = TaskEnv::new(cx, &mut out, &[]);
            let a = arena.get_mut(id).unwrap();
            find_cover(a, threat(), 0.0, 784.0, &mut env)
        });
        assert_eq!(found, Some(v(200.0, 0.0)));
        let a = h.arena.get(id).unwrap();
        assert_eq!(a.move_spot, Some(v(200.0, 0.0)));
        assert!(!a.route.is_clear());
    }

    #[test]
    fn mate_nearby_or_range_rules_out_cover() {
        let mut h = Harness::with_world(covered_world());
        let id = h.spawn_idle(soldier(0.0, 0.0));

        let (crowded, too_close) = h.with_cx(|arena, cx| {
            let mut out = ThinkOutput::default();
            let mates = [v(220.0, 30.0)];
            let mut env = TaskEnv::new(cx, &mut out, &mates);
            let a = arena.get_mut(id).unwrap();
            let crowded = find_cover(a, threat(), 0.0, 784.0, &mut env);
            let mut env = TaskEnv::new(cx, &mut out, &[]);
            let too_close = find_cover(a, threat(), 0.0, 150.0, &mut env);
            (crowded, too_close)
        });
        assert_eq!(crowded, None);
        assert_eq!(too_close, None);
    }
}
