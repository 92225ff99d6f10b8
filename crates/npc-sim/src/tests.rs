//! Integration tests for npc-sim.

#[cfg(test)]
mod helpers {
    use npc_agent::AgentBuilder;
    use npc_behavior::{Attack, BrainEvent};
    use npc_core::{AgentId, Capabilities, Classification, EngineConfig, SpeciesId, Tick, Vec3};
    use npc_spatial::BoxWorld;

    use crate::{Sim, SimBuilder, SimObserver};

    pub fn v(x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    pub fn open_sim() -> Sim<BoxWorld> {
        let world = BoxWorld::new(v(-2048.0, -2048.0), v(2048.0, 2048.0));
        SimBuilder::new(EngineConfig::default(), world).build().unwrap()
    }

    pub fn soldier(x: f32, y: f32) -> AgentBuilder {
        AgentBuilder::new(SpeciesId(0), Classification::HumanMilitary)
            .origin(v(x, y))
            .capabilities(Capabilities::RANGE_ATTACK1 | Capabilities::HEAR)
    }

    pub fn alien(x: f32, y: f32) -> AgentBuilder {
        AgentBuilder::new(SpeciesId(0), Classification::AlienMilitary).origin(v(x, y)).yaw(180.0)
    }

    /// Records everything the sim reports.
    #[derive(Default)]
    pub struct Recorder {
        pub events:  Vec<BrainEvent>,
        pub attacks: Vec<(Attack, f32)>,
        pub deaths:  Vec<AgentId>,
        pub thought: Vec<usize>,
    }

    impl SimObserver for Recorder {
        fn on_tick_end(&mut self, _tick: Tick, thought: usize) {
            self.thought.push(thought);
        }

        fn on_event(&mut self, _tick: Tick, event: &BrainEvent) {
            self.events.push(event.clone());
        }

        fn on_attack(&mut self, _tick: Tick, attack: &Attack, dealt: f32) {
            self.attacks.push((*attack, dealt));
        }

        fn on_death(&mut self, _tick: Tick, agent: AgentId) {
            self.deaths.push(agent);
        }
    }
}

// ── ThinkQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use npc_core::{AgentId, Tick};

    use crate::ThinkQueue;

    #[test]
    fn drains_overdue_in_handle_order_without_duplicates() {
        let mut q = ThinkQueue::new();
        let a = AgentId::new(3, 0);
        let b = AgentId::new(1, 0);
        q.push(Tick(2), a);
        q.push(Tick(1), b);
        q.push(Tick(2), b);
        q.push(Tick(5), a);
        assert_eq!(q.len(), 4);

        assert_eq!(q.drain_due(Tick(2)), vec![b, a]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_tick(), Some(Tick(5)));
        assert!(q.drain_due(Tick(4)).is_empty());
        assert_eq!(q.drain_due(Tick(9)), vec![a]);
        assert!(q.is_empty());
    }
}

// ── Builder and entry points ──────────────────────────────────────────────────

#[cfg(test)]
mod entry {
    use npc_agent::{AgentBuilder, ScriptState};
    use npc_behavior::BehaviorError;
    use npc_core::{Classification, Conditions, EngineConfig, Memory, MonsterState, NpcError, SpeciesId};
    use npc_schedule::Activity;
    use npc_spatial::BoxWorld;

    use super::helpers::*;
    use crate::{NoopObserver, SimBuilder, SimError};

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig { tick_secs: 0.0, ..EngineConfig::default() };
        let world = BoxWorld::new(v(-64.0, -64.0), v(64.0, 64.0));
        let err = SimBuilder::new(config, world).build().err();
        assert!(matches!(err, Some(SimError::Core(NpcError::Config(_)))));
    }

    #[test]
    fn unknown_species_is_an_error() {
        let mut sim = open_sim();
        let err = sim.spawn(AgentBuilder::new(SpeciesId(7), Classification::HumanMilitary)).err();
        assert!(matches!(err, Some(SimError::Behavior(BehaviorError::UnknownSpecies(SpeciesId(7))))));
        assert!(sim.arena.is_empty());
    }

    #[test]
    fn spawned_agent_thinks_every_tick() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        let player = sim.spawn(soldier(500.0, 500.0).player(true)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(3, &mut rec).unwrap();
        assert_eq!(rec.thought, vec![1, 1, 1]);
        assert_eq!(sim.arena.get(id).unwrap().schedule_name(), Some("IdleStand"));
        assert!(sim.arena.get(player).unwrap().schedule.is_none());
    }

    #[test]
    fn damage_sets_light_and_heavy() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();

        assert!(!sim.apply_damage(id, 5.0, Some(v(100.0, 0.0)), None).unwrap());
        let a = sim.arena.get(id).unwrap();
        assert!(a.has_conditions(Conditions::LIGHT_DAMAGE));
        assert!(!a.has_conditions(Conditions::HEAVY_DAMAGE));
        assert!(!a.has_memory(Memory::PROVOKED));

        let other = sim.spawn(alien(100.0, 0.0)).unwrap();
        sim.apply_damage(id, 25.0, Some(v(100.0, 0.0)), Some(other)).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert!(a.has_all_conditions(Conditions::ANY_DAMAGE));
        assert!(a.has_memory(Memory::PROVOKED));
        assert_eq!(a.health, 20.0);
    }

    #[test]
    fn death_runs_die_schedule_then_stops_thinking() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        assert!(sim.apply_damage(id, 500.0, None, None).unwrap());
        assert_eq!(sim.arena.get(id).unwrap().state, MonsterState::Dead);
        assert_eq!(sim.stimuli.len(), 1, "death cry");

        let mut rec = Recorder::default();
        sim.run_ticks(30, &mut rec).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert!(a.has_memory(Memory::KILLED));
        assert_eq!(a.schedule_name(), Some("Die"));
        assert_eq!(rec.thought.last(), Some(&0));
        assert!(sim.queue.is_empty());

        // Dead agents take no further damage.
        assert!(!sim.apply_damage(id, 10.0, None, None).unwrap());
    }

    #[test]
    fn removed_handle_is_skipped() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        assert!(sim.remove(id).is_some());
        assert!(sim.remove(id).is_none());

        let mut rec = Recorder::default();
        sim.run_ticks(2, &mut rec).unwrap();
        assert_eq!(rec.thought, vec![0, 0]);
        assert!(matches!(sim.apply_damage(id, 1.0, None, None), Err(SimError::Core(_))));
    }

    #[test]
    fn script_plays_and_returns_to_idle() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        sim.begin_script(id, ScriptState::new(Activity::Eat, 0.5)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.arena.get(id).unwrap().schedule_name(), Some("AiScript"));

        sim.run_ticks(20, &mut NoopObserver).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert!(a.script.is_none());
        assert_eq!(a.state, MonsterState::Idle);
    }

    #[test]
    fn prone_until_released() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        sim.set_prone(id).unwrap();
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert_eq!(a.state, MonsterState::Prone);
        assert_eq!(a.schedule_name(), Some("VictimGrab"));

        sim.release_prone(id).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert_eq!(a.state, MonsterState::Idle);
        assert_eq!(a.schedule_name(), Some("IdleStand"));
    }

    #[test]
    fn dead_agents_cannot_be_scripted() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        sim.apply_damage(id, 100.0, None, None).unwrap();
        let err = sim.begin_script(id, ScriptState::new(Activity::Eat, 1.0)).err();
        assert!(matches!(err, Some(SimError::AgentDead(d)) if d == id));
    }
}

// ── Tick loop behaviour ───────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use npc_agent::SquadSlots;
    use npc_behavior::{AttackKind, BrainEvent};
    use npc_core::{Capabilities, Conditions, MonsterState, SoundTypes};
    use npc_squad::{members, squad_count};

    use super::helpers::*;
    use crate::NoopObserver;

    #[test]
    fn squad_recruits_on_first_think() {
        let mut sim = open_sim();
        let caps = Capabilities::SQUAD | Capabilities::RANGE_ATTACK1;
        let lead = sim.spawn(soldier(0.0, 0.0).capabilities(caps)).unwrap();
        let m1 = sim.spawn(soldier(64.0, 0.0).capabilities(caps)).unwrap();
        let m2 = sim.spawn(soldier(0.0, 64.0).capabilities(caps)).unwrap();
        let loner = sim.spawn(soldier(1800.0, 1800.0).capabilities(caps)).unwrap();

        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(members(&sim.arena, m2), vec![lead, m1, m2]);
        assert_eq!(squad_count(&sim.arena, loner), 0);
        assert!(sim.arena.get(loner).unwrap().squad.as_ref().unwrap().recruited);
    }

    #[test]
    fn killing_the_leader_dissolves_the_squad() {
        let mut sim = open_sim();
        let caps = Capabilities::SQUAD;
        let lead = sim.spawn(soldier(0.0, 0.0).capabilities(caps)).unwrap();
        let m1 = sim.spawn(soldier(64.0, 0.0).capabilities(caps)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(squad_count(&sim.arena, m1), 2);

        sim.apply_damage(lead, 100.0, None, None).unwrap();
        assert_eq!(squad_count(&sim.arena, m1), 0);
        let slot = sim.arena.get(m1).unwrap().squad.as_ref().unwrap().my_slot;
        assert_eq!(slot, SquadSlots::empty());
    }

    #[test]
    fn combat_sound_alerts_idle_agent() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        sim.emit_sound(v(0.0, 200.0), SoundTypes::COMBAT, 600.0, 1.0, None);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert_eq!(a.state, MonsterState::Alert);
        assert!((a.ideal_yaw - 90.0).abs() < 0.01);

        // Long gone once its lifetime passes.
        sim.run_ticks(15, &mut NoopObserver).unwrap();
        assert!(sim.stimuli.is_empty());
    }

    #[test]
    fn deaf_agent_ignores_combat_sound() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0).capabilities(Capabilities::RANGE_ATTACK1)).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();

        sim.emit_sound(v(0.0, 200.0), SoundTypes::COMBAT, 600.0, 1.0, None);
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let a = sim.arena.get(id).unwrap();
        assert_eq!(a.state, MonsterState::Idle);
        assert!(a.senses.audible.is_empty());
        assert!(!a.has_conditions(Conditions::HEAR_SOUND));
    }

    #[test]
    fn soldier_engages_and_damages_alien() {
        let mut sim = open_sim();
        let id = sim.spawn(soldier(0.0, 0.0)).unwrap();
        let foe = sim.spawn(alien(400.0, 0.0)).unwrap();

        let mut rec = Recorder::default();
        sim.run_ticks(15, &mut rec).unwrap();
        assert!(rec.events.contains(&BrainEvent::EnemyAcquired { agent: id, enemy: foe }));
        let (attack, dealt) = rec.attacks.first().copied().expect("an attack within 15 ticks");
        assert_eq!(attack.attacker, id);
        assert_eq!(attack.kind, AttackKind::Range1);
        assert!(dealt > 0.0);
        assert!(sim.arena.get(foe).unwrap().health < 50.0);
    }
}
