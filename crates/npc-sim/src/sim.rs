//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use npc_agent::{Agent, AgentArena, AgentBuilder, ScriptState, Stimulus};
use npc_behavior::{think, Attack, SpeciesRegistry, ThinkContext, ThinkOutput};
use npc_core::{
    AgentId, Conditions, EngineConfig, Memory, MonsterState, NpcError, SimClock, SoundTypes, Tick, Vec3,
};
use npc_schedule::ScheduleCatalog;
use npc_sense::{expire_stimuli, gather};
use npc_spatial::{Occupant, WorldQuery};
use npc_squad::{recruit, squad_remove};
use tracing::{debug, info, trace};

use crate::queue::ThinkQueue;
use crate::{SimError, SimObserver, SimResult};

/// Damage at or above this in one hit also sets `HEAVY_DAMAGE`.
pub const HEAVY_DAMAGE_THRESHOLD: f32 = 20.0;
/// Audible radius of a death cry.
pub const DEATH_VOLUME: f32 = 384.0;
pub const DEATH_SOUND_SECS: f32 = 1.0;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Each [`step`][Sim::step] runs one tick:
///
/// 1. **Expire**: stimuli past their lifetime are dropped.
/// 2. **Think**: agents due this tick think one at a time in ascending
///    handle order.  Each think sees the arena as left by the previous one.
/// 3. **Apply**: the collected world requests are applied in think order.
///    Doors are opened, sounds are added to the stimulus list and attacks
///    become damage.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<W: WorldQuery> {
    pub config:  EngineConfig,
    pub clock:   SimClock,
    pub arena:   AgentArena,
    pub world:   W,
    /// Shared read-only; species and agents never mutate it.
    pub catalog: Arc<ScheduleCatalog>,
    pub species: SpeciesRegistry,
    /// Live sounds and scents.
    pub stimuli: Vec<Stimulus>,
    pub queue:   ThinkQueue,
}

impl<W: WorldQuery> Sim<W> {
    // ── Clock ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// Simulated seconds at the current tick.
    #[inline]
    pub fn now(&self) -> f32 {
        self.clock.now_secs()
    }

    // ── Entry points ──────────────────────────────────────────────────────

    /// Create an agent through its species hooks and queue its first think
    /// for the current tick.  Players are never queued.
    pub fn spawn(&mut self, builder: AgentBuilder) -> SimResult<AgentId> {
        let species = self.species.get(builder.species_id())?;
        let builder = species.on_create(builder);
        let id = self.arena.spawn(builder, self.config.seed);

        let agent = self.arena.try_get_mut(id)?;
        species.spawn(agent);
        if !agent.is_player {
            self.queue.push(self.clock.current_tick, id);
        }
        debug!(agent = %id, species = species.name(), "spawn");
        Ok(id)
    }

    /// Take `id` out of its squad and free its slot.  Queued thinks for the
    /// stale handle are skipped.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        squad_remove(&mut self.arena, id);
        let agent = self.arena.remove(id);
        if agent.is_some() {
            debug!(agent = %id, "remove");
        }
        agent
    }

    /// Hurt `target`.  Returns `true` when the hit killed it.
    ///
    /// Any damage sets `LIGHT_DAMAGE`, a heavy hit also `HEAVY_DAMAGE`.  An
    /// attacker leaves the target provoked.  Death forces the `Dead` state,
    /// drops the running schedule, leaves the squad and cries out.
    pub fn apply_damage(
        &mut self,
        target:   AgentId,
        amount:   f32,
        from:     Option<Vec3>,
        attacker: Option<AgentId>,
    ) -> SimResult<bool> {
        debug_assert!(amount >= 0.0, "negative damage {amount} to {target}");
        let now = self.now();
        let agent = self.arena.try_get_mut(target)?;
        if !agent.is_alive() {
            return Ok(false);
        }

        agent.health -= amount;
        agent.set_conditions(Conditions::LIGHT_DAMAGE);
        if amount >= HEAVY_DAMAGE_THRESHOLD {
            agent.set_conditions(Conditions::HEAVY_DAMAGE);
        }
        agent.last_damage_origin = from;
        agent.last_damage_at = now;
        if attacker.is_some() {
            agent.remember(Memory::PROVOKED);
        }
        trace!(agent = %target, amount, health = agent.health, "damage");
        if agent.health > 0.0 {
            return Ok(false);
        }

        agent.health = 0.0;
        agent.state = MonsterState::Dead;
        agent.ideal_state = MonsterState::Dead;
        agent.script = None;
        agent.enemy = None;
        agent.route.clear();
        agent.clear_schedule();
        let origin = agent.origin;
        info!(agent = %target, killer = ?attacker, "killed");

        squad_remove(&mut self.arena, target);
        self.stimuli.push(Stimulus {
            origin,
            kind: SoundTypes::COMBAT,
            volume: DEATH_VOLUME,
            expires_at: now + DEATH_SOUND_SECS,
            source: Some(target),
        });
        Ok(true)
    }

    /// Add a sound or scent lasting `secs`.
    pub fn emit_sound(&mut self, origin: Vec3, kind: SoundTypes, volume: f32, secs: f32, source: Option<AgentId>) {
        debug_assert!(kind.bits().count_ones() == 1, "stimulus must carry one class, got {kind:?}");
        let expires_at = self.now() + secs;
        trace!(?kind, volume, "sound");
        self.stimuli.push(Stimulus { origin, kind, volume, expires_at, source });
    }

    /// Hand `id` a scripted sequence.  The running schedule is dropped and
    /// the agent enters `Script` at once.
    pub fn begin_script(&mut self, id: AgentId, script: ScriptState) -> SimResult<()> {
        let agent = self.arena.try_get_mut(id)?;
        if !agent.is_alive() {
            return Err(SimError::AgentDead(id));
        }
        debug!(agent = %id, activity = ?script.activity, "script");
        agent.script = Some(script);
        agent.state = MonsterState::Script;
        agent.ideal_state = MonsterState::Script;
        agent.clear_schedule();
        Ok(())
    }

    /// Something has grabbed `id`; it stops acting until released.
    pub fn set_prone(&mut self, id: AgentId) -> SimResult<()> {
        let agent = self.arena.try_get_mut(id)?;
        if !agent.is_alive() {
            return Err(SimError::AgentDead(id));
        }
        agent.state = MonsterState::Prone;
        agent.ideal_state = MonsterState::Prone;
        agent.route.clear();
        agent.clear_schedule();
        Ok(())
    }

    /// Let go of a prone agent; it resumes from `Idle`.
    pub fn release_prone(&mut self, id: AgentId) -> SimResult<()> {
        let agent = self.arena.try_get_mut(id)?;
        if agent.state != MonsterState::Prone {
            return Ok(());
        }
        agent.state = MonsterState::Idle;
        agent.ideal_state = MonsterState::Idle;
        agent.clear_schedule();
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run `n` ticks.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Run one tick and advance the clock.  Returns how many agents thought.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<usize> {
        let tick = self.clock.current_tick;
        let now = self.now();
        observer.on_tick_start(tick);

        let expired = expire_stimuli(&mut self.stimuli, now);
        if expired > 0 {
            trace!(%tick, expired, "stimuli expired");
        }

        // ── Think ─────────────────────────────────────────────────────────
        let due = self.queue.drain_due(tick);
        let mut outputs: Vec<(AgentId, ThinkOutput)> = Vec::with_capacity(due.len());
        for id in due {
            if !self.arena.contains(id) {
                continue;
            }
            let mut out = ThinkOutput::default();
            self.think_one(id, &mut out)?;
            if self.arena.get(id).is_some_and(still_thinking) {
                self.queue.push(tick + 1, id);
            }
            outputs.push((id, out));
        }
        let thought = outputs.len();

        // ── Apply ─────────────────────────────────────────────────────────
        for (_, out) in outputs {
            for event in &out.events {
                observer.on_event(tick, event);
            }
            for solid in out.barriers {
                debug!(?solid, "open barrier");
                self.world.open_barrier(solid);
            }
            self.stimuli.extend(out.sounds);
            for attack in &out.attacks {
                self.resolve_attack(attack, tick, observer)?;
            }
        }

        observer.on_tick_end(tick, thought);
        observer.on_snapshot(tick, &self.arena);
        self.clock.advance();
        Ok(thought)
    }

    fn think_one(&mut self, id: AgentId, out: &mut ThinkOutput) -> SimResult<()> {
        let Some(agent) = self.arena.get(id) else {
            return Ok(());
        };
        let species = self.species.get(agent.species)?;

        let wants_squad = agent.is_alive() && agent.squad.as_ref().is_some_and(|s| !s.recruited && !s.in_squad());
        if wants_squad {
            recruit(&mut self.arena, &self.world, id, self.config.recruit_radius, self.config.max_squad_size);
        }

        let perceivables = gather(&self.arena);
        let occupants: Vec<Occupant> = self.arena.iter().map(Agent::occupant).collect();
        let cx = ThinkContext {
            world:        &self.world,
            catalog:      &*self.catalog,
            species,
            config:       &self.config,
            now:          self.clock.now_secs(),
            dt:           self.config.tick_secs,
            perceivables: &perceivables,
            stimuli:      &self.stimuli,
            occupants:    &occupants,
        };
        think(&mut self.arena, id, &cx, out);
        Ok(())
    }

    /// Attacks land if both ends are still alive when they are applied.
    fn resolve_attack<O: SimObserver>(&mut self, attack: &Attack, tick: Tick, observer: &mut O) -> SimResult<()> {
        let Some(from) = self.arena.get(attack.attacker).filter(|a| a.is_alive()).map(|a| a.origin) else {
            return Ok(());
        };
        if !self.arena.is_alive(attack.target) {
            return Ok(());
        }
        let killed = match self.apply_damage(attack.target, attack.damage, Some(from), Some(attack.attacker)) {
            Ok(killed) => killed,
            Err(SimError::Core(NpcError::AgentNotFound(_) | NpcError::StaleHandle(_))) => return Ok(()),
            Err(e) => return Err(e),
        };
        observer.on_attack(tick, attack, attack.damage);
        if killed {
            observer.on_death(tick, attack.target);
        }
        Ok(())
    }
}

/// Agents drop out of the queue once they have finished dying.
fn still_thinking(agent: &Agent) -> bool {
    !agent.is_player && !(agent.state == MonsterState::Dead && agent.has_memory(Memory::KILLED))
}
