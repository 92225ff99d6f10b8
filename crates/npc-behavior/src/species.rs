//! The `Species` trait: the extension point for per-species behavior.

use npc_agent::{Agent, AgentBuilder};
use npc_core::{Classification, Conditions, EntityRef, Relationship, SoundTypes, SpeciesId};
use npc_schedule::{Activity, ScheduleCatalog, ScheduleRef, ScheduleType, Task};

use crate::context::TaskEnv;
use crate::event::{AttackKind, ThinkOutput};
use crate::{BehaviorError, BehaviorResult};

/// Pluggable per-species behavior.
///
/// Every method has a default matching the generic engine, so a species
/// only overrides what makes it different.  The engine calls these from a
/// single thread, but registries are shared behind `Arc`, hence the
/// `Send + Sync` bound.
///
/// # Hook order during a think
///
/// `relationship` and `sound_mask` feed the senses, `ignore_conditions`
/// filters what they produced, the `check_*` hooks gate attack conditions,
/// `schedule_of_type` overrides catalog lookups, and `start_task` /
/// `run_task` may take over any task before the standard implementation.
/// `task_failed` hears about a failure before the fail schedule is chosen.
///
/// # Example
///
/// ```rust,ignore
/// struct Grunt;
///
/// impl Species for Grunt {
///     fn name(&self) -> &str { "grunt" }
///     fn check_range_attack1(&self, _a: &Agent, dot: f32, dist: f32) -> bool {
///         dist <= 2048.0 && dot >= 0.5
///     }
/// }
/// ```
pub trait Species: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Adjust the builder before the agent is created.
    fn on_create(&self, builder: AgentBuilder) -> AgentBuilder {
        builder
    }

    /// Called once the agent is in the arena.
    fn spawn(&self, _agent: &mut Agent) {}

    /// A played (non-looping) activity reached its end.
    fn handle_anim_event(&self, _agent: &mut Agent, _activity: Activity, _out: &mut ThinkOutput) {}

    /// Species-specific schedule for `ty`; `None` defers to the catalog.
    fn schedule_of_type(
        &self,
        _agent:   &Agent,
        _ty:      ScheduleType,
        _catalog: &ScheduleCatalog,
    ) -> Option<ScheduleRef> {
        None
    }

    /// `dot` is the plan-view cosine between facing and the enemy, `dist`
    /// the distance to it.
    fn check_range_attack1(&self, _agent: &Agent, dot: f32, dist: f32) -> bool {
        dist > 64.0 && dist <= 784.0 && dot >= 0.5
    }

    fn check_range_attack2(&self, _agent: &Agent, dot: f32, dist: f32) -> bool {
        dist > 64.0 && dist <= 512.0 && dot >= 0.5
    }

    fn check_melee_attack1(&self, _agent: &Agent, dot: f32, dist: f32) -> bool {
        dist <= 64.0 && dot >= 0.7
    }

    fn check_melee_attack2(&self, _agent: &Agent, dot: f32, dist: f32) -> bool {
        dist <= 64.0 && dot >= 0.7
    }

    fn relationship(&self, agent: &Agent, other: Classification) -> Relationship {
        Relationship::between(agent.classification, other)
    }

    /// Stimulus classes this species notices at all.
    fn sound_mask(&self, _agent: &Agent) -> SoundTypes {
        SoundTypes::ALL_SOUNDS
    }

    /// Conditions stripped right after sensing.
    fn ignore_conditions(&self, _agent: &Agent) -> Conditions {
        Conditions::empty()
    }

    /// Begin `task`.  Return `true` when handled here.
    fn start_task(&self, _agent: &mut Agent, _task: &Task, _env: &mut TaskEnv<'_, '_>) -> bool {
        false
    }

    /// Advance a running `task`.  Return `true` when handled here.
    fn run_task(&self, _agent: &mut Agent, _task: &Task, _env: &mut TaskEnv<'_, '_>) -> bool {
        false
    }

    /// `task` set `TASK_FAILED`.  Called before the fail schedule is
    /// picked, so setting `agent.fail_schedule` here redirects it.
    fn task_failed(&self, _agent: &mut Agent, _task: &Task, _env: &mut TaskEnv<'_, '_>) {}

    /// The local mover ran into `by`.
    fn blocked(&self, _agent: &mut Agent, _by: EntityRef) {}

    /// Playing time of a non-looping activity, in seconds.
    fn activity_duration(&self, _agent: &Agent, activity: Activity) -> f32 {
        match activity {
            Activity::RangeAttack1 | Activity::RangeAttack2 => 0.5,
            Activity::MeleeAttack1 | Activity::MeleeAttack2 => 0.6,
            Activity::Reload => 1.5,
            Activity::SmallFlinch => 0.4,
            Activity::BigFlinch => 0.8,
            Activity::TurnLeft | Activity::TurnRight => 0.5,
            Activity::Inspect => 1.0,
            Activity::Die => 1.0,
            Activity::VictoryDance | Activity::Eat => 2.0,
            Activity::Cower => 3.0,
            _ => 0.0,
        }
    }

    /// Damage dealt by one attack of `kind`.
    fn attack(&self, _agent: &Agent, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Range1 => 8.0,
            AttackKind::Range2 => 20.0,
            AttackKind::Melee1 => 10.0,
            AttackKind::Melee2 => 25.0,
        }
    }
}

/// A species with every default.
pub struct GenericSpecies;

impl Species for GenericSpecies {
    fn name(&self) -> &str {
        "generic"
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Species implementations indexed by [`SpeciesId`].
#[derive(Default)]
pub struct SpeciesRegistry {
    entries: Vec<Box<dyn Species>>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `species`; ids are handed out in registration order.
    pub fn register(&mut self, species: impl Species) -> SpeciesId {
        let id = SpeciesId(self.entries.len() as u16);
        tracing::debug!(%id, name = species.name(), "species registered");
        self.entries.push(Box::new(species));
        id
    }

    pub fn get(&self, id: SpeciesId) -> BehaviorResult<&dyn Species> {
        self.entries
            .get(id.index())
            .map(|s| s.as_ref())
            .ok_or(BehaviorError::UnknownSpecies(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for SpeciesRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|s| s.name())).finish()
    }
}
