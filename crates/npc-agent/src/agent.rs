//! The agent record.
//!
//! An [`Agent`] is a plain struct with public fields grouped by concern.
//! The engine crates read and write the fields directly; the methods below
//! are the small set of state transitions that must keep several fields
//! consistent (schedule changes, task completion, activity timing).

use npc_core::{
    AgentId, AgentRng, Capabilities, Classification, Conditions, Memory, MonsterState, SoundTypes,
    SpawnFlags, SpeciesId, Vec3,
};
use npc_schedule::{Activity, ScheduleRef, ScheduleType, Task};
use npc_spatial::{Hull, Mover, Occupant, Route};

use crate::component::{RememberedEnemies, ScriptState, Senses, SquadState};

/// Progress of the current task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    New,
    RunningMovement,
    RunningTask,
    Complete,
}

#[derive(Debug)]
pub struct Agent {
    pub id:             AgentId,
    pub species:        SpeciesId,
    pub classification: Classification,
    pub spawn_flags:    SpawnFlags,
    /// Agents sharing a group name recruit each other regardless of range.
    pub group_name:     Option<String>,
    pub capabilities:   Capabilities,
    pub is_player:      bool,
    /// Never selected as anyone's enemy.
    pub no_target:      bool,

    // ── Body ──────────────────────────────────────────────────────────────
    pub origin:       Vec3,
    pub velocity:     Vec3,
    pub hull:         Hull,
    pub eye_height:   f32,
    /// Degrees, `[0, 360)`.
    pub yaw:          f32,
    pub ideal_yaw:    f32,
    /// Turn rate in degrees per second.
    pub yaw_speed:    f32,
    /// Cosine of the half view angle.
    pub fov:          f32,
    pub walk_speed:   f32,
    pub run_speed:    f32,
    /// Speed of the current movement activity.
    pub ground_speed: f32,
    pub on_ground:    bool,
    pub health:       f32,
    pub max_health:   f32,

    // ── Behaviour ─────────────────────────────────────────────────────────
    pub state:         MonsterState,
    pub ideal_state:   MonsterState,
    pub schedule:      Option<ScheduleRef>,
    pub task_index:    usize,
    pub task_status:   TaskStatus,
    /// Set by `SetFailSchedule`; cleared on every schedule change.
    pub fail_schedule: Option<ScheduleType>,
    pub conditions:    Conditions,
    pub memory:        Memory,
    /// Task-private timer (waits, flinches, attacks).
    pub wait_until:    f32,

    // ── Enemy ─────────────────────────────────────────────────────────────
    pub enemy:       Option<AgentId>,
    /// Last known position of `enemy`.
    pub enemy_lkp:   Vec3,
    pub old_enemies: RememberedEnemies,
    /// Non-enemy entity used by the `*Target` tasks.
    pub target:      Option<AgentId>,

    // ── Navigation ────────────────────────────────────────────────────────
    pub route:           Route,
    /// No movement before this time (door opening, blocked by a mover).
    pub move_wait_until: f32,
    pub last_position:   Option<Vec3>,
    /// Cover point or investigation target picked by a task.
    pub move_spot:       Option<Vec3>,
    pub patrol:          Vec<Vec3>,
    pub patrol_index:    usize,

    // ── Animation ─────────────────────────────────────────────────────────
    pub activity:             Activity,
    pub ideal_activity:       Activity,
    /// When the current non-looping activity finishes.
    pub sequence_finished_at: f32,

    // ── Damage ────────────────────────────────────────────────────────────
    pub last_damage_origin: Option<Vec3>,
    pub last_damage_at:     f32,

    // ── Components ────────────────────────────────────────────────────────
    pub senses: Senses,
    pub squad:  Option<SquadState>,
    pub script: Option<ScriptState>,
    pub rng:    AgentRng,
}

impl Agent {
    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && self.state != MonsterState::Dead
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.capabilities.contains(Capabilities::FLY)
    }

    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.origin + Vec3::UP * self.eye_height
    }

    /// Horizontal facing direction.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        Vec3::from_yaw(self.yaw)
    }

    pub fn is_moving(&self) -> bool {
        !self.route.is_clear() && self.velocity.length_2d() > 0.0
    }

    pub fn state(&self) -> MonsterState {
        self.state
    }

    pub fn schedule_name(&self) -> Option<&str> {
        self.schedule.as_deref().map(|s| s.name())
    }

    /// The task being run, if any.
    pub fn task(&self) -> Option<&Task> {
        self.schedule.as_deref().and_then(|s| s.task(self.task_index))
    }

    pub fn in_squad(&self) -> bool {
        self.squad.as_ref().is_some_and(|s| s.in_squad())
    }

    pub fn is_leader(&self) -> bool {
        self.squad.as_ref().is_some_and(|s| s.leader == Some(self.id))
    }

    pub fn squad_leader(&self) -> Option<AgentId> {
        self.squad.as_ref().and_then(|s| s.leader)
    }

    pub fn sound_types(&self) -> SoundTypes {
        self.senses.sound_types
    }

    // ── Condition / memory helpers ────────────────────────────────────────

    #[inline]
    pub fn has_conditions(&self, c: Conditions) -> bool {
        self.conditions.intersects(c)
    }

    #[inline]
    pub fn has_all_conditions(&self, c: Conditions) -> bool {
        self.conditions.contains(c)
    }

    #[inline]
    pub fn set_conditions(&mut self, c: Conditions) {
        self.conditions.insert(c);
    }

    #[inline]
    pub fn clear_conditions(&mut self, c: Conditions) {
        self.conditions.remove(c);
    }

    /// Set `c` when `on`, clear it otherwise.
    #[inline]
    pub fn set_conditions_to(&mut self, c: Conditions, on: bool) {
        self.conditions.set(c, on);
    }

    #[inline]
    pub fn has_memory(&self, m: Memory) -> bool {
        self.memory.intersects(m)
    }

    #[inline]
    pub fn remember(&mut self, m: Memory) {
        self.memory.insert(m);
    }

    #[inline]
    pub fn forget(&mut self, m: Memory) {
        self.memory.remove(m);
    }

    // ── Schedule transitions ──────────────────────────────────────────────

    /// Install `schedule` from its first task.  Clears every condition, the
    /// fail-schedule override and the repeated-blockage memory.
    pub fn change_schedule(&mut self, schedule: ScheduleRef) {
        self.schedule = Some(schedule);
        self.task_index = 0;
        self.task_status = TaskStatus::New;
        self.conditions = Conditions::empty();
        self.fail_schedule = None;
        self.memory.remove(Memory::MOVE_FAILED);
    }

    pub fn clear_schedule(&mut self) {
        self.schedule = None;
        self.task_index = 0;
        self.task_status = TaskStatus::New;
    }

    /// A schedule is valid while it exists and nothing has invalidated it.
    pub fn schedule_valid(&self) -> bool {
        self.schedule.is_some() && !self.has_conditions(Conditions::TASK_FAILED | Conditions::SCHEDULE_DONE)
    }

    #[inline]
    pub fn task_complete(&mut self) {
        self.task_status = TaskStatus::Complete;
    }

    /// Abandon the current task; the executor picks a fail schedule next.
    #[inline]
    pub fn task_fail(&mut self) {
        self.set_conditions(Conditions::TASK_FAILED);
    }

    #[inline]
    pub fn task_is_running(&self) -> bool {
        matches!(self.task_status, TaskStatus::RunningMovement | TaskStatus::RunningTask)
    }

    /// Step past the completed task.  Returns `true` exactly when this call
    /// ran off the end of the schedule, which also sets `SCHEDULE_DONE`.
    pub fn next_scheduled_task(&mut self) -> bool {
        let Some(len) = self.schedule.as_deref().map(|s| s.len()) else {
            return false;
        };
        if self.task_index >= len {
            return false;
        }
        self.task_index += 1;
        self.task_status = TaskStatus::New;
        if self.task_index >= len {
            self.set_conditions(Conditions::SCHEDULE_DONE);
            return true;
        }
        false
    }

    // ── Activity ──────────────────────────────────────────────────────────

    /// Start `activity`; non-looping activities finish after `duration`.
    pub fn set_activity(&mut self, activity: Activity, now: f32, duration: f32) {
        self.activity = activity;
        self.ideal_activity = activity;
        self.sequence_finished_at = if activity.is_movement() { f32::INFINITY } else { now + duration };
    }

    #[inline]
    pub fn sequence_finished(&self, now: f32) -> bool {
        now >= self.sequence_finished_at
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    pub fn mover(&self) -> Mover {
        Mover { id: self.id, hull: self.hull, flying: self.is_flying() }
    }

    pub fn occupant(&self) -> Occupant {
        Occupant {
            id:        self.id,
            origin:    self.origin,
            radius:    self.hull.radius,
            height:    self.hull.height,
            moving:    self.is_moving(),
            is_player: self.is_player,
            on_ground: self.on_ground,
        }
    }
}
