//! Schedules and the generic schedule types.
//!
//! A [`Schedule`] is built once and shared as [`ScheduleRef`]; nothing in
//! the engine mutates one after construction.

use std::fmt;
use std::sync::Arc;

use strum::{Display, EnumString, FromRepr, IntoStaticStr};

use npc_core::{Conditions, SoundTypes};

use crate::task::Task;
use crate::{ScheduleError, ScheduleResult};

/// Shared, read-only schedule handle.
pub type ScheduleRef = Arc<Schedule>;

// ── ScheduleType ──────────────────────────────────────────────────────────────

/// What the selector asks for.  Species map a type to their own schedule;
/// the generic catalog covers every type except the `Custom*` slots.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, FromRepr,
    IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ScheduleType {
    None = 0,
    IdleStand,
    Patrol,
    Wake,
    WakeAngry,
    AlertFace,
    AlertSmallFlinch,
    AlertBigFlinch,
    AlertStand,
    InvestigateSound,
    CombatFace,
    CombatStand,
    ChaseEnemy,
    ChaseEnemyFailed,
    VictoryDance,
    TargetFace,
    TargetChase,
    SmallFlinch,
    TakeCoverFromBestSound,
    TakeCoverFromEnemy,
    TakeCoverFromOrigin,
    Cower,
    RangeAttack1,
    RangeAttack2,
    MeleeAttack1,
    MeleeAttack2,
    Reload,
    Standoff,
    VictimGrab,
    AiScript,
    Die,
    Fail,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
}

// ── Schedule ──────────────────────────────────────────────────────────────────

/// A named, ordered, non-empty task list with its interrupt and sound masks.
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    name:       String,
    tasks:      Vec<Task>,
    interrupts: Conditions,
    sounds:     SoundTypes,
}

impl Schedule {
    /// Build a schedule; an empty task list is rejected.
    pub fn new(
        name:       impl Into<String>,
        tasks:      Vec<Task>,
        interrupts: Conditions,
        sounds:     SoundTypes,
    ) -> ScheduleResult<Self> {
        let name = name.into();
        if tasks.is_empty() {
            return Err(ScheduleError::EmptySchedule(name));
        }
        Ok(Self { name, tasks, interrupts, sounds })
    }

    /// Construct from a task list known to be non-empty.
    pub(crate) fn fixed(
        name:       &str,
        tasks:      &[Task],
        interrupts: Conditions,
        sounds:     SoundTypes,
    ) -> ScheduleRef {
        debug_assert!(!tasks.is_empty(), "schedule {name} has no tasks");
        Arc::new(Self { name: name.to_owned(), tasks: tasks.to_vec(), interrupts, sounds })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Task at `index`, or `None` past the end.
    #[inline]
    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[inline]
    pub fn interrupts(&self) -> Conditions {
        self.interrupts
    }

    #[inline]
    pub fn sounds(&self) -> SoundTypes {
        self.sounds
    }

    /// `true` when `cond` appears in the interrupt mask.
    #[inline]
    pub fn interrupted_by(&self, cond: Conditions) -> bool {
        self.interrupts.intersects(cond)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, t) in self.tasks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{t}")?;
        }
        f.write_str("]")
    }
}
