//! The closed task catalog.
//!
//! A [`Task`] is an immutable `(TaskKind, f32)` pair.  The float parameter is
//! interpreted per kind; [`TaskKind::param_meaning`] is the authoritative
//! table and the typed accessors on [`Task`] decode it.
//!
//! | Meaning        | Decoded by               | Example                      |
//! |----------------|--------------------------|------------------------------|
//! | `Seconds`      | [`Task::seconds`]        | `Wait(2.0)`                  |
//! | `Activity`     | [`Task::activity`]       | `SetActivity(Idle)`          |
//! | `MemoryBit`    | [`Task::memory`]         | `Remember(IN_COVER)`         |
//! | `ScheduleType` | [`Task::schedule_type`]  | `SetFailSchedule(Fail)`      |
//! | `Degrees`      | [`Task::param`]          | `TurnLeft(180)`              |
//! | `Distance`     | [`Task::param`]          | `FindCoverFromEnemy(0)`      |
//! | `StateId`      | [`Task::state`]          | `SuggestState(Combat)`       |
//! | `Voice`        | [`Task::param`]          | `Vocalize(3)`                |

use std::fmt;

use strum::{Display, EnumString, FromRepr, IntoStaticStr};

use npc_core::{Memory, MonsterState};

use crate::schedule::ScheduleType;

// ── ParamMeaning ──────────────────────────────────────────────────────────────

/// How a task kind reads its float parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamMeaning {
    /// Parameter ignored.
    None,
    Seconds,
    Activity,
    /// Bit index (0–31) into [`Memory`].
    MemoryBit,
    ScheduleType,
    Degrees,
    /// World units; `0` means "use the engine default".
    Distance,
    StateId,
    /// Application-defined voice line id.
    Voice,
}

// ── Activity ──────────────────────────────────────────────────────────────────

/// Animation-level activity an agent can be put in.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, FromRepr, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Activity {
    #[default]
    Idle = 0,
    Walk,
    Run,
    Fly,
    Hover,
    TurnLeft,
    TurnRight,
    Crouch,
    RangeAttack1,
    RangeAttack2,
    MeleeAttack1,
    MeleeAttack2,
    Reload,
    SmallFlinch,
    BigFlinch,
    VictoryDance,
    Inspect,
    Cower,
    Eat,
    /// Held helpless while prone.
    Held,
    Die,
}

impl Activity {
    /// Locomotion activities loop until the route ends instead of finishing.
    pub fn is_movement(self) -> bool {
        matches!(self, Activity::Walk | Activity::Run | Activity::Fly | Activity::Hover)
    }
}

// ── Voices ────────────────────────────────────────────────────────────────────

/// Voice line ids used by the generic schedules.  Species are free to use
/// any other value with [`TaskKind::Vocalize`].
pub mod voice {
    pub const WAKE:  f32 = 1.0;
    pub const ALERT: f32 = 2.0;
    pub const PAIN:  f32 = 3.0;
    pub const DIE:   f32 = 4.0;
}

// ── TaskKind ──────────────────────────────────────────────────────────────────

/// Every task the executor knows how to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskKind {
    Wait,
    WaitFaceEnemy,
    WaitRandom,
    WaitIndefinite,
    StopMoving,
    SetActivity,
    PlayActivity,
    FaceIdeal,
    FaceEnemy,
    FaceTarget,
    FaceLastPosition,
    TurnLeft,
    TurnRight,
    Remember,
    Forget,
    SetFailSchedule,
    SetSchedule,
    SuggestState,
    StoreLastPosition,
    ClearLastPosition,
    GetPathToEnemy,
    GetPathToEnemyLkp,
    GetPathToTarget,
    GetPathToSpot,
    GetPathToLastPosition,
    GetPathToBestSound,
    GetPathToBestScent,
    GetPathToPatrol,
    GetPathToScriptMark,
    FindCoverFromEnemy,
    FindCoverFromOrigin,
    FindCoverFromBestSound,
    WalkPath,
    RunPath,
    WaitForMovement,
    MoveToTargetRange,
    RangeAttack1,
    RangeAttack2,
    MeleeAttack1,
    MeleeAttack2,
    Reload,
    SmallFlinch,
    BigFlinch,
    Vocalize,
    PlayScript,
    EndScript,
    Die,
}

impl TaskKind {
    /// The fixed meaning of this kind's parameter.
    pub fn param_meaning(self) -> ParamMeaning {
        use TaskKind::*;
        match self {
            Wait | WaitFaceEnemy | WaitRandom => ParamMeaning::Seconds,
            SetActivity | PlayActivity => ParamMeaning::Activity,
            TurnLeft | TurnRight => ParamMeaning::Degrees,
            Remember | Forget => ParamMeaning::MemoryBit,
            SetFailSchedule | SetSchedule => ParamMeaning::ScheduleType,
            SuggestState => ParamMeaning::StateId,
            FindCoverFromEnemy | FindCoverFromOrigin | FindCoverFromBestSound
            | MoveToTargetRange => ParamMeaning::Distance,
            Vocalize => ParamMeaning::Voice,
            _ => ParamMeaning::None,
        }
    }

    /// Tasks that hand control to the local mover.
    pub fn is_movement(self) -> bool {
        matches!(self, TaskKind::WaitForMovement | TaskKind::MoveToTargetRange)
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub kind:  TaskKind,
    pub param: f32,
}

impl Task {
    pub const fn new(kind: TaskKind, param: f32) -> Self {
        Self { kind, param }
    }

    /// A task whose parameter is unused.
    pub const fn of(kind: TaskKind) -> Self {
        Self { kind, param: 0.0 }
    }

    pub const fn wait(secs: f32) -> Self {
        Self::new(TaskKind::Wait, secs)
    }

    pub const fn set_activity(activity: Activity) -> Self {
        Self::new(TaskKind::SetActivity, activity as u8 as f32)
    }

    pub const fn play_activity(activity: Activity) -> Self {
        Self::new(TaskKind::PlayActivity, activity as u8 as f32)
    }

    pub const fn set_fail_schedule(ty: ScheduleType) -> Self {
        Self::new(TaskKind::SetFailSchedule, ty as u16 as f32)
    }

    pub const fn set_schedule(ty: ScheduleType) -> Self {
        Self::new(TaskKind::SetSchedule, ty as u16 as f32)
    }

    pub const fn suggest_state(state: MonsterState) -> Self {
        Self::new(TaskKind::SuggestState, state as u8 as f32)
    }

    pub const fn remember(flag: Memory) -> Self {
        Self::new(TaskKind::Remember, flag.bits().trailing_zeros() as f32)
    }

    pub const fn forget(flag: Memory) -> Self {
        Self::new(TaskKind::Forget, flag.bits().trailing_zeros() as f32)
    }

    // ── Parameter decoding ────────────────────────────────────────────────

    #[inline]
    pub fn seconds(&self) -> f32 {
        debug_assert_eq!(self.kind.param_meaning(), ParamMeaning::Seconds);
        self.param.max(0.0)
    }

    pub fn activity(&self) -> Option<Activity> {
        Activity::from_repr(self.param as u8)
    }

    pub fn memory(&self) -> Option<Memory> {
        Memory::from_bit_index(self.param as u32)
    }

    pub fn schedule_type(&self) -> Option<ScheduleType> {
        ScheduleType::from_repr(self.param as u16)
    }

    pub fn state(&self) -> Option<MonsterState> {
        MonsterState::from_repr(self.param as u8)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.param_meaning() {
            ParamMeaning::None => write!(f, "{}", self.kind),
            ParamMeaning::Activity => match self.activity() {
                Some(a) => write!(f, "{}({a})", self.kind),
                None => write!(f, "{}(?{})", self.kind, self.param),
            },
            ParamMeaning::ScheduleType => match self.schedule_type() {
                Some(t) => write!(f, "{}({t})", self.kind),
                None => write!(f, "{}(?{})", self.kind, self.param),
            },
            ParamMeaning::StateId => match self.state() {
                Some(s) => write!(f, "{}({s})", self.kind),
                None => write!(f, "{}(?{})", self.kind, self.param),
            },
            _ => write!(f, "{}({})", self.kind, self.param),
        }
    }
}
