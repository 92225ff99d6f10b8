//! Optional and embedded agent components.
//!
//! | Component            | Present on                  | Holds                               |
//! |----------------------|-----------------------------|-------------------------------------|
//! | [`SquadState`]       | agents with `Capabilities::SQUAD` | leader/member handles, slots  |
//! | [`ScriptState`]      | agents running a script     | mark, activity, duration            |
//! | [`Senses`]           | every agent                 | visible handles, audible stimuli    |
//! | [`RememberedEnemies`]| every agent                 | ring of prior enemies               |

use bitflags::bitflags;

use npc_core::{AgentId, SoundTypes, Vec3};
use npc_schedule::Activity;

/// Member handles a leader can hold (the leader itself is not counted).
pub const MAX_SQUAD_MEMBERS: usize = 4;

/// Prior enemies an agent remembers.
pub const MAX_OLD_ENEMIES: usize = 4;

// ── Squad ─────────────────────────────────────────────────────────────────────

bitflags! {
    /// Tactical permissions arbitrated by a squad leader.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SquadSlots: u32 {
        const ATTACK1  = 1 << 0;
        const ATTACK2  = 1 << 1;
        const GRENADE1 = 1 << 2;
        const GRENADE2 = 1 << 3;
        const CHASE1   = 1 << 4;
        const CHASE2   = 1 << 5;
        /// Pseudo-slot held while the squad's enemies diverge.
        const SQUAD_SPLIT = 1 << 31;

        const ENGAGE  = Self::ATTACK1.bits() | Self::ATTACK2.bits();
        const GRENADE = Self::GRENADE1.bits() | Self::GRENADE2.bits();
        const CHASE   = Self::CHASE1.bits() | Self::CHASE2.bits();
    }
}

/// Squad membership.  `leader == None` means "not in a squad".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SquadState {
    /// Squad leader; equals the agent's own handle on the leader.
    pub leader:  Option<AgentId>,
    /// Leader only: member handles, never the leader itself.
    pub members: [Option<AgentId>; MAX_SQUAD_MEMBERS],
    /// Leader only: slots claimed by anyone in the squad.
    pub slots:   SquadSlots,
    /// The slot this agent currently holds.
    pub my_slot: SquadSlots,
    /// Recruitment has been attempted.
    pub recruited: bool,
}

impl SquadState {
    #[inline]
    pub fn in_squad(&self) -> bool {
        self.leader.is_some()
    }

    pub fn member_count(&self) -> usize {
        self.members.iter().flatten().count()
    }

    /// Drop all links and slots.
    pub fn reset(&mut self) {
        self.leader = None;
        self.members = [None; MAX_SQUAD_MEMBERS];
        self.slots = SquadSlots::empty();
        self.my_slot = SquadSlots::empty();
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

/// A scripted sequence the agent has been told to play.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptState {
    /// Walk here before playing; `None` plays in place.
    pub mark:          Option<Vec3>,
    pub activity:      Activity,
    pub duration:      f32,
    /// Damage and task failure may cut the script short.
    pub interruptible: bool,
    /// Set when the activity starts playing.
    pub started_at:    Option<f32>,
}

impl ScriptState {
    pub fn new(activity: Activity, duration: f32) -> Self {
        Self { mark: None, activity, duration, interruptible: true, started_at: None }
    }

    pub fn finished(&self, now: f32) -> bool {
        self.started_at.is_some_and(|t| now >= t + self.duration)
    }
}

// ── Senses ────────────────────────────────────────────────────────────────────

/// A sound or scent emitted into the world.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stimulus {
    pub origin:     Vec3,
    /// Exactly one class bit.
    pub kind:       SoundTypes,
    /// Audible radius in world units.
    pub volume:     f32,
    pub expires_at: f32,
    pub source:     Option<AgentId>,
}

impl Stimulus {
    #[inline]
    pub fn is_sound(&self) -> bool {
        self.kind.is_sound()
    }

    #[inline]
    pub fn is_scent(&self) -> bool {
        self.kind.is_scent()
    }
}

/// Per-tick perception results, rebuilt by the look and listen passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Senses {
    pub visible:     Vec<AgentId>,
    pub audible:     Vec<Stimulus>,
    /// Union of the classes in `audible`.
    pub sound_types: SoundTypes,
}

// ── Remembered enemies ────────────────────────────────────────────────────────

/// Fixed ring of prior enemies with their last known positions.  Pushing a
/// known enemy is ignored; a full ring overwrites its oldest entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RememberedEnemies {
    slots: [Option<(AgentId, Vec3)>; MAX_OLD_ENEMIES],
    next:  usize,
}

impl RememberedEnemies {
    pub fn push(&mut self, enemy: AgentId, lkp: Vec3) {
        if self.contains(enemy) {
            return;
        }
        self.slots[self.next] = Some((enemy, lkp));
        self.next = (self.next + 1) % MAX_OLD_ENEMIES;
    }

    pub fn contains(&self, enemy: AgentId) -> bool {
        self.slots.iter().flatten().any(|&(id, _)| id == enemy)
    }

    /// Remove and return the most recent entry accepted by `usable`.  Stale
    /// entries are discarded along the way.
    pub fn pop(&mut self, mut usable: impl FnMut(AgentId) -> bool) -> Option<(AgentId, Vec3)> {
        for back in 1..=MAX_OLD_ENEMIES {
            let i = (self.next + MAX_OLD_ENEMIES - back) % MAX_OLD_ENEMIES;
            if let Some((id, lkp)) = self.slots[i].take() {
                if usable(id) {
                    return Some((id, lkp));
                }
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
