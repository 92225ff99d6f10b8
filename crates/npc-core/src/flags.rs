//! Bit sets carried on every agent.
//!
//! | Set              | Width | Owner / meaning                                   |
//! |------------------|-------|---------------------------------------------------|
//! | [`Conditions`]   | u32   | per-tick sensed signals; interrupt masks          |
//! | [`SoundTypes`]   | u8    | stimulus classes; species and schedule sound masks |
//! | [`Capabilities`] | u32   | what an agent can do (attacks, doors, flight)     |
//! | [`Memory`]       | u32   | sticky facts that outlive a schedule              |
//! | [`SpawnFlags`]   | u16   | placement options                                 |

use bitflags::bitflags;

bitflags! {
    /// Signals recomputed every tick and consumed by interrupt masks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Conditions: u32 {
        const NO_AMMO_LOADED    = 1 << 0;
        const SEE_HATE          = 1 << 1;
        const SEE_FEAR          = 1 << 2;
        const SEE_DISLIKE       = 1 << 3;
        const SEE_ENEMY         = 1 << 4;
        const ENEMY_OCCLUDED    = 1 << 5;
        const SMELL_FOOD        = 1 << 6;
        const ENEMY_TOO_FAR     = 1 << 7;
        const LIGHT_DAMAGE      = 1 << 8;
        const HEAVY_DAMAGE      = 1 << 9;
        const CAN_RANGE_ATTACK1 = 1 << 10;
        const CAN_MELEE_ATTACK1 = 1 << 11;
        const CAN_RANGE_ATTACK2 = 1 << 12;
        const CAN_MELEE_ATTACK2 = 1 << 13;
        const PROVOKED          = 1 << 14;
        const NEW_ENEMY         = 1 << 15;
        const HEAR_SOUND        = 1 << 16;
        const SMELL             = 1 << 17;
        const ENEMY_FACING_ME   = 1 << 18;
        const ENEMY_DEAD        = 1 << 19;
        const SEE_CLIENT        = 1 << 20;
        const SEE_NEMESIS       = 1 << 21;
        const SPECIAL1          = 1 << 28;
        const SPECIAL2          = 1 << 29;
        const TASK_FAILED       = 1 << 30;
        const SCHEDULE_DONE     = 1 << 31;

        /// Every `SEE_*` signal produced by the look pass.
        const ALL_SEE = Self::SEE_HATE.bits()
            | Self::SEE_FEAR.bits()
            | Self::SEE_DISLIKE.bits()
            | Self::SEE_ENEMY.bits()
            | Self::SEE_CLIENT.bits()
            | Self::SEE_NEMESIS.bits();

        const CAN_ATTACK = Self::CAN_RANGE_ATTACK1.bits()
            | Self::CAN_MELEE_ATTACK1.bits()
            | Self::CAN_RANGE_ATTACK2.bits()
            | Self::CAN_MELEE_ATTACK2.bits();

        const ANY_DAMAGE = Self::LIGHT_DAMAGE.bits() | Self::HEAVY_DAMAGE.bits();
    }
}

bitflags! {
    /// Stimulus classes.  The first three are audible; the rest are scents.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SoundTypes: u8 {
        const COMBAT  = 1 << 0;
        const WORLD   = 1 << 1;
        const PLAYER  = 1 << 2;
        const DANGER  = 1 << 3;
        const CARCASS = 1 << 4;
        const MEAT    = 1 << 5;
        const GARBAGE = 1 << 6;

        const ALL_SOUNDS = Self::COMBAT.bits() | Self::WORLD.bits() | Self::PLAYER.bits() | Self::DANGER.bits();
        const ALL_SCENTS = Self::CARCASS.bits() | Self::MEAT.bits() | Self::GARBAGE.bits();
        const FOOD       = Self::CARCASS.bits() | Self::MEAT.bits();
    }
}

impl SoundTypes {
    /// `true` when any audible class is present.
    #[inline]
    pub fn is_sound(self) -> bool {
        self.intersects(SoundTypes::ALL_SOUNDS)
    }

    /// `true` when any scent class is present.
    #[inline]
    pub fn is_scent(self) -> bool {
        self.intersects(SoundTypes::ALL_SCENTS)
    }
}

bitflags! {
    /// What an agent is able to do.  Attack checks are gated on these bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u32 {
        const DUCK          = 1 << 0;
        const JUMP          = 1 << 1;
        const STRAFE        = 1 << 2;
        const SQUAD         = 1 << 3;
        const SWIM          = 1 << 4;
        const CLIMB         = 1 << 5;
        const USE           = 1 << 6;
        const HEAR          = 1 << 7;
        const AUTO_DOORS    = 1 << 8;
        const OPEN_DOORS    = 1 << 9;
        const TURN_HEAD     = 1 << 10;
        const RANGE_ATTACK1 = 1 << 11;
        const RANGE_ATTACK2 = 1 << 12;
        const MELEE_ATTACK1 = 1 << 13;
        const MELEE_ATTACK2 = 1 << 14;
        const FLY           = 1 << 15;

        const DOORS_GROUP = Self::USE.bits() | Self::AUTO_DOORS.bits() | Self::OPEN_DOORS.bits();
    }
}

bitflags! {
    /// Sticky per-agent facts.  Schedules set and clear them through the
    /// `Remember` / `Forget` tasks, addressed by bit index.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Memory: u32 {
        const PROVOKED      = 1 << 0;
        const IN_COVER      = 1 << 1;
        const SUSPICIOUS    = 1 << 2;
        const PATH_FINISHED = 1 << 3;
        const ON_PATH       = 1 << 4;
        const MOVE_FAILED   = 1 << 5;
        const FLINCHED      = 1 << 6;
        const KILLED        = 1 << 7;
        const CUSTOM4       = 1 << 28;
        const CUSTOM3       = 1 << 29;
        const CUSTOM2       = 1 << 30;
        const CUSTOM1       = 1 << 31;
    }
}

impl Memory {
    /// The single flag at `bit` (0–31), or `None` when out of range.
    pub fn from_bit_index(bit: u32) -> Option<Memory> {
        if bit < 32 { Some(Memory::from_bits_retain(1 << bit)) } else { None }
    }
}

bitflags! {
    /// Placement options set when an agent is spawned.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpawnFlags: u16 {
        /// Ignore players until a player is looking back at this agent.
        const WAIT_TILL_SEEN = 1 << 0;
        /// Suppress idle vocalisation.
        const GAG            = 1 << 1;
        /// Neither sees nor is seen by other agents.
        const PRISONER       = 1 << 4;
    }
}
