//! Classification and disposition between agents.
//!
//! Every agent reports a [`Classification`]; how one class regards another
//! is a [`Relationship`].  Species may override the lookup, but the default
//! matrix below covers the stock factions.

use std::fmt;

/// Faction an agent belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Classification {
    #[default]
    None = 0,
    Machine,
    Player,
    HumanPassive,
    HumanMilitary,
    AlienMilitary,
    AlienPassive,
    AlienMonster,
    AlienPrey,
    AlienPredator,
    Insect,
    PlayerAlly,
}

impl Classification {
    pub const COUNT: usize = 12;
}

/// Disposition toward another class, ordered from friendliest to most
/// hostile so `max` selects the most pressing target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum Relationship {
    Ally    = -2,
    Fear    = -1,
    #[default]
    None    = 0,
    Dislike = 1,
    Hate    = 2,
    Nemesis = 3,
}

impl Relationship {
    /// Relationships that make a sighted entity a candidate enemy.
    #[inline]
    pub fn is_hostile(self) -> bool {
        matches!(self, Relationship::Dislike | Relationship::Hate | Relationship::Nemesis)
    }

    /// Default matrix lookup: how `me` regards `other`.
    pub fn between(me: Classification, other: Classification) -> Relationship {
        DEFAULT_MATRIX[me as usize][other as usize]
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationship::Ally    => "ally",
            Relationship::Fear    => "fear",
            Relationship::None    => "none",
            Relationship::Dislike => "dislike",
            Relationship::Hate    => "hate",
            Relationship::Nemesis => "nemesis",
        };
        f.write_str(s)
    }
}

use Relationship::{Ally as AL, Dislike as DL, Fear as FR, Hate as HT, None as NO};

/// Row = observer, column = observed, both in `Classification` order.
const DEFAULT_MATRIX: [[Relationship; Classification::COUNT]; Classification::COUNT] = [
    //            NONE MACH PLYR HPAS HMIL AMIL APAS AMON APRY APRD INSC PALY
    /* NONE   */ [NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO],
    /* MACH   */ [NO,  NO,  DL,  DL,  NO,  DL,  DL,  DL,  DL,  DL,  NO,  DL],
    /* PLYR   */ [NO,  DL,  NO,  NO,  DL,  DL,  DL,  DL,  DL,  DL,  NO,  NO],
    /* HPAS   */ [NO,  NO,  AL,  AL,  HT,  FR,  NO,  HT,  DL,  FR,  NO,  AL],
    /* HMIL   */ [NO,  NO,  HT,  DL,  NO,  HT,  DL,  DL,  DL,  DL,  NO,  HT],
    /* AMIL   */ [NO,  DL,  HT,  DL,  HT,  NO,  NO,  NO,  NO,  NO,  NO,  DL],
    /* APAS   */ [NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO,  NO],
    /* AMON   */ [NO,  DL,  DL,  DL,  DL,  NO,  NO,  NO,  NO,  NO,  NO,  DL],
    /* APRY   */ [NO,  NO,  DL,  DL,  DL,  NO,  NO,  NO,  NO,  FR,  NO,  DL],
    /* APRD   */ [NO,  NO,  DL,  DL,  DL,  NO,  NO,  NO,  HT,  DL,  NO,  DL],
    /* INSC   */ [FR,  FR,  FR,  FR,  FR,  NO,  FR,  FR,  FR,  FR,  NO,  FR],
    /* PALY   */ [NO,  DL,  AL,  AL,  DL,  DL,  DL,  DL,  DL,  DL,  NO,  NO],
];
