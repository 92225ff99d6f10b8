//! The coarse behavioural state an agent is in.

use std::fmt;
use std::str::FromStr;

use crate::NpcError;

/// High-level mode driving schedule selection.
///
/// `None` only exists before an agent's first think.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MonsterState {
    #[default]
    None = 0,
    Idle,
    Combat,
    Alert,
    Hunt,
    Prone,
    Script,
    Dead,
}

impl MonsterState {
    const ALL: [MonsterState; 8] = [
        MonsterState::None,
        MonsterState::Idle,
        MonsterState::Combat,
        MonsterState::Alert,
        MonsterState::Hunt,
        MonsterState::Prone,
        MonsterState::Script,
        MonsterState::Dead,
    ];

    /// Inverse of `state as u8`.
    pub fn from_repr(id: u8) -> Option<MonsterState> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            MonsterState::None   => "None",
            MonsterState::Idle   => "Idle",
            MonsterState::Combat => "Combat",
            MonsterState::Alert  => "Alert",
            MonsterState::Hunt   => "Hunt",
            MonsterState::Prone  => "Prone",
            MonsterState::Script => "Script",
            MonsterState::Dead   => "Dead",
        }
    }
}

impl fmt::Display for MonsterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonsterState {
    type Err = NpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NpcError::Parse(format!("unknown monster state {s:?}")))
    }
}
