//! Strongly typed identifiers.
//!
//! Plain indices (`NodeId`, `SpeciesId`, `SolidId`) are generated by the
//! `typed_id!` macro.  Agents are different: they live in a slot arena whose
//! slots are reused, so an [`AgentId`] pairs the slot index with the slot's
//! generation.  A handle whose generation no longer matches the slot is
//! stale and resolves to nothing, which is how squad links and remembered
//! enemies are invalidated when an agent is removed.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a navigation graph node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a species in the species registry.
    pub struct SpeciesId(u16);
}

typed_id! {
    /// Index of a static or openable world solid (wall, crate, door).
    pub struct SolidId(u32);
}

// ── AgentId ───────────────────────────────────────────────────────────────────

/// Generational handle to an agent slot.
///
/// Ordering is by slot index first, which is the order the tick loop
/// processes agents in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId {
    pub index:      u32,
    pub generation: u32,
}

impl AgentId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index for direct arena access.
    #[inline(always)]
    pub fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent({}v{})", self.index, self.generation)
    }
}

// ── EntityRef ─────────────────────────────────────────────────────────────────

/// Whatever a trace or movement probe ran into.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityRef {
    /// Unnamed world geometry (floor edge, map bounds).
    World,
    /// A placed solid: wall, crate, door.
    Solid(SolidId),
    /// Another agent.
    Agent(AgentId),
}

impl EntityRef {
    pub fn agent(self) -> Option<AgentId> {
        match self {
            EntityRef::Agent(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::World     => write!(f, "world"),
            EntityRef::Solid(s)  => write!(f, "{s}"),
            EntityRef::Agent(a)  => write!(f, "{a}"),
        }
    }
}
