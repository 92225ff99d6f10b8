//! Agent collision hulls.

use bitflags::bitflags;

/// Upright cylinder approximating an agent's collision volume.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hull {
    /// Half of the hull's horizontal width.
    pub radius: f32,
    pub height: f32,
}

impl Hull {
    pub const HUMAN: Hull = Hull { radius: 16.0, height: 72.0 };
    pub const SMALL: Hull = Hull { radius: 12.0, height: 24.0 };
    pub const LARGE: Hull = Hull { radius: 32.0, height: 64.0 };

    #[inline]
    pub fn width(self) -> f32 {
        self.radius * 2.0
    }

    /// Navigation class used to filter graph links.
    pub fn class(self, flying: bool) -> HullClass {
        if flying {
            HullClass::Fly
        } else if self.radius > 16.0 {
            HullClass::Large
        } else if self.height <= 36.0 {
            HullClass::Small
        } else {
            HullClass::Human
        }
    }
}

impl Default for Hull {
    fn default() -> Self {
        Hull::HUMAN
    }
}

/// Coarse hull categories the navigation graph is annotated with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HullClass {
    Small,
    Human,
    Large,
    Fly,
}

impl HullClass {
    pub fn mask(self) -> HullMask {
        match self {
            HullClass::Small => HullMask::SMALL,
            HullClass::Human => HullMask::HUMAN,
            HullClass::Large => HullMask::LARGE,
            HullClass::Fly   => HullMask::FLY,
        }
    }
}

bitflags! {
    /// Which hull classes may traverse a graph link.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HullMask: u8 {
        const SMALL = 1 << 0;
        const HUMAN = 1 << 1;
        const LARGE = 1 << 2;
        const FLY   = 1 << 3;

        const GROUND = Self::SMALL.bits() | Self::HUMAN.bits() | Self::LARGE.bits();
    }
}

impl Default for HullMask {
    fn default() -> Self {
        HullMask::all()
    }
}
