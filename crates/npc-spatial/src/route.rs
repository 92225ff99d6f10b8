//! Fixed-capacity waypoint routes.
//!
//! A route holds at most [`ROUTE_SIZE`] waypoints and an index to the one
//! currently being walked.  Exactly one waypoint carries
//! [`WaypointFlags::IS_GOAL`]; a route truncated by capacity has none and is
//! flagged `partial`, which tells the mover to rebuild toward
//! [`Route::goal`] once it runs off the end.

use bitflags::bitflags;

use npc_core::{EntityRef, NodeId, Vec3};

/// Waypoint capacity of a route.
pub const ROUTE_SIZE: usize = 8;

bitflags! {
    /// Why a waypoint exists.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WaypointFlags: u16 {
        const TO_TARGET      = 1 << 0;
        const TO_ENEMY       = 1 << 1;
        const TO_COVER       = 1 << 2;
        const TO_DETOUR      = 1 << 3;
        const TO_PATH_CORNER = 1 << 4;
        const TO_NODE        = 1 << 5;
        const TO_LOCATION    = 1 << 6;
        const IS_GOAL        = 1 << 7;
        const DONT_SIMPLIFY  = 1 << 8;

        /// Bits that qualify a waypoint rather than name its kind.
        const NOT_TO_MASK = Self::IS_GOAL.bits() | Self::DONT_SIMPLIFY.bits();
    }
}

impl WaypointFlags {
    /// The `TO_*` kind bits alone.
    #[inline]
    pub fn kind(self) -> WaypointFlags {
        self - WaypointFlags::NOT_TO_MASK
    }

    /// Simplification may drop this waypoint.
    #[inline]
    pub fn simplifiable(self) -> bool {
        let kind = self.kind();
        kind != WaypointFlags::TO_PATH_CORNER && !self.contains(WaypointFlags::DONT_SIMPLIFY)
    }
}

/// One route entry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub pos:   Vec3,
    pub flags: WaypointFlags,
    /// Graph node this waypoint was produced from.
    pub node:  Option<NodeId>,
}

impl Waypoint {
    pub fn new(pos: Vec3, flags: WaypointFlags) -> Self {
        Self { pos, flags, node: None }
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.flags.contains(WaypointFlags::IS_GOAL)
    }
}

/// What a route was built toward; kept so a stale route can be rebuilt.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveGoal {
    pub pos:    Vec3,
    /// A single `TO_*` kind bit.
    pub kind:   WaypointFlags,
    pub target: Option<EntityRef>,
}

/// The agent's current path.
#[derive(Clone, Debug, Default)]
pub struct Route {
    waypoints:   Vec<Waypoint>,
    index:       usize,
    pub goal:    Option<MoveGoal>,
    /// Node chain was longer than [`ROUTE_SIZE`]; no goal waypoint stored.
    pub partial: bool,
}

impl Route {
    pub fn new() -> Self {
        Self { waypoints: Vec::with_capacity(ROUTE_SIZE), index: 0, goal: None, partial: false }
    }

    /// Forget everything including the movement goal.
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.index = 0;
        self.goal = None;
        self.partial = false;
    }

    /// Drop the waypoints but remember the goal (for refresh).
    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
        self.index = 0;
        self.partial = false;
    }

    /// No waypoint left to walk.
    #[inline]
    pub fn is_clear(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn current(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.index)
    }

    pub fn next(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.index + 1)
    }

    /// Waypoints from the current one to the end.
    pub fn remaining(&self) -> &[Waypoint] {
        self.waypoints.get(self.index..).unwrap_or(&[])
    }

    /// All stored waypoints, walked or not.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// `true` when the current waypoint is the last stored slot.
    pub fn at_last_slot(&self) -> bool {
        self.index + 1 >= self.waypoints.len()
    }

    /// Append; returns `false` once the route is full.
    pub fn push(&mut self, wp: Waypoint) -> bool {
        if self.waypoints.len() >= ROUTE_SIZE {
            return false;
        }
        self.waypoints.push(wp);
        true
    }

    /// Step to the next waypoint.
    pub fn advance(&mut self) {
        if self.index < self.waypoints.len() {
            self.index += 1;
        }
    }

    /// Put `wp` in front of the current waypoint.  When the route is full
    /// the last waypoint is dropped and the route becomes partial.
    pub fn insert_current(&mut self, wp: Waypoint) {
        if self.waypoints.len() >= ROUTE_SIZE {
            let dropped = self.waypoints.pop();
            if dropped.is_some_and(|w| w.is_goal()) {
                self.partial = true;
            }
        }
        let at = self.index.min(self.waypoints.len());
        self.waypoints.insert(at, wp);
    }

    /// Replace every waypoint from the current index on, truncating to
    /// capacity, and restart the index at zero.
    pub fn replace_remaining(&mut self, waypoints: Vec<Waypoint>) {
        let mut kept: Vec<Waypoint> = waypoints;
        if kept.len() > ROUTE_SIZE {
            if kept[ROUTE_SIZE..].iter().any(|w| w.is_goal()) {
                self.partial = true;
            }
            kept.truncate(ROUTE_SIZE);
        }
        self.waypoints = kept;
        self.index = 0;
    }

    /// Number of stored goal waypoints (0 or 1 for a well-formed route).
    pub fn goal_count(&self) -> usize {
        self.waypoints.iter().filter(|w| w.is_goal()).count()
    }
}
