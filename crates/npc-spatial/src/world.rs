//! The geometry/query collaborator.
//!
//! # Pluggability
//!
//! The engine calls geometry only through [`WorldQuery`], so an application
//! can back it with a BSP, a navmesh or a physics engine.  [`BoxWorld`]
//! is the bundled implementation used by tests and the demo.
//!
//! [`BoxWorld`]: crate::BoxWorld

use npc_core::{Capabilities, EntityRef, NodeId, SolidId, Vec3};

use crate::hull::HullClass;

// ── TraceResult ───────────────────────────────────────────────────────────────

/// Outcome of a line trace against world geometry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TraceResult {
    /// Fraction of the segment travelled before the hit; `1.0` when clear.
    pub fraction: f32,
    /// What was hit, if anything.
    pub hit:      Option<EntityRef>,
    /// Surface normal at the hit point (zero when clear).
    pub normal:   Vec3,
}

impl TraceResult {
    pub const CLEAR: TraceResult = TraceResult { fraction: 1.0, hit: None, normal: Vec3::ZERO };

    #[inline]
    pub fn is_clear(&self) -> bool {
        self.fraction >= 1.0
    }
}

// ── Barrier ───────────────────────────────────────────────────────────────────

/// An openable solid sitting on a graph link (a door).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Barrier {
    pub solid:        SolidId,
    /// Seconds the barrier takes to finish opening.
    pub operate_secs: f32,
}

// ── WorldQuery ────────────────────────────────────────────────────────────────

/// Geometry services consumed by senses, routing and movement.
///
/// Traces ignore agents; agent-vs-agent blocking is handled by
/// [`MoveProbe`](crate::MoveProbe) from an occupant snapshot.
pub trait WorldQuery {
    /// Trace a line through static and openable geometry.
    fn trace_line(&self, start: Vec3, end: Vec3) -> TraceResult;

    /// Snap `pos` straight down onto the highest floor at or below it.
    /// `None` when there is no floor underneath.
    fn drop_to_floor(&self, pos: Vec3) -> Option<Vec3>;

    /// Closest navigation node usable with `caps`.
    fn nearest_node(&self, pos: Vec3, caps: Capabilities) -> Option<NodeId>;

    /// Node chain from `from` to `to` inclusive, filtered by hull and
    /// capabilities.  `None` when the nodes are disconnected.
    fn shortest_path(
        &self,
        from: NodeId,
        to:   NodeId,
        hull: HullClass,
        caps: Capabilities,
    ) -> Option<Vec<NodeId>>;

    fn node_position(&self, node: NodeId) -> Option<Vec3>;

    /// Up to `limit` nodes ordered by distance from `pos`.
    fn nodes_near(&self, pos: Vec3, limit: usize) -> Vec<NodeId>;

    /// Openable barrier on the link `a → b`, if any.
    fn barrier_between(&self, _a: NodeId, _b: NodeId) -> Option<Barrier> {
        None
    }

    /// Start opening a barrier.  Worlds without doors ignore this.
    fn open_barrier(&mut self, _solid: SolidId) {}
}
