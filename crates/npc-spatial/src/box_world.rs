//! Axis-aligned reference world.
//!
//! A flat floor at `z = 0` bounded by a rectangle, with box-shaped solids
//! standing on it and a navigation graph laid over it.  Solids double as
//! raised floors (crates, ledges) and doors can be opened, after which they
//! no longer block traces.

use npc_core::{Capabilities, EntityRef, NodeId, SolidId, Vec3};

use crate::graph::NodeGraph;
use crate::hull::HullClass;
use crate::pathfind;
use crate::world::{Barrier, TraceResult, WorldQuery};

/// Tolerance used when deciding whether a point rests on a surface.
const SURFACE_EPSILON: f32 = 0.5;

/// Eye height used for node visibility checks.
const NODE_EYE: f32 = 32.0;

// ── Solid ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    pub id:   SolidId,
    pub min:  Vec3,
    pub max:  Vec3,
    /// Only doors can be opened.
    pub door: bool,
    pub open: bool,
}

impl Solid {
    #[inline]
    fn blocks(&self) -> bool {
        !self.open
    }

    #[inline]
    fn covers_xy(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Slab test; returns entry fraction and face normal.
    fn intersect(&self, start: Vec3, end: Vec3) -> Option<(f32, Vec3)> {
        let d = end - start;
        let (mut t_enter, mut t_exit) = (0.0_f32, 1.0_f32);
        let mut normal = Vec3::ZERO;
        let axes = [
            (start.x, d.x, self.min.x, self.max.x, Vec3::new(1.0, 0.0, 0.0)),
            (start.y, d.y, self.min.y, self.max.y, Vec3::new(0.0, 1.0, 0.0)),
            (start.z, d.z, self.min.z, self.max.z, Vec3::new(0.0, 0.0, 1.0)),
        ];
        for (s, dv, lo, hi, axis) in axes {
            if dv.abs() < f32::EPSILON {
                if s < lo || s > hi {
                    return None;
                }
                continue;
            }
            let (t0, t1) = ((lo - s) / dv, (hi - s) / dv);
            let (near, far, n) = if t0 < t1 { (t0, t1, -axis) } else { (t1, t0, axis) };
            if near > t_enter {
                t_enter = near;
                normal = n;
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }
        Some((t_enter, normal))
    }
}

// ── BoxWorld ──────────────────────────────────────────────────────────────────

pub struct BoxWorld {
    /// Floor rectangle corners (z ignored).
    pub floor_min: Vec3,
    pub floor_max: Vec3,
    pub solids:    Vec<Solid>,
    pub graph:     NodeGraph,
}

impl BoxWorld {
    /// Empty floor spanning `min..max` in plan view.
    pub fn new(floor_min: Vec3, floor_max: Vec3) -> Self {
        Self { floor_min, floor_max, solids: Vec::new(), graph: NodeGraph::empty() }
    }

    pub fn with_graph(mut self, graph: NodeGraph) -> Self {
        self.graph = graph;
        self
    }

    /// Add a solid box and return its id.
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> SolidId {
        self.push_solid(min, max, false)
    }

    /// Add a closed door.
    pub fn add_door(&mut self, min: Vec3, max: Vec3) -> SolidId {
        self.push_solid(min, max, true)
    }

    fn push_solid(&mut self, min: Vec3, max: Vec3, door: bool) -> SolidId {
        let id = SolidId(self.solids.len() as u32);
        self.solids.push(Solid { id, min, max, door, open: false });
        id
    }

    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        self.solids.get(id.index())
    }

    fn on_floor_plan(&self, p: Vec3) -> bool {
        p.x >= self.floor_min.x && p.x <= self.floor_max.x && p.y >= self.floor_min.y && p.y <= self.floor_max.y
    }

    fn node_visible(&self, pos: Vec3, node: NodeId) -> bool {
        self.graph.position(node).is_some_and(|np| {
            let eye = Vec3::UP * NODE_EYE;
            self.trace_line(pos + eye, np + eye).is_clear()
        })
    }
}

impl WorldQuery for BoxWorld {
    fn trace_line(&self, start: Vec3, end: Vec3) -> TraceResult {
        let mut best = TraceResult::CLEAR;
        for s in self.solids.iter().filter(|s| s.blocks()) {
            if let Some((t, normal)) = s.intersect(start, end) {
                if t < best.fraction {
                    best = TraceResult { fraction: t, hit: Some(EntityRef::Solid(s.id)), normal };
                }
            }
        }
        best
    }

    fn drop_to_floor(&self, pos: Vec3) -> Option<Vec3> {
        let mut top: Option<f32> = None;
        if self.on_floor_plan(pos) && pos.z >= -SURFACE_EPSILON {
            top = Some(0.0);
        }
        for s in self.solids.iter().filter(|s| s.blocks() && s.covers_xy(pos)) {
            if s.max.z <= pos.z + SURFACE_EPSILON && top.is_none_or(|t| s.max.z > t) {
                top = Some(s.max.z);
            }
        }
        top.map(|z| Vec3::new(pos.x, pos.y, z))
    }

    fn nearest_node(&self, pos: Vec3, _caps: Capabilities) -> Option<NodeId> {
        let candidates = self.graph.k_nearest(pos, 8);
        candidates
            .iter()
            .copied()
            .find(|&n| self.node_visible(pos, n))
            .or_else(|| candidates.first().copied())
    }

    fn shortest_path(
        &self,
        from: NodeId,
        to:   NodeId,
        hull: HullClass,
        caps: Capabilities,
    ) -> Option<Vec<NodeId>> {
        match pathfind::shortest_path(&self.graph, from, to, hull, caps) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::trace!(%err, "graph query failed");
                None
            }
        }
    }

    fn node_position(&self, node: NodeId) -> Option<Vec3> {
        self.graph.position(node)
    }

    fn nodes_near(&self, pos: Vec3, limit: usize) -> Vec<NodeId> {
        self.graph.k_nearest(pos, limit)
    }

    fn barrier_between(&self, a: NodeId, b: NodeId) -> Option<Barrier> {
        let link = self.graph.find_link(a, b)?;
        let barrier = self.graph.link_spec[link].barrier?;
        // An already-open door no longer needs operating.
        match self.solid(barrier.solid) {
            Some(s) if !s.open => Some(barrier),
            _ => None,
        }
    }

    fn open_barrier(&mut self, solid: SolidId) {
        if let Some(s) = self.solids.get_mut(solid.index()) {
            if s.door {
                s.open = true;
            }
        }
    }
}
