//! Navigation node graph and builder.
//!
//! # Data layout
//!
//! Outgoing links are stored in **Compressed Sparse Row** form.  Node `n`'s
//! links occupy the index range
//!
//! ```text
//! link_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! with parallel arrays for link cost, permitted hulls, required
//! capabilities and an optional barrier (door).  Iterating a node's links
//! is a contiguous scan, which is what Dijkstra's inner loop wants.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over 3-D node positions answers nearest-node and
//! k-nearest queries for route endpoints and cover search.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use npc_core::{Capabilities, NodeId, Vec3};

use crate::hull::HullMask;
use crate::world::Barrier;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f32; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── LinkSpec ──────────────────────────────────────────────────────────────────

/// Traversal constraints attached to a link.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkSpec {
    /// Hull classes allowed through.
    pub hulls:    HullMask,
    /// Capabilities an agent must have *all* of.
    pub requires: Capabilities,
    /// Door sitting on the link.
    pub barrier:  Option<Barrier>,
}

impl LinkSpec {
    pub fn door(barrier: Barrier) -> Self {
        Self { hulls: HullMask::GROUND, requires: Capabilities::OPEN_DOORS, barrier: Some(barrier) }
    }
}

impl Default for LinkSpec {
    fn default() -> Self {
        Self { hulls: HullMask::all(), requires: Capabilities::empty(), barrier: None }
    }
}

// ── NodeGraph ─────────────────────────────────────────────────────────────────

/// Directed navigation graph in CSR form plus a spatial index.
///
/// Construct with [`NodeGraphBuilder`].
pub struct NodeGraph {
    pub node_pos:       Vec<Vec3>,
    /// `node_count + 1` row pointers into the link arrays.
    pub node_out_start: Vec<u32>,
    pub link_from:      Vec<NodeId>,
    pub link_to:        Vec<NodeId>,
    /// Link length, used as the Dijkstra cost.
    pub link_cost:      Vec<f32>,
    pub link_spec:      Vec<LinkSpec>,
    spatial_idx:        RTree<NodeEntry>,
}

impl NodeGraph {
    pub fn empty() -> Self {
        NodeGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> Option<Vec3> {
        self.node_pos.get(node.index()).copied()
    }

    /// Indices of `node`'s outgoing links.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> std::ops::Range<usize> {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    /// The link `a → b`, if one exists.
    pub fn find_link(&self, a: NodeId, b: NodeId) -> Option<usize> {
        if a.index() >= self.node_count() {
            return None;
        }
        self.out_links(a).find(|&l| self.link_to[l] == b)
    }

    /// `true` when an agent with `hulls`/`caps` may use link `l`.
    #[inline]
    pub fn link_usable(&self, l: usize, hulls: HullMask, caps: Capabilities) -> bool {
        let spec = &self.link_spec[l];
        spec.hulls.intersects(hulls) && caps.contains(spec.requires)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    pub fn nearest(&self, pos: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y, pos.z])
            .map(|e| e.id)
    }

    /// Up to `k` nearest nodes, ascending distance.
    pub fn k_nearest(&self, pos: Vec3, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y, pos.z])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── NodeGraphBuilder ──────────────────────────────────────────────────────────

/// Accumulates nodes and links, then packs them with [`build`](Self::build).
///
/// ```
/// use npc_core::Vec3;
/// use npc_spatial::NodeGraphBuilder;
///
/// let mut b = NodeGraphBuilder::new();
/// let a = b.add_node(Vec3::new(0.0, 0.0, 0.0));
/// let c = b.add_node(Vec3::new(128.0, 0.0, 0.0));
/// b.add_link(a, c);
/// let graph = b.build();
/// assert_eq!(graph.link_count(), 2); // bidirectional
/// ```
pub struct NodeGraphBuilder {
    nodes:     Vec<Vec3>,
    raw_links: Vec<RawLink>,
}

struct RawLink {
    from: NodeId,
    to:   NodeId,
    cost: f32,
    spec: LinkSpec,
}

impl NodeGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_links: Vec::new() }
    }

    pub fn add_node(&mut self, pos: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Directed link with explicit constraints; cost is the straight-line
    /// distance between the endpoints.
    pub fn add_directed_link(&mut self, from: NodeId, to: NodeId, spec: LinkSpec) {
        let cost = match (self.nodes.get(from.index()), self.nodes.get(to.index())) {
            (Some(&a), Some(&b)) => a.distance(b),
            _ => f32::INFINITY,
        };
        self.raw_links.push(RawLink { from, to, cost, spec });
    }

    /// Unconstrained link in both directions.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) {
        self.add_link_with(a, b, LinkSpec::default());
    }

    pub fn add_link_with(&mut self, a: NodeId, b: NodeId, spec: LinkSpec) {
        self.add_directed_link(a, b, spec);
        self.add_directed_link(b, a, spec);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder.  O(E log E) link sort + O(N log N) R-tree load.
    pub fn build(self) -> NodeGraph {
        let node_count = self.nodes.len();

        let mut raw = self.raw_links;
        raw.retain(|l| l.from.index() < node_count && l.to.index() < node_count);
        raw.sort_by_key(|l| l.from.0);

        let link_from: Vec<NodeId>   = raw.iter().map(|l| l.from).collect();
        let link_to:   Vec<NodeId>   = raw.iter().map(|l| l.to).collect();
        let link_cost: Vec<f32>      = raw.iter().map(|l| l.cost).collect();
        let link_spec: Vec<LinkSpec> = raw.iter().map(|l| l.spec).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for l in &raw {
            node_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y, p.z], id: NodeId(i as u32) })
            .collect();

        NodeGraph {
            node_pos: self.nodes,
            node_out_start,
            link_from,
            link_to,
            link_cost,
            link_spec,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}

impl Default for NodeGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
