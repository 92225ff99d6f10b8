//! Shortest paths over [`NodeGraph`].
//!
//! Plain Dijkstra with link filtering: a link is only relaxed when the
//! agent's hull class is permitted on it and the agent has every capability
//! the link requires.  Costs are link lengths in world units.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use npc_core::{Capabilities, NodeId};

use crate::graph::NodeGraph;
use crate::hull::HullClass;
use crate::{SpatialError, SpatialResult};

/// Heap entry ordered by cost, then node for deterministic tie-breaks.
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f32,
    node: NodeId,
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Node chain `from ..= to`.  `from == to` yields a single-node path.
pub fn shortest_path(
    graph: &NodeGraph,
    from:  NodeId,
    to:    NodeId,
    hull:  HullClass,
    caps:  Capabilities,
) -> SpatialResult<Vec<NodeId>> {
    let n = graph.node_count();
    if from.index() >= n {
        return Err(SpatialError::NodeNotFound(from));
    }
    if to.index() >= n {
        return Err(SpatialError::NodeNotFound(to));
    }
    if from == to {
        return Ok(vec![from]);
    }

    let hulls = hull.mask();
    let mut dist = vec![f32::INFINITY; n];
    let mut prev = vec![NodeId::INVALID; n];
    dist[from.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Reverse(Frontier { cost: 0.0, node: from }));

    while let Some(Reverse(Frontier { cost, node })) = heap.pop() {
        if node == to {
            return Ok(reconstruct(&prev, from, to));
        }
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }
        for l in graph.out_links(node) {
            if !graph.link_usable(l, hulls, caps) {
                continue;
            }
            let next = graph.link_to[l];
            let next_cost = cost + graph.link_cost[l];
            if next_cost < dist[next.index()] {
                dist[next.index()] = next_cost;
                prev[next.index()] = node;
                heap.push(Reverse(Frontier { cost: next_cost, node: next }));
            }
        }
    }

    Err(SpatialError::NoPath { from, to })
}

fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        if !cur.is_valid() {
            break;
        }
        path.push(cur);
    }
    path.reverse();
    path
}
