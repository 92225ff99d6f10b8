//! Spatial-subsystem error type.

use thiserror::Error;

use npc_core::{NodeId, Vec3};

/// Errors produced by `npc-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no graph node reachable near {0}")]
    NoNearbyNode(Vec3),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
