use npc_core::{EntityRef, NodeId, Vec3};
use npc_spatial::SpatialError;
use thiserror::Error;

/// Why a route could not be built or walked.  Callers turn every variant
/// into a task failure.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no navigation node near {0}")]
    NoNode(Vec3),

    #[error("no graph path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("route has no remembered goal")]
    NoGoal,

    #[error("no patrol points left to walk")]
    NoPatrol,

    #[error("movement blocked by {0}")]
    Blocked(EntityRef),

    #[error("graph error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type RouteResult<T> = Result<T, RouteError>;
