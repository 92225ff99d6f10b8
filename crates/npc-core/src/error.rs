//! Engine-wide error type.
//!
//! Sub-crates define their own error enums and wrap `NpcError` with
//! `#[from]` where a core failure can surface through them.

use thiserror::Error;

use crate::{AgentId, NodeId, SpeciesId};

/// The base error type shared by all `npc-*` crates.
#[derive(Debug, Error)]
pub enum NpcError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("agent handle {0} is stale")]
    StaleHandle(AgentId),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("species {0} is not registered")]
    UnknownSpecies(SpeciesId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `npc-*` crates.
pub type NpcResult<T> = Result<T, NpcError>;
