use thiserror::Error;

use npc_core::SpeciesId;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("species {0} is not registered")]
    UnknownSpecies(SpeciesId),

    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
