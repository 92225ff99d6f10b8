use npc_behavior::BehaviorError;
use npc_core::{AgentId, NpcError};
use npc_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("agent {0} is dead")]
    AgentDead(AgentId),

    #[error(transparent)]
    Core(#[from] NpcError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),

    #[error("schedule catalog: {0}")]
    Schedule(#[from] ScheduleError),
}

pub type SimResult<T> = Result<T, SimError>;
