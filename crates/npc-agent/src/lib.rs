//! `npc-agent`: the agent record and where agents live.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`agent`]     | `Agent`, `TaskStatus`                                           |
//! | [`component`] | `SquadState`, `SquadSlots`, `ScriptState`, `Senses`, `Stimulus`, `RememberedEnemies` |
//! | [`arena`]     | `AgentArena` (generational slots, ascending iteration)          |
//! | [`builder`]   | `AgentBuilder`                                                  |
//!
//! Agents are composed rather than layered: squad and script behaviour are
//! optional components on the same record, and every cross-agent link is an
//! `AgentId` resolved through the arena.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `SquadSlots` and `Stimulus` |

pub mod agent;
pub mod arena;
pub mod builder;
pub mod component;

#[cfg(test)]
mod tests;

pub use agent::{Agent, TaskStatus};
pub use arena::AgentArena;
pub use builder::AgentBuilder;
pub use component::{
    RememberedEnemies, ScriptState, Senses, SquadSlots, SquadState, Stimulus, MAX_OLD_ENEMIES,
    MAX_SQUAD_MEMBERS,
};
