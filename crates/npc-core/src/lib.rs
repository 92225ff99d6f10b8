//! `npc-core`: foundational types for the npc behavior engine.
//!
//! Every other `npc-*` crate depends on this one.  It has no `npc-*`
//! dependencies and only a handful of external ones (`bitflags`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`ids`]      | `AgentId` (generational), `NodeId`, `SpeciesId`, `SolidId`, `EntityRef` |
//! | [`geo`]      | `Vec3`, yaw helpers, `Plane`                                  |
//! | [`time`]     | `Tick`, `SimClock`                                            |
//! | [`rng`]      | `AgentRng` (per-agent deterministic RNG)                      |
//! | [`flags`]    | `Conditions`, `SoundTypes`, `Capabilities`, `Memory`, `SpawnFlags` |
//! | [`relation`] | `Classification`, `Relationship`, default relationship table |
//! | [`state`]    | `MonsterState`                                                |
//! | [`config`]   | `EngineConfig` tunables                                       |
//! | [`error`]    | `NpcError`, `NpcResult`                                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config, flag and math types. |

pub mod config;
pub mod error;
pub mod flags;
pub mod geo;
pub mod ids;
pub mod relation;
pub mod rng;
pub mod state;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EngineConfig;
pub use error::{NpcError, NpcResult};
pub use flags::{Capabilities, Conditions, Memory, SoundTypes, SpawnFlags};
pub use geo::{Plane, Vec3};
pub use ids::{AgentId, EntityRef, NodeId, SolidId, SpeciesId};
pub use relation::{Classification, Relationship};
pub use rng::AgentRng;
pub use state::MonsterState;
pub use time::{SimClock, Tick};
