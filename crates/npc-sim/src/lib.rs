//! `npc-sim`: tick loop for the npc behavior engine.
//!
//! # Tick loop
//!
//! ```text
//! each step:
//!   ① Expire: drop stimuli whose lifetime has run out.
//!   ② Think:  drain agents due this tick from the ThinkQueue and run
//!             npc_behavior::think for each, ascending handle order,
//!             sequentially.  Unrecruited squad agents recruit first.
//!   ③ Apply:  in think order:
//!               barriers → WorldQuery::open_barrier
//!               sounds   → stimulus list
//!               attacks  → apply_damage (death, squad removal, cry)
//! ```
//!
//! Outside the loop the host drives agents through [`Sim::spawn`],
//! [`Sim::remove`], [`Sim::apply_damage`], [`Sim::emit_sound`],
//! [`Sim::begin_script`] and [`Sim::set_prone`] / [`Sim::release_prone`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use npc_agent::AgentBuilder;
//! use npc_core::{Classification, EngineConfig, SpeciesId, Vec3};
//! use npc_sim::{NoopObserver, SimBuilder};
//! use npc_spatial::BoxWorld;
//!
//! let world = BoxWorld::new(Vec3::new(-512.0, -512.0, 0.0), Vec3::new(512.0, 512.0, 0.0));
//! let mut sim = SimBuilder::new(EngineConfig::default(), world).build()?;
//! sim.spawn(AgentBuilder::new(SpeciesId(0), Classification::HumanMilitary))?;
//! sim.run_ticks(50, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod queue;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use queue::ThinkQueue;
pub use sim::{Sim, DEATH_SOUND_SECS, DEATH_VOLUME, HEAVY_DAMAGE_THRESHOLD};
