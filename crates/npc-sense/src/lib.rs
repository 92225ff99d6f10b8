//! `npc-sense`: the sensory aggregator.
//!
//! Sensing runs first in every think: it rebuilds an agent's visible and
//! audible lists and the perception-derived condition bits that the
//! interrupt evaluator and schedule selector read afterwards.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`perceive`]  | `Perceivable` snapshot of other agents, `gather`, view cones |
//! | [`look`]      | `look`: `SEE_*` conditions and the visible list            |
//! | [`listen`]    | `listen`, `best_sound`, `best_scent`, `expire_stimuli`     |
//!
//! Nothing here touches the agent's route or schedule.

pub mod listen;
pub mod look;
pub mod perceive;


pub use listen::{best_scent, best_sound, expire_stimuli, listen};
pub use look::look;
pub use perceive::{gather, in_view_cone, Perceivable};
