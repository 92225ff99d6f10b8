//! `npc-squad`: the squad coordinator.
//!
//! A squad is rooted at a leader agent.  The leader's [`SquadState`] holds
//! up to four member handles, the claimed-slot bitmask, and (through its
//! `enemy_lkp`) the squad's shared last known enemy position.  Members only
//! hold the leader's handle.  All operations take the arena and resolve
//! handles on every call, so a freed agent simply drops out.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`roster`]  | `squad_add`, `squad_remove`, `members`, `squad_count`          |
//! | [`recruit`] | `recruit`: group-name and line-of-sight recruitment            |
//! | [`slots`]   | `occupy_slot`, `vacate_slot`, `squad_enemy_split`              |
//! | [`enemy`]   | `squad_make_enemy`, `paste_enemy_info`, `copy_enemy_info`      |
//! | [`fire`]    | `no_friendly_fire`, `squad_member_in_range`                    |
//!
//! Enemy propagation mutates siblings immediately: members that think later
//! in the same tick see the new enemy, members that already thought pick it
//! up on their next think.
//!
//! [`SquadState`]: npc_agent::SquadState

pub mod enemy;
pub mod fire;
pub mod recruit;
pub mod roster;
pub mod slots;


pub use enemy::{copy_enemy_info, paste_enemy_info, squad_make_enemy};
pub use fire::{no_friendly_fire, squad_member_in_range, MEMBER_CLEARANCE};
pub use recruit::recruit;
pub use roster::{leader_of, members, squad_add, squad_count, squad_remove};
pub use slots::{occupy_slot, squad_enemy_split, vacate_slot};
