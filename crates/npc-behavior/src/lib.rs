//! `npc-behavior`: the per-agent brain.
//!
//! A think runs four phases over one agent:
//!
//! 1. **Sense**: `look` and `listen` rebuild perception, then the enemy is
//!    acquired and checked.
//! 2. **Evaluate**: the ideal state is updated from the live conditions.
//! 3. **Select**: when the running schedule is done, failed, interrupted
//!    or the state has moved, a new schedule is picked.
//! 4. **Execute**: the current task is started or advanced.
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | `species`    | [`Species`] hook trait, [`GenericSpecies`], registry   |
//! | `context`    | [`ThinkContext`], [`TaskEnv`]                          |
//! | `event`      | [`BrainEvent`], [`Attack`], [`ThinkOutput`]            |
//! | `conditions` | [`must_interrupt`], [`update_ideal_state`]             |
//! | `selector`   | [`select_schedule`], [`COMBAT_PRIORITY`]               |
//! | `executor`   | [`maintain_schedule`], [`change_schedule`]             |
//! | `tasks`      | standard task start/run implementations                |
//! | `enemy`      | [`get_enemy`], [`check_enemy`]                         |
//! | `cover`      | [`find_cover`]                                         |
//! | `brain`      | [`think`]                                              |
//! | `error`      | [`BehaviorError`], [`BehaviorResult`]                  |

pub mod brain;
pub mod conditions;
pub mod context;
pub mod cover;
pub mod enemy;
pub mod error;
pub mod event;
pub mod executor;
pub mod selector;
pub mod species;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use brain::think;
pub use conditions::{must_interrupt, update_ideal_state};
pub use context::{TaskEnv, ThinkContext};
pub use cover::find_cover;
pub use enemy::{attack_conditions, best_visible_enemy, check_enemy, get_enemy};
pub use error::{BehaviorError, BehaviorResult};
pub use event::{Attack, AttackKind, BrainEvent, ThinkOutput};
pub use executor::{change_schedule, maintain_schedule, MAX_SCHEDULE_ITERATIONS};
pub use selector::{
    fail_schedule, schedule_of_type, select_schedule, select_type, set_state, CombatRule, COMBAT_PRIORITY,
};
pub use species::{GenericSpecies, Species, SpeciesRegistry};
pub use tasks::FACE_TOLERANCE;
