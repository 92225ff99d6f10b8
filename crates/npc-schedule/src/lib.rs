//! `npc-schedule`: tasks, schedules and the schedule catalog.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`task`]      | `TaskKind` (closed catalog), `Task`, `ParamMeaning`, `Activity` |
//! | [`schedule`]  | `Schedule`, `ScheduleRef`, `ScheduleType`                     |
//! | [`catalog`]   | `ScheduleCatalog` (generic, per-species, fail registry)       |
//! | [`defaults`]  | the generic schedule set                                      |
//! | [`loader`]    | `load_schedules_csv`, `load_schedules_reader`                 |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `serde`   | `Serialize`/`Deserialize` on tasks and enums         |
//! | `fx-hash` | `rustc-hash` maps inside `ScheduleCatalog`           |

pub mod catalog;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod schedule;
pub mod task;

#[cfg(test)]
mod tests;

pub use catalog::ScheduleCatalog;
pub use defaults::default_schedules;
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_schedules_csv, load_schedules_reader, LoadedSchedule};
pub use schedule::{Schedule, ScheduleRef, ScheduleType};
pub use task::{voice, Activity, ParamMeaning, Task, TaskKind};
