//! Schedule lookup: generic, per-species and fail-schedule tables.
//!
//! # Resolution
//!
//! ```text
//! resolve(species, type)
//!   → per-species entry for (species, type)
//!   → generic entry for type
//!   → generic IdleStand + warn!
//! ```
//!
//! The catalog is populated at startup and then only read, so the simulation
//! shares it behind an `Arc` without synchronisation.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use npc_core::{Conditions, SoundTypes, SpeciesId};

use crate::defaults::{default_schedules, DEFAULT_FAIL_SCHEDULES};
use crate::loader::{load_schedules_reader, LoadedSchedule};
use crate::schedule::{Schedule, ScheduleRef, ScheduleType};
use crate::task::{Activity, Task, TaskKind};
use crate::ScheduleResult;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// All schedules known to the engine.
#[derive(Clone, Debug)]
pub struct ScheduleCatalog {
    generic:  Map<ScheduleType, ScheduleRef>,
    species:  Map<(SpeciesId, ScheduleType), ScheduleRef>,
    by_name:  Map<String, ScheduleRef>,
    fail_for: Map<String, ScheduleType>,
    /// Returned when nothing else matches.
    fallback: ScheduleRef,
}

impl ScheduleCatalog {
    /// A catalog with no generic schedules.  Lookups still return the
    /// built-in idle fallback.
    pub fn empty() -> Self {
        let fallback = Schedule::fixed(
            "IdleStand",
            &[Task::of(TaskKind::StopMoving), Task::set_activity(Activity::Idle), Task::wait(5.0)],
            Conditions::NEW_ENEMY | Conditions::ANY_DAMAGE | Conditions::HEAR_SOUND | Conditions::PROVOKED,
            SoundTypes::ALL_SOUNDS,
        );
        Self {
            generic:  Map::default(),
            species:  Map::default(),
            by_name:  Map::default(),
            fail_for: Map::default(),
            fallback,
        }
    }

    /// The full generic set plus the stock fail-schedule registrations.
    pub fn with_defaults() -> Self {
        let mut cat = Self::empty();
        for (ty, sched) in default_schedules() {
            cat.insert_generic(ty, sched);
        }
        for &(name, ty) in DEFAULT_FAIL_SCHEDULES {
            cat.register_fail(name, ty);
        }
        if let Some(idle) = cat.generic(ScheduleType::IdleStand) {
            cat.fallback = idle;
        }
        cat
    }

    // ── Population ────────────────────────────────────────────────────────

    pub fn insert_generic(&mut self, ty: ScheduleType, schedule: ScheduleRef) {
        self.by_name.insert(schedule.name().to_owned(), Arc::clone(&schedule));
        self.generic.insert(ty, schedule);
    }

    pub fn insert_species(&mut self, species: SpeciesId, ty: ScheduleType, schedule: ScheduleRef) {
        self.by_name.insert(schedule.name().to_owned(), Arc::clone(&schedule));
        self.species.insert((species, ty), schedule);
    }

    /// Make a schedule findable by name without binding it to a type.
    pub fn insert_named(&mut self, schedule: ScheduleRef) {
        self.by_name.insert(schedule.name().to_owned(), schedule);
    }

    /// Failing schedule `name` continues with schedule type `ty`.
    pub fn register_fail(&mut self, name: impl Into<String>, ty: ScheduleType) {
        self.fail_for.insert(name.into(), ty);
    }

    /// Add rows loaded from CSV; returns how many schedules were added.
    pub fn extend(&mut self, loaded: Vec<LoadedSchedule>) -> usize {
        let n = loaded.len();
        for entry in loaded {
            if let Some(fail) = entry.fail {
                self.register_fail(entry.schedule.name(), fail);
            }
            match (entry.species, entry.ty) {
                (Some(sp), Some(ty)) => self.insert_species(sp, ty, entry.schedule),
                (None, Some(ty)) => self.insert_generic(ty, entry.schedule),
                _ => self.insert_named(entry.schedule),
            }
        }
        n
    }

    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> ScheduleResult<usize> {
        let loaded = load_schedules_reader(reader)?;
        Ok(self.extend(loaded))
    }

    pub fn extend_from_csv(&mut self, path: &Path) -> ScheduleResult<usize> {
        let file = std::fs::File::open(path)?;
        self.extend_from_reader(file)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn generic(&self, ty: ScheduleType) -> Option<ScheduleRef> {
        self.generic.get(&ty).cloned()
    }

    pub fn species(&self, species: SpeciesId, ty: ScheduleType) -> Option<ScheduleRef> {
        self.species.get(&(species, ty)).cloned()
    }

    pub fn by_name(&self, name: &str) -> Option<ScheduleRef> {
        if name.is_empty() {
            tracing::warn!("lookup of unnamed schedule");
            return None;
        }
        self.by_name.get(name).cloned()
    }

    /// Registered fail continuation for schedule `name`.
    pub fn fail_for(&self, name: &str) -> Option<ScheduleType> {
        self.fail_for.get(name).copied()
    }

    /// Per-species entry, then generic, then the idle fallback.  Never fails;
    /// a miss is logged.
    pub fn resolve(&self, species: SpeciesId, ty: ScheduleType) -> ScheduleRef {
        if let Some(s) = self.species(species, ty).or_else(|| self.generic(ty)) {
            return s;
        }
        tracing::warn!(%species, schedule_type = %ty, "no schedule of requested type, using IdleStand");
        Arc::clone(&self.fallback)
    }

    pub fn fallback(&self) -> ScheduleRef {
        Arc::clone(&self.fallback)
    }

    /// Number of distinct named schedules.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for ScheduleCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
