//! Fluent builder for constructing a [`Sim`].

use std::path::PathBuf;
use std::sync::Arc;

use npc_agent::AgentArena;
use npc_behavior::{GenericSpecies, SpeciesRegistry};
use npc_core::{EngineConfig, SimClock};
use npc_schedule::ScheduleCatalog;
use npc_spatial::WorldQuery;
use tracing::info;

use crate::queue::ThinkQueue;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<W>`].
///
/// # Optional inputs
///
/// | Method               | Default                                   |
/// |----------------------|-------------------------------------------|
/// | `.catalog(c)`        | `ScheduleCatalog::with_defaults()`        |
/// | `.schedules_csv(p)`  | none; each file extends the catalog       |
/// | `.species(r)`        | registry holding only `GenericSpecies`    |
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(EngineConfig::default(), world)
///     .schedules_csv("data/grunt.csv")
///     .build()?;
/// let id = sim.spawn(AgentBuilder::new(SpeciesId(0), Classification::HumanMilitary))?;
/// sim.run_ticks(100, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<W: WorldQuery> {
    config:    EngineConfig,
    world:     W,
    catalog:   Option<ScheduleCatalog>,
    csv_files: Vec<PathBuf>,
    species:   Option<SpeciesRegistry>,
}

impl<W: WorldQuery> SimBuilder<W> {
    pub fn new(config: EngineConfig, world: W) -> Self {
        Self { config, world, catalog: None, csv_files: Vec::new(), species: None }
    }

    /// Replace the default schedule catalog.
    pub fn catalog(mut self, catalog: ScheduleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Extend the catalog from a schedule CSV file when building.
    pub fn schedules_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_files.push(path.into());
        self
    }

    /// Species hooks, indexed by `SpeciesId`.
    pub fn species(mut self, registry: SpeciesRegistry) -> Self {
        self.species = Some(registry);
        self
    }

    /// Validate the configuration, load schedule files and return a sim at
    /// tick zero with no agents.
    pub fn build(self) -> SimResult<Sim<W>> {
        self.config.validate()?;

        let mut catalog = self.catalog.unwrap_or_else(ScheduleCatalog::with_defaults);
        for path in &self.csv_files {
            let added = catalog.extend_from_csv(path)?;
            info!(path = %path.display(), schedules = added, "loaded schedules");
        }
        if catalog.is_empty() {
            return Err(SimError::Config("schedule catalog is empty".into()));
        }

        let species = self.species.unwrap_or_else(|| {
            let mut registry = SpeciesRegistry::new();
            registry.register(GenericSpecies);
            registry
        });
        if species.is_empty() {
            return Err(SimError::Config("no species registered".into()));
        }

        Ok(Sim {
            clock:   SimClock::new(self.config.tick_secs),
            config:  self.config,
            arena:   AgentArena::new(),
            world:   self.world,
            catalog: Arc::new(catalog),
            species,
            stimuli: Vec::new(),
            queue:   ThinkQueue::new(),
        })
    }
}
