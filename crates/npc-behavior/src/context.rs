use npc_agent::Stimulus;
use npc_core::{AgentId, EngineConfig, Vec3};
use npc_mobility::Router;
use npc_schedule::ScheduleCatalog;
use npc_sense::Perceivable;
use npc_spatial::{Occupant, WorldQuery};

use crate::event::ThinkOutput;
use crate::species::Species;

/// Read-only view of the world handed to one agent's think.
///
/// Built by the caller immediately before the think so the snapshots
/// reflect every earlier agent's update this tick.
pub struct ThinkContext<'a> {
    pub world:        &'a dyn WorldQuery,
    pub catalog:      &'a ScheduleCatalog,
    /// The thinking agent's species.
    pub species:      &'a dyn Species,
    pub config:       &'a EngineConfig,
    /// Simulation time in seconds.
    pub now:          f32,
    /// Seconds since the previous tick.
    pub dt:           f32,
    pub perceivables: &'a [Perceivable],
    pub stimuli:      &'a [Stimulus],
    pub occupants:    &'a [Occupant],
}

impl<'a> ThinkContext<'a> {
    pub fn perceivable(&self, id: AgentId) -> Option<&'a Perceivable> {
        self.perceivables.iter().find(|p| p.id == id)
    }

    /// A router over this tick's world and occupants.
    pub fn router(&self) -> Router<'a> {
        Router::new(self.world, self.occupants, self.config, self.now)
    }
}

/// What a task implementation may touch besides the agent itself.
pub struct TaskEnv<'e, 'a> {
    pub cx:  &'e ThinkContext<'a>,
    pub out: &'e mut ThinkOutput,
    /// Positions of the agent's squad mates, for cover spacing.
    pub mates: &'e [Vec3],
    /// Schedule requested by `SetSchedule`, installed by the executor.
    pub switch_to: Option<npc_schedule::ScheduleRef>,
}

impl<'e, 'a> TaskEnv<'e, 'a> {
    pub fn new(cx: &'e ThinkContext<'a>, out: &'e mut ThinkOutput, mates: &'e [Vec3]) -> Self {
        Self { cx, out, mates, switch_to: None }
    }

    /// Collect barrier-open requests the router made.
    pub fn absorb(&mut self, router: &mut Router<'_>) {
        self.out.barriers.extend(router.take_barrier_requests());
    }
}
