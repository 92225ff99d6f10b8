//! Fluent construction of [`Agent`]s.
//!
//! # Usage
//!
//! ```rust
//! use npc_agent::{AgentArena, AgentBuilder};
//! use npc_core::{Capabilities, Classification, SpeciesId, Vec3};
//!
//! let mut arena = AgentArena::new();
//! let grunt = arena.spawn(
//!     AgentBuilder::new(SpeciesId(0), Classification::HumanMilitary)
//!         .origin(Vec3::new(64.0, 0.0, 0.0))
//!         .capabilities(Capabilities::SQUAD | Capabilities::RANGE_ATTACK1)
//!         .group_name("alpha"),
//!     /*seed=*/ 42,
//! );
//!
//! let agent = arena.get(grunt).unwrap();
//! assert!(agent.squad.is_some());
//! assert!(!agent.in_squad());
//! ```

use npc_core::{
    AgentId, AgentRng, Capabilities, Classification, Conditions, Memory, MonsterState, SpawnFlags,
    SpeciesId, Vec3,
};
use npc_schedule::Activity;
use npc_spatial::{Hull, Route};

use crate::agent::{Agent, TaskStatus};
use crate::arena::AgentArena;
use crate::component::{RememberedEnemies, Senses, SquadState};

/// Builder for a single [`Agent`].  Every setter is optional.
#[derive(Clone, Debug)]
pub struct AgentBuilder {
    species:        SpeciesId,
    classification: Classification,
    origin:         Vec3,
    yaw:            f32,
    hull:           Hull,
    eye_height:     f32,
    capabilities:   Capabilities,
    spawn_flags:    SpawnFlags,
    group_name:     Option<String>,
    fov_degrees:    f32,
    yaw_speed:      f32,
    walk_speed:     f32,
    run_speed:      f32,
    health:         f32,
    patrol:         Vec<Vec3>,
    is_player:      bool,
    no_target:      bool,
}

impl AgentBuilder {
    pub fn new(species: SpeciesId, classification: Classification) -> Self {
        Self {
            species,
            classification,
            origin:       Vec3::ZERO,
            yaw:          0.0,
            hull:         Hull::HUMAN,
            eye_height:   64.0,
            capabilities: Capabilities::empty(),
            spawn_flags:  SpawnFlags::empty(),
            group_name:   None,
            fov_degrees:  120.0,
            yaw_speed:    180.0,
            walk_speed:   80.0,
            run_speed:    220.0,
            health:       50.0,
            patrol:       Vec::new(),
            is_player:    false,
            no_target:    false,
        }
    }

    /// Species the agent will be built as.
    pub fn species_id(&self) -> SpeciesId {
        self.species
    }

    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Sets the hull and an eye height proportional to it.
    pub fn hull(mut self, hull: Hull) -> Self {
        self.hull = hull;
        self.eye_height = hull.height * 0.9;
        self
    }

    pub fn eye_height(mut self, h: f32) -> Self {
        self.eye_height = h;
        self
    }

    pub fn capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities = caps;
        self
    }

    pub fn spawn_flags(mut self, flags: SpawnFlags) -> Self {
        self.spawn_flags = flags;
        self
    }

    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    /// Full view angle in degrees.
    pub fn fov_degrees(mut self, deg: f32) -> Self {
        self.fov_degrees = deg;
        self
    }

    pub fn yaw_speed(mut self, deg_per_sec: f32) -> Self {
        self.yaw_speed = deg_per_sec;
        self
    }

    pub fn speeds(mut self, walk: f32, run: f32) -> Self {
        self.walk_speed = walk;
        self.run_speed = run;
        self
    }

    pub fn health(mut self, hp: f32) -> Self {
        self.health = hp;
        self
    }

    /// Path corners walked by the `Patrol` schedule, in order.
    pub fn patrol(mut self, points: Vec<Vec3>) -> Self {
        self.patrol = points;
        self
    }

    pub fn player(mut self, is_player: bool) -> Self {
        self.is_player = is_player;
        self
    }

    pub fn no_target(mut self, no_target: bool) -> Self {
        self.no_target = no_target;
        self
    }

    /// Materialise the agent for handle `id`.
    pub fn build(self, id: AgentId, seed: u64) -> Agent {
        let squad = self
            .capabilities
            .contains(Capabilities::SQUAD)
            .then(SquadState::default);

        Agent {
            id,
            species:        self.species,
            classification: self.classification,
            spawn_flags:    self.spawn_flags,
            group_name:     self.group_name,
            capabilities:   self.capabilities,
            is_player:      self.is_player,
            no_target:      self.no_target,

            origin:       self.origin,
            velocity:     Vec3::ZERO,
            hull:         self.hull,
            eye_height:   self.eye_height,
            yaw:          npc_core::geo::angle_mod(self.yaw),
            ideal_yaw:    npc_core::geo::angle_mod(self.yaw),
            yaw_speed:    self.yaw_speed,
            fov:          (self.fov_degrees * 0.5).to_radians().cos(),
            walk_speed:   self.walk_speed,
            run_speed:    self.run_speed,
            ground_speed: 0.0,
            on_ground:    !self.capabilities.contains(Capabilities::FLY),
            health:       self.health,
            max_health:   self.health,

            state:         MonsterState::None,
            ideal_state:   MonsterState::Idle,
            schedule:      None,
            task_index:    0,
            task_status:   TaskStatus::New,
            fail_schedule: None,
            conditions:    Conditions::empty(),
            memory:        Memory::empty(),
            wait_until:    0.0,

            enemy:       None,
            enemy_lkp:   Vec3::ZERO,
            old_enemies: RememberedEnemies::default(),
            target:      None,

            route:           Route::new(),
            move_wait_until: f32::NEG_INFINITY,
            last_position:   None,
            move_spot:       None,
            patrol:          self.patrol,
            patrol_index:    0,

            activity:             Activity::Idle,
            ideal_activity:       Activity::Idle,
            sequence_finished_at: 0.0,

            last_damage_origin: None,
            last_damage_at:     f32::NEG_INFINITY,

            senses: Senses::default(),
            squad,
            script: None,
            rng:    AgentRng::new(seed, id),
        }
    }
}

impl AgentArena {
    /// Build and insert in one step.
    pub fn spawn(&mut self, builder: AgentBuilder, seed: u64) -> AgentId {
        let id = self.next_id();
        self.insert(builder.build(id, seed))
    }
}
