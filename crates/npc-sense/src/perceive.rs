//! What one agent can know about another.
//!
//! The think loop mutates one agent at a time, so the look pass works from
//! a [`Perceivable`] snapshot of everyone else taken before the agent's
//! update rather than borrowing the arena.

use npc_agent::{Agent, AgentArena};
use npc_core::{AgentId, Classification, SpawnFlags, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Perceivable {
    pub id:             AgentId,
    pub origin:         Vec3,
    pub eye_height:     f32,
    pub classification: Classification,
    pub alive:          bool,
    pub is_player:      bool,
    pub no_target:      bool,
    pub prisoner:       bool,
    pub yaw:            f32,
    /// Cosine of the half view angle.
    pub fov:            f32,
    pub velocity:       Vec3,
    pub on_ground:      bool,
}

impl Perceivable {
    pub fn of(agent: &Agent) -> Self {
        Self {
            id:             agent.id,
            origin:         agent.origin,
            eye_height:     agent.eye_height,
            classification: agent.classification,
            alive:          agent.is_alive(),
            is_player:      agent.is_player,
            no_target:      agent.no_target,
            prisoner:       agent.spawn_flags.contains(SpawnFlags::PRISONER),
            yaw:            agent.yaw,
            fov:            agent.fov,
            velocity:       agent.velocity,
            on_ground:      agent.on_ground,
        }
    }

    #[inline]
    pub fn eye_position(&self) -> Vec3 {
        self.origin + Vec3::UP * self.eye_height
    }

    /// `true` when `point` lies inside this entity's view cone.
    #[inline]
    pub fn sees_point(&self, point: Vec3) -> bool {
        in_view_cone(self.origin, self.yaw, self.fov, point)
    }
}

/// Snapshot every live slot, in ascending handle order.
pub fn gather(arena: &AgentArena) -> Vec<Perceivable> {
    arena.iter().map(Perceivable::of).collect()
}

/// Plan-view cone test: the direction to `point` makes an angle with the
/// `yaw` heading whose cosine exceeds `fov`.
pub fn in_view_cone(origin: Vec3, yaw: f32, fov: f32, point: Vec3) -> bool {
    let dir = (point - origin).flat().normalize();
    dir.dot_2d(Vec3::from_yaw(yaw)) > fov
}
