//! The local move check.
//!
//! A short, synchronous traversability probe shared by the router and the
//! local mover.  The segment is walked in fixed steps; each step sweeps the
//! hull's knee and head lines (centre and both flanks) through the world,
//! rejects other agents' cylinders, and for ground movers re-snaps to the
//! floor, refusing drops taller than a stair.  The loop runs at most
//! `ceil(distance / step) + 1` times.

use npc_core::{AgentId, EngineConfig, EntityRef, Vec3};

use crate::hull::Hull;
use crate::world::WorldQuery;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Another agent as seen by the probe: a vertical cylinder.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Occupant {
    pub id:        AgentId,
    pub origin:    Vec3,
    pub radius:    f32,
    pub height:    f32,
    pub moving:    bool,
    pub is_player: bool,
    pub on_ground: bool,
}

/// The agent being probed for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mover {
    pub id:     AgentId,
    pub hull:   Hull,
    pub flying: bool,
}

// ── Output ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocalMove {
    Valid,
    Invalid,
    /// Reachable in plan view but the goal sits far above or below; only the
    /// node graph can get there.
    InvalidDontTriangulate,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalMoveResult {
    pub status:  LocalMove,
    /// Distance covered before the first failing step.
    pub dist:    f32,
    pub blocker: Option<EntityRef>,
}

impl LocalMoveResult {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.status == LocalMove::Valid
    }
}

// ── MoveProbe ─────────────────────────────────────────────────────────────────

/// Geometry plus an occupant snapshot, ready to answer move checks.
#[derive(Copy, Clone)]
pub struct MoveProbe<'a> {
    pub world:              &'a dyn WorldQuery,
    pub occupants:          &'a [Occupant],
    pub step:               f32,
    pub step_height:        f32,
    pub max_vertical_delta: f32,
}

impl<'a> MoveProbe<'a> {
    pub fn new(world: &'a dyn WorldQuery, occupants: &'a [Occupant], config: &EngineConfig) -> Self {
        Self {
            world,
            occupants,
            step:               config.local_step.max(1.0),
            step_height:        config.step_height,
            max_vertical_delta: config.max_vertical_delta,
        }
    }

    pub fn occupant(&self, id: AgentId) -> Option<&Occupant> {
        self.occupants.iter().find(|o| o.id == id)
    }

    /// Walk `start → end` for `mover`.  Running into `target` counts as
    /// success.
    pub fn check_local_move(
        &self,
        mover:  &Mover,
        start:  Vec3,
        end:    Vec3,
        target: Option<EntityRef>,
    ) -> LocalMoveResult {
        let delta = end - start;
        let (dir, dist) = if mover.flying {
            (delta.normalize(), delta.length())
        } else {
            (delta.flat().normalize(), delta.length_2d())
        };

        let mut pos = if mover.flying {
            start
        } else {
            self.world.drop_to_floor(start).unwrap_or(start)
        };

        let max_steps = (dist / self.step).ceil() as usize + 1;
        let mut walked = 0.0_f32;
        let mut result = LocalMoveResult { status: LocalMove::Valid, dist: 0.0, blocker: None };

        for _ in 0..max_steps {
            if walked >= dist {
                break;
            }
            let step = self.step.min(dist - walked);
            match self.try_step(mover, pos, pos + dir * step) {
                Ok(landed) => {
                    pos = landed;
                    walked += step;
                }
                Err(hit) => {
                    if target != Some(hit) {
                        result.status = LocalMove::Invalid;
                        result.blocker = Some(hit);
                    }
                    break;
                }
            }
        }
        result.dist = walked;

        if result.status == LocalMove::Valid
            && !mover.flying
            && self.target_grounded(target)
            && (end.z - pos.z).abs() > self.max_vertical_delta
        {
            result.status = LocalMove::InvalidDontTriangulate;
        }
        result
    }

    /// Shorthand for a target-less validity test.
    #[inline]
    pub fn walkable(&self, mover: &Mover, start: Vec3, end: Vec3, target: Option<EntityRef>) -> bool {
        self.check_local_move(mover, start, end, target).is_valid()
    }

    /// One physics step.  Returns where the mover lands, or what stopped it.
    pub fn try_step(&self, mover: &Mover, from: Vec3, to: Vec3) -> Result<Vec3, EntityRef> {
        let travel = to - from;
        let fwd = if mover.flying { travel.normalize() } else { travel.flat().normalize() };
        let side = fwd.cross(Vec3::UP).normalize() * (mover.hull.radius - 1.0).max(0.0);
        let lead = fwd * mover.hull.radius;

        let lift = if mover.flying { 1.0 } else { self.step_height + 1.0 };
        let heights = [lift.min(mover.hull.height - 1.0), mover.hull.height - 1.0];
        for h in heights {
            let up = Vec3::UP * h;
            for off in [Vec3::ZERO, side, -side] {
                let tr = self.world.trace_line(from + up + off, to + up + off + lead);
                if !tr.is_clear() {
                    return Err(tr.hit.unwrap_or(EntityRef::World));
                }
            }
        }

        if let Some(hit) = self.occupant_hit(mover, from, to) {
            return Err(EntityRef::Agent(hit));
        }

        if mover.flying {
            return Ok(to);
        }
        let landed = self
            .world
            .drop_to_floor(to + Vec3::UP * self.step_height)
            .ok_or(EntityRef::World)?;
        if from.z - landed.z > self.step_height {
            return Err(EntityRef::World);
        }
        Ok(landed)
    }

    /// First other agent the step walks into.  Agents already overlapping
    /// the mover only block if the step brings them closer.
    fn occupant_hit(&self, mover: &Mover, from: Vec3, to: Vec3) -> Option<AgentId> {
        self.occupants
            .iter()
            .filter(|o| o.id != mover.id)
            .filter(|o| {
                let overlap_z = to.z < o.origin.z + o.height && o.origin.z < to.z + mover.hull.height;
                let reach = o.radius + mover.hull.radius;
                let d_to = o.origin.distance_2d(to);
                overlap_z && d_to < reach && d_to < o.origin.distance_2d(from)
            })
            .map(|o| o.id)
            .next()
    }

    fn target_grounded(&self, target: Option<EntityRef>) -> bool {
        match target {
            Some(EntityRef::Agent(id)) => self.occupant(id).is_none_or(|o| o.on_ground),
            _ => true,
        }
    }
}
