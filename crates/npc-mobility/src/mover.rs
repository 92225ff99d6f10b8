//! The local mover.

use npc_agent::Agent;
use npc_core::geo::{angle_mod, yaw_delta};
use npc_core::{EntityRef, Memory, Vec3};
use npc_spatial::WaypointFlags;
use tracing::{debug, trace};

use crate::error::RouteError;
use crate::router::{next_patrol_corner, Router};

/// A blocked-by-mover wait is only repeated after this many seconds.
const WAIT_COOLDOWN_SECS: f32 = 3.0;

/// Pause after rebuilding a route around a blockage.
const REFRESH_PAUSE_SECS: f32 = 0.1;

#[derive(Debug)]
pub enum MoveStatus {
    /// Still walking (possibly after inserting a detour).
    Moving,
    /// Held in place: a door is opening or another agent is in the way.
    Waiting,
    /// The goal waypoint was reached and the route cleared.
    Arrived,
    Failed(RouteError),
}

#[derive(Debug)]
pub struct MoveOutcome {
    pub status:  MoveStatus,
    /// What the lookahead check ran into this tick, if anything.
    pub blocker: Option<EntityRef>,
}

impl MoveOutcome {
    fn new(status: MoveStatus, blocker: Option<EntityRef>) -> Self {
        Self { status, blocker }
    }

    pub fn is_arrived(&self) -> bool {
        matches!(self.status, MoveStatus::Arrived)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, MoveStatus::Failed(_))
    }
}

/// Turn toward `ideal_yaw` by at most `yaw_speed * dt` degrees.  Returns
/// the signed amount turned.
pub fn change_yaw(agent: &mut Agent, dt: f32) -> f32 {
    let delta = yaw_delta(agent.yaw, agent.ideal_yaw);
    let max = agent.yaw_speed * dt;
    let turn = delta.clamp(-max, max);
    agent.yaw = angle_mod(agent.yaw + turn);
    turn
}

/// Advance `agent` along its route for one tick of `dt` seconds.
pub fn move_agent(router: &mut Router<'_>, agent: &mut Agent, dt: f32) -> MoveOutcome {
    let now = router.now();
    let config = router.config();

    if agent.route.is_clear() {
        // A route cut short by simplification still knows its goal.
        if let Err(err) = router.refresh_route(agent) {
            return MoveOutcome::new(MoveStatus::Failed(err), None);
        }
        if agent.route.is_clear() {
            return MoveOutcome::new(MoveStatus::Failed(RouteError::NoGoal), None);
        }
    }
    if agent.move_wait_until > now {
        return MoveOutcome::new(MoveStatus::Waiting, None);
    }

    let Some(wp) = agent.route.current().copied() else {
        return MoveOutcome::new(MoveStatus::Failed(RouteError::NoGoal), None);
    };
    let flying = agent.is_flying();
    let leg = wp.pos - agent.origin;
    let wp_dist = if flying { leg.length() } else { leg.length_2d() };
    let dir = if flying { leg.normalize() } else { leg.flat().normalize() };

    if !leg.flat().is_zero() {
        agent.ideal_yaw = leg.to_yaw();
    }
    change_yaw(agent, dt);

    let check_dist = wp_dist.min(config.lookahead);
    let target = match wp.flags.kind() {
        k if k == WaypointFlags::TO_ENEMY  => agent.enemy.map(EntityRef::Agent),
        k if k == WaypointFlags::TO_TARGET => agent.target.map(EntityRef::Agent),
        _ => None,
    };
    let mover = agent.mover();
    let check = router.probe().check_local_move(&mover, agent.origin, agent.origin + dir * check_dist, target);

    let mut blocker = None;
    let mut detoured = false;
    if !check.is_valid() {
        agent.velocity = Vec3::ZERO;
        blocker = check.blocker;

        let blocked_by_mover = blocker
            .and_then(EntityRef::agent)
            .and_then(|id| router.probe().occupant(id))
            .is_some_and(|o| o.moving && !o.is_player);

        if blocked_by_mover
            && config.move_wait_secs > 0.0
            && now - agent.move_wait_until > WAIT_COOLDOWN_SECS
        {
            if check.dist < agent.ground_speed {
                agent.move_wait_until = now + config.move_wait_secs;
                trace!(agent = %agent.id, blocker = ?blocker, "waiting for mover");
                return MoveOutcome::new(MoveStatus::Waiting, blocker);
            }
            // Enough clearance for this step; carry on.
        } else if let Some(apex) = router.triangulate(&mover, agent.origin, wp.pos, check.dist, target) {
            router.insert_waypoint(agent, apex, WaypointFlags::TO_DETOUR);
            router.simplify(agent, target);
            trace!(agent = %agent.id, %apex, "detour inserted");
            let to_apex = apex - agent.origin;
            if !to_apex.flat().is_zero() {
                agent.ideal_yaw = to_apex.to_yaw();
            }
            detoured = true;
        } else if config.move_wait_secs > 0.0 && !agent.has_memory(Memory::MOVE_FAILED) {
            agent.remember(Memory::MOVE_FAILED);
            return match router.refresh_route(agent) {
                Ok(()) if !agent.route.is_clear() => {
                    agent.move_wait_until = now + REFRESH_PAUSE_SECS;
                    debug!(agent = %agent.id, "blocked, route rebuilt");
                    MoveOutcome::new(MoveStatus::Waiting, blocker)
                }
                Ok(()) => MoveOutcome::new(MoveStatus::Failed(RouteError::NoGoal), blocker),
                Err(err) => MoveOutcome::new(MoveStatus::Failed(err), blocker),
            };
        } else {
            let err = RouteError::Blocked(blocker.unwrap_or(EntityRef::World));
            debug!(agent = %agent.id, %err, "movement failed");
            return MoveOutcome::new(MoveStatus::Failed(err), blocker);
        }
    }

    // Advance early for natural cornering.  A fresh detour is stepped
    // toward at once instead.
    if !detoured && wp_dist <= config.corner_cut_distance {
        match router.advance_route(agent, wp_dist) {
            Err(err) => return MoveOutcome::new(MoveStatus::Failed(err), blocker),
            Ok(true) => {
                if wp.flags.kind() == WaypointFlags::TO_PATH_CORNER {
                    next_patrol_corner(agent);
                }
                agent.route.clear();
                agent.velocity = Vec3::ZERO;
                trace!(agent = %agent.id, "arrived");
                return MoveOutcome::new(MoveStatus::Arrived, blocker);
            }
            Ok(false) => {}
        }
    }
    // Possibly waiting on a door now.
    if agent.move_wait_until > now {
        agent.velocity = Vec3::ZERO;
        return MoveOutcome::new(MoveStatus::Waiting, blocker);
    }

    let Some(next) = agent.route.current().copied() else {
        return MoveOutcome::new(MoveStatus::Moving, blocker);
    };
    let leg = next.pos - agent.origin;
    let (dir, leg_dist) = if flying { (leg.normalize(), leg.length()) } else { (leg.flat().normalize(), leg.length_2d()) };
    // The detour leg was cleared by `triangulate`, not by the lookahead check.
    let cleared = if detoured { config.lookahead } else { check_dist };
    let mut remaining = (agent.ground_speed * dt).min(cleared).min(leg_dist);

    let start = agent.origin;
    let mut pos = start;
    let step = router.probe().step;
    while remaining > 1e-3 {
        let len = step.min(remaining);
        match router.probe().try_step(&mover, pos, pos + dir * len) {
            Ok(landed) => pos = landed,
            Err(hit) => {
                blocker = Some(hit);
                break;
            }
        }
        remaining -= len;
    }
    agent.origin = pos;
    agent.velocity = if dt > 0.0 { (pos - start) * (1.0 / dt) } else { Vec3::ZERO };

    MoveOutcome::new(MoveStatus::Moving, blocker)
}
