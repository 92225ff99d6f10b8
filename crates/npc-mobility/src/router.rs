//! Route construction.
//!
//! [`Router`] bundles the geometry, the occupant snapshot and the tunables
//! for one agent's think.  It writes straight into `agent.route` and keeps
//! the movement goal on the route so a stale or truncated route can be
//! rebuilt with [`Router::refresh_route`].

use npc_agent::Agent;
use npc_core::{EngineConfig, EntityRef, SolidId, Vec3};
use npc_spatial::{
    LocalMove, MoveGoal, MoveProbe, Mover, Occupant, SpatialError, Waypoint, WaypointFlags,
    WorldQuery, ROUTE_SIZE,
};
use tracing::{debug, trace};

use crate::error::{RouteError, RouteResult};

/// Upper bound on triangulation probe rings.
pub const MAX_TRIANGULATION_RINGS: u32 = 8;

/// Probe spacing is derived from the hull width, clamped to this range.
const PROBE_WIDTH_MIN: f32 = 24.0;
const PROBE_WIDTH_MAX: f32 = 48.0;

/// Arrival at the goal waypoint: within this fraction of a second of travel.
const ARRIVE_SECS: f32 = 0.2;

pub struct Router<'a> {
    probe:    MoveProbe<'a>,
    config:   &'a EngineConfig,
    now:      f32,
    barriers: Vec<SolidId>,
}

impl<'a> Router<'a> {
    pub fn new(
        world:     &'a dyn WorldQuery,
        occupants: &'a [Occupant],
        config:    &'a EngineConfig,
        now:       f32,
    ) -> Self {
        Self { probe: MoveProbe::new(world, occupants, config), config, now, barriers: Vec::new() }
    }

    #[inline]
    pub fn probe(&self) -> &MoveProbe<'a> {
        &self.probe
    }

    #[inline]
    pub fn world(&self) -> &'a dyn WorldQuery {
        self.probe.world
    }

    #[inline]
    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    #[inline]
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Barriers whose links were entered since the last call.
    pub fn take_barrier_requests(&mut self) -> Vec<SolidId> {
        std::mem::take(&mut self.barriers)
    }

    // ── Building ──────────────────────────────────────────────────────────

    /// Replace `agent.route` with a route to `goal`.
    ///
    /// `kind` is a single `TO_*` bit describing the goal.  Running into
    /// `target` counts as reaching it.
    pub fn build_route(
        &mut self,
        agent:  &mut Agent,
        goal:   Vec3,
        kind:   WaypointFlags,
        target: Option<EntityRef>,
    ) -> RouteResult<()> {
        agent.route.clear();
        agent.route.goal = Some(MoveGoal { pos: goal, kind, target });

        let mover = agent.mover();
        let start = agent.origin;
        let direct = self.probe.check_local_move(&mover, start, goal, target);

        if direct.is_valid() {
            agent.route.push(Waypoint::new(goal, kind | WaypointFlags::IS_GOAL));
            debug!(agent = %agent.id, %goal, "direct route");
            return Ok(());
        }

        if direct.status != LocalMove::InvalidDontTriangulate {
            if let Some(apex) = self.triangulate(&mover, start, goal, direct.dist, target) {
                agent.route.push(Waypoint::new(apex, kind | WaypointFlags::TO_DETOUR));
                agent.route.push(Waypoint::new(goal, kind | WaypointFlags::IS_GOAL));
                self.simplify(agent, target);
                debug!(agent = %agent.id, %goal, %apex, "triangulated route");
                return Ok(());
            }
        }

        match self.build_node_route(agent, goal, kind) {
            Ok(()) => {
                self.simplify(agent, target);
                debug!(agent = %agent.id, %goal, waypoints = agent.route.len(), partial = agent.route.partial, "node route");
                Ok(())
            }
            Err(err) => {
                agent.route.clear_waypoints();
                debug!(agent = %agent.id, %goal, %err, "no route");
                Err(err)
            }
        }
    }

    /// Look for a detour point around whatever stopped a move `start → end`
    /// after `blocked_at` units.
    ///
    /// Probes start just past the obstruction, three probe widths to either
    /// side, and move two widths further out per ring; flyers also probe
    /// above and below.  Left is tried before right.  A probe is accepted
    /// when both `start → probe` and `probe → end` are walkable.
    pub fn triangulate(
        &self,
        mover:      &Mover,
        start:      Vec3,
        end:        Vec3,
        blocked_at: f32,
        target:     Option<EntityRef>,
    ) -> Option<Vec3> {
        let size_x = mover.hull.width().clamp(PROBE_WIDTH_MIN, PROBE_WIDTH_MAX);
        let size_z = mover.hull.height;

        let fwd = if mover.flying { (end - start).normalize() } else { (end - start).flat().normalize() };
        let mut right = fwd.cross(Vec3::UP).normalize();
        if right.is_zero() {
            right = Vec3::right_of_yaw(0.0);
        }

        let ahead = start + fwd * (blocked_at + size_x);
        let mut left_probe = ahead - right * (size_x * 3.0);
        let mut right_probe = ahead + right * (size_x * 3.0);
        let side_step = right * (size_x * 2.0);

        let level = start + fwd * blocked_at;
        let mut top = level + Vec3::UP * (size_z * 3.0);
        let mut bottom = level - Vec3::UP * (size_z * 3.0);
        let vertical_step = Vec3::UP * (size_z * 2.0);

        let rings = self.config.triangulation_rings.min(MAX_TRIANGULATION_RINGS);
        for ring in 0..rings {
            let mut candidates = vec![left_probe, right_probe];
            if mover.flying {
                candidates.extend([top, bottom]);
            }
            for apex in candidates {
                if self.probe.walkable(mover, start, apex, target)
                    && self.probe.walkable(mover, apex, end, target)
                {
                    trace!(agent = %mover.id, ring, %apex, "triangulated");
                    return Some(apex);
                }
            }
            left_probe = left_probe - side_step;
            right_probe = right_probe + side_step;
            top = top + vertical_step;
            bottom = bottom - vertical_step;
        }
        None
    }

    /// Graph route from the node nearest the agent to the node nearest
    /// `goal`, followed by `goal` itself when it fits.  A chain longer than
    /// the route capacity leaves the route partial.
    ///
    /// Both ends of a door link are protected from simplification.
    pub fn build_node_route(&mut self, agent: &mut Agent, goal: Vec3, kind: WaypointFlags) -> RouteResult<()> {
        let world = self.probe.world;
        let caps = agent.capabilities;

        let src = world.nearest_node(agent.origin, caps).ok_or(RouteError::NoNode(agent.origin))?;
        let dst = world.nearest_node(goal, caps).ok_or(RouteError::NoNode(goal))?;
        let path = world
            .shortest_path(src, dst, agent.hull.class(agent.is_flying()), caps)
            .ok_or(RouteError::NoPath { from: src, to: dst })?;

        let mut waypoints: Vec<Waypoint> = Vec::with_capacity(path.len() + 1);
        for (i, &node) in path.iter().enumerate() {
            let pos = world.node_position(node).ok_or(SpatialError::NodeNotFound(node))?;
            let mut flags = WaypointFlags::TO_NODE;
            if i > 0 && world.barrier_between(path[i - 1], node).is_some() {
                flags |= WaypointFlags::DONT_SIMPLIFY;
                if let Some(prev) = waypoints.last_mut() {
                    prev.flags |= WaypointFlags::DONT_SIMPLIFY;
                }
            }
            waypoints.push(Waypoint { pos, flags, node: Some(node) });
        }
        waypoints.push(Waypoint::new(goal, kind | WaypointFlags::IS_GOAL));

        agent.route.clear_waypoints();
        agent.route.replace_remaining(waypoints);
        Ok(())
    }

    /// Walk the agent's patrol corners from `patrol_index` onward.  The
    /// final corner is the goal; corners past the route capacity leave it
    /// partial.
    pub fn build_patrol_route(&mut self, agent: &mut Agent) -> RouteResult<()> {
        let corners = agent.patrol.get(agent.patrol_index..).unwrap_or(&[]);
        let Some(&last) = corners.last() else {
            return Err(RouteError::NoPatrol);
        };

        let mut waypoints: Vec<Waypoint> = corners
            .iter()
            .map(|&p| Waypoint::new(p, WaypointFlags::TO_PATH_CORNER))
            .collect();
        if let Some(end) = waypoints.last_mut() {
            end.flags |= WaypointFlags::IS_GOAL;
        }

        agent.route.clear();
        agent.route.goal = Some(MoveGoal { pos: last, kind: WaypointFlags::TO_PATH_CORNER, target: None });
        agent.route.replace_remaining(waypoints);
        debug!(agent = %agent.id, corners = corners.len(), "patrol route");
        Ok(())
    }

    /// Rebuild toward the route's remembered goal.  Enemy goals chase the
    /// current last known position.
    pub fn refresh_route(&mut self, agent: &mut Agent) -> RouteResult<()> {
        let goal = agent.route.goal.ok_or(RouteError::NoGoal)?;
        trace!(agent = %agent.id, kind = ?goal.kind, "refresh route");

        if goal.kind == WaypointFlags::TO_PATH_CORNER {
            self.build_patrol_route(agent)
        } else if goal.kind == WaypointFlags::TO_ENEMY {
            let target = agent.enemy.map(EntityRef::Agent);
            let lkp = agent.enemy_lkp;
            self.build_route(agent, lkp, WaypointFlags::TO_ENEMY, target)
        } else if goal.kind == WaypointFlags::TO_NODE {
            self.build_node_route(agent, goal.pos, goal.kind)?;
            self.simplify(agent, None);
            Ok(())
        } else {
            self.build_route(agent, goal.pos, goal.kind, goal.target)
        }
    }

    // ── Editing ───────────────────────────────────────────────────────────

    /// Put a detour in front of the current waypoint.  The detour inherits
    /// the current waypoint's kind so a later refresh still knows the goal.
    pub fn insert_waypoint(&self, agent: &mut Agent, pos: Vec3, flags: WaypointFlags) {
        let inherited = agent.route.current().map_or(WaypointFlags::empty(), |w| w.flags.kind());
        agent.route.insert_current(Waypoint::new(pos, flags | inherited));
    }

    /// Drop or shorten waypoints that a straight move can skip.
    ///
    /// For each removable waypoint: skip it when the next one is directly
    /// reachable; otherwise replace it with the midpoint of its outgoing leg
    /// when that is reachable, or with two points (the midpoint of the
    /// incoming leg, then the midpoint of the outgoing leg) when that pair is
    /// walkable.  Path corners, protected waypoints and the goal are kept.
    pub fn simplify(&self, agent: &mut Agent, target: Option<EntityRef>) {
        let remaining = agent.route.remaining();
        let count = remaining.iter().position(Waypoint::is_goal).map_or(remaining.len(), |i| i + 1);
        if count < 2 {
            return;
        }
        let src: Vec<Waypoint> = remaining[..count].to_vec();

        let mover = agent.mover();
        let mut out: Vec<Waypoint> = Vec::with_capacity(ROUTE_SIZE * 2);
        let mut start = agent.origin;

        for pair in src.windows(2) {
            let (wp, next) = (pair[0], pair[1]);
            if !wp.flags.simplifiable() {
                out.push(wp);
            } else if self.probe.walkable(&mover, start, next.pos, target) {
                continue;
            } else {
                let test = (wp.pos + next.pos) * 0.5;
                let split = (wp.pos + start) * 0.5;
                let flags = (wp.flags | WaypointFlags::TO_DETOUR) - WaypointFlags::NOT_TO_MASK;
                if self.probe.walkable(&mover, start, test, target) {
                    out.push(Waypoint::new(test, flags));
                } else if self.probe.walkable(&mover, split, test, target) {
                    out.push(Waypoint::new(split, flags));
                    out.push(Waypoint::new(test, flags));
                } else {
                    out.push(wp);
                }
            }
            if let Some(last) = out.last() {
                start = last.pos;
            }
        }
        out.push(src[count - 1]);

        trace!(agent = %agent.id, before = count, after = out.len(), "simplified");
        agent.route.replace_remaining(out);
    }

    // ── Walking ───────────────────────────────────────────────────────────

    /// Called once the agent is within corner-cut distance of the current
    /// waypoint.  Returns `true` when that waypoint is the goal and the agent
    /// is close enough to call it reached.
    ///
    /// Passing a node waypoint whose link to the next one has a barrier
    /// queues the barrier and holds the agent for its operating time.  At the
    /// last stored slot of a partial route the route is refreshed instead.
    pub fn advance_route(&mut self, agent: &mut Agent, dist: f32) -> RouteResult<bool> {
        let Some(current) = agent.route.current().copied() else {
            return Ok(false);
        };

        if current.is_goal() {
            return Ok(dist < (agent.ground_speed * ARRIVE_SECS).max(1.0));
        }
        if agent.route.at_last_slot() {
            self.refresh_route(agent)?;
            return Ok(false);
        }

        if current.flags.kind() == WaypointFlags::TO_PATH_CORNER {
            next_patrol_corner(agent);
        }
        if let (Some(a), Some(b)) = (current.node, agent.route.next().and_then(|w| w.node)) {
            if let Some(barrier) = self.probe.world.barrier_between(a, b) {
                self.barriers.push(barrier.solid);
                agent.move_wait_until = self.now + barrier.operate_secs;
                debug!(agent = %agent.id, solid = %barrier.solid, wait = barrier.operate_secs, "operating barrier");
            }
        }
        agent.route.advance();
        Ok(false)
    }
}

/// Step the patrol index past the corner just reached, wrapping round.
pub(crate) fn next_patrol_corner(agent: &mut Agent) {
    if !agent.patrol.is_empty() {
        agent.patrol_index = (agent.patrol_index + 1) % agent.patrol.len();
    }
}
