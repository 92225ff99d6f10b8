//! Cover search over the navigation graph.

use npc_agent::Agent;
use npc_core::Vec3;
use npc_spatial::WaypointFlags;
use npc_squad::MEMBER_CLEARANCE;
use tracing::{debug, trace};

use crate::context::TaskEnv;

/// Route `agent` to the nearest graph node between `min` and `max` units
/// away that hides its eyes from `threat`.
///
/// Nodes within [`MEMBER_CLEARANCE`] of a squad mate are skipped.  At most
/// `cover_node_budget` nodes are examined.  On success the route is built,
/// `move_spot` holds the cover point, and the point is returned.
pub fn find_cover(agent: &mut Agent, threat: Vec3, min: f32, max: f32, env: &mut TaskEnv<'_, '_>) -> Option<Vec3> {
    let world = env.cx.world;
    let candidates = world.nodes_near(agent.origin, env.cx.config.cover_node_budget);

    for node in candidates {
        let Some(pos) = world.node_position(node) else {
            continue;
        };
        let d = pos.distance(agent.origin);
        if d < min || d > max {
            continue;
        }
        let eye = pos + Vec3::UP * agent.eye_height;
        if world.trace_line(eye, threat).is_clear() {
            continue;
        }
        if env.mates.iter().any(|m| m.distance_2d(pos) <= MEMBER_CLEARANCE) {
            trace!(agent = %agent.id, %node, "cover taken by squad mate");
            continue;
        }

        let mut router = env.cx.router();
        let routed = router.build_route(agent, pos, WaypointFlags::TO_COVER, None);
        env.absorb(&mut router);
        if routed.is_ok() {
            debug!(agent = %agent.id, %node, cover = %pos, "cover found");
            agent.move_spot = Some(pos);
            return Some(pos);
        }
    }

    debug!(agent = %agent.id, %threat, "no cover");
    None
}
