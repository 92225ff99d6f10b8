//! Line-of-fire and spacing checks against squad mates.

use npc_agent::AgentArena;
use npc_core::geo::Plane;
use npc_core::{AgentId, Vec3};

use crate::roster::members;

/// Cover within this distance of a squad mate is rejected.
pub const MEMBER_CLEARANCE: f32 = 128.0;

/// `true` when `id` may fire at its enemy without hitting a squad mate.
///
/// The check volume is bounded by three planes: behind the shooter, and to
/// either side at one and a half hull widths.  Any living mate inside all
/// three blocks the shot.  With no enemy the answer is `false`.
pub fn no_friendly_fire(arena: &AgentArena, id: AgentId) -> bool {
    let Some(me) = arena.get(id) else {
        return false;
    };
    if !me.in_squad() {
        return true;
    }
    let Some(enemy) = me.enemy.and_then(|e| arena.get(e)) else {
        return false;
    };

    let center = enemy.origin + Vec3::UP * (enemy.hull.height * 0.5);
    let forward = (center - me.origin).normalize();
    let right = Vec3::right_of_yaw(forward.to_yaw());
    let half = me.hull.width() * 1.5;

    let back = Plane::through(forward, me.origin);
    let left = Plane::through(right, me.origin - right * half);
    let right_side = Plane::through(-right, me.origin + right * half);

    !members(arena, id)
        .into_iter()
        .filter(|&m| m != id)
        .filter_map(|m| arena.get(m))
        .filter(|m| m.is_alive())
        .any(|m| back.point_in_front(m.origin) && left.point_in_front(m.origin) && right_side.point_in_front(m.origin))
}

/// `true` when a squad mate of `id` stands within `dist` (plan view) of `pos`.
pub fn squad_member_in_range(arena: &AgentArena, id: AgentId, pos: Vec3, dist: f32) -> bool {
    members(arena, id)
        .into_iter()
        .filter(|&m| m != id)
        .filter_map(|m| arena.get(m))
        .any(|m| m.origin.distance_2d(pos) <= dist)
}
