//! `npc-mobility`: getting an agent from where it is to where its task
//! wants it.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                            |
//! |------------|---------------------------------------------------------------------|
//! | [`router`] | `Router`: direct / triangulated / node-graph routes, simplification, refresh, door barriers |
//! | [`mover`]  | `move_agent` per-tick walker, `change_yaw`, `MoveOutcome`           |
//! | [`error`]  | `RouteError`, `RouteResult<T>`                                      |
//!
//! # Movement model
//!
//! 1. A `GetPathTo*` task calls [`Router::build_route`], which tries a
//!    straight local move, then a triangulated detour, then the node graph,
//!    and simplifies whatever it produced.
//! 2. Every tick a movement task calls [`move_agent`], which turns toward
//!    the current waypoint, re-checks up to `lookahead` units ahead, and
//!    walks in `local_step` increments.
//! 3. Blockage escalates: wait for a moving agent, triangulate a detour,
//!    rebuild the route once (remembering `MOVE_FAILED`), then fail.
//! 4. Door links push a barrier-open request onto the router and hold the
//!    agent for the barrier's operating time.  The caller drains the
//!    requests with [`Router::take_barrier_requests`] once the think is over.

pub mod error;
pub mod mover;
pub mod router;


pub use error::{RouteError, RouteResult};
pub use mover::{change_yaw, move_agent, MoveOutcome, MoveStatus};
pub use router::{Router, MAX_TRIANGULATION_RINGS};
