//! `npc-spatial`: everything the engine asks of world geometry.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`world`]     | `WorldQuery` trait, `TraceResult`, `Barrier`                    |
//! | [`hull`]      | `Hull`, `HullClass`, `HullMask`                                 |
//! | [`probe`]     | `MoveProbe` local move check, `Occupant`, `LocalMove`           |
//! | [`graph`]     | `NodeGraph` (CSR + R-tree), `NodeGraphBuilder`, `LinkSpec`      |
//! | [`pathfind`]  | capability/hull-filtered Dijkstra over `NodeGraph`              |
//! | [`route`]     | fixed-capacity `Route`, `Waypoint`, `WaypointFlags`, `MoveGoal` |
//! | [`box_world`] | `BoxWorld`, an axis-aligned reference `WorldQuery`              |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                              |
//!
//! The engine only ever talks to geometry through [`WorldQuery`]; applications
//! with their own collision world implement the trait and keep using the
//! probe, graph and route types from here.

pub mod box_world;
pub mod error;
pub mod graph;
pub mod hull;
pub mod pathfind;
pub mod probe;
pub mod route;
pub mod world;


pub use box_world::{BoxWorld, Solid};
pub use error::{SpatialError, SpatialResult};
pub use graph::{LinkSpec, NodeGraph, NodeGraphBuilder};
pub use hull::{Hull, HullClass, HullMask};
pub use probe::{LocalMove, LocalMoveResult, MoveProbe, Mover, Occupant};
pub use route::{MoveGoal, Route, Waypoint, WaypointFlags, ROUTE_SIZE};
pub use world::{Barrier, TraceResult, WorldQuery};
