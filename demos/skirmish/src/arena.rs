//! The walled arena the skirmish is fought in.
//!
//! ```text
//!   y
//!   768  o---o---o       o---o---o     open ends
//!        |   |   |  ###  |   |   |
//!     0  o---o---o==DOOR=o---o---o     door link
//!        |   |   |  ###  |   |   |
//!  -768  o---o---o       o---o---o
//!      -768        x=0         768
//! ```
//!
//! A wall at `x = 0` runs from `y = -WALL_HALF` to `WALL_HALF` with a door
//! in the middle.  Crates on either side give the cover search something
//! to hide behind.

use npc_core::Vec3;
use npc_spatial::{Barrier, BoxWorld, LinkSpec, NodeGraphBuilder};

pub const HALF_EXTENT: f32 = 1024.0;
const WALL_HALF: f32 = 600.0;
const WALL_HEIGHT: f32 = 128.0;
const DOOR_HALF: f32 = 64.0;
const GRID_STEP: f32 = 256.0;

const WEST_X: [f32; 3] = [-768.0, -512.0, -256.0];
const EAST_X: [f32; 3] = [256.0, 512.0, 768.0];

fn v(x: f32, y: f32) -> Vec3 {
    Vec3::new(x, y, 0.0)
}

pub fn build_world() -> BoxWorld {
    let mut world = BoxWorld::new(v(-HALF_EXTENT, -HALF_EXTENT), v(HALF_EXTENT, HALF_EXTENT));

    world.add_box(Vec3::new(-16.0, -WALL_HALF, 0.0), Vec3::new(16.0, -DOOR_HALF, WALL_HEIGHT));
    world.add_box(Vec3::new(-16.0, DOOR_HALF, 0.0), Vec3::new(16.0, WALL_HALF, WALL_HEIGHT));
    let door = world.add_door(Vec3::new(-8.0, -DOOR_HALF, 0.0), Vec3::new(8.0, DOOR_HALF, WALL_HEIGHT));

    // Crates, tall enough to hide a standing eye.
    world.add_box(Vec3::new(-448.0, -320.0, 0.0), Vec3::new(-416.0, -192.0, 96.0));
    world.add_box(Vec3::new(-448.0, 192.0, 0.0), Vec3::new(-416.0, 320.0, 96.0));
    world.add_box(Vec3::new(416.0, -320.0, 0.0), Vec3::new(448.0, -192.0, 96.0));
    world.add_box(Vec3::new(416.0, 192.0, 0.0), Vec3::new(448.0, 320.0, 96.0));

    let rows: Vec<f32> = (-3..=3).map(|i| i as f32 * GRID_STEP).collect();
    let mut g = NodeGraphBuilder::new();
    let mut west = Vec::new();
    let mut east = Vec::new();
    for &y in &rows {
        west.push(WEST_X.map(|x| g.add_node(v(x, y))));
        east.push(EAST_X.map(|x| g.add_node(v(x, y))));
    }

    for side in [&west, &east] {
        for (r, row) in side.iter().enumerate() {
            for c in 0..row.len() - 1 {
                g.add_link(row[c], row[c + 1]);
            }
            if let Some(next) = side.get(r + 1) {
                for c in 0..row.len() {
                    g.add_link(row[c], next[c]);
                }
            }
        }
    }

    // Across the wall: open at both ends, through the door in the middle.
    for (r, &y) in rows.iter().enumerate() {
        let (w, e) = (west[r][2], east[r][0]);
        if y.abs() > WALL_HALF {
            g.add_link(w, e);
        } else if y == 0.0 {
            g.add_link_with(w, e, LinkSpec::door(Barrier { solid: door, operate_secs: 1.0 }));
        }
    }

    world.with_graph(g.build())
}
