//! Windmill: a smock tower that tapers with height, a conical cap, four
//! diagonal sail blades on the north face, and the millstone on the work
//! floor.

use super::{place_door, GenContext, Shell, STORY_HEIGHT};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::furnish::room_kind_for;
use crate::geometry::{conical_roof, fill_disc, fill_ring, profile, Blend};
use crate::grid::VoxelGrid;
use crate::options::RoomKind;
use crate::partition::RoomBounds;
use blockwright_core::{blocks, Facing, Voxel, BLOCK_AIR};
use tracing::debug;

const MIN_BASE_RADIUS: i32 = 4;
const TAPER: i32 = 2;
const BLADE_LENGTH: i32 = 7;

const ROOM_ROTATION: [RoomKind; 2] = [RoomKind::Workshop, RoomKind::Storage];

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let base_radius = ((ctx.options.width.unwrap_or(11) as i32 - 1) / 2).max(MIN_BASE_RADIUS);
    let top_radius = (base_radius - TAPER).max(3);
    let stories = ctx.options.floors.max(2) as i32;
    let wall_top = stories * STORY_HEIGHT;

    let center = base_radius + BLADE_LENGTH + 2;
    let side = (2 * center + 1) as usize;
    let height = (wall_top + top_radius + BLADE_LENGTH + 4) as usize;
    let mut grid = VoxelGrid::new(side, height, side);
    let mut frame = ShellFrame::new(0, wall_top);
    debug!(base_radius, top_radius, stories, "raising windmill");

    tower(&mut grid, &mut frame, center, base_radius, top_radius, wall_top, ctx);
    floors(&mut grid, center, base_radius, top_radius, stories, wall_top, ctx)?;
    conical_roof(&mut grid, center, center, wall_top + 1, top_radius + 1, Voxel::new(ctx.palette.roof_ridge));
    blades(&mut grid, center, base_radius, top_radius, wall_top, ctx);

    grid.set(center, 1, center, Voxel::new(blocks::MILLSTONE));

    frame.wall_rects.push((
        center - base_radius,
        center - base_radius,
        center + base_radius,
        center + base_radius,
    ));
    Ok((grid, frame))
}

/// Radius of the smock at height `y`, eased from base to top.
fn radius_at(y: i32, wall_top: i32, base: i32, top: i32) -> f64 {
    let t = f64::from(y) / f64::from(wall_top);
    f64::from(base) - f64::from(base - top) * profile(Blend::Smoothstep, t)
}

fn tower(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    center: i32,
    base: i32,
    top: i32,
    wall_top: i32,
    ctx: &GenContext,
) {
    let palette = ctx.palette;
    fill_disc(grid, center, 0, center, f64::from(base), Voxel::new(palette.foundation));
    for y in 1..=wall_top {
        fill_ring(grid, center, y, center, radius_at(y, wall_top, base, top), Voxel::new(palette.wall));
    }

    // South door at grade.
    let door_z = center + base;
    grid.set(center, 1, door_z, Voxel::new(BLOCK_AIR));
    grid.set(center, 2, door_z, Voxel::new(BLOCK_AIR));
    place_door(grid, frame, center, 0, door_z, Facing::South, palette);

    // One window per story on the east and west sides.
    for story in 0..wall_top / STORY_HEIGHT {
        let y = story * STORY_HEIGHT + 2;
        let r = radius_at(y, wall_top, base, top).round() as i32;
        for x in [center - r, center + r] {
            grid.set(x, y, center, Voxel::new(palette.window));
            frame.windows.push((x, y, center));
        }
    }
}

fn floors(
    grid: &mut VoxelGrid,
    center: i32,
    base: i32,
    top: i32,
    stories: i32,
    wall_top: i32,
    ctx: &mut GenContext,
) -> Result<(), GenError> {
    let palette = ctx.palette;
    let mut room_index = 0usize;
    for story in 0..stories {
        ctx.deadline.check()?;
        let floor_y = story * STORY_HEIGHT;
        let r = radius_at(floor_y.max(1), wall_top, base, top);

        // Hollow the story, then lay its floor disc.
        for y in floor_y + 1..floor_y + STORY_HEIGHT {
            fill_disc(grid, center, y, center, radius_at(y, wall_top, base, top) - 1.0, Voxel::new(BLOCK_AIR));
        }
        if story > 0 {
            fill_disc(grid, center, floor_y, center, r - 1.0, Voxel::new(palette.floor));
        } else {
            fill_disc(grid, center, 0, center, r - 1.0, Voxel::new(palette.floor));
        }

        // Furnish on the inscribed square.
        let inner = ((r - 1.0) * 0.7) as i32;
        let room = RoomBounds {
            x1: center - inner,
            z1: center - inner,
            x2: center + inner,
            z2: center + inner,
            floor_y,
            height: STORY_HEIGHT - 1,
        };
        let kind = room_kind_for(ctx.options.rooms.as_deref(), &ROOM_ROTATION, room_index);
        room_index += 1;
        ctx.furnisher.furnish(grid, &room, kind, palette, ctx.rng);
    }

    // Ladder up the north side, offset so the taper never swallows it.
    let ladder_z = center - (top - 1);
    for y in 1..wall_top {
        grid.set(center, y, ladder_z, Voxel::facing(blocks::LADDER, Facing::North));
    }
    Ok(())
}

/// Four sail blades in an X around a hub poking out of the north face.
fn blades(grid: &mut VoxelGrid, center: i32, base: i32, top: i32, wall_top: i32, ctx: &mut GenContext) {
    let hub_y = wall_top - 1;
    let hub_z = center - radius_at(hub_y, wall_top, base, top).round() as i32 - 1;
    let arm = Voxel::new(blocks::DARK_OAK_LOG);
    let cloth = *ctx.rng.pick(&[
        Voxel::new(blocks::WHITE_WOOL),
        Voxel::new(blocks::WHITE_WOOL),
        Voxel::new(blocks::YELLOW_WOOL),
    ]);

    // Axle from the tower face out to the hub.
    grid.set(center, hub_y, hub_z + 1, arm);
    grid.set(center, hub_y, hub_z, arm);

    for (sx, sy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        for i in 1..=BLADE_LENGTH {
            let (x, y) = (center + sx * i, hub_y + sy * i);
            grid.set(x, y, hub_z, arm);
            // Cloth panel trails the arm on one side, skipping the tip.
            if i < BLADE_LENGTH {
                grid.set(x - sx, y, hub_z, cloth);
            }
        }
    }
}
