//! Dungeon: stacked underground levels carved out of solid stone, a ladder
//! shaft tying them together, and a small shack marking the entrance at
//! grade.

use super::{place_door, slab, wall_ring, GenContext, Shell, STORY_HEIGHT};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::furnish::room_kind_for;
use crate::geometry::weather_region;
use crate::grid::VoxelGrid;
use crate::options::RoomKind;
use crate::partition::{carve_cross_corridor, quadrant_rooms, FloorArea};
use blockwright_core::{blocks, Facing, Voxel, BLOCK_AIR};
use tracing::debug;

const MIN_FOOTPRINT: i32 = 21;
const EDGE_MARGIN: i32 = 2;
const SHACK_HALF: i32 = 2;
/// Mossy/cracked substitution rate for carved chamber walls.
const DAMP_PROBABILITY: f64 = 0.16;

const CHAMBER_ROTATION: [RoomKind; 4] = [
    RoomKind::Cell,
    RoomKind::Storage,
    RoomKind::Armory,
    RoomKind::Cell,
];

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let footprint = (ctx.options.width.unwrap_or(29) as i32).max(MIN_FOOTPRINT);
    let levels = ctx.options.floors as i32;
    let ground_y = levels * STORY_HEIGHT;

    let side = (footprint + 2 * EDGE_MARGIN) as usize;
    let mut grid = VoxelGrid::new(side, (ground_y + 8) as usize, side);
    let mut frame = ShellFrame::new(ground_y, ground_y + 4);
    debug!(footprint, levels, "sinking dungeon");

    let (d1, d2) = (EDGE_MARGIN, EDGE_MARGIN + footprint - 1);

    // Solid rock down to the deepest floor; rooms are carved, not built.
    grid.fill(d1, 0, d1, d2, ground_y - 1, d2, Voxel::new(blocks::STONE));
    grid.fill(d1, ground_y, d1, d2, ground_y, d2, Voxel::new(blocks::DIRT));

    let area = FloorArea::new(d1 + 2, d1 + 2, d2 - 2, d2 - 2);
    let mut room_index = 0usize;
    for level in 0..levels {
        ctx.deadline.check()?;
        // Level 0 sits just under grade, deeper levels follow below it.
        let floor_y = ground_y - (level + 1) * STORY_HEIGHT;
        carve_level(&mut grid, area, floor_y, &mut room_index, ctx);
    }

    ladder_shaft(&mut grid, area, ground_y);
    shack(&mut grid, &mut frame, area, ground_y, ctx);
    Ok((grid, frame))
}

fn carve_level(
    grid: &mut VoxelGrid,
    area: FloorArea,
    floor_y: i32,
    room_index: &mut usize,
    ctx: &mut GenContext,
) {
    let ceiling = STORY_HEIGHT - 1;
    carve_cross_corridor(grid, area, floor_y, ceiling, 1);

    // The small quadrants are carved two cells deeper in.
    let rooms = quadrant_rooms(area, floor_y, ceiling, 1, 1, 3);
    for room in &rooms {
        grid.fill(
            room.x1,
            floor_y + 1,
            room.z1,
            room.x2,
            floor_y + ceiling,
            room.z2,
            Voxel::new(BLOCK_AIR),
        );
    }
    // Weather the whole level in one pass; buried stone takes hits too but
    // only the carved faces show it.
    weather_region(
        grid,
        area.x1 - 1,
        floor_y,
        area.z1 - 1,
        area.x2 + 1,
        floor_y + ceiling,
        area.z2 + 1,
        blocks::STONE,
        &[
            (Voxel::new(blocks::MOSSY_COBBLESTONE), 2.0),
            (Voxel::new(blocks::CRACKED_STONE_BRICKS), 1.0),
        ],
        DAMP_PROBABILITY,
        ctx.rng,
    );

    for room in &rooms {
        let kind = room_kind_for(ctx.options.rooms.as_deref(), &CHAMBER_ROTATION, *room_index);
        *room_index += 1;
        ctx.furnisher.furnish(grid, room, kind, ctx.palette, ctx.rng);
    }

    // Torches where the corridors meet.
    let (cx, cz) = area.center();
    grid.set(cx + 2, floor_y + 2, cz + 2, Voxel::new(ctx.palette.light));
}

/// One ladder column from the deepest corridor up through the shack floor.
fn ladder_shaft(grid: &mut VoxelGrid, area: FloorArea, ground_y: i32) {
    let (cx, cz) = area.center();
    for y in 1..=ground_y + 1 {
        grid.set(cx, y, cz, Voxel::facing(blocks::LADDER, Facing::North));
    }
    // Open the hatch through the dirt cap.
    grid.set(cx, ground_y, cz, Voxel::facing(blocks::LADDER, Facing::North));
}

fn shack(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    area: FloorArea,
    ground_y: i32,
    ctx: &GenContext,
) {
    let (cx, cz) = area.center();
    let (s1x, s1z, s2x, s2z) = (cx - SHACK_HALF, cz - SHACK_HALF, cx + SHACK_HALF, cz + SHACK_HALF);
    let palette = ctx.palette;

    wall_ring(grid, s1x, s1z, s2x, s2z, ground_y + 1, ground_y + 3, Voxel::new(palette.wall));
    slab(grid, s1x, s1z, s2x, s2z, ground_y + 4, Voxel::new(palette.roof_flat));
    grid.set(cx, ground_y + 3, s1z, Voxel::new(palette.window));
    frame.windows.push((cx, ground_y + 3, s1z));

    grid.set(cx, ground_y + 1, s2z, Voxel::new(BLOCK_AIR));
    grid.set(cx, ground_y + 2, s2z, Voxel::new(BLOCK_AIR));
    place_door(grid, frame, cx, ground_y, s2z, Facing::South, palette);
    frame.wall_rects.push((s1x, s1z, s2x, s2z));
}
