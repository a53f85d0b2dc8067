//! House generator: rectangular, L, T, and U floor plans, five roof shapes,
//! and the optional yard features (porch, chimney, backyard, driveway,
//! fence, trees, garden, pool).

use super::{
    hollow_interior, place_door, plant_tree, slab, wall_ring, window_row, GenContext, Shell,
    STORY_HEIGHT,
};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::furnish::room_kind_for;
use crate::grid::VoxelGrid;
use crate::options::{FeatureFlags, FloorPlan, RoofShape, RoomKind};
use crate::partition::{front_back_rooms, FloorArea, RoomBounds};
use blockwright_core::{blocks, Facing, StylePalette, Voxel, BLOCK_AIR};
use tracing::debug;

/// Smallest footprint that still fits a partitioned interior.
const MIN_FOOTPRINT: i32 = 7;
/// Yard space reserved on every side of the plan.
const YARD_MARGIN: i32 = 8;
/// Wing cross-section for L/T/U plans.
const WING_WIDTH: i32 = 5;
const WING_DEPTH: i32 = 5;
/// Houses taller than this read as towers; extra floors are clamped away.
const MAX_FLOORS: u32 = 3;

const ROOM_ROTATION: [RoomKind; 4] = [
    RoomKind::Hall,
    RoomKind::Kitchen,
    RoomKind::Bedroom,
    RoomKind::Study,
];

/// One rectangular volume of the plan (inclusive wall-to-wall bounds).
#[derive(Debug, Clone, Copy)]
struct PlanRect {
    x1: i32,
    z1: i32,
    x2: i32,
    z2: i32,
    stories: i32,
}

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let main_w = (ctx.options.width.unwrap_or(11) as i32).max(MIN_FOOTPRINT);
    let main_l = (ctx.options.length.unwrap_or(9) as i32).max(MIN_FOOTPRINT);
    let floors = ctx.options.floors.min(MAX_FLOORS) as i32;

    let plan_depth = match ctx.options.floor_plan {
        FloorPlan::Rect => main_l,
        FloorPlan::L | FloorPlan::T | FloorPlan::U => main_l + WING_DEPTH,
    };
    let site_w = main_w + 2 * YARD_MARGIN;
    let site_l = plan_depth + 2 * YARD_MARGIN;
    let height = floors * STORY_HEIGHT + main_w.max(main_l) / 2 + 8;

    let mut grid = VoxelGrid::new(site_w as usize, height as usize, site_l as usize);
    let mut frame = ShellFrame::new(0, floors * STORY_HEIGHT);

    let main = PlanRect {
        x1: YARD_MARGIN,
        z1: YARD_MARGIN,
        x2: YARD_MARGIN + main_w - 1,
        z2: YARD_MARGIN + main_l - 1,
        stories: floors,
    };
    let rects = plan_rects(main, ctx.options.floor_plan);
    debug!(plan = ?ctx.options.floor_plan, rects = rects.len(), "laying house plan");

    for rect in &rects {
        build_shell(&mut grid, &mut frame, rect, ctx)?;
    }

    // Wings share their north wall with the main volume; cut a doorway
    // through it so each wing is reachable from inside.
    for rect in rects.iter().skip(1) {
        let cut_x = (rect.x1 + rect.x2) / 2;
        grid.set(cut_x, 1, main.z2, Voxel::new(BLOCK_AIR));
        grid.set(cut_x, 2, main.z2, Voxel::new(BLOCK_AIR));
    }

    // Front door at the south wall center of the main volume. For U plans
    // that wall faces the courtyard between the wings.
    let door_x = (main.x1 + main.x2) / 2;
    let door_z = main.z2;
    grid.set(door_x, 1, door_z, Voxel::new(BLOCK_AIR));
    grid.set(door_x, 2, door_z, Voxel::new(BLOCK_AIR));
    place_door(&mut grid, &mut frame, door_x, 0, door_z, Facing::South, ctx.palette);

    for rect in &rects {
        roof(&mut grid, rect, ctx.options.roof_shape, ctx.palette);
    }

    furnish_stories(&mut grid, &main, ctx)?;
    for (index, rect) in rects.iter().enumerate().skip(1) {
        let room = RoomBounds {
            x1: rect.x1 + 1,
            z1: rect.z1 + 1,
            x2: rect.x2 - 1,
            z2: rect.z2 - 1,
            floor_y: 0,
            height: STORY_HEIGHT - 1,
        };
        let kind = if index % 2 == 1 {
            RoomKind::Storage
        } else {
            RoomKind::Workshop
        };
        ctx.furnisher.furnish(&mut grid, &room, kind, ctx.palette, ctx.rng);
    }

    if floors > 1 {
        interior_ladder(&mut grid, &main, floors);
    }

    yard_features(&mut grid, &main, &rects, ctx);

    for rect in &rects {
        frame.wall_rects.push((rect.x1, rect.z1, rect.x2, rect.z2));
    }
    Ok((grid, frame))
}

/// Expand the main volume into the plan's rectangle list. Wings always
/// attach to the south wall; U wings are symmetric about the plan's X
/// center.
fn plan_rects(main: PlanRect, plan: FloorPlan) -> Vec<PlanRect> {
    let wing = |x1: i32| PlanRect {
        x1,
        z1: main.z2,
        x2: x1 + WING_WIDTH - 1,
        z2: main.z2 + WING_DEPTH,
        stories: 1,
    };
    match plan {
        FloorPlan::Rect => vec![main],
        FloorPlan::L => vec![main, wing(main.x1)],
        FloorPlan::T => vec![main, wing((main.x1 + main.x2) / 2 - WING_WIDTH / 2)],
        FloorPlan::U => vec![
            main,
            wing(main.x1),
            wing(main.x2 - WING_WIDTH + 1),
        ],
    }
}

fn build_shell(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    rect: &PlanRect,
    ctx: &mut GenContext,
) -> Result<(), GenError> {
    let palette = ctx.palette;
    // Foundation ring under the walls, floor boards inside.
    slab(grid, rect.x1, rect.z1, rect.x2, rect.z2, 0, Voxel::new(palette.foundation));
    grid.fill(
        rect.x1 + 1,
        0,
        rect.z1 + 1,
        rect.x2 - 1,
        0,
        rect.z2 - 1,
        Voxel::new(palette.floor),
    );

    for story in 0..rect.stories {
        ctx.deadline.check()?;
        let floor_y = story * STORY_HEIGHT;
        if story > 0 {
            slab(grid, rect.x1, rect.z1, rect.x2, rect.z2, floor_y, Voxel::new(palette.floor));
        }
        wall_ring(
            grid,
            rect.x1,
            rect.z1,
            rect.x2,
            rect.z2,
            floor_y + 1,
            floor_y + STORY_HEIGHT,
            Voxel::new(palette.wall),
        );
        hollow_interior(
            grid,
            rect.x1,
            rect.z1,
            rect.x2,
            rect.z2,
            floor_y + 1,
            floor_y + STORY_HEIGHT - 1,
        );
        window_row(
            grid,
            frame,
            rect.x1,
            rect.z1,
            rect.x2,
            rect.z2,
            floor_y,
            3,
            palette,
        );
    }
    // Attic floor sealing the top story.
    slab(
        grid,
        rect.x1,
        rect.z1,
        rect.x2,
        rect.z2,
        rect.stories * STORY_HEIGHT,
        Voxel::new(palette.floor),
    );
    Ok(())
}

fn furnish_stories(grid: &mut VoxelGrid, main: &PlanRect, ctx: &mut GenContext) -> Result<(), GenError> {
    let area = FloorArea::new(main.x1 + 1, main.z1 + 1, main.x2 - 1, main.z2 - 1);
    let mut room_index = 0usize;
    for story in 0..main.stories {
        ctx.deadline.check()?;
        let floor_y = story * STORY_HEIGHT;
        for room in front_back_rooms(area, floor_y, STORY_HEIGHT - 1, story as usize) {
            let kind = room_kind_for(
                ctx.options.rooms.as_deref(),
                &ROOM_ROTATION,
                room_index,
            );
            ctx.furnisher.furnish(grid, &room, kind, ctx.palette, ctx.rng);
            room_index += 1;
        }
    }
    Ok(())
}

/// Ladder column in the north-west interior corner, with the floor slabs
/// above punched open.
fn interior_ladder(grid: &mut VoxelGrid, main: &PlanRect, floors: i32) {
    let (x, z) = (main.x1 + 1, main.z1 + 1);
    // Runs through the upper floor slabs, replacing them cell-for-cell, so
    // the column doubles as the opening between stories.
    for y in 1..floors * STORY_HEIGHT {
        grid.set(x, y, z, Voxel::facing(blocks::LADDER, Facing::South));
    }
}

fn roof(grid: &mut VoxelGrid, rect: &PlanRect, shape: RoofShape, palette: &StylePalette) {
    let base_y = rect.stories * STORY_HEIGHT;
    match shape {
        RoofShape::Flat => {
            grid.fill(
                rect.x1 - 1,
                base_y + 1,
                rect.z1 - 1,
                rect.x2 + 1,
                base_y + 1,
                rect.z2 + 1,
                Voxel::new(palette.roof_flat),
            );
        }
        RoofShape::Hip => {
            crate::geometry::pyramid_roof(
                grid,
                rect.x1 - 1,
                rect.z1 - 1,
                rect.x2 + 1,
                rect.z2 + 1,
                base_y + 1,
                Voxel::new(palette.roof_flat),
            );
        }
        RoofShape::Gable => gable_roof(grid, rect, base_y, false, palette),
        RoofShape::Gambrel => gable_roof(grid, rect, base_y, true, palette),
        RoofShape::Mansard => mansard_roof(grid, rect, base_y, palette),
    }
}

/// Pitched roof with the ridge along the longer axis. `steep_eaves` doubles
/// the first course vertically (gambrel profile).
fn gable_roof(grid: &mut VoxelGrid, rect: &PlanRect, base_y: i32, steep_eaves: bool, palette: &StylePalette) {
    let along_x = (rect.x2 - rect.x1) >= (rect.z2 - rect.z1);
    let stairs = palette.roof_stairs;
    let ridge = Voxel::new(palette.roof_ridge);
    let wall = Voxel::new(palette.wall);

    if along_x {
        let (mut lo, mut hi) = (rect.z1 - 1, rect.z2 + 1);
        let mut y = base_y + 1;
        while lo < hi {
            for x in rect.x1 - 1..=rect.x2 + 1 {
                grid.set(x, y, lo, Voxel::facing(stairs, Facing::South));
                grid.set(x, y, hi, Voxel::facing(stairs, Facing::North));
                if steep_eaves && y == base_y + 1 {
                    grid.set(x, y + 1, lo, Voxel::facing(stairs, Facing::South));
                    grid.set(x, y + 1, hi, Voxel::facing(stairs, Facing::North));
                }
            }
            // Gable-end triangles.
            for z in lo + 1..hi {
                grid.set(rect.x1, y, z, wall);
                grid.set(rect.x2, y, z, wall);
            }
            lo += 1;
            hi -= 1;
            y += if steep_eaves && y == base_y + 1 { 2 } else { 1 };
        }
        for x in rect.x1 - 1..=rect.x2 + 1 {
            grid.set(x, y, lo, ridge);
        }
    } else {
        let (mut lo, mut hi) = (rect.x1 - 1, rect.x2 + 1);
        let mut y = base_y + 1;
        while lo < hi {
            for z in rect.z1 - 1..=rect.z2 + 1 {
                grid.set(lo, y, z, Voxel::facing(stairs, Facing::East));
                grid.set(hi, y, z, Voxel::facing(stairs, Facing::West));
                if steep_eaves && y == base_y + 1 {
                    grid.set(lo, y + 1, z, Voxel::facing(stairs, Facing::East));
                    grid.set(hi, y + 1, z, Voxel::facing(stairs, Facing::West));
                }
            }
            for x in lo + 1..hi {
                grid.set(x, y, rect.z1, wall);
                grid.set(x, y, rect.z2, wall);
            }
            lo += 1;
            hi -= 1;
            y += if steep_eaves && y == base_y + 1 { 2 } else { 1 };
        }
        for z in rect.z1 - 1..=rect.z2 + 1 {
            grid.set(lo, y, z, ridge);
        }
    }
}

/// Steep lower ring, then a flat cap one course up.
fn mansard_roof(grid: &mut VoxelGrid, rect: &PlanRect, base_y: i32, palette: &StylePalette) {
    let stairs = palette.roof_stairs;
    let y = base_y + 1;
    for x in rect.x1 - 1..=rect.x2 + 1 {
        grid.set(x, y, rect.z1 - 1, Voxel::facing(stairs, Facing::South));
        grid.set(x, y, rect.z2 + 1, Voxel::facing(stairs, Facing::North));
    }
    for z in rect.z1 - 1..=rect.z2 + 1 {
        grid.set(rect.x1 - 1, y, z, Voxel::facing(stairs, Facing::East));
        grid.set(rect.x2 + 1, y, z, Voxel::facing(stairs, Facing::West));
    }
    grid.fill(
        rect.x1,
        y + 1,
        rect.z1,
        rect.x2,
        y + 1,
        rect.z2,
        Voxel::new(palette.roof_flat),
    );
}

/// Yard features, applied in a fixed order so the RNG stream stays
/// positional: porch, chimney, backyard, driveway, fence, trees, garden,
/// pool.
fn yard_features(grid: &mut VoxelGrid, main: &PlanRect, rects: &[PlanRect], ctx: &mut GenContext) {
    let features = ctx.options.features;
    let palette = ctx.palette;
    let door_x = (main.x1 + main.x2) / 2;
    let south_edge = rects.iter().map(|r| r.z2).max().unwrap_or(main.z2);

    if features.contains(FeatureFlags::PORCH) {
        let z1 = main.z2 + 1;
        let z2 = main.z2 + 3;
        slab(grid, door_x - 2, z1, door_x + 2, z2, 0, Voxel::new(palette.floor));
        for (px, pz) in [(door_x - 2, z2), (door_x + 2, z2)] {
            grid.fill(px, 1, pz, px, 3, pz, Voxel::new(palette.wall_accent));
        }
        slab(grid, door_x - 2, z1, door_x + 2, z2, STORY_HEIGHT, Voxel::new(palette.roof_flat));
    }

    if features.contains(FeatureFlags::CHIMNEY) {
        let (cx, cz) = (main.x2 - 1, main.z1 + 1);
        let top = main.stories * STORY_HEIGHT + main.z2 - main.z1;
        grid.fill(cx, 1, cz, cx, top, cz, Voxel::new(blocks::COBBLESTONE));
        grid.set(cx, top + 1, cz, Voxel::new(blocks::COBBLESTONE_WALL));
    }

    if features.contains(FeatureFlags::BACKYARD) {
        slab(
            grid,
            main.x1 + 1,
            main.z1 - 4,
            main.x2 - 1,
            main.z1 - 1,
            0,
            Voxel::new(blocks::DIRT_PATH),
        );
    }

    if features.contains(FeatureFlags::DRIVEWAY) {
        slab(
            grid,
            door_x + 3,
            south_edge + 1,
            door_x + 5,
            grid.length() as i32 - 1,
            0,
            Voxel::new(blocks::GRAVEL),
        );
    }

    if features.contains(FeatureFlags::FENCE) {
        let fence = Voxel::new(palette.fence);
        let (fx1, fz1) = (2, 2);
        let (fx2, fz2) = (grid.width() as i32 - 3, grid.length() as i32 - 3);
        for x in fx1..=fx2 {
            grid.set(x, 1, fz1, fence);
            grid.set(x, 1, fz2, fence);
        }
        for z in fz1..=fz2 {
            grid.set(fx1, 1, z, fence);
            grid.set(fx2, 1, z, fence);
        }
        // Gate on the door axis.
        grid.set(door_x, 1, fz2, Voxel::facing(blocks::OAK_FENCE_GATE, Facing::South));
    }

    if features.contains(FeatureFlags::TREES) {
        plant_tree(grid, main.x1 - 4, 0, main.z1 - 3);
        plant_tree(grid, main.x2 + 4, 0, main.z1 - 3);
        if ctx.rng.chance(0.5) {
            plant_tree(grid, main.x1 - 4, 0, south_edge + 3);
        }
    }

    if features.contains(FeatureFlags::GARDEN) {
        for dz in 0..3 {
            let z = main.z1 + 1 + dz * 2;
            for dx in 0..2 {
                let x = main.x1 - 4 + dx;
                grid.set(x, 0, z, Voxel::new(blocks::DIRT));
                let plant = if ctx.rng.chance(0.6) {
                    blocks::ROSE_BUSH
                } else {
                    blocks::WHEAT_CROP
                };
                grid.set(x, 1, z, Voxel::new(plant));
            }
        }
    }

    if features.contains(FeatureFlags::POOL) {
        let (px1, pz1) = (main.x2 + 2, south_edge + 2);
        let (px2, pz2) = (px1 + 4, pz1 + 3);
        slab(grid, px1, pz1, px2, pz2, 0, Voxel::new(blocks::CUT_SANDSTONE));
        grid.fill(px1 + 1, 0, pz1 + 1, px2 - 1, 0, pz2 - 1, Voxel::new(blocks::WATER));
    }
}
