//! Castle: curtain walls with a wall-walk and battlements, four corner
//! towers, a south gatehouse, and a central keep that is never shorter than
//! two stories.

use super::{
    battlements, hollow_interior, place_door, slab, wall_ring, window_row, GenContext, Shell,
    STORY_HEIGHT,
};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::grid::VoxelGrid;
use crate::furnish::room_kind_for;
use crate::geometry::{fill_disc, fill_ring, weather_region};
use crate::options::RoomKind;
use crate::partition::{front_back_rooms, FloorArea};
use blockwright_core::{blocks, Facing, Voxel, BLOCK_AIR};
use tracing::debug;

/// Smallest bailey that fits the keep plus a walkable courtyard.
const MIN_FOOTPRINT: i32 = 25;
const EDGE_MARGIN: i32 = 4;
const CURTAIN_HEIGHT: i32 = 6;
const CORNER_TOWER_RADIUS: i32 = 3;
const KEEP_SIZE: i32 = 13;
const WEATHER_PROBABILITY: f64 = 0.14;

const KEEP_ROTATION: [RoomKind; 4] = [
    RoomKind::Hall,
    RoomKind::Armory,
    RoomKind::Bedroom,
    RoomKind::Storage,
];

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let footprint = (ctx.options.width.unwrap_or(31) as i32).max(MIN_FOOTPRINT);
    // The keep never drops below two stories, whatever the request.
    let keep_floors = (ctx.options.floors.max(2)) as i32;

    let side = (footprint + 2 * EDGE_MARGIN) as usize;
    let keep_top = keep_floors * STORY_HEIGHT;
    let height = (keep_top.max(CURTAIN_HEIGHT) + 12) as usize;

    let mut grid = VoxelGrid::new(side, height, side);
    let mut frame = ShellFrame::new(0, CURTAIN_HEIGHT);
    debug!(footprint, keep_floors, "raising castle");

    let (w1, w2) = (EDGE_MARGIN, EDGE_MARGIN + footprint - 1);

    curtain_walls(&mut grid, w1, w2, ctx);
    frame.wall_rects.push((w1, w1, w2, w2));
    corner_towers(&mut grid, w1, w2, ctx);
    gatehouse(&mut grid, w1, w2, ctx);
    keep(&mut grid, &mut frame, w1, w2, keep_floors, ctx)?;

    // Path from the gate to the keep door.
    let mid = (w1 + w2) / 2;
    let keep_south = (w1 + w2) / 2 + KEEP_SIZE / 2;
    grid.fill(mid - 1, 0, keep_south + 1, mid + 1, 0, w2, Voxel::new(blocks::GRAVEL));

    // A courtyard well, most of the time.
    if ctx.rng.chance(0.75) {
        let (wx, wz) = (w1 + 5, w2 - 5);
        fill_ring(&mut grid, wx, 1, wz, 1.5, Voxel::new(blocks::COBBLESTONE));
        grid.set(wx, 0, wz, Voxel::new(blocks::WATER));
    }

    Ok((grid, frame))
}

fn curtain_walls(grid: &mut VoxelGrid, w1: i32, w2: i32, ctx: &mut GenContext) {
    let wall = Voxel::new(ctx.palette.wall);
    // Two courses thick with a walkway slab on top, battlements outside.
    wall_ring(grid, w1, w1, w2, w2, 1, CURTAIN_HEIGHT, wall);
    wall_ring(grid, w1 + 1, w1 + 1, w2 - 1, w2 - 1, 1, CURTAIN_HEIGHT, wall);
    battlements(grid, w1, w1, w2, w2, CURTAIN_HEIGHT + 1, wall);

    // Rain-worn masonry on the curtain, worked around the ring north, south,
    // west, east so the stream order never shifts.
    let worn = [
        (Voxel::new(blocks::CRACKED_STONE_BRICKS), 1.0),
        (Voxel::new(blocks::MOSSY_COBBLESTONE), 1.0),
    ];
    for (x1, z1, x2, z2) in [
        (w1, w1, w2, w1 + 1),
        (w1, w2 - 1, w2, w2),
        (w1, w1 + 2, w1 + 1, w2 - 2),
        (w2 - 1, w1 + 2, w2, w2 - 2),
    ] {
        weather_region(
            grid,
            x1,
            1,
            z1,
            x2,
            CURTAIN_HEIGHT,
            z2,
            ctx.palette.wall,
            &worn,
            WEATHER_PROBABILITY,
            ctx.rng,
        );
    }
}

fn corner_towers(grid: &mut VoxelGrid, w1: i32, w2: i32, ctx: &GenContext) {
    let wall = Voxel::new(ctx.palette.wall);
    let r = f64::from(CORNER_TOWER_RADIUS);
    let top = CURTAIN_HEIGHT + 3;
    for (cx, cz) in [(w1, w1), (w1, w2), (w2, w1), (w2, w2)] {
        fill_disc(grid, cx, 0, cz, r, Voxel::new(ctx.palette.foundation));
        for y in 1..=top {
            fill_ring(grid, cx, y, cz, r, wall);
        }
        slab(
            grid,
            cx - CORNER_TOWER_RADIUS + 1,
            cz - CORNER_TOWER_RADIUS + 1,
            cx + CORNER_TOWER_RADIUS - 1,
            cz + CORNER_TOWER_RADIUS - 1,
            top,
            Voxel::new(ctx.palette.floor_alt),
        );
        super::ring_battlements(grid, cx, cz, top + 1, r, wall);
        // Doorway into the courtyard, on the face that looks inward.
        let (dx, dz) = (
            if cx == w1 { CORNER_TOWER_RADIUS } else { -CORNER_TOWER_RADIUS },
            0,
        );
        grid.set(cx + dx, 1, cz + dz, Voxel::new(BLOCK_AIR));
        grid.set(cx + dx, 2, cz + dz, Voxel::new(BLOCK_AIR));
    }
}

fn gatehouse(grid: &mut VoxelGrid, w1: i32, w2: i32, ctx: &GenContext) {
    let mid = (w1 + w2) / 2;
    // Cut the passage through both wall courses.
    grid.fill(mid - 1, 1, w2 - 1, mid + 1, 4, w2, Voxel::new(BLOCK_AIR));
    // Portcullis bars hang over the opening.
    for x in mid - 1..=mid + 1 {
        grid.set(x, 4, w2, Voxel::new(blocks::IRON_BARS));
    }
    // Flanking turrets.
    let wall = Voxel::new(ctx.palette.wall);
    for tx in [mid - 3, mid + 3] {
        grid.fill(tx, 1, w2 - 1, tx, CURTAIN_HEIGHT + 2, w2, wall);
    }
}

fn keep(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    w1: i32,
    w2: i32,
    keep_floors: i32,
    ctx: &mut GenContext,
) -> Result<(), GenError> {
    let mid = (w1 + w2) / 2;
    let half = KEEP_SIZE / 2;
    let (k1x, k1z, k2x, k2z) = (mid - half, mid - half, mid + half, mid + half);
    let palette = ctx.palette;
    let keep_top = keep_floors * STORY_HEIGHT;

    slab(grid, k1x, k1z, k2x, k2z, 0, Voxel::new(palette.foundation));
    for story in 0..keep_floors {
        ctx.deadline.check()?;
        let floor_y = story * STORY_HEIGHT;
        if story > 0 {
            slab(grid, k1x, k1z, k2x, k2z, floor_y, Voxel::new(palette.floor));
        } else {
            grid.fill(k1x + 1, 0, k1z + 1, k2x - 1, 0, k2z - 1, Voxel::new(palette.floor));
        }
        wall_ring(
            grid,
            k1x,
            k1z,
            k2x,
            k2z,
            floor_y + 1,
            floor_y + STORY_HEIGHT,
            Voxel::new(palette.wall),
        );
        hollow_interior(grid, k1x, k1z, k2x, k2z, floor_y + 1, floor_y + STORY_HEIGHT - 1);
        window_row(grid, frame, k1x, k1z, k2x, k2z, floor_y, 4, palette);

        // Two chambers per story, the split side alternating with story
        // parity so stacked floors differ.
        let area = FloorArea::new(k1x + 1, k1z + 1, k2x - 1, k2z - 1);
        for (index, room) in front_back_rooms(area, floor_y, STORY_HEIGHT - 1, story as usize)
            .into_iter()
            .enumerate()
        {
            let kind = room_kind_for(
                ctx.options.rooms.as_deref(),
                &KEEP_ROTATION,
                story as usize * 2 + index,
            );
            ctx.furnisher.furnish(grid, &room, kind, palette, ctx.rng);
        }
    }
    slab(grid, k1x, k1z, k2x, k2z, keep_top, Voxel::new(palette.floor));
    battlements(grid, k1x, k1z, k2x, k2z, keep_top + 1, Voxel::new(palette.wall));

    // Ladder shaft between stories.
    for y in 1..keep_top {
        grid.set(k1x + 1, y, k1z + 1, Voxel::facing(blocks::LADDER, Facing::South));
    }

    // Keep entrance faces the gate.
    grid.set(mid, 1, k2z, Voxel::new(BLOCK_AIR));
    grid.set(mid, 2, k2z, Voxel::new(BLOCK_AIR));
    place_door(grid, frame, mid, 0, k2z, Facing::South, palette);
    frame.wall_rects.push((k1x, k1z, k2x, k2z));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furnish::BasicFurnisher;
    use crate::generate::Deadline;
    use crate::options::{Archetype, GenerationOptions};
    use crate::rng::StructureRng;
    use blockwright_core::palette::STONEWORK;

    fn run(options: &GenerationOptions) -> (VoxelGrid, ShellFrame) {
        let mut rng = StructureRng::new(options.seed);
        let mut ctx = GenContext {
            options,
            palette: &STONEWORK,
            furnisher: &BasicFurnisher,
            rng: &mut rng,
            deadline: &Deadline::none(),
        };
        generate(&mut ctx).expect("castle generation failed")
    }

    #[test]
    fn keep_is_never_shorter_than_two_stories() {
        let options = GenerationOptions::new(Archetype::Castle, 21).with_floors(1);
        let (grid, frame) = run(&options);
        let keep = frame.wall_rects[1];
        let mid_x = (keep.0 + keep.2) / 2;
        // Second-story wall material present even though one floor was asked.
        let y = STORY_HEIGHT + 2;
        assert_eq!(grid.get(mid_x, y, keep.1).unwrap().id, STONEWORK.wall);
    }

    #[test]
    fn gatehouse_passage_is_open() {
        let options = GenerationOptions::new(Archetype::Castle, 33).with_floors(2);
        let (grid, frame) = run(&options);
        let curtain = frame.wall_rects[0];
        let mid = (curtain.0 + curtain.2) / 2;
        for y in 1..=3 {
            assert!(grid.get(mid, y, curtain.3).unwrap().is_air());
            assert!(grid.get(mid, y, curtain.3 - 1).unwrap().is_air());
        }
        assert_eq!(grid.get(mid, 4, curtain.3).unwrap().id, blocks::IRON_BARS);
    }

    #[test]
    fn curtain_walls_carry_battlements() {
        let options = GenerationOptions::new(Archetype::Castle, 33).with_floors(2);
        let (grid, frame) = run(&options);
        let curtain = frame.wall_rects[0];
        let merlons = grid
            .iter_solid()
            .filter(|&(_, y, _, _)| y == CURTAIN_HEIGHT + 1)
            .filter(|&(x, _, z, _)| x == curtain.0 || x == curtain.2 || z == curtain.1 || z == curtain.3)
            .count();
        assert!(merlons > 20);
    }

    #[test]
    fn curtain_masonry_shows_wear() {
        let options = GenerationOptions::new(Archetype::Castle, 33).with_floors(2);
        let (grid, _) = run(&options);
        let worn = grid
            .iter_solid()
            .filter(|(_, _, _, voxel)| {
                voxel.id == blocks::CRACKED_STONE_BRICKS
                    || voxel.id == blocks::MOSSY_COBBLESTONE
            })
            .count();
        assert!(worn > 10, "expected worn masonry on the curtain, got {worn}");
    }

    #[test]
    fn footprint_clamps_to_minimum() {
        let options = GenerationOptions::new(Archetype::Castle, 2).with_footprint(10, 10);
        let (_, frame) = run(&options);
        let curtain = frame.wall_rects[0];
        assert_eq!(curtain.2 - curtain.0 + 1, MIN_FOOTPRINT);
    }
}
