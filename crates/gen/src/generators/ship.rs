//! Sailing ship: a cosine-tapered plank hull floating at the waterline,
//! deck cabins astern, and square-rigged masts whose lowest sail always
//! clears the tallest deck structure.

use super::{place_door, slab, wall_ring, GenContext, Shell, STORY_HEIGHT};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::furnish::room_kind_for;
use crate::geometry::{profile, Blend};
use crate::grid::VoxelGrid;
use crate::options::RoomKind;
use crate::partition::RoomBounds;
use blockwright_core::{blocks, Facing, Voxel, BLOCK_AIR};
use tracing::debug;

const MIN_LENGTH: i32 = 24;
const MIN_BEAM: i32 = 7;
/// Hull draft below the waterline.
const DRAFT: i32 = 3;
/// Deck height above the waterline.
const FREEBOARD: i32 = 3;
/// Fraction of the hull length spent tapering at each end.
const BOW_FRACTION: f64 = 0.30;
const STERN_FRACTION: f64 = 0.20;
const SAIL_TIER_HEIGHT: i32 = 4;

const CABIN_ROTATION: [RoomKind; 2] = [RoomKind::Bedroom, RoomKind::Storage];

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let length = (ctx.options.length.unwrap_or(40) as i32).max(MIN_LENGTH);
    let beam = {
        let b = (ctx.options.width.unwrap_or(11) as i32).max(MIN_BEAM);
        b | 1 // keel needs a center column
    };
    let cabin_stories = (ctx.options.floors.min(2)) as i32;

    let waterline = DRAFT;
    let deck_y = waterline + FREEBOARD;
    let mast_top = deck_y + 3 * SAIL_TIER_HEIGHT + 4;

    let grid_w = (beam + 4) as usize;
    let grid_l = (length + 8) as usize; // room for the bowsprit
    let mut grid = VoxelGrid::new(grid_w, (mast_top + 2) as usize, grid_l);
    let mut frame = ShellFrame::new(waterline, deck_y);
    debug!(length, beam, cabin_stories, "laying down hull");

    let cx = grid_w as i32 / 2;
    let z0 = 2; // bow
    let z1 = z0 + length - 1; // stern

    hull(&mut grid, cx, z0, z1, beam, deck_y, ctx);
    bowsprit(&mut grid, cx, z0, deck_y);

    let cabin_top = cabins(&mut grid, &mut frame, cx, z0, z1, beam, deck_y, cabin_stories, ctx)?;
    masts(&mut grid, cx, z0, length, deck_y, cabin_top, ctx);

    Ok((grid, frame))
}

/// Half-beam of the hull at `z`, tapering toward both ends.
fn half_beam(z: i32, z0: i32, z1: i32, max_half: f64) -> f64 {
    let length = f64::from(z1 - z0 + 1);
    let bow_len = length * BOW_FRACTION;
    let stern_len = length * STERN_FRACTION;
    let from_bow = f64::from(z - z0);
    let from_stern = f64::from(z1 - z);
    let mut t: f64 = 1.0;
    if from_bow < bow_len {
        t = t.min(profile(Blend::CosineEase, from_bow / bow_len));
    }
    if from_stern < stern_len {
        t = t.min(profile(Blend::CosineEase, from_stern / stern_len));
    }
    // Even the tips keep one plank of width.
    (max_half * t).max(0.5)
}

fn hull(grid: &mut VoxelGrid, cx: i32, z0: i32, z1: i32, beam: i32, deck_y: i32, ctx: &GenContext) {
    let palette = ctx.palette;
    let max_half = f64::from(beam / 2);
    let plank = Voxel::new(palette.wall);
    let keel = Voxel::new(palette.foundation);

    for z in z0..=z1 {
        let hb = half_beam(z, z0, z1, max_half);
        let hb_cells = hb.floor() as i32;
        // The keel rises toward the ends: full draft amidships, none at the
        // tips, with a smoothstep belly in between.
        let depth = (f64::from(DRAFT) * profile(Blend::Smoothstep, hb / max_half)).round() as i32;
        let waterline = deck_y - FREEBOARD;
        let bottom = waterline - depth;

        for dx in -hb_cells..=hb_cells {
            let x = cx + dx;
            let edge = dx.abs() == hb_cells;
            if edge {
                // Side planking from the bilge up past the deck (bulwark).
                grid.fill(x, bottom, z, x, deck_y + 1, z, plank);
            } else {
                // Solid bilge up to the waterline keeps the hold dry when
                // the water plane gets stamped around the hull.
                grid.fill(x, bottom, z, x, waterline - 1, z, keel);
                grid.set(x, waterline, z, Voxel::new(palette.floor_alt));
                grid.fill(x, waterline + 1, z, x, deck_y - 1, z, Voxel::new(BLOCK_AIR));
                grid.set(x, deck_y, z, Voxel::new(palette.floor));
            }
        }
    }
}

fn bowsprit(grid: &mut VoxelGrid, cx: i32, z0: i32, deck_y: i32) {
    let spar = Voxel::new(blocks::STRIPPED_OAK_LOG);
    for step in 0..4 {
        grid.set(cx, deck_y + step / 2, z0 - 1 - step, spar);
    }
}

/// Stern cabin block, one room per story. Returns the y of the highest
/// cabin ceiling so the rig can stay clear of it.
#[allow(clippy::too_many_arguments)]
fn cabins(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    cx: i32,
    z0: i32,
    z1: i32,
    beam: i32,
    deck_y: i32,
    stories: i32,
    ctx: &mut GenContext,
) -> Result<i32, GenError> {
    let palette = ctx.palette;
    let half = beam / 2 - 1;
    let depth = ((z1 - z0) / 5).clamp(4, 8);
    let (c1x, c2x) = (cx - half, cx + half);
    let (c1z, c2z) = (z1 - depth, z1 - 1);
    let story_h = STORY_HEIGHT - 1;

    let mut top = deck_y;
    for story in 0..stories {
        ctx.deadline.check()?;
        let base = deck_y + story * story_h;
        wall_ring(grid, c1x, c1z, c2x, c2z, base + 1, base + story_h, Voxel::new(palette.wall));
        grid.fill(c1x + 1, base + 1, c1z + 1, c2x - 1, base + story_h - 1, c2z - 1, Voxel::new(BLOCK_AIR));
        slab(grid, c1x, c1z, c2x, c2z, base + story_h, Voxel::new(palette.floor_alt));
        top = base + story_h;

        grid.set(c1x, base + 2, (c1z + c2z) / 2, Voxel::new(palette.window));
        frame.windows.push((c1x, base + 2, (c1z + c2z) / 2));
        grid.set(c2x, base + 2, (c1z + c2z) / 2, Voxel::new(palette.window));

        let room = RoomBounds {
            x1: c1x + 1,
            z1: c1z + 1,
            x2: c2x - 1,
            z2: c2z - 1,
            floor_y: base,
            height: story_h - 1,
        };
        let kind = room_kind_for(ctx.options.rooms.as_deref(), &CABIN_ROTATION, story as usize);
        ctx.furnisher.furnish(grid, &room, kind, palette, ctx.rng);
    }

    // Cabin door opens onto the deck, facing the bow.
    grid.set(cx, deck_y + 1, c1z, Voxel::new(BLOCK_AIR));
    grid.set(cx, deck_y + 2, c1z, Voxel::new(BLOCK_AIR));
    place_door(grid, frame, cx, deck_y, c1z, Facing::North, palette);
    frame.wall_rects.push((c1x, c1z, c2x, c2z));

    // Hold hatch just forward of the cabin.
    let hatch_z = c1z - 2;
    for y in deck_y - FREEBOARD + 1..=deck_y {
        grid.set(cx + 1, y, hatch_z, Voxel::facing(blocks::LADDER, Facing::North));
    }
    Ok(top)
}

/// Masts with square wool sails. The lowest sail tier starts strictly
/// above `clearance_y`, whatever got built on deck.
fn masts(
    grid: &mut VoxelGrid,
    cx: i32,
    z0: i32,
    length: i32,
    deck_y: i32,
    clearance_y: i32,
    ctx: &mut GenContext,
) {
    let mast = Voxel::new(blocks::DARK_OAK_LOG);
    let count = if length >= 36 { 3 } else { 2 };
    let sail_base = clearance_y + 2;
    let top = sail_base + 2 * SAIL_TIER_HEIGHT + 2;

    // Twentieths of the hull length; the mizzen stays clear of the cabin.
    let positions: &[i32] = match count {
        3 => &[4, 10, 15],
        _ => &[5, 13],
    };
    for (i, twentieths) in positions.iter().enumerate() {
        let z = z0 + length * twentieths / 20;
        grid.fill(cx, deck_y + 1, z, cx, top, z, mast);
        for tier in 0..2 {
            let y = sail_base + tier * SAIL_TIER_HEIGHT;
            sail(grid, cx, y, z, 3 - tier, ctx);
        }
        // Crow's nest on the main mast.
        if i == count / 2 {
            grid.fill(cx - 1, top, z - 1, cx + 1, top, z + 1, Voxel::new(ctx.palette.floor));
            grid.set(cx, top + 1, z, Voxel::new(blocks::BANNER));
        }
    }
}

fn sail(grid: &mut VoxelGrid, cx: i32, y: i32, z: i32, half_width: i32, ctx: &mut GenContext) {
    let cloth = *ctx.rng.pick(&[
        Voxel::new(blocks::WHITE_WOOL),
        Voxel::new(blocks::WHITE_WOOL),
        Voxel::new(blocks::RED_WOOL),
    ]);
    // Yard arm, then the cloth billowing one cell abaft the mast.
    grid.fill(cx - half_width, y + SAIL_TIER_HEIGHT - 1, z, cx + half_width, y + SAIL_TIER_HEIGHT - 1, z, Voxel::new(blocks::STRIPPED_OAK_LOG));
    for dy in 0..SAIL_TIER_HEIGHT - 1 {
        for dx in -half_width..=half_width {
            if dx != 0 {
                grid.set(cx + dx, y + dy, z + 1, cloth);
            }
        }
    }
}
