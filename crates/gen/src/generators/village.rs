//! Village: a crossroads settlement composed from six independent
//! sub-builds. Each sub-build runs on its own forked stream, keyed by a
//! fixed slot number, so adding draws inside one lot never reshuffles its
//! neighbors.

use super::{house, plant_tree, well, GenContext, Shell};
use crate::compose::{paste, paste_mirrored, trim};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::grid::VoxelGrid;
use crate::options::{Archetype, FeatureFlags, GenerationOptions, RoofShape};
use crate::rng::StructureRng;
use blockwright_core::{blocks, Voxel};
use tracing::debug;

const MIN_SITE: i32 = 60;
const ROAD_HALF: i32 = 1;
const LAMP_SPACING: i32 = 10;

/// Slot layout: four house lots around the crossroads, then the farm and
/// the orchard. Order is part of the output contract.
const HOUSE_SLOTS: [(u32, Quadrant); 4] = [
    (0, Quadrant::NorthWest),
    (1, Quadrant::NorthEast),
    (2, Quadrant::SouthWest),
    (3, Quadrant::SouthEast),
];
const FARM_SLOT: u32 = 4;
const ORCHARD_SLOT: u32 = 5;

#[derive(Debug, Clone, Copy)]
enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let side = (ctx.options.width.unwrap_or(80) as i32).max(MIN_SITE);
    let mut grid = VoxelGrid::new(side as usize, 26, side as usize);
    let frame = ShellFrame::new(0, 4);
    debug!(side, "laying out village");

    let center = side / 2;
    roads(&mut grid, side, center);

    for (slot, quadrant) in HOUSE_SLOTS {
        ctx.deadline.check()?;
        let mut fork = ctx.rng.fork(slot);
        let lot = house_lot(&mut fork, ctx)?;
        place_house(&mut grid, &lot, quadrant, side, center);
    }

    let mut fork = ctx.rng.fork(FARM_SLOT);
    farm(&mut grid, &mut fork, center + ROAD_HALF + 3, side - 14, ctx);

    let mut fork = ctx.rng.fork(ORCHARD_SLOT);
    orchard(&mut grid, &mut fork, 6, 6);

    // The well anchors the crossroads.
    well(&mut grid, center + ROAD_HALF + 4, center + ROAD_HALF + 4, ctx.palette);
    lamps(&mut grid, side, center, ctx);

    Ok((grid, frame))
}

fn roads(grid: &mut VoxelGrid, side: i32, center: i32) {
    let path = Voxel::new(blocks::DIRT_PATH);
    grid.fill(0, 0, center - ROAD_HALF, side - 1, 0, center + ROAD_HALF, path);
    grid.fill(center - ROAD_HALF, 0, 0, center + ROAD_HALF, 0, side - 1, path);
}

/// Run the house generator on the forked stream and trim the lot tight.
fn house_lot(fork: &mut StructureRng, ctx: &GenContext) -> Result<VoxelGrid, GenError> {
    let width = 7 + 2 * fork.index(2) as u32;
    let floors = 1 + fork.index(2) as u32;
    let roof = *fork.pick(&[RoofShape::Gable, RoofShape::Hip]);

    let mut options = GenerationOptions::new(Archetype::House, 0)
        .with_footprint(width, 8)
        .with_floors(floors);
    options.roof_shape = roof;
    options.features = FeatureFlags::empty();

    let mut sub_ctx = GenContext {
        options: &options,
        palette: ctx.palette,
        furnisher: ctx.furnisher,
        rng: fork,
        deadline: ctx.deadline,
    };
    let (lot, _) = house::generate(&mut sub_ctx)?;
    Ok(trim(lot, 1))
}

/// Paste a lot so its front door faces the east-west road: lots south of it
/// are mirrored.
fn place_house(grid: &mut VoxelGrid, lot: &VoxelGrid, quadrant: Quadrant, side: i32, center: i32) {
    let lot_w = lot.width() as i32;
    let lot_l = lot.length() as i32;
    let gap = 3;

    let ox = match quadrant {
        Quadrant::NorthWest | Quadrant::SouthWest => center - ROAD_HALF - gap - lot_w,
        Quadrant::NorthEast | Quadrant::SouthEast => (center + ROAD_HALF + gap).min(side - lot_w),
    };
    match quadrant {
        Quadrant::NorthWest | Quadrant::NorthEast => {
            let oz = center - ROAD_HALF - gap - lot_l;
            paste(grid, lot, ox, 0, oz);
        }
        Quadrant::SouthWest | Quadrant::SouthEast => {
            let oz = center + ROAD_HALF + gap;
            paste_mirrored(grid, lot, ox, 0, oz);
        }
    }
}

/// Fenced field: tilled rows with a water channel, crop choice per row.
fn farm(grid: &mut VoxelGrid, fork: &mut StructureRng, x0: i32, z0: i32, ctx: &GenContext) {
    let (w, d) = (11, 8);
    let (x1, z1) = (x0 + w - 1, z0 + d - 1);

    grid.fill(x0, 0, z0, x1, 0, z1, Voxel::new(blocks::DIRT));
    let mid = (x0 + x1) / 2;
    grid.fill(mid, 0, z0 + 1, mid, 0, z1 - 1, Voxel::new(blocks::WATER));

    for x in x0 + 1..x1 {
        if x == mid {
            continue;
        }
        let crop = if fork.chance(0.5) {
            blocks::WHEAT_CROP
        } else {
            blocks::CARROT_CROP
        };
        grid.fill(x, 1, z0 + 1, x, 1, z1 - 1, Voxel::new(crop));
    }

    // Fence with a gate toward the road.
    let fence = Voxel::new(ctx.palette.fence);
    for x in x0..=x1 {
        grid.set(x, 1, z0, fence);
        grid.set(x, 1, z1, fence);
    }
    for z in z0..=z1 {
        grid.set(x0, 1, z, fence);
        grid.set(x1, 1, z, fence);
    }
    grid.set(mid, 1, z0, Voxel::new(blocks::OAK_FENCE_GATE));
}

fn orchard(grid: &mut VoxelGrid, fork: &mut StructureRng, x0: i32, z0: i32) {
    for row in 0..3 {
        for col in 0..3 {
            if fork.chance(0.8) {
                plant_tree(grid, x0 + col * 4, 0, z0 + row * 4);
            }
        }
    }
}

fn lamps(grid: &mut VoxelGrid, side: i32, center: i32, ctx: &GenContext) {
    let post = Voxel::new(ctx.palette.fence);
    let mut offset = LAMP_SPACING / 2;
    while center + offset < side - 2 {
        for pos in [center - offset, center + offset] {
            if pos < 2 {
                continue;
            }
            for (x, z) in [(pos, center + ROAD_HALF + 1), (center - ROAD_HALF - 1, pos)] {
                grid.fill(x, 1, z, x, 2, z, post);
                grid.set(x, 3, z, Voxel::new(ctx.palette.light));
            }
        }
        offset += LAMP_SPACING;
    }
}
