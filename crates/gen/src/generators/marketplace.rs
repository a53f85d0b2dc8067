//! Marketplace: a paved plaza around a covered well, with facing rows of
//! market stalls. The south row is the north row mirrored, so both rows of
//! awnings open toward the well.

use super::{well, GenContext, Shell};
use crate::compose::{paste, paste_mirrored};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::grid::VoxelGrid;
use crate::rng::StructureRng;
use blockwright_core::palette::StylePalette;
use blockwright_core::{blocks, Voxel};
use serde_json::json;
use tracing::debug;

const MIN_PLAZA: i32 = 25;
const STALL_WIDTH: usize = 4;
const STALL_DEPTH: usize = 3;
const STALL_PITCH: i32 = 6;

const AWNING_COLORS: [(Voxel, f64); 3] = [
    (Voxel::new(blocks::RED_WOOL), 2.0),
    (Voxel::new(blocks::WHITE_WOOL), 2.0),
    (Voxel::new(blocks::YELLOW_WOOL), 1.0),
];

const STALL_GOODS: [&str; 4] = ["produce", "tools", "cloth", "bread"];

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let side = (ctx.options.width.unwrap_or(35) as i32).max(MIN_PLAZA);
    let mut grid = VoxelGrid::new(side as usize, 10, side as usize);
    let mut frame = ShellFrame::new(0, 4);
    debug!(side, "laying out marketplace");

    // Paving: foundation slabs with an accent border.
    grid.fill(0, 0, 0, side - 1, 0, side - 1, Voxel::new(ctx.palette.floor));
    for z in [0, side - 1] {
        grid.fill(0, 0, z, side - 1, 0, z, Voxel::new(ctx.palette.floor_alt));
    }
    for x in [0, side - 1] {
        grid.fill(x, 0, 0, x, 0, side - 1, Voxel::new(ctx.palette.floor_alt));
    }

    let center = side / 2;
    // Accent paving apron around the well.
    grid.fill(center - 2, 0, center - 2, center + 2, 0, center + 2, Voxel::new(ctx.palette.floor_alt));
    well(&mut grid, center, center, ctx.palette);

    stall_rows(&mut grid, side, ctx)?;
    lamps(&mut grid, side, ctx.palette);

    frame.wall_rects.push((0, 0, side - 1, side - 1));
    Ok((grid, frame))
}

/// One stall, booth opening toward +z. Awning color and stocked goods come
/// from the caller's stream.
fn stall(palette: &StylePalette, rng: &mut StructureRng) -> VoxelGrid {
    let mut booth = VoxelGrid::new(STALL_WIDTH, 5, STALL_DEPTH);
    let w = STALL_WIDTH as i32 - 1;
    let d = STALL_DEPTH as i32 - 1;

    // Corner posts and the front counter.
    for (x, z) in [(0, 0), (w, 0), (0, d), (w, d)] {
        booth.fill(x, 0, z, x, 2, z, Voxel::new(palette.fence));
    }
    booth.fill(1, 0, d, w - 1, 0, d, Voxel::new(palette.furniture));

    // Striped awning.
    let cloth = *rng.pick_weighted(&AWNING_COLORS);
    for x in 0..=w {
        let stripe = if x % 2 == 0 { cloth } else { Voxel::new(blocks::WHITE_WOOL) };
        booth.fill(x, 3, 0, x, 3, d, stripe);
    }

    // Stock behind the counter.
    booth.set(1, 0, 0, Voxel::new(blocks::BARREL));
    booth.set(w - 1, 0, 0, Voxel::new(blocks::CHEST));
    booth.add_entity(
        w - 1,
        0,
        0,
        json!({ "loot": *rng.pick(&STALL_GOODS), "rolls": rng.range_i32(1, 3) }),
    );
    booth
}

fn stall_rows(grid: &mut VoxelGrid, side: i32, ctx: &mut GenContext) -> Result<(), GenError> {
    let north_z = 2;
    let south_z = side - 2 - STALL_DEPTH as i32;
    let mut x = 3;
    while x + (STALL_WIDTH as i32) < side - 3 {
        ctx.deadline.check()?;
        // Facing pair per column; the southern booth is flipped so its
        // opening still faces the well.
        let booth = stall(ctx.palette, ctx.rng);
        paste(grid, &booth, x, 1, north_z);
        let booth = stall(ctx.palette, ctx.rng);
        paste_mirrored(grid, &booth, x, 1, south_z);
        x += STALL_PITCH;
    }
    Ok(())
}

fn lamps(grid: &mut VoxelGrid, side: i32, palette: &StylePalette) {
    for (x, z) in [(2, 2), (2, side - 3), (side - 3, 2), (side - 3, side - 3)] {
        grid.fill(x, 1, z, x, 3, z, Voxel::new(palette.fence));
        grid.set(x, 4, z, Voxel::new(palette.light));
        grid.set(x, 3, z, Voxel::new(blocks::BANNER));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furnish::BasicFurnisher;
    use crate::generate::Deadline;
    use crate::options::{Archetype, GenerationOptions};
    use blockwright_core::palette::SANDSTONE;

    fn run(options: &GenerationOptions) -> (VoxelGrid, ShellFrame) {
        let mut rng = StructureRng::new(options.seed);
        let mut ctx = GenContext {
            options,
            palette: &SANDSTONE,
            furnisher: &BasicFurnisher,
            rng: &mut rng,
            deadline: &Deadline::none(),
        };
        generate(&mut ctx).expect("marketplace generation failed")
    }

    #[test]
    fn well_sits_at_the_plaza_center() {
        let options = GenerationOptions::new(Archetype::Marketplace, 21);
        let (grid, _) = run(&options);
        let c = grid.width() as i32 / 2;
        assert_eq!(grid.get(c, 1, c).unwrap().id, blocks::WATER);
        assert_eq!(grid.get(c - 1, 1, c - 1).unwrap().id, blocks::COBBLESTONE);
    }

    #[test]
    fn south_row_mirrors_the_north_row() {
        let options = GenerationOptions::new(Archetype::Marketplace, 21);
        let (grid, _) = run(&options);
        let side = grid.length() as i32;
        // North booths open south: counter on the inner face, posts behind.
        let north_counter_z = 2 + STALL_DEPTH as i32 - 1;
        let south_counter_z = side - 2 - STALL_DEPTH as i32;
        assert_eq!(grid.get(4, 1, north_counter_z).unwrap().id, SANDSTONE.furniture);
        assert_eq!(grid.get(4, 1, south_counter_z).unwrap().id, SANDSTONE.furniture);
    }

    #[test]
    fn stalls_carry_loot_entities() {
        let options = GenerationOptions::new(Archetype::Marketplace, 21);
        let (grid, _) = run(&options);
        assert!(!grid.entities().is_empty());
        for entity in grid.entities() {
            assert!(entity.payload.get("loot").is_some());
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let options = GenerationOptions::new(Archetype::Marketplace, 8);
        let (a, _) = run(&options);
        let (b, _) = run(&options);
        assert_eq!(a, b);
        assert_eq!(a.entities(), b.entities());
    }
}
