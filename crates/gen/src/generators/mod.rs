//! One generator per structure archetype.
//!
//! Every generator allocates its own grid sized by archetype bounding-box
//! rules, lays the shell with the shared primitives, delegates interiors to
//! the furnisher, and reports its wall geometry in a [`ShellFrame`] for the
//! decoration pass. The shared RNG is threaded positionally: the call order
//! inside each generator is fixed.

pub(crate) mod bridge;
pub(crate) mod castle;
pub(crate) mod cathedral;
pub(crate) mod dungeon;
pub(crate) mod house;
pub(crate) mod marketplace;
pub(crate) mod ship;
pub(crate) mod tower;
pub(crate) mod village;
pub(crate) mod windmill;

use crate::decor::ShellFrame;
use crate::furnish::Furnisher;
use crate::generate::Deadline;
use crate::grid::VoxelGrid;
use crate::options::GenerationOptions;
use crate::rng::StructureRng;
use blockwright_core::{blocks, Facing, StylePalette, Voxel, BLOCK_AIR};

/// One vertical story: three cells of head room plus the ceiling slab.
pub(crate) const STORY_HEIGHT: i32 = 4;

/// Everything a generator call needs besides its own geometry.
pub(crate) struct GenContext<'a> {
    pub options: &'a GenerationOptions,
    pub palette: &'a StylePalette,
    pub furnisher: &'a dyn Furnisher,
    pub rng: &'a mut StructureRng,
    pub deadline: &'a Deadline,
}

/// A generator's result: the populated grid plus the shell geometry the
/// decoration pass needs.
pub(crate) type Shell = (VoxelGrid, ShellFrame);

/// Horizontal slab over the inclusive rectangle at height `y`.
pub(crate) fn slab(grid: &mut VoxelGrid, x1: i32, z1: i32, x2: i32, z2: i32, y: i32, voxel: Voxel) {
    grid.fill(x1, y, z1, x2, y, z2, voxel);
}

/// Perimeter wall ring between `y1..=y2` (exclusive of interior).
pub(crate) fn wall_ring(
    grid: &mut VoxelGrid,
    x1: i32,
    z1: i32,
    x2: i32,
    z2: i32,
    y1: i32,
    y2: i32,
    voxel: Voxel,
) {
    for y in y1..=y2 {
        for x in x1..=x2 {
            grid.set(x, y, z1, voxel);
            grid.set(x, y, z2, voxel);
        }
        for z in z1..=z2 {
            grid.set(x1, y, z, voxel);
            grid.set(x2, y, z, voxel);
        }
    }
}

/// Clear the interior volume of a walled rectangle to air.
pub(crate) fn hollow_interior(
    grid: &mut VoxelGrid,
    x1: i32,
    z1: i32,
    x2: i32,
    z2: i32,
    y1: i32,
    y2: i32,
) {
    grid.fill(x1 + 1, y1, z1 + 1, x2 - 1, y2, z2 - 1, Voxel::new(BLOCK_AIR));
}

/// Cut a two-cell doorway into a wall, hang the door, and record it in the
/// frame. `(x, z)` is the wall cell; the door faces `facing` (outward).
pub(crate) fn place_door(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    x: i32,
    floor_y: i32,
    z: i32,
    facing: Facing,
    palette: &StylePalette,
) {
    let y = floor_y + 1;
    grid.set(x, y, z, Voxel::facing(palette.door_lower, facing));
    grid.set(x, y + 1, z, Voxel::facing(palette.door_upper, facing));
    frame.doorways.push((x, y, z, facing));
}

/// Punch a window cell and record it.
pub(crate) fn place_window(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    x: i32,
    y: i32,
    z: i32,
    palette: &StylePalette,
) {
    grid.set(x, y, z, Voxel::new(palette.window));
    frame.windows.push((x, y, z));
}

/// Windows every `spacing` cells along both long walls of a rectangle at
/// eye height above `floor_y`, skipping corners.
#[allow(clippy::too_many_arguments)]
pub(crate) fn window_row(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    x1: i32,
    z1: i32,
    x2: i32,
    z2: i32,
    floor_y: i32,
    spacing: i32,
    palette: &StylePalette,
) {
    let y = floor_y + 2;
    let mut x = x1 + 2;
    while x <= x2 - 2 {
        place_window(grid, frame, x, y, z1, palette);
        place_window(grid, frame, x, y, z2, palette);
        x += spacing;
    }
    let mut z = z1 + 2;
    while z <= z2 - 2 {
        place_window(grid, frame, x1, y, z, palette);
        place_window(grid, frame, x2, y, z, palette);
        z += spacing;
    }
}

/// Crenellated parapet along the top of a wall rectangle: merlons on even
/// parity cells, one above the walkway.
pub(crate) fn battlements(
    grid: &mut VoxelGrid,
    x1: i32,
    z1: i32,
    x2: i32,
    z2: i32,
    top_y: i32,
    voxel: Voxel,
) {
    for x in x1..=x2 {
        for z in [z1, z2] {
            if (x + z) % 2 == 0 {
                grid.set(x, top_y, z, voxel);
            }
        }
    }
    for z in z1..=z2 {
        for x in [x1, x2] {
            if (x + z) % 2 == 0 {
                grid.set(x, top_y, z, voxel);
            }
        }
    }
}

/// Crenellated parapet around a circular wall top.
pub(crate) fn ring_battlements(
    grid: &mut VoxelGrid,
    cx: i32,
    cz: i32,
    top_y: i32,
    radius: f64,
    voxel: Voxel,
) {
    let reach = radius.ceil() as i32 + 1;
    for dz in -reach..=reach {
        for dx in -reach..=reach {
            if crate::geometry::ring_contains(dx, dz, radius) && (dx + dz).rem_euclid(2) == 0 {
                grid.set(cx + dx, top_y, cz + dz, voxel);
            }
        }
    }
}

/// Covered well: cobble ring, open water, post-and-slab canopy.
pub(crate) fn well(grid: &mut VoxelGrid, cx: i32, cz: i32, palette: &StylePalette) {
    grid.fill(cx - 1, 1, cz - 1, cx + 1, 1, cz + 1, Voxel::new(blocks::COBBLESTONE));
    grid.set(cx, 1, cz, Voxel::new(blocks::WATER));
    grid.set(cx, 0, cz, Voxel::new(blocks::WATER));
    for (dx, dz) in [(-1, -1), (1, 1), (-1, 1), (1, -1)] {
        grid.fill(cx + dx, 2, cz + dz, cx + dx, 3, cz + dz, Voxel::new(palette.fence));
    }
    grid.fill(cx - 1, 4, cz - 1, cx + 1, 4, cz + 1, Voxel::new(palette.roof_ridge));
}

/// A small tree: log trunk plus a leaf blob. Used by yard and village
/// decoration.
pub(crate) fn plant_tree(grid: &mut VoxelGrid, x: i32, ground_y: i32, z: i32) {
    let trunk_top = ground_y + 4;
    grid.fill(x, ground_y + 1, z, x, trunk_top, z, Voxel::new(blocks::OAK_LOG));
    let leaves = Voxel::new(blocks::OAK_LEAVES);
    grid.fill(x - 1, trunk_top - 1, z - 1, x + 1, trunk_top, z + 1, leaves);
    grid.set(x, trunk_top + 1, z, leaves);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::palette::TIMBER;

    #[test]
    fn wall_ring_leaves_interior_open() {
        let mut grid = VoxelGrid::new(10, 6, 10);
        wall_ring(&mut grid, 1, 1, 8, 8, 1, 3, Voxel::new(blocks::STONE));
        assert!(!grid.get(1, 2, 4).unwrap().is_air());
        assert!(grid.get(4, 2, 4).unwrap().is_air());
    }

    #[test]
    fn door_records_frame_entry() {
        let mut grid = VoxelGrid::new(10, 6, 10);
        let mut frame = ShellFrame::new(0, 4);
        place_door(&mut grid, &mut frame, 4, 0, 8, Facing::South, &TIMBER);
        assert_eq!(frame.doorways.len(), 1);
        assert_eq!(
            grid.get(4, 1, 8).unwrap().block_facing(),
            Some(Facing::South)
        );
        assert_eq!(grid.get(4, 2, 8).unwrap().id, TIMBER.door_upper);
    }

    #[test]
    fn battlements_alternate() {
        let mut grid = VoxelGrid::new(12, 6, 12);
        battlements(&mut grid, 0, 0, 10, 10, 2, Voxel::new(blocks::STONE_BRICKS));
        assert!(!grid.get(0, 2, 0).unwrap().is_air());
        assert!(grid.get(1, 2, 0).unwrap().is_air());
        assert!(!grid.get(2, 2, 0).unwrap().is_air());
    }
}
