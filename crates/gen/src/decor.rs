//! Post-shell decoration.
//!
//! Styles declare an ordered list of [`DecorStep`]s; generators record the
//! shell geometry they produced in a [`ShellFrame`], and the orchestrator
//! replays the steps in declaration order. Generators never branch on
//! material identity to decide decoration.

use crate::geometry::weather_region;
use crate::grid::VoxelGrid;
use crate::rng::StructureRng;
use blockwright_core::{blocks, DecorStep, Facing, StylePalette, Voxel};

/// Probability used by the weathered-stone substitution pass.
const WEATHERING_PROBABILITY: f64 = 0.15;

/// Shell geometry a generator exposes to the decoration pass.
#[derive(Debug, Clone, Default)]
pub struct ShellFrame {
    /// Exterior wall rectangles `(x1, z1, x2, z2)`, outer faces inclusive.
    pub wall_rects: Vec<(i32, i32, i32, i32)>,
    /// Y of the ground plane (walls start one above).
    pub ground_y: i32,
    /// Topmost wall Y.
    pub wall_top_y: i32,
    /// Ground-floor doorway cells and the direction they open toward.
    pub doorways: Vec<(i32, i32, i32, Facing)>,
    /// Window cells on exterior walls.
    pub windows: Vec<(i32, i32, i32)>,
}

impl ShellFrame {
    pub fn new(ground_y: i32, wall_top_y: i32) -> Self {
        Self {
            ground_y,
            wall_top_y,
            ..Default::default()
        }
    }
}

/// Replay the palette's decor steps over the recorded shell, in order.
pub fn apply_decor(
    grid: &mut VoxelGrid,
    frame: &ShellFrame,
    palette: &StylePalette,
    rng: &mut StructureRng,
) {
    for step in palette.decor {
        match step {
            DecorStep::TimberFraming => timber_framing(grid, frame, palette),
            DecorStep::CobbleSkirt => cobble_skirt(grid, frame),
            DecorStep::DoorLanterns => door_lanterns(grid, frame, palette),
            DecorStep::WindowPlanters => window_planters(grid, frame),
            DecorStep::WeatheredStone => weathered_stone(grid, frame, palette, rng),
        }
    }
}

/// Accent columns on every exterior wall corner.
fn timber_framing(grid: &mut VoxelGrid, frame: &ShellFrame, palette: &StylePalette) {
    let accent = Voxel::new(palette.wall_accent);
    for &(x1, z1, x2, z2) in &frame.wall_rects {
        for (x, z) in [(x1, z1), (x1, z2), (x2, z1), (x2, z2)] {
            for y in frame.ground_y + 1..=frame.wall_top_y {
                if !matches!(grid.get(x, y, z), Ok(voxel) if !voxel.is_air()) {
                    continue;
                }
                grid.set(x, y, z, accent);
            }
        }
    }
}

/// Replace the lowest wall course with cobblestone.
fn cobble_skirt(grid: &mut VoxelGrid, frame: &ShellFrame) {
    let skirt = Voxel::new(blocks::COBBLESTONE);
    let y = frame.ground_y + 1;
    for &(x1, z1, x2, z2) in &frame.wall_rects {
        for x in x1..=x2 {
            for z in [z1, z2] {
                if matches!(grid.get(x, y, z), Ok(voxel) if !voxel.is_air() && voxel.block_facing().is_none())
                {
                    grid.set(x, y, z, skirt);
                }
            }
        }
        for z in z1..=z2 {
            for x in [x1, x2] {
                if matches!(grid.get(x, y, z), Ok(voxel) if !voxel.is_air() && voxel.block_facing().is_none())
                {
                    grid.set(x, y, z, skirt);
                }
            }
        }
    }
}

/// A light on the wall beside every ground-floor doorway.
fn door_lanterns(grid: &mut VoxelGrid, frame: &ShellFrame, palette: &StylePalette) {
    for &(x, y, z, facing) in &frame.doorways {
        let (dx, dz) = facing.offset();
        // One cell out from the door, one to the side, at head height.
        let (side_x, side_z) = match facing {
            Facing::North | Facing::South => (x + 1, z + dz),
            Facing::East | Facing::West => (x + dx, z + 1),
        };
        if matches!(grid.get(side_x, y + 1, side_z), Ok(voxel) if voxel.is_air()) {
            grid.set(side_x, y + 1, side_z, Voxel::new(palette.light));
        }
    }
}

/// Flower pots on the sill outside each ground-floor window.
fn window_planters(grid: &mut VoxelGrid, frame: &ShellFrame) {
    for &(x, y, z) in &frame.windows {
        if y > frame.ground_y + 3 {
            continue;
        }
        for (dx, dz) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let (ox, oz) = (x + dx, z + dz);
            let outside_is_air = matches!(grid.get(ox, y, oz), Ok(voxel) if voxel.is_air());
            let has_sill = matches!(grid.get(ox, y - 1, oz), Ok(voxel) if !voxel.is_air());
            if outside_is_air && has_sill {
                grid.set(ox, y, oz, Voxel::new(blocks::FLOWER_POT));
                break;
            }
        }
    }
}

/// Mossy/cracked substitution over the exterior walls.
fn weathered_stone(
    grid: &mut VoxelGrid,
    frame: &ShellFrame,
    palette: &StylePalette,
    rng: &mut StructureRng,
) {
    let candidates = [
        (Voxel::new(blocks::MOSSY_STONE_BRICKS), 2.0),
        (Voxel::new(blocks::CRACKED_STONE_BRICKS), 1.0),
    ];
    for &(x1, z1, x2, z2) in &frame.wall_rects {
        weather_region(
            grid,
            x1,
            frame.ground_y + 1,
            z1,
            x2,
            frame.wall_top_y,
            z2,
            palette.wall,
            &candidates,
            WEATHERING_PROBABILITY,
            rng,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::palette::{STONEWORK, TIMBER};

    fn boxy_shell() -> (VoxelGrid, ShellFrame) {
        let mut grid = VoxelGrid::new(12, 12, 12);
        let mut frame = ShellFrame::new(0, 4);
        frame.wall_rects.push((1, 1, 9, 9));
        // Hollow box of wall material.
        for y in 1..=4 {
            for x in 1..=9 {
                for z in 1..=9 {
                    if x == 1 || x == 9 || z == 1 || z == 9 {
                        grid.set(x, y, z, Voxel::new(TIMBER.wall));
                    }
                }
            }
        }
        (grid, frame)
    }

    #[test]
    fn timber_framing_accents_all_corners() {
        let (mut grid, frame) = boxy_shell();
        timber_framing(&mut grid, &frame, &TIMBER);
        for (x, z) in [(1, 1), (1, 9), (9, 1), (9, 9)] {
            for y in 1..=4 {
                assert_eq!(grid.get(x, y, z).unwrap().id, TIMBER.wall_accent);
            }
        }
        // Mid-wall cells untouched.
        assert_eq!(grid.get(5, 2, 1).unwrap().id, TIMBER.wall);
    }

    #[test]
    fn door_lantern_lands_in_open_air() {
        let (mut grid, mut frame) = boxy_shell();
        frame.doorways.push((5, 1, 9, Facing::South));
        door_lanterns(&mut grid, &frame, &TIMBER);
        assert_eq!(grid.get(6, 2, 10).unwrap().id, TIMBER.light);
    }

    #[test]
    fn weathered_stone_only_replaces_wall_material() {
        let mut grid = VoxelGrid::new(12, 12, 12);
        let mut frame = ShellFrame::new(0, 4);
        frame.wall_rects.push((1, 1, 9, 9));
        grid.fill(1, 1, 1, 9, 4, 1, Voxel::new(STONEWORK.wall));
        grid.set(5, 1, 1, Voxel::new(blocks::OAK_PLANKS));

        let mut rng = StructureRng::new(3);
        weathered_stone(&mut grid, &frame, &STONEWORK, &mut rng);

        assert_eq!(grid.get(5, 1, 1).unwrap().id, blocks::OAK_PLANKS);
        let weathered = grid
            .iter_solid()
            .filter(|(_, _, _, voxel)| {
                voxel.id == blocks::MOSSY_STONE_BRICKS || voxel.id == blocks::CRACKED_STONE_BRICKS
            })
            .count();
        assert!(weathered > 0, "expected some substitution at p=0.15");
    }

    #[test]
    fn steps_apply_in_declared_order() {
        // TIMBER declares framing before the skirt, so the skirt overwrites
        // the accent at ground-course corners.
        let (mut grid, frame) = boxy_shell();
        let mut rng = StructureRng::new(0);
        apply_decor(&mut grid, &frame, &TIMBER, &mut rng);
        assert_eq!(grid.get(1, 1, 1).unwrap().id, blocks::COBBLESTONE);
        assert_eq!(grid.get(1, 2, 1).unwrap().id, TIMBER.wall_accent);
    }
}
