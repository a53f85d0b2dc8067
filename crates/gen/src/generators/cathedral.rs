//! Cathedral: a tall nave flanked by lower aisles, pillar rows, exterior
//! buttresses, a semicircular apse, a parabolic west portal under a rose
//! window, and a spire over the crossing.

use super::{place_door, slab, GenContext, Shell};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::furnish::room_kind_for;
use crate::geometry::{disc_contains, profile, pyramid_roof, ring_contains, Blend};
use crate::grid::VoxelGrid;
use crate::options::RoomKind;
use crate::partition::RoomBounds;
use blockwright_core::{blocks, Facing, Voxel, BLOCK_AIR};
use tracing::debug;

const MIN_LENGTH: i32 = 33;
const MIN_WIDTH: i32 = 17;
const AISLE_HEIGHT: i32 = 5;
const NAVE_HEIGHT: i32 = 12;
const PILLAR_SPACING: i32 = 4;
const PORTAL_HEIGHT: i32 = 6;

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let length = (ctx.options.length.unwrap_or(45) as i32).max(MIN_LENGTH);
    let width = {
        let w = (ctx.options.width.unwrap_or(23) as i32).max(MIN_WIDTH);
        w | 1
    };
    let nave_half = width / 4 + 1;
    let apse_radius = f64::from(nave_half);

    let grid_w = (width + 6) as usize;
    let grid_l = (length + nave_half + 6) as usize;
    // Roof gable peaks at NAVE_HEIGHT + nave_half, spire apex a bit above.
    let sky = (NAVE_HEIGHT + nave_half + 9) as usize;
    let mut grid = VoxelGrid::new(grid_w, sky, grid_l);
    let mut frame = ShellFrame::new(0, NAVE_HEIGHT);
    debug!(length, width, "raising cathedral");

    let cx = grid_w as i32 / 2;
    let west_z = 3; // portal end
    let east_z = west_z + length - 1; // apse springs from here
    let (x1, x2) = (cx - width / 2, cx + width / 2);

    slab(&mut grid, x1 - 1, west_z - 1, x2 + 1, east_z, 0, Voxel::new(ctx.palette.foundation));
    nave_and_aisles(&mut grid, &mut frame, cx, x1, x2, west_z, east_z, nave_half, ctx);
    pillars(&mut grid, cx, west_z, east_z, nave_half, ctx);
    buttresses(&mut grid, x1, x2, west_z, east_z, ctx);
    apse(&mut grid, cx, east_z, apse_radius, ctx);
    west_front(&mut grid, &mut frame, cx, west_z, nave_half, ctx);
    chancel(&mut grid, cx, x1, x2, west_z, east_z, ctx)?;
    spire(&mut grid, cx, (west_z + east_z) / 2, nave_half, ctx);

    frame.wall_rects.push((x1, west_z, x2, east_z));
    Ok((grid, frame))
}

#[allow(clippy::too_many_arguments)]
fn nave_and_aisles(
    grid: &mut VoxelGrid,
    frame: &mut ShellFrame,
    cx: i32,
    x1: i32,
    x2: i32,
    west_z: i32,
    east_z: i32,
    nave_half: i32,
    ctx: &GenContext,
) {
    let wall = Voxel::new(ctx.palette.wall);
    let glass = Voxel::new(blocks::BLUE_STAINED_GLASS);

    // Outer aisle walls, clerestory walls above them over the nave span.
    for z in west_z..=east_z {
        for x in [x1, x2] {
            grid.fill(x, 1, z, x, AISLE_HEIGHT, z, wall);
        }
        for x in [cx - nave_half, cx + nave_half] {
            grid.fill(x, AISLE_HEIGHT, z, x, NAVE_HEIGHT, z, wall);
        }
        // Tall lancets every few bays, aisle and clerestory alike.
        if (z - west_z) % PILLAR_SPACING == 2 {
            for x in [x1, x2] {
                grid.fill(x, 2, z, x, 4, z, glass);
                frame.windows.push((x, 3, z));
            }
            for x in [cx - nave_half, cx + nave_half] {
                grid.fill(x, AISLE_HEIGHT + 2, z, x, NAVE_HEIGHT - 2, z, glass);
            }
        }
    }
    // End walls close the aisle bays; the nave span at the west end is
    // rebuilt by the facade and the east chord is opened by the apse.
    for z in [west_z, east_z] {
        grid.fill(x1, 1, z, cx - nave_half, AISLE_HEIGHT, z, wall);
        grid.fill(cx + nave_half, 1, z, x2, AISLE_HEIGHT, z, wall);
    }
    grid.fill(x1 + 1, 0, west_z + 1, x2 - 1, 0, east_z - 1, Voxel::new(ctx.palette.floor));

    // Lean-to aisle roofs and the nave vault.
    for z in west_z..=east_z {
        grid.fill(x1, AISLE_HEIGHT + 1, z, cx - nave_half - 1, AISLE_HEIGHT + 1, z, Voxel::new(ctx.palette.roof_flat));
        grid.fill(cx + nave_half + 1, AISLE_HEIGHT + 1, z, x2, AISLE_HEIGHT + 1, z, Voxel::new(ctx.palette.roof_flat));
    }
    pyramid_gable(grid, cx, nave_half, west_z, east_z, ctx);
}

/// Stepped gable over the nave, one stair course per cell of half-span.
fn pyramid_gable(grid: &mut VoxelGrid, cx: i32, nave_half: i32, west_z: i32, east_z: i32, ctx: &GenContext) {
    let stairs = Voxel::new(ctx.palette.roof_stairs);
    let ridge = Voxel::new(ctx.palette.roof_ridge);
    for step in 0..nave_half {
        let y = NAVE_HEIGHT + 1 + step;
        let reach = nave_half - step;
        for z in west_z..=east_z {
            grid.set(cx - reach, y, z, stairs.with_facing(Facing::East));
            grid.set(cx + reach, y, z, stairs.with_facing(Facing::West));
        }
    }
    grid.fill(cx, NAVE_HEIGHT + 1 + nave_half, west_z, cx, NAVE_HEIGHT + 1 + nave_half, east_z, ridge);
}

fn pillars(grid: &mut VoxelGrid, cx: i32, west_z: i32, east_z: i32, nave_half: i32, ctx: &GenContext) {
    let pier = Voxel::new(ctx.palette.wall_accent);
    let mut z = west_z + PILLAR_SPACING;
    while z < east_z - 2 {
        for x in [cx - nave_half, cx + nave_half] {
            grid.fill(x, 1, z, x, AISLE_HEIGHT - 1, z, pier);
        }
        z += PILLAR_SPACING;
    }
}

fn buttresses(grid: &mut VoxelGrid, x1: i32, x2: i32, west_z: i32, east_z: i32, ctx: &GenContext) {
    let stone = Voxel::new(ctx.palette.wall);
    let mut z = west_z + PILLAR_SPACING;
    while z < east_z - 2 {
        // Stepped piers leaning against the aisle walls.
        grid.fill(x1 - 1, 1, z, x1 - 1, AISLE_HEIGHT - 1, z, stone);
        grid.set(x1 - 2, 1, z, stone);
        grid.fill(x2 + 1, 1, z, x2 + 1, AISLE_HEIGHT - 1, z, stone);
        grid.set(x2 + 2, 1, z, stone);
        z += PILLAR_SPACING;
    }
}

/// Semicircular east end, full nave height, closing off the chancel.
fn apse(grid: &mut VoxelGrid, cx: i32, east_z: i32, radius: f64, ctx: &GenContext) {
    let wall = Voxel::new(ctx.palette.wall);
    let reach = radius.ceil() as i32 + 1;
    for dz in 0..=reach {
        for dx in -reach..=reach {
            if ring_contains(dx, dz, radius) {
                grid.fill(cx + dx, 1, east_z + dz, cx + dx, NAVE_HEIGHT, east_z + dz, wall);
            } else if disc_contains(dx, dz, radius) {
                grid.set(cx + dx, 0, east_z + dz, Voxel::new(ctx.palette.floor_alt));
                grid.set(cx + dx, NAVE_HEIGHT + 1, east_z + dz, Voxel::new(ctx.palette.roof_flat));
            }
        }
    }
    // Open the chord so the chancel flows into the apse.
    grid.fill(cx - radius as i32 + 1, 1, east_z, cx + radius as i32 - 1, NAVE_HEIGHT - 1, east_z, Voxel::new(BLOCK_AIR));
}

/// West facade: parabolic portal arch with doors, rose window above.
fn west_front(grid: &mut VoxelGrid, frame: &mut ShellFrame, cx: i32, west_z: i32, nave_half: i32, ctx: &GenContext) {
    let wall = Voxel::new(ctx.palette.wall);
    grid.fill(cx - nave_half, 1, west_z, cx + nave_half, NAVE_HEIGHT, west_z, wall);

    // Portal: opening height falls off parabolically from the centerline.
    for dx in -2i32..=2 {
        let t = f64::from(dx.abs()) / 3.0;
        let opening = (f64::from(PORTAL_HEIGHT) * profile(Blend::Parabola, t)).round() as i32;
        grid.fill(cx + dx, 1, west_z, cx + dx, opening.max(1), west_z, Voxel::new(BLOCK_AIR));
    }
    place_door(grid, frame, cx, 0, west_z, Facing::North, ctx.palette);

    // Rose window: a stained disc in the vertical plane above the portal,
    // red heart ringed with blue.
    let rose_y = PORTAL_HEIGHT + 4;
    for dy in -2..=2 {
        for dx in -2..=2 {
            if disc_contains(dx, dy, 2.0) {
                let pane = if dx * dx + dy * dy <= 1 {
                    blocks::RED_STAINED_GLASS
                } else {
                    blocks::BLUE_STAINED_GLASS
                };
                grid.set(cx + dx, rose_y + dy, west_z, Voxel::new(pane));
            }
        }
    }
    frame.windows.push((cx, rose_y, west_z));
}

/// Altar platform in the chancel, pews down the nave, side chapels in the
/// aisles.
fn chancel(
    grid: &mut VoxelGrid,
    cx: i32,
    x1: i32,
    x2: i32,
    west_z: i32,
    east_z: i32,
    ctx: &mut GenContext,
) -> Result<(), GenError> {
    ctx.deadline.check()?;
    let palette = ctx.palette;

    // Raised altar.
    grid.fill(cx - 2, 1, east_z - 3, cx + 2, 1, east_z - 1, Voxel::new(palette.floor_alt));
    grid.set(cx, 2, east_z - 2, Voxel::new(blocks::BANNER));
    for dx in [-2, 2] {
        grid.set(cx + dx, 2, east_z - 1, Voxel::new(palette.light));
    }

    // Pew rows face the altar.
    let mut z = west_z + 4;
    while z < east_z - 8 {
        for x in (cx - 3..=cx + 3).filter(|&x| x != cx) {
            grid.set(x, 1, z, Voxel::facing(palette.roof_stairs, Facing::South));
        }
        z += 2;
    }

    // Aisles get chapel furnishings.
    let chapel_rotation = [RoomKind::Chapel];
    for (index, (rx1, rx2)) in [(x1 + 1, cx - 4), (cx + 4, x2 - 1)].into_iter().enumerate() {
        let room = RoomBounds {
            x1: rx1,
            z1: east_z - 9,
            x2: rx2,
            z2: east_z - 5,
            floor_y: 0,
            height: AISLE_HEIGHT - 1,
        };
        let kind = room_kind_for(ctx.options.rooms.as_deref(), &chapel_rotation, index);
        ctx.furnisher.furnish(grid, &room, kind, palette, ctx.rng);
    }
    Ok(())
}

/// Slender spire on a short tower over the crossing.
fn spire(grid: &mut VoxelGrid, cx: i32, cz: i32, nave_half: i32, ctx: &GenContext) {
    let base_y = NAVE_HEIGHT + nave_half + 1;
    let half = 2;
    super::wall_ring(grid, cx - half, cz - half, cx + half, cz + half, base_y, base_y + 3, Voxel::new(ctx.palette.wall));
    grid.set(cx, base_y + 2, cz, Voxel::new(blocks::BELL));
    pyramid_roof(grid, cx - half, cz - half, cx + half, cz + half, base_y + 4, Voxel::new(ctx.palette.roof_ridge));
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
        generate(&mut ctx).expect("cathedral generation failed")
    }

    #[test]
    fn nave_rises_above_the_aisles() {
        let options = GenerationOptions::new(Archetype::Cathedral, 12);
        let (grid, frame) = run(&options);
        let (x1, west_z, x2, east_z) = frame.wall_rects[0];
        let cx = (x1 + x2) / 2;
        let mid_z = (west_z + east_z) / 2;
        let nave_half = (x2 - x1 + 1) / 4 + 1;
        // Clerestory wall present above aisle roof level.
        assert!(!grid.get(cx - nave_half, AISLE_HEIGHT + 1, mid_z).unwrap().is_air());
        // Outer wall stops at aisle height.
        assert!(grid.get(x1, NAVE_HEIGHT, mid_z).unwrap().is_air());
    }

    #[test]
    fn portal_arch_is_tallest_at_the_centerline() {
        let options = GenerationOptions::new(Archetype::Cathedral, 12);
        let (grid, frame) = run(&options);
        let (x1, west_z, x2, _) = frame.wall_rects[0];
        let cx = (x1 + x2) / 2;
        let opening_height = |x: i32| {
            (1..NAVE_HEIGHT)
                .take_while(|&y| {
                    let v = grid.get(x, y, west_z).unwrap();
                    v.is_air() || v.id == STONEWORK.door_lower || v.id == STONEWORK.door_upper
                })
                .count()
        };
        assert!(opening_height(cx) > opening_height(cx + 2));
        assert_eq!(opening_height(cx), PORTAL_HEIGHT as usize);
    }

    #[test]
    fn apse_closes_the_east_end() {
        let options = GenerationOptions::new(Archetype::Cathedral, 12);
        let (grid, frame) = run(&options);
        let (x1, _, x2, east_z) = frame.wall_rects[0];
        let cx = (x1 + x2) / 2;
        let nave_half = (x2 - x1 + 1) / 4 + 1;
        // Wall material on the half ring behind the chancel.
        assert!(!grid.get(cx, 3, east_z + nave_half).unwrap().is_air());
    }

    #[test]
    fn aisle_bays_are_walled_at_both_ends() {
        let options = GenerationOptions::new(Archetype::Cathedral, 12);
        let (grid, frame) = run(&options);
        let (x1, west_z, x2, east_z) = frame.wall_rects[0];
        let cx = (x1 + x2) / 2;
        let nave_half = (x2 - x1 + 1) / 4 + 1;
        // Mid-aisle columns outside the nave span are solid end to end.
        for x in [(x1 + cx - nave_half) / 2, (x2 + cx + nave_half) / 2] {
            for z in [west_z, east_z] {
                for y in 1..=AISLE_HEIGHT {
                    assert!(
                        !grid.get(x, y, z).unwrap().is_air(),
                        "open aisle bay at ({x}, {y}, {z})"
                    );
                }
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let options = GenerationOptions::new(Archetype::Cathedral, 5);
        let (a, _) = run(&options);
        let (b, _) = run(&options);
        assert_eq!(a.iter_solid().count(), b.iter_solid().count());
    }
}
