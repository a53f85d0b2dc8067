//! Reusable shaping primitives: disc/ring rasterization, profile curves,
//! spiral stairs, cone and pyramid roofs, and the weathering pass.

use crate::grid::VoxelGrid;
use crate::rng::StructureRng;
use blockwright_core::{BlockId, Facing, Voxel, BLOCK_AIR};
use std::f64::consts::PI;

/// True when `(dx, dz)` lies inside a disc of `radius`.
///
/// The ±0.5 tolerance band closes the gaps a raw `dist <= r` test leaves at
/// the four cardinal points of a circle rasterized on a square grid.
#[inline]
pub fn disc_contains(dx: i32, dz: i32, radius: f64) -> bool {
    let dist = f64::from(dx * dx + dz * dz).sqrt();
    dist <= radius + 0.5
}

/// True when `(dx, dz)` lies on the one-cell ring at `radius`.
#[inline]
pub fn ring_contains(dx: i32, dz: i32, radius: f64) -> bool {
    let dist = f64::from(dx * dx + dz * dz).sqrt();
    dist >= radius - 0.5 && dist <= radius + 0.5
}

/// Rasterize a filled disc at height `y`.
pub fn fill_disc(grid: &mut VoxelGrid, cx: i32, y: i32, cz: i32, radius: f64, voxel: Voxel) {
    let reach = radius.ceil() as i32 + 1;
    for dz in -reach..=reach {
        for dx in -reach..=reach {
            if disc_contains(dx, dz, radius) {
                grid.set(cx + dx, y, cz + dz, voxel);
            }
        }
    }
}

/// Rasterize a one-cell-thick ring at height `y`.
pub fn fill_ring(grid: &mut VoxelGrid, cx: i32, y: i32, cz: i32, radius: f64, voxel: Voxel) {
    let reach = radius.ceil() as i32 + 1;
    for dz in -reach..=reach {
        for dx in -reach..=reach {
            if ring_contains(dx, dz, radius) {
                grid.set(cx + dx, y, cz + dz, voxel);
            }
        }
    }
}

/// Blend mode for the shared 1D profile curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// `0.5 − 0.5·cos(π·t)` — smooth ease-in/ease-out (hull bow/stern taper).
    CosineEase,
    /// `t²(3 − 2t)` — smoothstep (hull depth from keel to deck).
    Smoothstep,
    /// `1 − t²` — parabolic falloff (arch height, terrain mounds).
    Parabola,
}

/// Shared tapered-profile curve, `t ∈ [0, 1]` → `[0, 1]`.
pub fn profile(blend: Blend, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match blend {
        Blend::CosineEase => 0.5 - 0.5 * (PI * t).cos(),
        Blend::Smoothstep => t * t * (3.0 - 2.0 * t),
        Blend::Parabola => 1.0 - t * t,
    }
}

/// Quantize a travel direction to the nearest cardinal facing.
/// `dx = −sin(angle)`, `dz = cos(angle)` is the tangent of a
/// counter-clockwise orbit.
fn facing_for_tangent(angle: f64) -> Facing {
    let dx = -angle.sin();
    let dz = angle.cos();
    if dx.abs() > dz.abs() {
        if dx > 0.0 {
            Facing::East
        } else {
            Facing::West
        }
    } else if dz > 0.0 {
        Facing::South
    } else {
        Facing::North
    }
}

/// Headroom cleared above every stair step.
const STAIR_HEADROOM: i32 = 3;

/// Emit a discrete helix of stairs orbiting `(cx, cz)`.
///
/// Each step advances the angle by `(π/2) / steps_per_quarter` and rises one
/// level, from `base_y` up to (not including) `top_y`. Headroom is cleared
/// above each step, and the floor slab at `top_y` is punched open at the
/// landing so the stair is traversable from below.
#[allow(clippy::too_many_arguments)]
pub fn spiral_stairs(
    grid: &mut VoxelGrid,
    cx: i32,
    cz: i32,
    base_y: i32,
    top_y: i32,
    orbit_radius: f64,
    start_angle: f64,
    steps_per_quarter: u32,
    stairs: BlockId,
) {
    debug_assert!(steps_per_quarter > 0);
    let step_angle = (PI / 2.0) / f64::from(steps_per_quarter);

    let mut landing = None;
    for (step, y) in (base_y..top_y).enumerate() {
        let angle = start_angle + step_angle * step as f64;
        let x = cx + (angle.cos() * orbit_radius).round() as i32;
        let z = cz + (angle.sin() * orbit_radius).round() as i32;

        grid.set(x, y, z, Voxel::facing(stairs, facing_for_tangent(angle)));
        for dy in 1..=STAIR_HEADROOM {
            grid.set(x, y + dy, z, Voxel::new(BLOCK_AIR));
        }
        landing = Some((x, z, angle));
    }

    // Punch the exit opening through the floor above the last step, plus the
    // cell the climber steps onto next.
    if let Some((x, z, angle)) = landing {
        grid.set(x, top_y, z, Voxel::new(BLOCK_AIR));
        let next = angle + step_angle;
        let nx = cx + (next.cos() * orbit_radius).round() as i32;
        let nz = cz + (next.sin() * orbit_radius).round() as i32;
        grid.set(nx, top_y, nz, Voxel::new(BLOCK_AIR));
    }
}

/// Stack shrinking rings from `base_y` upward: layer `i` has radius
/// `initial_radius − i`. Stops at radius zero (capped with a single block)
/// or at the top of the grid.
pub fn conical_roof(
    grid: &mut VoxelGrid,
    cx: i32,
    cz: i32,
    base_y: i32,
    initial_radius: i32,
    voxel: Voxel,
) {
    for layer in 0..=initial_radius {
        let y = base_y + layer;
        if y >= grid.height() as i32 {
            return;
        }
        let radius = initial_radius - layer;
        if radius == 0 {
            grid.set(cx, y, cz, voxel);
            return;
        }
        fill_ring(grid, cx, y, cz, f64::from(radius), voxel);
    }
}

/// Square analogue of [`conical_roof`]: each layer is the hollow square
/// frame inset one cell further, until the frame degenerates to a line.
pub fn pyramid_roof(
    grid: &mut VoxelGrid,
    x0: i32,
    z0: i32,
    x1: i32,
    z1: i32,
    base_y: i32,
    voxel: Voxel,
) {
    let mut lo_x = x0.min(x1);
    let mut hi_x = x0.max(x1);
    let mut lo_z = z0.min(z1);
    let mut hi_z = z0.max(z1);
    let mut y = base_y;

    while lo_x <= hi_x && lo_z <= hi_z {
        if y >= grid.height() as i32 {
            return;
        }
        for x in lo_x..=hi_x {
            grid.set(x, y, lo_z, voxel);
            grid.set(x, y, hi_z, voxel);
        }
        for z in lo_z..=hi_z {
            grid.set(lo_x, y, z, voxel);
            grid.set(hi_x, y, z, voxel);
        }
        lo_x += 1;
        hi_x -= 1;
        lo_z += 1;
        hi_z -= 1;
        y += 1;
    }
}

/// Independent per-cell material substitution over a region.
///
/// Scans the inclusive prism in ascending `y`, `z`, `x` order; every cell
/// whose id equals `target` rolls once against `probability` and, on a hit,
/// is replaced by a weighted pick from `candidates`. The scan order is part
/// of the determinism contract: each matching cell consumes stream draws, so
/// callers must weather regions in a fixed sequence.
#[allow(clippy::too_many_arguments)]
pub fn weather_region(
    grid: &mut VoxelGrid,
    x0: i32,
    y0: i32,
    z0: i32,
    x1: i32,
    y1: i32,
    z1: i32,
    target: BlockId,
    candidates: &[(Voxel, f64)],
    probability: f64,
    rng: &mut StructureRng,
) {
    for y in y0.min(y1)..=y0.max(y1) {
        for z in z0.min(z1)..=z0.max(z1) {
            for x in x0.min(x1)..=x0.max(x1) {
                let Ok(voxel) = grid.get(x, y, z) else {
                    continue;
                };
                if voxel.id != target {
                    continue;
                }
                if rng.chance(probability) {
                    grid.set(x, y, z, *rng.pick_weighted(candidates));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::blocks;

    #[test]
    fn disc_band_covers_cardinal_points() {
        // Raw dist <= r would already include (5, 0); the band must also keep
        // the diagonal-adjacent cells a naive test drops.
        assert!(disc_contains(5, 0, 5.0));
        assert!(disc_contains(4, 3, 5.0));
        assert!(!disc_contains(6, 0, 5.0));
        assert!(disc_contains(0, 0, 5.0));
    }

    #[test]
    fn ring_excludes_interior_and_exterior() {
        assert!(ring_contains(5, 0, 5.0));
        assert!(!ring_contains(0, 0, 5.0));
        assert!(!ring_contains(3, 0, 5.0));
        assert!(!ring_contains(7, 0, 5.0));
    }

    #[test]
    fn ring_has_no_cardinal_gaps() {
        // Every angle around the ring must hit at least one rasterized cell.
        let radius = 6.0;
        for step in 0..360 {
            let angle = f64::from(step).to_radians();
            let x = (angle.cos() * radius).round() as i32;
            let z = (angle.sin() * radius).round() as i32;
            assert!(
                ring_contains(x, z, radius),
                "gap at {step} degrees ({x}, {z})"
            );
        }
    }

    #[test]
    fn profile_endpoints() {
        assert!(profile(Blend::CosineEase, 0.0).abs() < 1e-9);
        assert!((profile(Blend::CosineEase, 1.0) - 1.0).abs() < 1e-9);
        assert!((profile(Blend::CosineEase, 0.5) - 0.5).abs() < 1e-9);

        assert!(profile(Blend::Smoothstep, 0.0).abs() < 1e-9);
        assert!((profile(Blend::Smoothstep, 1.0) - 1.0).abs() < 1e-9);

        assert!((profile(Blend::Parabola, 0.0) - 1.0).abs() < 1e-9);
        assert!(profile(Blend::Parabola, 1.0).abs() < 1e-9);
    }

    #[test]
    fn profile_clamps_domain() {
        assert_eq!(profile(Blend::Parabola, -2.0), 1.0);
        assert_eq!(profile(Blend::Parabola, 2.0), 0.0);
    }

    #[test]
    fn spiral_rises_one_level_per_step() {
        let mut grid = VoxelGrid::new(16, 16, 16);
        spiral_stairs(&mut grid, 8, 8, 1, 9, 3.0, 0.0, 5, blocks::OAK_STAIRS);

        let mut per_level = vec![0usize; 16];
        for (_, y, _, voxel) in grid.iter_solid() {
            assert_eq!(voxel.id, blocks::OAK_STAIRS);
            per_level[y as usize] += 1;
        }
        for y in 1..9 {
            assert_eq!(per_level[y], 1, "level {y}");
        }
        assert_eq!(per_level[9], 0);
    }

    #[test]
    fn spiral_punches_floor_opening() {
        let mut grid = VoxelGrid::new(16, 16, 16);
        // Solid floor slab at the top landing level.
        grid.fill(0, 9, 0, 15, 9, 15, Voxel::new(blocks::OAK_PLANKS));
        spiral_stairs(&mut grid, 8, 8, 1, 9, 3.0, 0.0, 5, blocks::OAK_STAIRS);

        // The column above the topmost step must be open so the stair exits
        // through the slab.
        let (top_x, top_z) = grid
            .iter_solid()
            .filter(|&(_, y, _, voxel)| y == 8 && voxel.id == blocks::OAK_STAIRS)
            .map(|(x, _, z, _)| (x, z))
            .next()
            .expect("topmost step missing");
        assert!(grid.get(top_x, 9, top_z).unwrap().is_air());

        let holes = (0..16)
            .flat_map(|z| (0..16).map(move |x| (x, z)))
            .filter(|&(x, z)| grid.get(x, 9, z).unwrap().is_air())
            .count();
        assert!(holes >= 2, "expected landing + exit openings, got {holes}");
    }

    #[test]
    fn spiral_steps_face_their_travel_direction() {
        let mut grid = VoxelGrid::new(16, 16, 16);
        spiral_stairs(&mut grid, 8, 8, 1, 6, 3.0, 0.0, 5, blocks::OAK_STAIRS);
        for (_, _, _, voxel) in grid.iter_solid() {
            assert!(voxel.block_facing().is_some());
        }
    }

    #[test]
    fn cone_terminates_and_caps() {
        let mut grid = VoxelGrid::new(24, 24, 24);
        conical_roof(&mut grid, 12, 12, 4, 5, Voxel::new(blocks::SPRUCE_PLANKS));
        // Cap block sits at base_y + initial_radius.
        assert_eq!(grid.get(12, 9, 12).unwrap().id, blocks::SPRUCE_PLANKS);
        assert!(grid.get(12, 10, 12).unwrap().is_air());
    }

    #[test]
    fn cone_stops_at_grid_top() {
        let mut grid = VoxelGrid::new(24, 6, 24);
        conical_roof(&mut grid, 12, 12, 4, 5, Voxel::new(blocks::SPRUCE_PLANKS));
        for (_, y, _, _) in grid.iter_solid() {
            assert!(y < 6);
        }
    }

    #[test]
    fn pyramid_shrinks_to_apex() {
        let mut grid = VoxelGrid::new(16, 16, 16);
        pyramid_roof(&mut grid, 2, 2, 8, 8, 0, Voxel::new(blocks::STONE));
        // 7x7 base frame, then 5x5, 3x3, single apex at the center.
        assert!(!grid.get(5, 3, 5).unwrap().is_air());
        assert!(grid.get(5, 4, 5).unwrap().is_air());
    }

    #[test]
    fn weathering_touches_only_target_cells() {
        let mut grid = VoxelGrid::new(8, 8, 8);
        grid.fill(0, 0, 0, 7, 0, 7, Voxel::new(blocks::STONE_BRICKS));
        grid.set(3, 0, 3, Voxel::new(blocks::OAK_PLANKS));

        let mut rng = StructureRng::new(42);
        let candidates = [
            (Voxel::new(blocks::MOSSY_STONE_BRICKS), 2.0),
            (Voxel::new(blocks::CRACKED_STONE_BRICKS), 1.0),
        ];
        weather_region(
            &mut grid,
            0,
            0,
            0,
            7,
            0,
            7,
            blocks::STONE_BRICKS,
            &candidates,
            1.0,
            &mut rng,
        );

        assert_eq!(grid.get(3, 0, 3).unwrap().id, blocks::OAK_PLANKS);
        for (_, _, _, voxel) in grid.iter_solid() {
            assert_ne!(voxel.id, blocks::STONE_BRICKS);
        }
    }

    #[test]
    fn weathering_at_zero_probability_is_identity() {
        let mut grid = VoxelGrid::new(8, 8, 8);
        grid.fill(0, 0, 0, 7, 7, 7, Voxel::new(blocks::COBBLESTONE));
        let before = grid.clone();

        let mut rng = StructureRng::new(1);
        weather_region(
            &mut grid,
            0,
            0,
            0,
            7,
            7,
            7,
            blocks::COBBLESTONE,
            &[(Voxel::new(blocks::MOSSY_COBBLESTONE), 1.0)],
            0.0,
            &mut rng,
        );
        assert_eq!(grid, before);
    }
}
