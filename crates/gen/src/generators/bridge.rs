//! Arched bridge: a parabolic stone arch between two abutments, a flat
//! deck riding strictly above the crown, railings, and lamp posts.

use super::{GenContext, Shell};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::geometry::{profile, Blend};
use crate::grid::VoxelGrid;
use blockwright_core::Voxel;
use tracing::debug;

const MIN_SPAN: i32 = 21;
const MIN_DECK_WIDTH: i32 = 3;
/// Waterline the arch springs clear of.
const WATERLINE: i32 = 3;
const LAMP_SPACING: i32 = 6;

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    ctx.deadline.check()?;
    let span = (ctx.options.length.unwrap_or(33) as i32).max(MIN_SPAN);
    let deck_width = (ctx.options.width.unwrap_or(5) as i32).max(MIN_DECK_WIDTH);

    let rise = (span / 5).clamp(3, 8);
    let spring_y = WATERLINE - 1;
    let crown_y = spring_y + rise;
    // The deck never dips to the crown, let alone below it.
    let deck_y = crown_y + 1;

    let grid_w = (deck_width + 4) as usize;
    let grid_l = (span + 4) as usize;
    let mut grid = VoxelGrid::new(grid_w, (deck_y + 4) as usize, grid_l);
    let mut frame = ShellFrame::new(WATERLINE, deck_y);
    debug!(span, deck_width, rise, "spanning bridge");

    let x1 = 2;
    let x2 = x1 + deck_width - 1;
    let z0 = 2;
    let z1 = z0 + span - 1;
    let mid = f64::from(z0 + z1) / 2.0;
    let half_span = f64::from(span) / 2.0;

    let stone = Voxel::new(ctx.palette.wall);
    let deck = Voxel::new(ctx.palette.floor);

    for z in z0..=z1 {
        // Arch height falls off parabolically with distance from midspan.
        let t = (f64::from(z) - mid).abs() / half_span;
        let arch_y = spring_y + (f64::from(rise) * profile(Blend::Parabola, t)).round() as i32;

        for x in x1..=x2 {
            grid.set(x, arch_y, z, stone);
            grid.set(x, deck_y, z, deck);
            // Spandrel between arch and deck at the haunches.
            if deck_y - arch_y > 2 {
                grid.set(x, arch_y + 1, z, stone);
            }
        }
    }

    abutments(&mut grid, x1, x2, z0, z1, deck_y, ctx);
    piers(&mut grid, x1, x2, z0, z1, span, ctx);
    railings(&mut grid, x1, x2, z0, z1, deck_y, ctx);

    frame.wall_rects.push((x1, z0, x2, z1));
    Ok((grid, frame))
}

/// Solid fill from the riverbed to the deck at both ends.
fn abutments(grid: &mut VoxelGrid, x1: i32, x2: i32, z0: i32, z1: i32, deck_y: i32, ctx: &GenContext) {
    let stone = Voxel::new(ctx.palette.foundation);
    for z in [z0 - 1, z0, z1, z1 + 1] {
        grid.fill(x1 - 1, 0, z, x2 + 1, deck_y, z, stone);
    }
}

/// Intermediate piers for long spans, dropped at the quarter points.
fn piers(grid: &mut VoxelGrid, x1: i32, x2: i32, z0: i32, z1: i32, span: i32, ctx: &GenContext) {
    if span < 29 {
        return;
    }
    let stone = Voxel::new(ctx.palette.wall);
    for z in [z0 + span / 4, z1 - span / 4] {
        for x in [x1, x2] {
            // Stop below the arch soffit; the arch line stays clean.
            grid.fill(x, 0, z, x, WATERLINE, z, stone);
        }
    }
}

fn railings(grid: &mut VoxelGrid, x1: i32, x2: i32, z0: i32, z1: i32, deck_y: i32, ctx: &GenContext) {
    let rail = Voxel::new(ctx.palette.fence);
    for z in z0 - 1..=z1 + 1 {
        for x in [x1, x2] {
            grid.set(x, deck_y + 1, z, rail);
        }
    }
    let mut z = z0 + 1;
    while z <= z1 {
        for x in [x1, x2] {
            grid.set(x, deck_y + 2, z, Voxel::new(ctx.palette.light));
        }
        z += LAMP_SPACING;
    }
}
