//! Cylindrical tower: one circular room per story, a continuous spiral
//! stair hugging the wall, and battlements or a conical cap.

use super::{ring_battlements, GenContext, Shell, STORY_HEIGHT};
use crate::decor::ShellFrame;
use crate::error::GenError;
use crate::furnish::room_kind_for;
use crate::geometry::{conical_roof, fill_disc, fill_ring, spiral_stairs};
use crate::options::{RoofShape, RoomKind};
use crate::partition::RoomBounds;
use blockwright_core::{Facing, Voxel, BLOCK_AIR};
use std::f64::consts::PI;
use tracing::debug;

/// Narrowest tower that still fits the wall ring, the stair orbit, and a
/// usable room.
pub(crate) const MIN_RADIUS: i32 = 4;
/// Margin between the wall and the grid edge (roof overhang).
const EDGE_MARGIN: i32 = 2;

const ROOM_ROTATION: [RoomKind; 2] = [RoomKind::Storage, RoomKind::Study];

pub(crate) fn generate(ctx: &mut GenContext) -> Result<Shell, GenError> {
    let radius = ((ctx.options.width.unwrap_or(13) as i32 - 1) / 2).max(MIN_RADIUS);
    let floors = ctx.options.floors as i32;

    let center = radius + EDGE_MARGIN;
    let side = (2 * center + 1) as usize;
    let top_y = floors * STORY_HEIGHT;
    let height = (top_y + radius + 4) as usize;

    let mut grid = crate::grid::VoxelGrid::new(side, height, side);
    let mut frame = ShellFrame::new(0, top_y);
    debug!(radius, floors, "raising tower");

    let wall = Voxel::new(ctx.palette.wall);
    let r = f64::from(radius);

    // Foundation pad.
    fill_disc(&mut grid, center, 0, center, r, Voxel::new(ctx.palette.foundation));

    for story in 0..floors {
        ctx.deadline.check()?;
        let floor_y = story * STORY_HEIGHT;

        // Story floor slab (alternating boards), then the wall ring, then
        // the hollow.
        let floor_block = if story % 2 == 0 {
            ctx.palette.floor
        } else {
            ctx.palette.floor_alt
        };
        fill_disc(&mut grid, center, floor_y, center, r - 1.0, Voxel::new(floor_block));
        for y in floor_y + 1..=floor_y + STORY_HEIGHT {
            fill_ring(&mut grid, center, y, center, r, wall);
        }
        for y in floor_y + 1..floor_y + STORY_HEIGHT {
            fill_disc(&mut grid, center, y, center, r - 1.0, Voxel::new(BLOCK_AIR));
        }

        // Arrow-slit windows at the four cardinal points.
        let window_y = floor_y + 2;
        let window = Voxel::new(ctx.palette.window);
        grid.set(center + radius, window_y, center, window);
        grid.set(center - radius, window_y, center, window);
        frame.windows.push((center + radius, window_y, center));
        frame.windows.push((center - radius, window_y, center));
        grid.set(center, window_y, center + radius, window);
        grid.set(center, window_y, center - radius, window);
        frame.windows.push((center, window_y, center + radius));
        frame.windows.push((center, window_y, center - radius));
    }

    // Ceiling over the top story.
    fill_disc(&mut grid, center, top_y, center, r - 1.0, Voxel::new(ctx.palette.floor));

    // Ground entrance on the south face.
    grid.set(center, 1, center + radius, Voxel::new(BLOCK_AIR));
    grid.set(center, 2, center + radius, Voxel::new(BLOCK_AIR));
    super::place_door(
        &mut grid,
        &mut frame,
        center,
        0,
        center + radius,
        Facing::South,
        ctx.palette,
    );

    // One continuous spiral: each story climbs its own segment, the angle
    // carrying over so the helix never doubles back.
    let step_angle = (PI / 2.0) / 5.0;
    let orbit = r - 1.5;
    for story in 0..floors {
        let base_y = story * STORY_HEIGHT + 1;
        let start_angle = f64::from(story) * f64::from(STORY_HEIGHT - 1) * step_angle;
        spiral_stairs(
            &mut grid,
            center,
            center,
            base_y,
            base_y + STORY_HEIGHT - 1,
            orbit,
            start_angle,
            5,
            ctx.palette.roof_stairs,
        );
    }

    // Furnish the circular rooms on the square inscribed in the free space,
    // which keeps furniture against the walls and out of the open center.
    let inner = ((r - 1.0) * 0.7) as i32;
    for story in 0..floors {
        let room = RoomBounds {
            x1: center - inner,
            z1: center - inner,
            x2: center + inner,
            z2: center + inner,
            floor_y: story * STORY_HEIGHT,
            height: STORY_HEIGHT - 1,
        };
        let kind = room_kind_for(ctx.options.rooms.as_deref(), &ROOM_ROTATION, story as usize);
        ctx.furnisher
            .furnish(&mut grid, &room, kind, ctx.palette, ctx.rng);
    }

    // Parapet ring, then merlons or a cone depending on the roof request.
    fill_ring(&mut grid, center, top_y + 1, center, r, wall);
    if ctx.options.roof_shape == RoofShape::Flat {
        ring_battlements(&mut grid, center, center, top_y + 2, r, wall);
    } else {
        conical_roof(
            &mut grid,
            center,
            center,
            top_y + 2,
            radius + 1,
            Voxel::new(ctx.palette.roof_flat),
        );
    }

    frame.wall_rects.push((
        center - radius,
        center - radius,
        center + radius,
        center + radius,
    ));
    Ok((grid, frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furnish::BasicFurnisher;
    use crate::generate::Deadline;
    use crate::options::{Archetype, GenerationOptions};
    use crate::rng::StructureRng;
    use blockwright_core::palette::STONEWORK;

    fn run(options: &GenerationOptions) -> (crate::grid::VoxelGrid, ShellFrame) {
        let mut rng = StructureRng::new(options.seed);
        let mut ctx = GenContext {
            options,
            palette: &STONEWORK,
            furnisher: &BasicFurnisher,
            rng: &mut rng,
            deadline: &Deadline::none(),
        };
        generate(&mut ctx).expect("tower generation failed")
    }

    #[test]
    fn hollow_invariant_holds_per_story() {
        let options = GenerationOptions::new(Archetype::Tower, 42)
            .with_floors(3)
            .with_footprint(13, 13);
        let (grid, _) = run(&options);
        let radius = 6;
        let center = radius + EDGE_MARGIN;
        let hollow_sq = (radius - 2) * (radius - 2);

        for story in 0..3 {
            let floor_y = story * STORY_HEIGHT;
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if dx * dx + dz * dz >= hollow_sq {
                        continue;
                    }
                    // Between slabs: strictly air.
                    for y in floor_y + 1..floor_y + STORY_HEIGHT {
                        assert!(
                            grid.get(center + dx, y, center + dz).unwrap().is_air(),
                            "story {story} blocked at ({dx}, {y}, {dz})"
                        );
                    }
                    // Slab level: floor boards or a punched stair opening.
                    let slab = grid.get(center + dx, floor_y, center + dz).unwrap();
                    assert!(
                        slab.is_air()
                            || slab.id == STONEWORK.floor
                            || slab.id == STONEWORK.floor_alt
                            || slab.id == STONEWORK.foundation,
                        "unexpected slab block {slab:?} at story {story}"
                    );
                }
            }
        }
    }

    #[test]
    fn wall_ring_is_one_cell_thick_at_every_story() {
        let options = GenerationOptions::new(Archetype::Tower, 42)
            .with_floors(3)
            .with_footprint(13, 13);
        let (grid, _) = run(&options);
        let (radius, center) = (6, 8);

        for story in 0..3 {
            let y = story * STORY_HEIGHT + 1;
            if y <= 2 {
                continue; // door course
            }
            // Walking out from the center along +X: air until the ring, then
            // exactly one wall cell, then air.
            let mut solid_run = 0;
            for dx in 3..=radius + 1 {
                let voxel = grid.get(center + dx, y, center).unwrap();
                if !voxel.is_air() {
                    solid_run += 1;
                }
            }
            assert_eq!(solid_run, 1, "story {story}");
        }
    }

    #[test]
    fn degenerate_width_clamps_to_minimum_radius() {
        let options = GenerationOptions::new(Archetype::Tower, 1).with_footprint(3, 3);
        let (grid, frame) = run(&options);
        let rect = frame.wall_rects[0];
        assert_eq!(rect.2 - rect.0, 2 * MIN_RADIUS);
        assert!(grid.iter_solid().count() > 0);
    }

    #[test]
    fn flat_roof_gets_battlements() {
        let mut options = GenerationOptions::new(Archetype::Tower, 9).with_floors(2);
        options.roof_shape = RoofShape::Flat;
        let (grid, _) = run(&options);
        let top = 2 * STORY_HEIGHT + 2;
        let merlons = grid
            .iter_solid()
            .filter(|&(_, y, _, _)| y == top)
            .count();
        assert!(merlons > 4, "expected merlons on the parapet, got {merlons}");
    }
}
