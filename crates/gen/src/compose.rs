//! Grid composition: pasting sub-grids into a site grid, mirrored pasting
//! with facing correction, and bounding-box trimming.

use crate::grid::VoxelGrid;
use tracing::debug;

/// Copy every non-air cell and every block entity of `source` into `target`
/// at `offset`. Destinations outside `target` are silently skipped, entities
/// included.
pub fn paste(target: &mut VoxelGrid, source: &VoxelGrid, ox: i32, oy: i32, oz: i32) {
    for (x, y, z, voxel) in source.iter_solid() {
        target.set(x + ox, y + oy, z + oz, voxel);
    }
    for entity in source.entities() {
        target.add_entity(
            entity.x + ox,
            entity.y + oy,
            entity.z + oz,
            entity.payload.clone(),
        );
    }
}

/// As [`paste`], but mirrors the source across its Z axis:
/// `z' = (length − 1) − z`.
///
/// Every copied block whose state carries a facing gets that facing
/// mirrored (north↔south); east/west and non-orientable blocks pass through
/// unchanged. Without this rewrite, mirrored doors and furniture would face
/// into walls.
pub fn paste_mirrored(target: &mut VoxelGrid, source: &VoxelGrid, ox: i32, oy: i32, oz: i32) {
    let max_z = source.length() as i32 - 1;
    for (x, y, z, voxel) in source.iter_solid() {
        let placed = match voxel.block_facing() {
            Some(facing) => voxel.with_facing(facing.mirrored_z()),
            None => voxel,
        };
        target.set(x + ox, y + oy, (max_z - z) + oz, placed);
    }
    for entity in source.entities() {
        target.add_entity(
            entity.x + ox,
            entity.y + oy,
            (max_z - entity.z) + oz,
            entity.payload.clone(),
        );
    }
}

/// Tight bounding box over non-air cells: `(min_x, min_y, min_z, max_x,
/// max_y, max_z)`, or `None` for an all-air grid.
fn solid_bounds(grid: &VoxelGrid) -> Option<(i32, i32, i32, i32, i32, i32)> {
    let mut bounds: Option<(i32, i32, i32, i32, i32, i32)> = None;
    for (x, y, z, _) in grid.iter_solid() {
        bounds = Some(match bounds {
            None => (x, y, z, x, y, z),
            Some((min_x, min_y, min_z, max_x, max_y, max_z)) => (
                min_x.min(x),
                min_y.min(y),
                min_z.min(z),
                max_x.max(x),
                max_y.max(y),
                max_z.max(z),
            ),
        });
    }
    bounds
}

/// Minimum footprint-area saving for a trim copy to be worth it.
const TRIM_SAVING_THRESHOLD: f64 = 0.10;

/// Shrink `grid` to the tight bounding box of its non-air cells plus
/// `padding` on every side (clamped to the original bounds).
///
/// Skips the copy and returns the input unchanged when the trimmed footprint
/// area would not be at least 10% smaller. That is purely a cost heuristic:
/// both outcomes are valid grids.
pub fn trim(grid: VoxelGrid, padding: i32) -> VoxelGrid {
    let Some((min_x, min_y, min_z, max_x, max_y, max_z)) = solid_bounds(&grid) else {
        return grid;
    };

    let min_x = (min_x - padding).max(0);
    let min_y = (min_y - padding).max(0);
    let min_z = (min_z - padding).max(0);
    let max_x = (max_x + padding).min(grid.width() as i32 - 1);
    let max_y = (max_y + padding).min(grid.height() as i32 - 1);
    let max_z = (max_z + padding).min(grid.length() as i32 - 1);

    let new_width = (max_x - min_x + 1) as usize;
    let new_height = (max_y - min_y + 1) as usize;
    let new_length = (max_z - min_z + 1) as usize;

    let old_area = grid.width() * grid.length();
    let new_area = new_width * new_length;
    if (new_area as f64) > (old_area as f64) * (1.0 - TRIM_SAVING_THRESHOLD) {
        debug!(old_area, new_area, "trim skipped, saving below threshold");
        return grid;
    }

    debug!(
        from = ?(grid.width(), grid.height(), grid.length()),
        to = ?(new_width, new_height, new_length),
        "trimming grid"
    );

    let mut out = VoxelGrid::new(new_width, new_height, new_length);
    for (x, y, z, voxel) in grid.iter_solid() {
        out.set(x - min_x, y - min_y, z - min_z, voxel);
    }
    for entity in grid.entities() {
        out.add_entity(
            entity.x - min_x,
            entity.y - min_y,
            entity.z - min_z,
            entity.payload.clone(),
        );
    }
    out
}
