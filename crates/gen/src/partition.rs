//! Floor-area partitioning: corridors plus non-overlapping room bounds.
//!
//! Corridor air is always carved before any chamber interior is hollowed, so
//! generators call the carve functions first and furnish rooms afterwards.

use crate::grid::VoxelGrid;
use blockwright_core::{Voxel, BLOCK_AIR};

/// Narrowest corridor the partitioner will produce, as a half-width.
pub const MIN_CORRIDOR_HALF_WIDTH: i32 = 1;

/// Axis-aligned usable floor rectangle (inclusive bounds, interior space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloorArea {
    pub x1: i32,
    pub z1: i32,
    pub x2: i32,
    pub z2: i32,
}

impl FloorArea {
    pub fn new(x1: i32, z1: i32, x2: i32, z2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            z1: z1.min(z2),
            x2: x1.max(x2),
            z2: z1.max(z2),
        }
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.z1 + self.z2) / 2)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn depth(&self) -> i32 {
        self.z2 - self.z1 + 1
    }
}

/// A room rectangle with its floor level and usable height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomBounds {
    pub x1: i32,
    pub z1: i32,
    pub x2: i32,
    pub z2: i32,
    pub floor_y: i32,
    pub height: i32,
}

impl RoomBounds {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn depth(&self) -> i32 {
        self.z2 - self.z1 + 1
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.z1 + self.z2) / 2)
    }

    pub fn overlaps(&self, other: &RoomBounds) -> bool {
        self.floor_y == other.floor_y
            && self.x1 <= other.x2
            && other.x1 <= self.x2
            && self.z1 <= other.z2
            && other.z1 <= self.z2
    }
}

/// Sweep axis for a straight corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorAxis {
    AlongX,
    AlongZ,
}

/// Clear a corridor of air through the center of `area` along one axis,
/// `height` cells tall starting at `floor_y + 1`.
pub fn carve_corridor(
    grid: &mut VoxelGrid,
    area: FloorArea,
    floor_y: i32,
    height: i32,
    half_width: i32,
    axis: CorridorAxis,
) {
    let half = half_width.max(MIN_CORRIDOR_HALF_WIDTH);
    let (cx, cz) = area.center();
    let air = Voxel::new(BLOCK_AIR);
    match axis {
        CorridorAxis::AlongX => grid.fill(
            area.x1,
            floor_y + 1,
            cz - half,
            area.x2,
            floor_y + height,
            cz + half,
            air,
        ),
        CorridorAxis::AlongZ => grid.fill(
            cx - half,
            floor_y + 1,
            area.z1,
            cx + half,
            floor_y + height,
            area.z2,
            air,
        ),
    }
}

/// Carve the full cross: one corridor per axis through the area center.
pub fn carve_cross_corridor(
    grid: &mut VoxelGrid,
    area: FloorArea,
    floor_y: i32,
    height: i32,
    half_width: i32,
) {
    carve_corridor(grid, area, floor_y, height, half_width, CorridorAxis::AlongX);
    carve_corridor(grid, area, floor_y, height, half_width, CorridorAxis::AlongZ);
}

/// Four quadrant rooms around a cross corridor.
///
/// The north-west and south-east quadrants are the "large" pair; the other
/// two are inset further on their outer edges (`inset_small >= inset_large`),
/// giving the floor a spatial hierarchy. Returned in fixed order NW, NE, SW,
/// SE.
pub fn quadrant_rooms(
    area: FloorArea,
    floor_y: i32,
    height: i32,
    corridor_half: i32,
    inset_large: i32,
    inset_small: i32,
) -> [RoomBounds; 4] {
    let half = corridor_half.max(MIN_CORRIDOR_HALF_WIDTH);
    let (cx, cz) = area.center();

    let room = |x1: i32, z1: i32, x2: i32, z2: i32, inset: i32| RoomBounds {
        x1: x1 + inset,
        z1: z1 + inset,
        x2: x2 - inset,
        z2: z2 - inset,
        floor_y,
        height,
    };

    [
        // North-west, large.
        room(area.x1, area.z1, cx - half - 1, cz - half - 1, inset_large),
        // North-east, small.
        room(cx + half + 1, area.z1, area.x2, cz - half - 1, inset_small),
        // South-west, small.
        room(area.x1, cz + half + 1, cx - half - 1, area.z2, inset_small),
        // South-east, large.
        room(cx + half + 1, cz + half + 1, area.x2, area.z2, inset_large),
    ]
}

/// Two rooms split front/back across Z.
///
/// The split line shifts by a third of the depth, toward the back on
/// even stories and toward the front on odd ones, so stacked stories do not
/// repeat the same plan.
pub fn front_back_rooms(
    area: FloorArea,
    floor_y: i32,
    height: i32,
    story_index: usize,
) -> [RoomBounds; 2] {
    let (_, cz) = area.center();
    let shift = area.depth() / 6;
    let split_z = if story_index % 2 == 0 {
        cz + shift
    } else {
        cz - shift
    };
    // Keep at least two cells of depth on each side.
    let split_z = split_z.clamp(area.z1 + 1, area.z2 - 2);

    [
        RoomBounds {
            x1: area.x1,
            z1: area.z1,
            x2: area.x2,
            z2: split_z,
            floor_y,
            height,
        },
        RoomBounds {
            x1: area.x1,
            z1: split_z + 1,
            x2: area.x2,
            z2: area.z2,
            floor_y,
            height,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::blocks;

    fn area() -> FloorArea {
        FloorArea::new(1, 1, 19, 19)
    }

    #[test]
    fn quadrants_do_not_overlap_each_other() {
        let rooms = quadrant_rooms(area(), 0, 3, 1, 0, 2);
        for (i, a) in rooms.iter().enumerate() {
            for b in rooms.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn quadrants_clear_the_corridor_band() {
        let rooms = quadrant_rooms(area(), 0, 3, 1, 0, 2);
        let (cx, cz) = area().center();
        for room in &rooms {
            assert!(room.x2 < cx - 1 || room.x1 > cx + 1);
            assert!(room.z2 < cz - 1 || room.z1 > cz + 1);
        }
    }

    #[test]
    fn small_quadrants_are_inset_further() {
        let rooms = quadrant_rooms(area(), 0, 3, 1, 0, 2);
        let [nw, ne, sw, se] = rooms;
        assert!(nw.width() > ne.width());
        assert!(se.width() > sw.width());
        assert_eq!(nw.width(), se.width());
        assert_eq!(ne.width(), sw.width());
    }

    #[test]
    fn front_back_split_alternates_by_parity() {
        let even = front_back_rooms(area(), 0, 3, 0);
        let odd = front_back_rooms(area(), 0, 3, 1);
        assert_ne!(even[0].z2, odd[0].z2);
        // Fully tiled: the two rooms share the area edge-to-edge.
        assert_eq!(even[0].z2 + 1, even[1].z1);
        assert_eq!(even[0].x1, area().x1);
        assert_eq!(even[1].z2, area().z2);
    }

    #[test]
    fn front_back_keeps_minimum_depth() {
        let tiny = FloorArea::new(0, 0, 5, 4);
        for story in 0..4 {
            let rooms = front_back_rooms(tiny, 0, 3, story);
            assert!(rooms[0].depth() >= 2);
            assert!(rooms[1].depth() >= 2);
        }
    }

    #[test]
    fn corridor_carving_clears_air_above_floor() {
        let mut grid = VoxelGrid::new(21, 8, 21);
        grid.fill(0, 1, 0, 20, 4, 20, Voxel::new(blocks::STONE));
        carve_cross_corridor(&mut grid, area(), 1, 3, 1);

        let (cx, cz) = area().center();
        for x in area().x1..=area().x2 {
            assert!(grid.get(x, 2, cz).unwrap().is_air());
        }
        for z in area().z1..=area().z2 {
            assert!(grid.get(cx, 2, z).unwrap().is_air());
        }
        // Floor itself untouched.
        assert_eq!(grid.get(cx, 1, cz).unwrap().id, blocks::STONE);
    }

    #[test]
    fn corridor_half_width_is_clamped_up() {
        let mut grid = VoxelGrid::new(21, 8, 21);
        grid.fill(0, 1, 0, 20, 4, 20, Voxel::new(blocks::STONE));
        carve_corridor(&mut grid, area(), 0, 3, 0, CorridorAxis::AlongX);
        let (_, cz) = area().center();
        // Even with half-width 0 requested, a 3-wide corridor is carved.
        assert!(grid.get(5, 2, cz - 1).unwrap().is_air());
        assert!(grid.get(5, 2, cz + 1).unwrap().is_air());
    }
}
