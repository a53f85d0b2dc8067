//! Room furnishing seam.
//!
//! Interior dressing is a collaborator concern, not part of the geometry
//! engine; generators only hand out [`RoomBounds`] and a room kind. The
//! [`BasicFurnisher`] here places just enough for rooms to read as lived-in
//! and for block-entity paths to be exercised.

use crate::grid::VoxelGrid;
use crate::options::RoomKind;
use crate::partition::RoomBounds;
use crate::rng::StructureRng;
use blockwright_core::{blocks, Facing, StylePalette, Voxel};
use serde_json::json;

/// Interior dressing collaborator.
pub trait Furnisher {
    fn furnish(
        &self,
        grid: &mut VoxelGrid,
        room: &RoomBounds,
        kind: RoomKind,
        palette: &StylePalette,
        rng: &mut StructureRng,
    );
}

/// Default furnisher: one or two anchor pieces per room kind plus a light.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicFurnisher;

impl BasicFurnisher {
    fn place_chest(
        grid: &mut VoxelGrid,
        x: i32,
        y: i32,
        z: i32,
        facing: Facing,
        loot_table: &str,
        rng: &mut StructureRng,
    ) {
        grid.set(x, y, z, Voxel::facing(blocks::CHEST, facing));
        let rolls = rng.range_i32(1, 3);
        grid.add_entity(x, y, z, json!({ "loot": loot_table, "rolls": rolls }));
    }
}

impl Furnisher for BasicFurnisher {
    fn furnish(
        &self,
        grid: &mut VoxelGrid,
        room: &RoomBounds,
        kind: RoomKind,
        palette: &StylePalette,
        rng: &mut StructureRng,
    ) {
        if room.width() < 3 || room.depth() < 3 {
            return;
        }

        let y = room.floor_y + 1;
        let (cx, cz) = room.center();

        match kind {
            RoomKind::Bedroom => {
                grid.set(room.x1, y, room.z1, Voxel::facing(blocks::BED_FOOT, Facing::South));
                grid.set(
                    room.x1,
                    y,
                    room.z1 + 1,
                    Voxel::facing(blocks::BED_HEAD, Facing::South),
                );
                Self::place_chest(grid, room.x2, y, room.z1, Facing::South, "bedroom", rng);
            }
            RoomKind::Kitchen => {
                grid.set(room.x1, y, room.z1, Voxel::facing(blocks::FURNACE, Facing::South));
                grid.set(room.x1 + 1, y, room.z1, Voxel::new(blocks::CRAFTING_TABLE));
                Self::place_chest(grid, room.x2, y, room.z1, Facing::South, "pantry", rng);
            }
            RoomKind::Study => {
                grid.set(room.x1, y, room.z1, Voxel::new(blocks::BOOKSHELF));
                grid.set(room.x1, y + 1, room.z1, Voxel::new(blocks::BOOKSHELF));
                grid.set(room.x2, y, room.z2, Voxel::new(palette.furniture));
            }
            RoomKind::Storage => {
                Self::place_chest(grid, room.x1, y, room.z1, Facing::East, "storage", rng);
                Self::place_chest(grid, room.x1, y, room.z2, Facing::East, "storage", rng);
                grid.set(room.x2, y, room.z2, Voxel::facing(blocks::BARREL, Facing::North));
            }
            RoomKind::Armory => {
                grid.set(room.x1, y, room.z1, Voxel::facing(blocks::ANVIL, Facing::East));
                Self::place_chest(grid, room.x2, y, room.z1, Facing::South, "armory", rng);
            }
            RoomKind::Chapel => {
                grid.set(cx, y, room.z1, Voxel::new(palette.wall_accent));
                grid.set(cx, y + 1, room.z1, Voxel::facing(blocks::BANNER, Facing::South));
            }
            RoomKind::Cell => {
                grid.set(room.x1, y, room.z2, Voxel::new(blocks::BARREL));
            }
            RoomKind::Workshop => {
                grid.set(room.x1, y, room.z1, Voxel::new(blocks::CRAFTING_TABLE));
                grid.set(room.x2, y, room.z1, Voxel::facing(blocks::ANVIL, Facing::West));
                Self::place_chest(grid, room.x2, y, room.z2, Facing::North, "workshop", rng);
            }
            RoomKind::Hall => {
                grid.set(cx, y, cz, Voxel::new(palette.furniture));
            }
        }

        // Every furnished room gets a light in the far corner.
        grid.set(room.x2, y + 1, room.z2, Voxel::new(palette.light));
    }
}

/// Cycle through the caller-requested room sequence, or fall back to a fixed
/// per-archetype default rotation.
pub fn room_kind_for(requested: Option<&[RoomKind]>, defaults: &[RoomKind], index: usize) -> RoomKind {
    match requested {
        Some(rooms) if !rooms.is_empty() => rooms[index % rooms.len()],
        _ => defaults[index % defaults.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::palette::TIMBER;

    fn room() -> RoomBounds {
        RoomBounds {
            x1: 1,
            z1: 1,
            x2: 6,
            z2: 6,
            floor_y: 0,
            height: 3,
        }
    }

    #[test]
    fn storage_room_records_loot_entities() {
        let mut grid = VoxelGrid::new(8, 8, 8);
        let mut rng = StructureRng::new(0);
        BasicFurnisher.furnish(&mut grid, &room(), RoomKind::Storage, &TIMBER, &mut rng);
        assert_eq!(grid.entities().len(), 2);
        assert_eq!(grid.entities()[0].payload["loot"], "storage");
    }

    #[test]
    fn degenerate_room_is_left_empty() {
        let mut grid = VoxelGrid::new(8, 8, 8);
        let mut rng = StructureRng::new(0);
        let sliver = RoomBounds {
            x1: 1,
            z1: 1,
            x2: 2,
            z2: 6,
            floor_y: 0,
            height: 3,
        };
        BasicFurnisher.furnish(&mut grid, &sliver, RoomKind::Bedroom, &TIMBER, &mut rng);
        assert!(grid.iter_solid().next().is_none());
        assert!(grid.entities().is_empty());
    }

    #[test]
    fn room_kind_cycles_requested_sequence() {
        let requested = [RoomKind::Kitchen, RoomKind::Bedroom];
        let defaults = [RoomKind::Hall];
        assert_eq!(
            room_kind_for(Some(&requested), &defaults, 0),
            RoomKind::Kitchen
        );
        assert_eq!(
            room_kind_for(Some(&requested), &defaults, 3),
            RoomKind::Bedroom
        );
        assert_eq!(room_kind_for(None, &defaults, 7), RoomKind::Hall);
        assert_eq!(room_kind_for(Some(&[]), &defaults, 0), RoomKind::Hall);
    }
}
