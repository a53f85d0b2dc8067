//! Dense voxel grid owned by a single generation call.

use crate::error::GenError;
use blockwright_core::Voxel;
use serde::{Deserialize, Serialize};

/// A positioned opaque metadata record (container contents, sign text, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntity {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub payload: serde_json::Value,
}

/// Dense `width × height × length` grid of voxels plus an append-only
/// block-entity list.
///
/// Bounds policy, applied uniformly:
/// - reads ([`VoxelGrid::get`]) fail with [`GenError::OutOfRange`];
/// - writes ([`VoxelGrid::set`], [`VoxelGrid::fill`],
///   [`VoxelGrid::add_entity`]) outside bounds are silent no-ops.
///
/// Repeated writes to one cell keep the last value; entity records
/// accumulate without deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    width: usize,
    height: usize,
    length: usize,
    voxels: Vec<Voxel>,
    entities: Vec<BlockEntity>,
}

impl VoxelGrid {
    /// Allocate a grid filled with air.
    pub fn new(width: usize, height: usize, length: usize) -> Self {
        debug_assert!(width > 0 && height > 0 && length > 0);
        Self {
            width,
            height,
            length,
            voxels: vec![Voxel::default(); width * height * length],
            entities: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.length
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (y as usize * self.length + z as usize) * self.width + x as usize
    }

    /// Bounds-checked read.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Result<Voxel, GenError> {
        if !self.in_bounds(x, y, z) {
            return Err(GenError::OutOfRange {
                x,
                y,
                z,
                width: self.width,
                height: self.height,
                length: self.length,
            });
        }
        Ok(self.voxels[self.index(x, y, z)])
    }

    /// Write one voxel. Out-of-bounds targets are skipped.
    pub fn set(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) {
        if self.in_bounds(x, y, z) {
            let idx = self.index(x, y, z);
            self.voxels[idx] = voxel;
        }
    }

    /// Uniform write over the inclusive prism `[x0..=x1, y0..=y1, z0..=z1]`.
    /// Cells outside bounds are skipped per-cell.
    pub fn fill(&mut self, x0: i32, y0: i32, z0: i32, x1: i32, y1: i32, z1: i32, voxel: Voxel) {
        for y in y0.min(y1)..=y0.max(y1) {
            for z in z0.min(z1)..=z0.max(z1) {
                for x in x0.min(x1)..=x0.max(x1) {
                    self.set(x, y, z, voxel);
                }
            }
        }
    }

    /// Append a block entity. Out-of-bounds positions are dropped so the
    /// in-bounds invariant on stored records always holds.
    pub fn add_entity(&mut self, x: i32, y: i32, z: i32, payload: serde_json::Value) {
        if self.in_bounds(x, y, z) {
            self.entities.push(BlockEntity { x, y, z, payload });
        }
    }

    pub fn entities(&self) -> &[BlockEntity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut Vec<BlockEntity> {
        &mut self.entities
    }

    /// Borrow raw voxel storage (composition and tests).
    pub(crate) fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Iterate all non-air cells as `(x, y, z, voxel)`.
    pub fn iter_solid(&self) -> impl Iterator<Item = (i32, i32, i32, Voxel)> + '_ {
        let (width, length) = (self.width, self.length);
        self.voxels
            .iter()
            .enumerate()
            .filter(|(_, voxel)| !voxel.is_air())
            .map(move |(idx, voxel)| {
                let x = idx % width;
                let z = (idx / width) % length;
                let y = idx / (width * length);
                (x as i32, y as i32, z as i32, *voxel)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_core::blocks;
    use serde_json::json;

    #[test]
    fn new_grid_is_all_air() {
        let grid = VoxelGrid::new(4, 4, 4);
        for y in 0..4 {
            for z in 0..4 {
                for x in 0..4 {
                    assert!(grid.get(x, y, z).unwrap().is_air());
                }
            }
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut grid = VoxelGrid::new(8, 8, 8);
        grid.set(1, 2, 3, Voxel::new(blocks::STONE));
        assert_eq!(grid.get(1, 2, 3).unwrap().id, blocks::STONE);
    }

    #[test]
    fn read_out_of_bounds_fails() {
        let grid = VoxelGrid::new(4, 4, 4);
        assert!(matches!(
            grid.get(4, 0, 0),
            Err(GenError::OutOfRange { x: 4, .. })
        ));
        assert!(grid.get(-1, 0, 0).is_err());
    }

    #[test]
    fn write_out_of_bounds_is_a_no_op() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        grid.set(-1, 0, 0, Voxel::new(blocks::STONE));
        grid.set(0, 99, 0, Voxel::new(blocks::STONE));
        assert!(grid.iter_solid().next().is_none());
    }

    #[test]
    fn fill_clips_per_cell() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        grid.fill(2, 0, 2, 6, 0, 6, Voxel::new(blocks::DIRT));
        assert_eq!(grid.iter_solid().count(), 4); // (2..4) x (2..4)
    }

    #[test]
    fn last_write_wins() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        grid.set(0, 0, 0, Voxel::new(blocks::STONE));
        grid.set(0, 0, 0, Voxel::new(blocks::DIRT));
        assert_eq!(grid.get(0, 0, 0).unwrap().id, blocks::DIRT);
    }

    #[test]
    fn entities_accumulate_in_order() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        grid.add_entity(0, 0, 0, json!({"loot": "bread"}));
        grid.add_entity(0, 0, 0, json!({"loot": "iron"}));
        assert_eq!(grid.entities().len(), 2);
        assert_eq!(grid.entities()[0].payload["loot"], "bread");
        assert_eq!(grid.entities()[1].payload["loot"], "iron");
    }

    #[test]
    fn out_of_bounds_entity_is_dropped() {
        let mut grid = VoxelGrid::new(4, 4, 4);
        grid.add_entity(9, 9, 9, json!({}));
        assert!(grid.entities().is_empty());
    }
}
