use serde::{Deserialize, Serialize};

/// Block identifier referencing the block catalog.
pub type BlockId = u16;
/// Block state metadata bits. Facing occupies the low two bits.
pub type BlockState = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;

/// Block IDs used by the structure generators.
///
/// The numbering is stable: serialized grids reference these values, so new
/// blocks are appended, never renumbered.
pub mod blocks {
    use super::BlockId;

    pub const STONE: BlockId = 1;
    pub const COBBLESTONE: BlockId = 2;
    pub const MOSSY_COBBLESTONE: BlockId = 3;
    pub const STONE_BRICKS: BlockId = 4;
    pub const MOSSY_STONE_BRICKS: BlockId = 5;
    pub const CRACKED_STONE_BRICKS: BlockId = 6;
    pub const SMOOTH_STONE: BlockId = 7;
    pub const SANDSTONE: BlockId = 8;
    pub const CUT_SANDSTONE: BlockId = 9;

    pub const DIRT: BlockId = 10;
    pub const GRASS: BlockId = 11;
    pub const GRAVEL: BlockId = 12;
    pub const DIRT_PATH: BlockId = 13;
    pub const SAND: BlockId = 14;
    pub const WATER: BlockId = 15;
    pub const FARMLAND: BlockId = 16;

    pub const OAK_LOG: BlockId = 20;
    pub const OAK_PLANKS: BlockId = 21;
    pub const SPRUCE_LOG: BlockId = 22;
    pub const SPRUCE_PLANKS: BlockId = 23;
    pub const DARK_OAK_LOG: BlockId = 24;
    pub const DARK_OAK_PLANKS: BlockId = 25;
    pub const STRIPPED_OAK_LOG: BlockId = 26;

    pub const GLASS: BlockId = 30;
    pub const GLASS_PANE: BlockId = 31;
    pub const WHITE_STAINED_GLASS: BlockId = 32;
    pub const BLUE_STAINED_GLASS: BlockId = 33;
    pub const RED_STAINED_GLASS: BlockId = 34;

    pub const OAK_DOOR_LOWER: BlockId = 40;
    pub const OAK_DOOR_UPPER: BlockId = 41;
    pub const SPRUCE_DOOR_LOWER: BlockId = 42;
    pub const SPRUCE_DOOR_UPPER: BlockId = 43;
    pub const IRON_DOOR_LOWER: BlockId = 44;
    pub const IRON_DOOR_UPPER: BlockId = 45;

    pub const OAK_STAIRS: BlockId = 50;
    pub const SPRUCE_STAIRS: BlockId = 51;
    pub const DARK_OAK_STAIRS: BlockId = 52;
    pub const STONE_BRICK_STAIRS: BlockId = 53;
    pub const COBBLESTONE_STAIRS: BlockId = 54;
    pub const SANDSTONE_STAIRS: BlockId = 55;

    pub const OAK_SLAB: BlockId = 60;
    pub const SPRUCE_SLAB: BlockId = 61;
    pub const STONE_SLAB: BlockId = 62;
    pub const STONE_BRICK_SLAB: BlockId = 63;

    pub const OAK_FENCE: BlockId = 70;
    pub const SPRUCE_FENCE: BlockId = 71;
    pub const OAK_FENCE_GATE: BlockId = 72;
    pub const IRON_BARS: BlockId = 73;
    pub const COBBLESTONE_WALL: BlockId = 74;
    pub const LADDER: BlockId = 75;

    pub const TORCH: BlockId = 80;
    pub const LANTERN: BlockId = 81;
    pub const CHEST: BlockId = 82;
    pub const BARREL: BlockId = 83;
    pub const CRAFTING_TABLE: BlockId = 84;
    pub const FURNACE: BlockId = 85;
    pub const BOOKSHELF: BlockId = 86;
    pub const BED_FOOT: BlockId = 87;
    pub const BED_HEAD: BlockId = 88;
    pub const BELL: BlockId = 89;
    pub const ANVIL: BlockId = 90;
    pub const FLOWER_POT: BlockId = 91;
    pub const BANNER: BlockId = 92;

    pub const WHITE_WOOL: BlockId = 100;
    pub const RED_WOOL: BlockId = 101;
    pub const GREEN_WOOL: BlockId = 102;
    pub const BLUE_WOOL: BlockId = 103;
    pub const YELLOW_WOOL: BlockId = 104;

    pub const OAK_LEAVES: BlockId = 110;
    pub const WHEAT_CROP: BlockId = 111;
    pub const CARROT_CROP: BlockId = 112;
    pub const ROSE_BUSH: BlockId = 113;
    pub const MILLSTONE: BlockId = 114;
}

/// Facing direction carried in the low two state bits of orientable blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    /// Decode facing from state bits (2 bits).
    pub fn from_state(state: BlockState) -> Self {
        match state & 0x03 {
            0 => Facing::North,
            1 => Facing::South,
            2 => Facing::East,
            _ => Facing::West,
        }
    }

    /// Encode to state bits.
    pub fn to_state(self) -> BlockState {
        match self {
            Facing::North => 0,
            Facing::South => 1,
            Facing::East => 2,
            Facing::West => 3,
        }
    }

    /// The opposite facing.
    pub fn opposite(self) -> Self {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }

    /// Facing after mirroring across the Z axis. North and south swap;
    /// east and west are unaffected by a Z-axis mirror.
    pub fn mirrored_z(self) -> Self {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            other => other,
        }
    }

    /// Unit offset (dx, dz) for this facing. North is −Z.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::South => (0, 1),
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
        }
    }
}

/// Whether a block's state bits carry a facing that mirroring must rewrite.
pub fn block_has_facing(id: BlockId) -> bool {
    use blocks::*;
    matches!(
        id,
        OAK_DOOR_LOWER
            | OAK_DOOR_UPPER
            | SPRUCE_DOOR_LOWER
            | SPRUCE_DOOR_UPPER
            | IRON_DOOR_LOWER
            | IRON_DOOR_UPPER
            | OAK_STAIRS
            | SPRUCE_STAIRS
            | DARK_OAK_STAIRS
            | STONE_BRICK_STAIRS
            | COBBLESTONE_STAIRS
            | SANDSTONE_STAIRS
            | CHEST
            | BARREL
            | FURNACE
            | BED_FOOT
            | BED_HEAD
            | LADDER
            | BANNER
            | OAK_FENCE_GATE
            | ANVIL
    )
}

/// A single grid cell: block identifier plus state bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voxel {
    pub id: BlockId,
    pub state: BlockState,
}

impl Default for Voxel {
    fn default() -> Self {
        Self {
            id: BLOCK_AIR,
            state: 0,
        }
    }
}

impl Voxel {
    /// A plain block with zeroed state.
    pub const fn new(id: BlockId) -> Self {
        Self { id, state: 0 }
    }

    /// A block with its facing encoded in the state bits.
    pub fn facing(id: BlockId, facing: Facing) -> Self {
        Self {
            id,
            state: facing.to_state(),
        }
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.id == BLOCK_AIR
    }

    /// Facing decoded from the state bits, if this block type carries one.
    pub fn block_facing(&self) -> Option<Facing> {
        block_has_facing(self.id).then(|| Facing::from_state(self.state))
    }

    /// Copy of this voxel with the facing bits replaced.
    pub fn with_facing(self, facing: Facing) -> Self {
        Self {
            id: self.id,
            state: (self.state & !0x03) | facing.to_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_state_round_trip() {
        for facing in [Facing::North, Facing::South, Facing::East, Facing::West] {
            assert_eq!(Facing::from_state(facing.to_state()), facing);
        }
    }

    #[test]
    fn mirrored_z_swaps_north_south_only() {
        assert_eq!(Facing::North.mirrored_z(), Facing::South);
        assert_eq!(Facing::South.mirrored_z(), Facing::North);
        assert_eq!(Facing::East.mirrored_z(), Facing::East);
        assert_eq!(Facing::West.mirrored_z(), Facing::West);
    }

    #[test]
    fn with_facing_preserves_upper_state_bits() {
        let voxel = Voxel {
            id: blocks::OAK_STAIRS,
            state: 0b1100 | Facing::East.to_state(),
        };
        let flipped = voxel.with_facing(Facing::West);
        assert_eq!(flipped.state & !0x03, 0b1100);
        assert_eq!(flipped.block_facing(), Some(Facing::West));
    }

    #[test]
    fn plain_blocks_report_no_facing() {
        let wall = Voxel::new(blocks::STONE_BRICKS);
        assert_eq!(wall.block_facing(), None);
        assert!(block_has_facing(blocks::OAK_DOOR_LOWER));
        assert!(!block_has_facing(blocks::STONE_BRICKS));
    }

    #[test]
    fn default_voxel_is_air() {
        assert!(Voxel::default().is_air());
        assert!(!Voxel::new(blocks::STONE).is_air());
    }
}
