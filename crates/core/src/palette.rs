//! Style palettes: named role→block bundles used to theme generated
//! structures.
//!
//! A palette is immutable once built. Callers that want a variation derive a
//! copy with [`StylePalette::derive`]; the catalog originals are never
//! touched.

use crate::material::{blocks, BlockId};
use serde::{Deserialize, Serialize};

/// A named decoration pass applied after the base shell, in declared order.
///
/// Styles attach these declaratively instead of generators branching on
/// material identity ("if wall is sandstone, add X").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorStep {
    /// Vertical log framing on exterior wall corners.
    TimberFraming,
    /// A one-block cobblestone skirt around the base of the walls.
    CobbleSkirt,
    /// Lanterns beside every ground-floor doorway.
    DoorLanterns,
    /// Flower pots under ground-floor windows.
    WindowPlanters,
    /// Mossy/cracked substitution over exposed stonework.
    WeatheredStone,
}

/// Role→block bundle for one architectural style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePalette {
    pub name: &'static str,
    pub wall: BlockId,
    /// Corner posts, lintels, horizontal banding.
    pub wall_accent: BlockId,
    pub foundation: BlockId,
    pub floor: BlockId,
    /// Alternate floor material for checker/border patterns.
    pub floor_alt: BlockId,
    /// Sloped roof surfaces (a stairs block; facing selects the slope side).
    pub roof_stairs: BlockId,
    /// Roof ridge line and gambrel/mansard breaks.
    pub roof_ridge: BlockId,
    /// Flat roof surfaces and hip caps.
    pub roof_flat: BlockId,
    pub window: BlockId,
    pub door_lower: BlockId,
    pub door_upper: BlockId,
    pub fence: BlockId,
    pub light: BlockId,
    /// Interior furniture wood (tables, shelving).
    pub furniture: BlockId,
    pub decor: &'static [DecorStep],
}

/// Shallow role substitutions applied over a catalog palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOverrides {
    pub wall: Option<BlockId>,
    pub wall_accent: Option<BlockId>,
    /// Replaces both door halves; the upper half id is `door_lower + 1` by
    /// catalog convention.
    pub door_lower: Option<BlockId>,
    pub roof_stairs: Option<BlockId>,
    pub roof_ridge: Option<BlockId>,
    pub roof_flat: Option<BlockId>,
}

impl StylePalette {
    /// Copy of this palette with the given roles substituted.
    pub fn derive(&self, overrides: &StyleOverrides) -> StylePalette {
        let mut out = self.clone();
        if let Some(wall) = overrides.wall {
            out.wall = wall;
        }
        if let Some(accent) = overrides.wall_accent {
            out.wall_accent = accent;
        }
        if let Some(lower) = overrides.door_lower {
            out.door_lower = lower;
            out.door_upper = lower + 1;
        }
        if let Some(stairs) = overrides.roof_stairs {
            out.roof_stairs = stairs;
        }
        if let Some(ridge) = overrides.roof_ridge {
            out.roof_ridge = ridge;
        }
        if let Some(flat) = overrides.roof_flat {
            out.roof_flat = flat;
        }
        out
    }
}

/// Timber-framed cottage style. The default for houses and villages.
pub const TIMBER: StylePalette = StylePalette {
    name: "timber",
    wall: blocks::OAK_PLANKS,
    wall_accent: blocks::OAK_LOG,
    foundation: blocks::COBBLESTONE,
    floor: blocks::OAK_PLANKS,
    floor_alt: blocks::SPRUCE_PLANKS,
    roof_stairs: blocks::DARK_OAK_STAIRS,
    roof_ridge: blocks::SPRUCE_SLAB,
    roof_flat: blocks::SPRUCE_PLANKS,
    window: blocks::GLASS_PANE,
    door_lower: blocks::OAK_DOOR_LOWER,
    door_upper: blocks::OAK_DOOR_UPPER,
    fence: blocks::OAK_FENCE,
    light: blocks::TORCH,
    furniture: blocks::OAK_PLANKS,
    decor: &[
        DecorStep::TimberFraming,
        DecorStep::CobbleSkirt,
        DecorStep::DoorLanterns,
        DecorStep::WindowPlanters,
    ],
};

/// Dressed-stone style for castles, keeps, and cathedrals.
pub const STONEWORK: StylePalette = StylePalette {
    name: "stonework",
    wall: blocks::STONE_BRICKS,
    wall_accent: blocks::SMOOTH_STONE,
    foundation: blocks::STONE,
    floor: blocks::SMOOTH_STONE,
    floor_alt: blocks::STONE_BRICKS,
    roof_stairs: blocks::STONE_BRICK_STAIRS,
    roof_ridge: blocks::STONE_BRICK_SLAB,
    roof_flat: blocks::STONE_BRICK_SLAB,
    window: blocks::IRON_BARS,
    door_lower: blocks::SPRUCE_DOOR_LOWER,
    door_upper: blocks::SPRUCE_DOOR_UPPER,
    fence: blocks::COBBLESTONE_WALL,
    light: blocks::LANTERN,
    furniture: blocks::SPRUCE_PLANKS,
    decor: &[DecorStep::WeatheredStone, DecorStep::DoorLanterns],
};

/// Sun-baked sandstone style.
pub const SANDSTONE: StylePalette = StylePalette {
    name: "sandstone",
    wall: blocks::SANDSTONE,
    wall_accent: blocks::CUT_SANDSTONE,
    foundation: blocks::SANDSTONE,
    floor: blocks::CUT_SANDSTONE,
    floor_alt: blocks::SANDSTONE,
    roof_stairs: blocks::SANDSTONE_STAIRS,
    roof_ridge: blocks::STONE_SLAB,
    roof_flat: blocks::CUT_SANDSTONE,
    window: blocks::GLASS_PANE,
    door_lower: blocks::OAK_DOOR_LOWER,
    door_upper: blocks::OAK_DOOR_UPPER,
    fence: blocks::SPRUCE_FENCE,
    light: blocks::LANTERN,
    furniture: blocks::SPRUCE_PLANKS,
    decor: &[DecorStep::WindowPlanters],
};

/// Tarred-timber style for ships and harbors.
pub const SEAFARER: StylePalette = StylePalette {
    name: "seafarer",
    wall: blocks::SPRUCE_PLANKS,
    wall_accent: blocks::DARK_OAK_LOG,
    foundation: blocks::DARK_OAK_PLANKS,
    floor: blocks::SPRUCE_PLANKS,
    floor_alt: blocks::DARK_OAK_PLANKS,
    roof_stairs: blocks::SPRUCE_STAIRS,
    roof_ridge: blocks::SPRUCE_SLAB,
    roof_flat: blocks::SPRUCE_PLANKS,
    window: blocks::GLASS_PANE,
    door_lower: blocks::SPRUCE_DOOR_LOWER,
    door_upper: blocks::SPRUCE_DOOR_UPPER,
    fence: blocks::SPRUCE_FENCE,
    light: blocks::LANTERN,
    furniture: blocks::DARK_OAK_PLANKS,
    decor: &[DecorStep::DoorLanterns],
};

/// Look up a catalog palette by name.
pub fn builtin(name: &str) -> Option<&'static StylePalette> {
    match name {
        "timber" => Some(&TIMBER),
        "stonework" => Some(&STONEWORK),
        "sandstone" => Some(&SANDSTONE),
        "seafarer" => Some(&SEAFARER),
        _ => None,
    }
}
