//! Core primitives shared across the workspace: block identifiers, voxel
//! state encoding, and style palettes.

pub mod material;
pub mod palette;

pub use material::{
    block_has_facing, blocks, BlockId, BlockState, Facing, Voxel, BLOCK_AIR,
};
pub use palette::{builtin, DecorStep, StyleOverrides, StylePalette};
