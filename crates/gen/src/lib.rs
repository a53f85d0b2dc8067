//! blockwright-gen: deterministic procedural structure generation.
//!
//! A pure function from [`GenerationOptions`] to a populated [`VoxelGrid`]:
//! identical options (seed included) always produce byte-identical grids and
//! identical block-entity lists. Serialization of finished grids to a game
//! file format is a downstream concern.

mod compose;
mod decor;
mod error;
mod furnish;
mod generate;
mod generators;
mod geometry;
mod grid;
mod options;
mod partition;
mod rng;

pub use compose::{paste, paste_mirrored, trim};
pub use decor::{apply_decor, ShellFrame};
pub use error::GenError;
pub use furnish::{BasicFurnisher, Furnisher};
pub use generate::{
    generate, generate_with, generate_with_deadline, resolve_palette, Deadline,
};
pub use geometry::{
    conical_roof, disc_contains, fill_disc, fill_ring, profile, pyramid_roof, ring_contains,
    spiral_stairs, weather_region, Blend,
};
pub use grid::{BlockEntity, VoxelGrid};
pub use options::{
    Archetype, FeatureFlags, FloorPlan, GenerationOptions, RoofShape, RoomKind,
};
pub use partition::{
    carve_corridor, carve_cross_corridor, front_back_rooms, quadrant_rooms, CorridorAxis,
    FloorArea, RoomBounds, MIN_CORRIDOR_HALF_WIDTH,
};
pub use rng::StructureRng;
