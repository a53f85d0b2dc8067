//! Generation options: the declarative parameter set one call consumes.

use crate::error::GenError;
use blockwright_core::StyleOverrides;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of structure archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    House,
    Tower,
    Castle,
    Dungeon,
    Ship,
    Cathedral,
    Bridge,
    Windmill,
    Marketplace,
    Village,
}

impl Archetype {
    pub const ALL: [Archetype; 10] = [
        Archetype::House,
        Archetype::Tower,
        Archetype::Castle,
        Archetype::Dungeon,
        Archetype::Ship,
        Archetype::Cathedral,
        Archetype::Bridge,
        Archetype::Windmill,
        Archetype::Marketplace,
        Archetype::Village,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::House => "house",
            Archetype::Tower => "tower",
            Archetype::Castle => "castle",
            Archetype::Dungeon => "dungeon",
            Archetype::Ship => "ship",
            Archetype::Cathedral => "cathedral",
            Archetype::Bridge => "bridge",
            Archetype::Windmill => "windmill",
            Archetype::Marketplace => "marketplace",
            Archetype::Village => "village",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = GenError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|archetype| archetype.as_str() == tag)
            .ok_or_else(|| GenError::UnknownArchetype(tag.to_owned()))
    }
}

/// Footprint outline for house-family structures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorPlan {
    #[default]
    Rect,
    L,
    T,
    U,
}

/// Roof construction for house-family structures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofShape {
    #[default]
    Gable,
    Hip,
    Flat,
    Gambrel,
    Mansard,
}

bitflags::bitflags! {
    /// Optional site features around a house.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct FeatureFlags: u16 {
        const PORCH    = 0b0000_0001;
        const CHIMNEY  = 0b0000_0010;
        const BACKYARD = 0b0000_0100;
        const DRIVEWAY = 0b0000_1000;
        const FENCE    = 0b0001_0000;
        const TREES    = 0b0010_0000;
        const GARDEN   = 0b0100_0000;
        const POOL     = 0b1000_0000;
    }
}

impl Serialize for FeatureFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for FeatureFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        Ok(FeatureFlags::from_bits_truncate(bits))
    }
}

/// Interior room types the furnisher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Hall,
    Bedroom,
    Kitchen,
    Study,
    Storage,
    Armory,
    Chapel,
    Cell,
    Workshop,
}

/// One generation call's full parameter set.
///
/// `seed` is mandatory: the engine never invents one. Callers that want a
/// "random" building pick a seed at their own boundary (wall clock, player
/// input, whatever) and pass it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub archetype: Archetype,
    pub seed: u64,
    pub floors: u32,
    /// Catalog style name. Defaults per archetype when absent.
    #[serde(default)]
    pub style: Option<String>,
    /// Explicit room-type sequence for the furnisher; generators cycle
    /// through it when partitioning produces more rooms than entries.
    #[serde(default)]
    pub rooms: Option<Vec<RoomKind>>,
    /// Footprint override (X extent). Archetype default when absent.
    #[serde(default)]
    pub width: Option<u32>,
    /// Footprint override (Z extent). Archetype default when absent.
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub overrides: StyleOverrides,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub floor_plan: FloorPlan,
    #[serde(default)]
    pub roof_shape: RoofShape,
}

impl GenerationOptions {
    /// Minimal options: everything else at archetype defaults.
    pub fn new(archetype: Archetype, seed: u64) -> Self {
        Self {
            archetype,
            seed,
            floors: 1,
            style: None,
            rooms: None,
            width: None,
            length: None,
            overrides: StyleOverrides::default(),
            features: FeatureFlags::default(),
            floor_plan: FloorPlan::default(),
            roof_shape: RoofShape::default(),
        }
    }

    pub fn with_floors(mut self, floors: u32) -> Self {
        self.floors = floors;
        self
    }

    pub fn with_footprint(mut self, width: u32, length: u32) -> Self {
        self.width = Some(width);
        self.length = Some(length);
        self
    }

    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_owned());
        self
    }
}
