//! Generation orchestrator: option resolution, archetype dispatch, ground
//! plane, decoration, and compound-site trimming.

use crate::compose;
use crate::decor::{apply_decor, ShellFrame};
use crate::error::GenError;
use crate::furnish::{BasicFurnisher, Furnisher};
use crate::generators::{self, GenContext};
use crate::grid::VoxelGrid;
use crate::options::{Archetype, GenerationOptions};
use crate::rng::StructureRng;
use blockwright_core::{blocks, palette, StylePalette, Voxel};
use std::time::Instant;
use tracing::{debug, info};

/// Optional wall-clock cutoff, checked at archetype and story boundaries.
///
/// The per-voxel loops never check it; a generation call overshoots by at
/// most one story of work.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn none() -> Self {
        Self { at: None }
    }

    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    /// Fails with [`GenError::DeadlineExceeded`] once the cutoff has passed.
    pub fn check(&self) -> Result<(), GenError> {
        match self.at {
            Some(at) if Instant::now() >= at => Err(GenError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Hard caps on requested dimensions, validated before dispatch. The grid
/// is dense, so an unbounded footprint is a memory hazard, and the i32
/// bounding-box math in the generators must never see a value near the
/// cast edge.
const MAX_FOOTPRINT: u32 = 256;
const MAX_FLOORS: u32 = 64;

/// Catalog style used when the options name none.
fn default_style(archetype: Archetype) -> &'static str {
    match archetype {
        Archetype::House | Archetype::Village | Archetype::Windmill => "timber",
        Archetype::Tower
        | Archetype::Castle
        | Archetype::Dungeon
        | Archetype::Cathedral
        | Archetype::Bridge => "stonework",
        Archetype::Ship => "seafarer",
        Archetype::Marketplace => "sandstone",
    }
}

/// Resolve the style palette for a call: catalog lookup plus shallow
/// overrides. The catalog original is never mutated.
pub fn resolve_palette(options: &GenerationOptions) -> Result<StylePalette, GenError> {
    let name = options
        .style
        .as_deref()
        .unwrap_or_else(|| default_style(options.archetype));
    let base = palette::builtin(name).ok_or_else(|| GenError::UnknownStyle(name.to_owned()))?;
    Ok(base.derive(&options.overrides))
}

/// Generate a structure with the default furnisher and no deadline.
pub fn generate(options: &GenerationOptions) -> Result<VoxelGrid, GenError> {
    generate_with(options, &BasicFurnisher, Deadline::none())
}

/// Generate with a wall-clock cutoff.
pub fn generate_with_deadline(
    options: &GenerationOptions,
    deadline: Instant,
) -> Result<VoxelGrid, GenError> {
    generate_with(options, &BasicFurnisher, Deadline::at(deadline))
}

/// Full-control entry point: caller-supplied furnisher and deadline.
pub fn generate_with(
    options: &GenerationOptions,
    furnisher: &dyn Furnisher,
    deadline: Deadline,
) -> Result<VoxelGrid, GenError> {
    if options.floors == 0 {
        return Err(GenError::InvalidOptions("floors must be at least 1".into()));
    }
    if options.floors > MAX_FLOORS {
        return Err(GenError::InvalidOptions(format!(
            "floors {} exceeds the maximum of {MAX_FLOORS}",
            options.floors
        )));
    }
    for (axis, value) in [("width", options.width), ("length", options.length)] {
        if value.is_some_and(|v| v > MAX_FOOTPRINT) {
            return Err(GenError::InvalidOptions(format!(
                "{axis} exceeds the maximum of {MAX_FOOTPRINT}"
            )));
        }
    }

    let resolved = resolve_palette(options)?;
    let mut rng = StructureRng::new(options.seed);

    info!(
        archetype = %options.archetype,
        seed = options.seed,
        floors = options.floors,
        style = resolved.name,
        "generating structure"
    );

    let mut ctx = GenContext {
        options,
        palette: &resolved,
        furnisher,
        rng: &mut rng,
        deadline: &deadline,
    };

    ctx.deadline.check()?;
    let (mut grid, frame) = match options.archetype {
        Archetype::House => generators::house::generate(&mut ctx)?,
        Archetype::Tower => generators::tower::generate(&mut ctx)?,
        Archetype::Castle => generators::castle::generate(&mut ctx)?,
        Archetype::Dungeon => generators::dungeon::generate(&mut ctx)?,
        Archetype::Ship => generators::ship::generate(&mut ctx)?,
        Archetype::Cathedral => generators::cathedral::generate(&mut ctx)?,
        Archetype::Bridge => generators::bridge::generate(&mut ctx)?,
        Archetype::Windmill => generators::windmill::generate(&mut ctx)?,
        Archetype::Marketplace => generators::marketplace::generate(&mut ctx)?,
        Archetype::Village => generators::village::generate(&mut ctx)?,
    };

    stamp_ground_plane(&mut grid, &frame, options.archetype);
    apply_decor(&mut grid, &frame, &resolved, &mut rng);

    // Compound sites over-allocate for sub-structure margins; reclaim.
    let grid = match options.archetype {
        Archetype::Village | Archetype::Marketplace => compose::trim(grid, 2),
        _ => grid,
    };

    debug!(
        width = grid.width(),
        height = grid.height(),
        length = grid.length(),
        entities = grid.entities().len(),
        "generation complete"
    );
    Ok(grid)
}

/// Fill what is still open at ground level. Ships and bridges sit over
/// water; everything else gets turf over subsoil.
fn stamp_ground_plane(grid: &mut VoxelGrid, frame: &ShellFrame, archetype: Archetype) {
    let y = frame.ground_y;
    if y < 0 || y >= grid.height() as i32 {
        return;
    }
    let cover = match archetype {
        Archetype::Ship | Archetype::Bridge => Voxel::new(blocks::WATER),
        _ => Voxel::new(blocks::GRASS),
    };
    for z in 0..grid.length() as i32 {
        for x in 0..grid.width() as i32 {
            if matches!(grid.get(x, y, z), Ok(voxel) if voxel.is_air()) {
                grid.set(x, y, z, cover);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;
    use std::time::Duration;

    #[test]
    fn zero_floors_is_rejected() {
        let options = GenerationOptions::new(Archetype::Tower, 1).with_floors(0);
        assert!(matches!(
            generate(&options),
            Err(GenError::InvalidOptions(_))
        ));
    }

    #[test]
    fn oversized_footprint_is_rejected() {
        let options =
            GenerationOptions::new(Archetype::House, 1).with_footprint(u32::MAX, 9);
        assert!(matches!(
            generate(&options),
            Err(GenError::InvalidOptions(_))
        ));
    }

    #[test]
    fn oversized_floor_count_is_rejected() {
        let options = GenerationOptions::new(Archetype::Tower, 1).with_floors(u32::MAX);
        assert!(matches!(
            generate(&options),
            Err(GenError::InvalidOptions(_))
        ));
    }

    #[test]
    fn unknown_style_is_rejected() {
        let options = GenerationOptions::new(Archetype::Tower, 1).with_style("rococo");
        assert_eq!(
            generate(&options),
            Err(GenError::UnknownStyle("rococo".into()))
        );
    }

    #[test]
    fn elapsed_deadline_aborts_before_any_work() {
        let options = GenerationOptions::new(Archetype::Village, 1).with_floors(2);
        let past = Instant::now() - Duration::from_secs(1);
        assert_eq!(
            generate_with_deadline(&options, past),
            Err(GenError::DeadlineExceeded)
        );
    }

    #[test]
    fn default_styles_cover_every_archetype() {
        for archetype in Archetype::ALL {
            let options = GenerationOptions::new(archetype, 5);
            assert!(resolve_palette(&options).is_ok(), "{archetype}");
        }
    }
}
