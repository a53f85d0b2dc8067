use thiserror::Error;

/// Failures a generation call can produce. All are fatal to the call: the
/// engine never returns a partial grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// An archetype tag outside the supported set.
    #[error("unknown archetype `{0}`")]
    UnknownArchetype(String),

    /// A style name with no catalog entry.
    #[error("unknown style `{0}`")]
    UnknownStyle(String),

    /// Coordinate read outside grid bounds.
    #[error("coordinate ({x}, {y}, {z}) outside grid {width}x{height}x{length}")]
    OutOfRange {
        x: i32,
        y: i32,
        z: i32,
        width: usize,
        height: usize,
        length: usize,
    },

    /// Options that no clamp can rescue (e.g. zero floors).
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The caller-supplied deadline elapsed mid-generation.
    #[error("generation deadline exceeded")]
    DeadlineExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_offender() {
        let err = GenError::UnknownArchetype("lighthouse".into());
        assert_eq!(err.to_string(), "unknown archetype `lighthouse`");

        let err = GenError::OutOfRange {
            x: -1,
            y: 0,
            z: 3,
            width: 8,
            height: 16,
            length: 8,
        };
        assert!(err.to_string().contains("(-1, 0, 3)"));
    }
}
