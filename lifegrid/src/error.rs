use thiserror::Error;

/// Everything that can go wrong while setting up a simulation.
///
/// Only [`Error::CoordinateOutOfBounds`] is recoverable: seeding drops the
/// offending coordinate and carries on. The rest abort before the first step.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("invalid grid size: {0}")]
    InvalidGridSize(String),

    #[error("seed array is {actual:?} but the grid interior is {expected:?} (height, width)")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("unsupported {kind} mode {mode:?}")]
    UnsupportedMode { kind: &'static str, mode: String },

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    CoordinateOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("probability {0} is not within [0, 1]")]
    InvalidProbability(f64),
}

impl Error {
    pub(crate) fn unsupported(kind: &'static str, mode: &str) -> Self {
        Self::UnsupportedMode {
            kind,
            mode: mode.to_owned(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
