use thiserror::Error;

/// Coarse classification of kernel failures.
///
/// Every failure is a deterministic function of the input; none of them is
/// worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad grid shape, too few curve points, zero direction.
    InvalidArgument,
    /// A surface parameter fell outside [0, 1] under the reject policy.
    OutOfRange,
}

/// Structured failure information for evaluation and extrusion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("curve has {provided} control points, need at least {required}")]
    TooFewControlPoints { required: usize, provided: usize },

    #[error("control grid must be at least 2x2, got {rows}x{cols}")]
    GridTooSmall { rows: usize, cols: usize },

    #[error("control grid row {row} has {found} points, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("control grid of {rows}x{cols} needs {expected} points, got {found}")]
    GridSizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },

    #[error("direction vector has zero length")]
    ZeroDirection,

    #[error("sample grid needs at least 2x2 samples, got {nu}x{nv}")]
    InsufficientSamples { nu: usize, nv: usize },

    #[error("parameter {name} = {value} is outside [0, 1]")]
    ParameterOutOfRange { name: &'static str, value: f64 },
}

impl KernelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ParameterOutOfRange { .. } => ErrorKind::OutOfRange,
            Self::TooFewControlPoints { .. }
            | Self::GridTooSmall { .. }
            | Self::RaggedGrid { .. }
            | Self::GridSizeMismatch { .. }
            | Self::ZeroDirection
            | Self::InsufficientSamples { .. } => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_out_of_range(&self) -> bool {
        self.kind() == ErrorKind::OutOfRange
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;
