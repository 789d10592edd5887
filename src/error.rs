use thiserror::Error;

/// Fatal build errors.
///
/// Everything that would leave the electrical parameters of the network
/// undefined aborts the build. Topological anomalies (unknown buses referenced
/// by segments, open lines, islands) are not errors; they accumulate in the
/// build and topology reports instead.
#[derive(Error, Debug)]
pub enum BuildError {
    /// No catalog entry matched the segment's cable characteristics under any
    /// candidate prefix.
    #[error("cable for line {line} not found with the following characteristics: section:{section}, core:{core}, insulation:{insulation}, insulation voltage:{insulation_voltage}")]
    CableNotFound {
        line: usize,
        section: String,
        core: String,
        insulation: String,
        insulation_voltage: String,
    },

    /// An explicit resolve of a bus id that was never registered.
    #[error("unknown bus {0}")]
    UnknownBus(usize),

    /// Segment length must be strictly positive.
    #[error("line {line}: segment length {length} must be positive")]
    NonPositiveLength { line: usize, length: f64 },

    /// A segment whose scaled series impedance is exactly zero cannot be
    /// reduced (the star point admittance path divides by it).
    #[error("line {line}: segment has zero series impedance")]
    ZeroImpedance { line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
