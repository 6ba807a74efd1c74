/// Failures reported by an accelerator at acquisition time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcceleratorError {
    /// The communication channel to the accelerator could not be opened.
    #[error("accelerator channel unavailable: {reason}")]
    ChannelUnavailable { reason: String },

    /// The accelerator does not support transforms of length `2^log2_len`.
    #[error("transform length 2^{log2_len} not supported, expected 2^{min}..=2^{max}")]
    UnsupportedShape { log2_len: u32, min: u32, max: u32 },

    /// The accelerator cannot allocate the requested engine or transpose memory.
    #[error("accelerator out of memory: requested {requested_bytes} bytes, {available_bytes} available")]
    ResourceExhausted {
        requested_bytes: usize,
        available_bytes: usize,
    },

    /// Source and destination engines cannot be chained through a transpose.
    #[error("cannot transpose {src_rows}x{src_len} output into {dst_rows}x{dst_len} input")]
    DimensionMismatch {
        src_rows: usize,
        src_len: usize,
        dst_rows: usize,
        dst_len: usize,
    },
}

impl AcceleratorError {
    /// Integer status reported through the driver entry points.
    pub fn code(&self) -> i32 {
        match self {
            AcceleratorError::ChannelUnavailable { .. } => -1,
            AcceleratorError::UnsupportedShape { .. } => -2,
            AcceleratorError::ResourceExhausted { .. } => -3,
            AcceleratorError::DimensionMismatch { .. } => -6,
        }
    }
}
