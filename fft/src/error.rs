use backend::AcceleratorError;

/// Errors returned by the transform entry points.
///
/// Host-side validation errors are raised before any accelerator resource is
/// acquired. Accelerator errors are raised after every instance acquired by
/// the failing call has been released. In both cases the output buffer is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FftError {
    #[error(transparent)]
    Accelerator(#[from] AcceleratorError),

    /// A dimension is zero, or is not a power of two where one is required.
    #[error("shape {rows}x{cols} not supported, dimensions must be non-zero powers of two")]
    InvalidShape { rows: usize, cols: usize },

    /// A host buffer does not match the declared shape.
    #[error("{what} buffer holds {actual} floats, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl FftError {
    /// Integer status: `-1` channel unavailable, `-2` shape not supported, `-3`
    /// out of accelerator memory, `-6` dimension mismatch, `-7` host buffer
    /// length mismatch.
    pub fn code(&self) -> i32 {
        match self {
            FftError::Accelerator(e) => e.code(),
            FftError::InvalidShape { .. } => -2,
            FftError::LengthMismatch { .. } => -7,
        }
    }
}

/// Maps a driver result to its integer status, `0` on success.
pub fn status(result: &Result<(), FftError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::{FftError, status};
    use backend::AcceleratorError;

    #[test]
    fn status_codes() {
        assert_eq!(status(&Ok(())), 0);
        assert_eq!(status(&Err(FftError::InvalidShape { rows: 3, cols: 4 })), -2);
        assert_eq!(
            status(&Err(FftError::LengthMismatch {
                what: "input",
                expected: 8,
                actual: 7
            })),
            -7
        );
        assert_eq!(
            status(&Err(AcceleratorError::ResourceExhausted {
                requested_bytes: 1,
                available_bytes: 0
            }
            .into())),
            -3
        );
    }

    #[test]
    fn accelerator_message_is_forwarded() {
        let e: FftError = AcceleratorError::ChannelUnavailable {
            reason: "mailbox busy".into(),
        }
        .into();
        assert!(e.to_string().contains("mailbox busy"));
    }
}
