//! Copies between host arrays and engine regions.
//!
//! Engine regions are only addressed through [RowsRef]/[RowsMut], so row `r`
//! always starts at `r * step`, never at `r * len`.

use backend::{RowsMut, RowsRef, Sample};
use itertools::izip;

/// Placement of an engine's output matrix in the host array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Engine row `r`, column `c` goes to host cell `r * len + c`.
    RowMajor,
    /// Engine row `r`, column `c` goes to host cell `c * rows + r`. Used for
    /// the output of a row-transpose-row pipeline, whose rows are the columns
    /// of the original matrix.
    Transposed,
}

/// Widens a row-major real matrix: `re = input[r * len + c]`, `im = 0`.
pub fn load_real(dst: &mut RowsMut<'_>, input: &[f32]) {
    let len: usize = dst.len();
    assert_eq!(input.len(), dst.rows() * len, "real input size");
    izip!(dst.iter_mut(), input.chunks_exact(len)).for_each(|(row, src)| {
        izip!(row.iter_mut(), src.iter()).for_each(|(s, x)| *s = Sample::new(*x, 0.0));
    });
}

/// Loads an interleaved complex matrix, dividing both parts by `divisor`.
pub fn load_complex(dst: &mut RowsMut<'_>, input: &[f32], divisor: f32) {
    let len: usize = dst.len();
    assert_eq!(input.len(), 2 * dst.rows() * len, "complex input size");
    izip!(dst.iter_mut(), input.chunks_exact(2 * len)).for_each(|(row, src)| {
        izip!(row.iter_mut(), src.chunks_exact(2)).for_each(|(s, x)| *s = Sample::new(x[0] / divisor, x[1] / divisor));
    });
}

/// Stores both parts as an interleaved complex matrix, dividing by `divisor`.
pub fn store_complex(src: RowsRef<'_>, output: &mut [f32], orientation: Orientation, divisor: f32) {
    let (rows, len) = (src.rows(), src.len());
    assert_eq!(output.len(), 2 * rows * len, "complex output size");
    match orientation {
        Orientation::RowMajor => {
            izip!(src.iter(), output.chunks_exact_mut(2 * len)).for_each(|(row, dst)| {
                izip!(row.iter(), dst.chunks_exact_mut(2)).for_each(|(s, x)| {
                    x[0] = s.re / divisor;
                    x[1] = s.im / divisor;
                });
            });
        }
        Orientation::Transposed => {
            src.iter().enumerate().for_each(|(r, row)| {
                row.iter().enumerate().for_each(|(c, s)| {
                    let idx: usize = c * rows + r;
                    output[2 * idx] = s.re / divisor;
                    output[2 * idx + 1] = s.im / divisor;
                });
            });
        }
    }
}

/// Stores the real parts only, dividing by `divisor`.
pub fn store_real(src: RowsRef<'_>, output: &mut [f32], orientation: Orientation, divisor: f32) {
    let (rows, len) = (src.rows(), src.len());
    assert_eq!(output.len(), rows * len, "real output size");
    match orientation {
        Orientation::RowMajor => {
            izip!(src.iter(), output.chunks_exact_mut(len)).for_each(|(row, dst)| {
                izip!(row.iter(), dst.iter_mut()).for_each(|(s, x)| *x = s.re / divisor);
            });
        }
        Orientation::Transposed => {
            src.iter().enumerate().for_each(|(r, row)| {
                row.iter()
                    .enumerate()
                    .for_each(|(c, s)| output[c * rows + r] = s.re / divisor);
            });
        }
    }
}
