use crate::FftError;

// de Bruijn lookup for floor(log2(v)), indexed by (v * 0x07C4ACDD) >> 27 once
// every bit below the top one is set.
const TAB32: [u32; 32] = [
    0, 9, 1, 10, 13, 21, 2, 29, 11, 14, 16, 18, 22, 25, 3, 30, 8, 12, 20, 28, 15, 17, 24, 7, 19, 27, 23, 6, 26, 5, 4, 31,
];

/// Base-2 exponent of a power of two.
///
/// `value` must be a non-zero power of two; for any other non-zero input the
/// result is `floor(log2(value))`, and zero maps to zero.
#[inline]
pub fn log2_u32(value: u32) -> u32 {
    debug_assert!(value.is_power_of_two(), "{value} is not a power of two");
    let mut v: u32 = value;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    TAB32[(v.wrapping_mul(0x07C4_ACDD) >> 27) as usize]
}

/// Validated matrix shape: `rows` rows of `cols` samples.
///
/// `cols` is always a power of two. `rows` is a power of two for shapes built
/// with [Shape::new_2d]; a 1D batch ([Shape::new_1d]) accepts any non-zero
/// row count. In both cases the interleaved complex length `2 * rows * cols`
/// fits in a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    rows: usize,
    cols: usize,
    area: usize,
}

impl Shape {
    pub fn new_1d(rows: usize, cols: usize) -> Result<Self, FftError> {
        if rows == 0 || !is_pow2_u32(cols) {
            return Err(FftError::InvalidShape { rows, cols });
        }
        Self::with_area(rows, cols)
    }

    pub fn new_2d(rows: usize, cols: usize) -> Result<Self, FftError> {
        if !is_pow2_u32(rows) || !is_pow2_u32(cols) {
            return Err(FftError::InvalidShape { rows, cols });
        }
        Self::with_area(rows, cols)
    }

    fn with_area(rows: usize, cols: usize) -> Result<Self, FftError> {
        match rows.checked_mul(cols).filter(|area| area.checked_mul(2).is_some()) {
            Some(area) => Ok(Self { rows, cols, area }),
            None => Err(FftError::InvalidShape { rows, cols }),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    #[inline]
    pub fn area(&self) -> usize {
        self.area
    }

    /// Length of the interleaved complex host array.
    #[inline]
    pub fn complex_len(&self) -> usize {
        2 * self.area
    }

    #[inline]
    pub fn log2_cols(&self) -> u32 {
        log2_u32(self.cols as u32)
    }

    /// Only meaningful for 2D shapes.
    #[inline]
    pub fn log2_rows(&self) -> u32 {
        log2_u32(self.rows as u32)
    }
}

#[inline]
fn is_pow2_u32(x: usize) -> bool {
    x.is_power_of_two() && x <= (1 << 31)
}
