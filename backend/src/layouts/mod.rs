mod channel;
mod engine;
mod rows;
mod transpose;

pub use channel::*;
pub use engine::*;
pub use rows::*;
pub use transpose::*;

/// Transform direction of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Complex sample with single precision real and imaginary parts.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub re: f32,
    pub im: f32,
}

impl Sample {
    pub const ZERO: Sample = Sample { re: 0.0, im: 0.0 };

    #[inline(always)]
    pub fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }
}

/// Shape of an engine's input and output regions.
///
/// Each region holds `rows` rows of `len = 2^log2_len` samples, row `r`
/// starting at sample `r * step`. `step >= len`; the difference is padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub log2_len: u32,
    pub rows: usize,
    pub step: usize,
    pub direction: Direction,
}

impl Geometry {
    #[inline]
    pub fn len(&self) -> usize {
        1 << self.log2_len
    }

    /// Samples in one region, padding included. `None` if it overflows `usize`.
    #[inline]
    pub fn region_len(&self) -> Option<usize> {
        self.step.checked_mul(self.rows)
    }

    /// Whether the output of `self` can be transposed into the input of `dst`.
    #[inline]
    pub fn transposes_into(&self, dst: &Geometry) -> bool {
        self.rows == dst.len() && self.len() == dst.rows
    }
}
