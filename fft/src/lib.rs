//! 1D and 2D discrete Fourier transforms driven through a row-transform
//! accelerator.
//!
//! A 2D transform of an `N x M` matrix runs as two 1D passes chained by an
//! accelerator-side transpose: `N` row transforms of length `M`, a transpose,
//! then `M` row transforms of length `N`. The last engine therefore holds the
//! spectrum in transposed orientation; the store step restores the original
//! `N`-row, `M`-column layout.
//!
//! Host arrays are row-major. Real arrays hold `x[r * cols + c]`, complex
//! arrays interleave `re = x[2 * (r * cols + c)]`, `im = x[2 * (r * cols + c) + 1]`.

mod dimension;
mod driver;
mod error;
mod marshal;
mod pipeline;

#[cfg(test)]
mod tests;

pub use backend::{AcceleratorError, Backend, CpuRef, CpuRefConfig, Direction, InstanceKind, Instrumented};
pub use dimension::*;
pub use driver::*;
pub use error::*;
pub use marshal::*;
pub use pipeline::*;
