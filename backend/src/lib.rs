//! Accelerator contract for row-wise 1D transform engines and the transpose
//! engine that chains them.
//!
//! A [Backend] exposes opaque channel, engine and transpose handles. The
//! layouts in this crate ([Channel], [Engine], [Transpose]) own those handles
//! and hand them back to the backend when dropped, so every successfully
//! prepared instance is released exactly once on every exit path.

mod error;
pub mod implementation;
pub mod layouts;
mod oep;

pub use error::*;
pub use implementation::{
    cpu_ref::{ConfigError, CpuRef, CpuRefConfig},
    instrumented::{InstanceKind, Instrumented},
};
pub use layouts::*;
pub use oep::*;
