use std::mem::ManuallyDrop;

use crate::{
    AcceleratorError, Backend,
    layouts::{Channel, Engine, Geometry},
};

/// Accelerator-resident transpose moving the output matrix of one engine into
/// the input region of another. Released on drop.
///
/// A transpose must be dropped before the engines it was prepared for.
pub struct Transpose<'a, B: Backend> {
    channel: &'a Channel<'a, B>,
    handle: ManuallyDrop<B::Transpose>,
    src: Geometry,
    dst: Geometry,
}

impl<'a, B: Backend> Transpose<'a, B> {
    /// Binds a transpose from `src`'s output to `dst`'s input.
    ///
    /// Fails with [AcceleratorError::DimensionMismatch] unless
    /// `src.rows == dst.len` and `src.len == dst.rows`.
    pub fn prepare(channel: &'a Channel<'a, B>, src: &Engine<'a, B>, dst: &Engine<'a, B>) -> Result<Self, AcceleratorError> {
        let (gs, gd) = (src.geometry(), dst.geometry());
        if !gs.transposes_into(&gd) {
            return Err(AcceleratorError::DimensionMismatch {
                src_rows: gs.rows,
                src_len: gs.len(),
                dst_rows: gd.rows,
                dst_len: gd.len(),
            });
        }
        let backend: &B = channel.backend();
        let handle: B::Transpose = backend.prepare_transpose(channel.handle(), src.handle(), dst.handle())?;
        tracing::debug!(
            backend = backend.name(),
            src_rows = gs.rows,
            src_len = gs.len(),
            "transpose prepared"
        );
        Ok(Self {
            channel,
            handle: ManuallyDrop::new(handle),
            src: gs,
            dst: gd,
        })
    }

    /// Transposes `src`'s output into `dst`'s input. Blocks until done.
    pub fn execute(&mut self, src: &Engine<'a, B>, dst: &mut Engine<'a, B>) {
        debug_assert_eq!(src.geometry(), self.src, "transpose executed with a foreign source");
        debug_assert_eq!(dst.geometry(), self.dst, "transpose executed with a foreign destination");
        debug_assert!(src.is_executed(), "transpose of an engine that has not run");
        self.channel
            .backend()
            .execute_transpose(&mut self.handle, src.handle(), dst.handle_mut());
        dst.set_input_written();
    }

    /// Releases the transpose now. Equivalent to dropping it.
    pub fn release(self) {}
}

impl<B: Backend> Drop for Transpose<'_, B> {
    fn drop(&mut self) {
        // SAFETY: the handle is taken exactly once, here.
        let handle: B::Transpose = unsafe { ManuallyDrop::take(&mut self.handle) };
        let backend: &B = self.channel.backend();
        backend.release_transpose(handle);
        tracing::debug!(backend = backend.name(), "transpose released");
    }
}
