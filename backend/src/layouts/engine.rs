use std::mem::ManuallyDrop;

use crate::{
    AcceleratorError, Backend,
    layouts::{Channel, Direction, Geometry, RowsMut, RowsRef},
};

/// Accelerator-resident engine running one 1D transform pass over the rows of
/// a matrix. Released on drop.
pub struct Engine<'a, B: Backend> {
    channel: &'a Channel<'a, B>,
    handle: ManuallyDrop<B::Engine>,
    geometry: Geometry,
    executed: bool,
}

impl<'a, B: Backend> Engine<'a, B> {
    /// Acquires an engine for `rows` transforms of length `2^log2_len`.
    /// Nothing is left allocated on failure.
    pub fn prepare(
        channel: &'a Channel<'a, B>,
        log2_len: u32,
        direction: Direction,
        rows: usize,
    ) -> Result<Self, AcceleratorError> {
        let backend: &B = channel.backend();
        let handle: B::Engine = backend.prepare_engine(channel.handle(), log2_len, direction, rows)?;
        let geometry: Geometry = backend.engine_geometry(&handle);
        debug_assert_eq!(geometry.log2_len, log2_len);
        debug_assert_eq!(geometry.rows, rows);
        debug_assert!(geometry.step >= geometry.len());
        tracing::debug!(
            backend = backend.name(),
            log2_len,
            rows,
            step = geometry.step,
            ?direction,
            "engine prepared"
        );
        Ok(Self {
            channel,
            handle: ManuallyDrop::new(handle),
            geometry,
            executed: false,
        })
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Strided view over the input region. Writing the input invalidates any
    /// previous output.
    pub fn input_rows(&mut self) -> RowsMut<'_> {
        self.executed = false;
        let g: Geometry = self.geometry;
        let data = self.channel.backend().engine_input(&mut self.handle);
        RowsMut::new(data, g.len(), g.rows, g.step)
    }

    /// Strided view over the output region, valid once [Engine::execute] returned.
    pub fn output_rows(&self) -> RowsRef<'_> {
        debug_assert!(self.executed, "engine output read before execute");
        let g: Geometry = self.geometry;
        let data = self.channel.backend().engine_output(&self.handle);
        RowsRef::new(data, g.len(), g.rows, g.step)
    }

    /// Runs the transform on every row. Blocks until the accelerator is done.
    pub fn execute(&mut self) {
        self.channel.backend().execute_engine(&mut self.handle);
        self.executed = true;
    }

    /// Releases the engine now. Equivalent to dropping it.
    pub fn release(self) {}

    pub(crate) fn handle(&self) -> &B::Engine {
        &self.handle
    }

    pub(crate) fn handle_mut(&mut self) -> &mut B::Engine {
        &mut self.handle
    }

    pub(crate) fn set_input_written(&mut self) {
        self.executed = false;
    }
}

impl<B: Backend> Drop for Engine<'_, B> {
    fn drop(&mut self) {
        // SAFETY: the handle is taken exactly once, here.
        let handle: B::Engine = unsafe { ManuallyDrop::take(&mut self.handle) };
        let backend: &B = self.channel.backend();
        backend.release_engine(handle);
        tracing::debug!(
            backend = backend.name(),
            log2_len = self.geometry.log2_len,
            rows = self.geometry.rows,
            "engine released"
        );
    }
}
