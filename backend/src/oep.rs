use crate::{
    error::AcceleratorError,
    layouts::{Direction, Geometry, Sample},
};

/// # THIS TRAIT IS AN OPEN EXTENSION POINT
///
/// Contract consumed by the orchestration layer. Implementors own the actual
/// transform and transpose computation.
///
/// * Every handle returned by a `prepare_*`/`open_channel` call is passed back
///   exactly once to the matching `release_*`/`close_channel` call. The
///   layouts in [crate::layouts] guarantee this.
/// * `engine_input` and `engine_output` return regions of exactly
///   `geometry.step * geometry.rows` samples, row `r` starting at `r * step`.
/// * `execute_*` calls block until the accelerator reports completion.
/// * A transpose handle is only executed with the engines it was prepared for
///   and is released before either of them.
pub trait Backend: Sized + Send + Sync {
    type Channel: Send;
    type Engine: Send;
    type Transpose: Send;

    fn name(&self) -> &'static str;

    fn open_channel(&self) -> Result<Self::Channel, AcceleratorError>;
    fn close_channel(&self, channel: Self::Channel);

    /// Prepares an engine running `rows` transforms of length `2^log2_len`.
    fn prepare_engine(
        &self,
        channel: &Self::Channel,
        log2_len: u32,
        direction: Direction,
        rows: usize,
    ) -> Result<Self::Engine, AcceleratorError>;
    fn engine_geometry(&self, engine: &Self::Engine) -> Geometry;
    fn engine_input<'a>(&self, engine: &'a mut Self::Engine) -> &'a mut [Sample];
    fn engine_output<'a>(&self, engine: &'a Self::Engine) -> &'a [Sample];
    fn execute_engine(&self, engine: &mut Self::Engine);
    fn release_engine(&self, engine: Self::Engine);

    /// Binds a transpose moving `src`'s output matrix into `dst`'s input.
    /// Dimension compatibility has already been checked by the caller.
    fn prepare_transpose(
        &self,
        channel: &Self::Channel,
        src: &Self::Engine,
        dst: &Self::Engine,
    ) -> Result<Self::Transpose, AcceleratorError>;
    fn execute_transpose(&self, transpose: &mut Self::Transpose, src: &Self::Engine, dst: &mut Self::Engine);
    fn release_transpose(&self, transpose: Self::Transpose);
}
