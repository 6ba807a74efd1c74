use backend::{AcceleratorError, Backend, Channel, Direction, Engine, Transpose};

use crate::Shape;

/// Progress of one transform invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    ChannelOpen,
    Stage1Prepared,
    Stage2Prepared,
    TransposePrepared,
    DataLoaded,
    Executed,
    DataStored,
    Released,
}

#[inline]
pub(crate) fn enter(state: DriverState) {
    tracing::debug!(?state, "transform state");
}

/// Engines and transpose acquired for one transform invocation.
///
/// Instances are held as a stack. Dropping the pipeline, including when an
/// acquisition fails partway through [Pipeline::two_pass], releases the
/// transpose first and then pops the engines in reverse acquisition order.
pub struct Pipeline<'a, B: Backend> {
    channel: &'a Channel<'a, B>,
    stages: Vec<Engine<'a, B>>,
    transpose: Option<Transpose<'a, B>>,
}

impl<'a, B: Backend> Pipeline<'a, B> {
    fn empty(channel: &'a Channel<'a, B>) -> Self {
        Self {
            channel,
            stages: Vec::with_capacity(2),
            transpose: None,
        }
    }

    /// One engine running `rows` transforms of length `2^log2_len`.
    pub fn single(
        channel: &'a Channel<'a, B>,
        log2_len: u32,
        direction: Direction,
        rows: usize,
    ) -> Result<Self, AcceleratorError> {
        let mut pipeline: Self = Self::empty(channel);
        pipeline.push_engine(log2_len, direction, rows)?;
        enter(DriverState::Stage1Prepared);
        Ok(pipeline)
    }

    /// Row pass over `shape`, transpose, then row pass over the transposed matrix.
    pub fn two_pass(channel: &'a Channel<'a, B>, shape: Shape, direction: Direction) -> Result<Self, AcceleratorError> {
        let mut pipeline: Self = Self::empty(channel);
        pipeline.push_engine(shape.log2_cols(), direction, shape.rows())?;
        enter(DriverState::Stage1Prepared);
        pipeline.push_engine(shape.log2_rows(), direction, shape.cols())?;
        enter(DriverState::Stage2Prepared);
        pipeline.bind_transpose()?;
        enter(DriverState::TransposePrepared);
        Ok(pipeline)
    }

    fn push_engine(&mut self, log2_len: u32, direction: Direction, rows: usize) -> Result<(), AcceleratorError> {
        match Engine::prepare(self.channel, log2_len, direction, rows) {
            Ok(engine) => {
                self.stages.push(engine);
                Ok(())
            }
            Err(e) => {
                self.unwinding("engine", &e);
                Err(e)
            }
        }
    }

    fn bind_transpose(&mut self) -> Result<(), AcceleratorError> {
        debug_assert!(self.transpose.is_none());
        let [src, dst] = self.stages.as_slice() else {
            unreachable!("transpose bound with {} stages", self.stages.len())
        };
        match Transpose::prepare(self.channel, src, dst) {
            Ok(t) => {
                self.transpose = Some(t);
                Ok(())
            }
            Err(e) => {
                self.unwinding("transpose", &e);
                Err(e)
            }
        }
    }

    fn unwinding(&self, what: &str, err: &AcceleratorError) {
        tracing::warn!(
            stage = self.stages.len() + 1,
            held = self.held(),
            "{what} acquisition failed, releasing earlier stages: {err}"
        );
    }

    /// Instances currently held.
    pub fn held(&self) -> usize {
        self.stages.len() + usize::from(self.transpose.is_some())
    }

    /// Number of engine passes.
    pub fn passes(&self) -> usize {
        self.stages.len()
    }

    /// Engine receiving host input.
    pub fn first_mut(&mut self) -> &mut Engine<'a, B> {
        &mut self.stages[0]
    }

    /// Engine whose output holds the result.
    pub fn last(&self) -> &Engine<'a, B> {
        &self.stages[self.stages.len() - 1]
    }

    /// Runs the first pass, then the transpose and the second pass if present.
    pub fn execute(&mut self) {
        let Some((first, rest)) = self.stages.split_first_mut() else {
            return;
        };
        first.execute();
        if let (Some(transpose), Some(second)) = (self.transpose.as_mut(), rest.first_mut()) {
            transpose.execute(first, second);
            second.execute();
        }
    }

    /// Releases every instance now. Equivalent to dropping the pipeline.
    pub fn release(self) {}
}

impl<B: Backend> Drop for Pipeline<'_, B> {
    fn drop(&mut self) {
        if let Some(transpose) = self.transpose.take() {
            transpose.release();
        }
        while let Some(engine) = self.stages.pop() {
            engine.release();
        }
    }
}
