//! Wrapper backend counting acquisitions and releases per instance kind, with
//! optional failure injection at a chosen prepare call.

use std::sync::{Mutex, MutexGuard};

use utils::map::CountMap;

use crate::{
    AcceleratorError, Backend,
    layouts::{Direction, Geometry, Sample},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    Channel,
    Engine,
    Transpose,
}

#[derive(Default)]
struct Ledger {
    acquired: CountMap<InstanceKind>,
    released: CountMap<InstanceKind>,
    attempts: CountMap<InstanceKind>,
    fail_at: Vec<(InstanceKind, i64)>,
}

pub struct Instrumented<B: Backend> {
    inner: B,
    ledger: Mutex<Ledger>,
}

impl<B: Backend> Instrumented<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes the `nth` (0-based, counted from the last [Instrumented::reset])
    /// acquisition attempt of `kind` fail.
    pub fn fail_at(&self, kind: InstanceKind, nth: usize) -> &Self {
        self.ledger().fail_at.push((kind, nth as i64));
        self
    }

    /// Clears counters and pending failures.
    pub fn reset(&self) {
        *self.ledger() = Ledger::default();
    }

    pub fn acquired(&self, kind: InstanceKind) -> i64 {
        self.ledger().acquired.get(&kind)
    }

    pub fn released(&self, kind: InstanceKind) -> i64 {
        self.ledger().released.get(&kind)
    }

    /// Instances of `kind` acquired but not yet released.
    pub fn live(&self, kind: InstanceKind) -> i64 {
        let ledger = self.ledger();
        ledger.acquired.get(&kind) - ledger.released.get(&kind)
    }

    pub fn live_total(&self) -> i64 {
        let ledger = self.ledger();
        ledger.acquired.total() - ledger.released.total()
    }

    /// Counts the attempt and returns an injected error if one is scheduled for it.
    fn attempt(&self, kind: InstanceKind) -> Result<(), AcceleratorError> {
        let mut ledger = self.ledger();
        let nth: i64 = ledger.attempts.incr(kind) - 1;
        if ledger.fail_at.contains(&(kind, nth)) {
            tracing::debug!(?kind, nth, "injected acquisition failure");
            return Err(match kind {
                InstanceKind::Channel => AcceleratorError::ChannelUnavailable {
                    reason: format!("injected failure on channel open #{nth}"),
                },
                InstanceKind::Engine | InstanceKind::Transpose => AcceleratorError::ResourceExhausted {
                    requested_bytes: 0,
                    available_bytes: 0,
                },
            });
        }
        Ok(())
    }

    fn record<T>(&self, kind: InstanceKind, result: Result<T, AcceleratorError>) -> Result<T, AcceleratorError> {
        if result.is_ok() {
            self.ledger().acquired.incr(kind);
        }
        result
    }

    fn release(&self, kind: InstanceKind) {
        self.ledger().released.incr(kind);
    }
}

impl<B: Backend> Backend for Instrumented<B> {
    type Channel = B::Channel;
    type Engine = B::Engine;
    type Transpose = B::Transpose;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn open_channel(&self) -> Result<B::Channel, AcceleratorError> {
        self.attempt(InstanceKind::Channel)?;
        self.record(InstanceKind::Channel, self.inner.open_channel())
    }

    fn close_channel(&self, channel: B::Channel) {
        self.inner.close_channel(channel);
        self.release(InstanceKind::Channel);
    }

    fn prepare_engine(
        &self,
        channel: &B::Channel,
        log2_len: u32,
        direction: Direction,
        rows: usize,
    ) -> Result<B::Engine, AcceleratorError> {
        self.attempt(InstanceKind::Engine)?;
        self.record(
            InstanceKind::Engine,
            self.inner.prepare_engine(channel, log2_len, direction, rows),
        )
    }

    fn engine_geometry(&self, engine: &B::Engine) -> Geometry {
        self.inner.engine_geometry(engine)
    }

    fn engine_input<'a>(&self, engine: &'a mut B::Engine) -> &'a mut [Sample] {
        self.inner.engine_input(engine)
    }

    fn engine_output<'a>(&self, engine: &'a B::Engine) -> &'a [Sample] {
        self.inner.engine_output(engine)
    }

    fn execute_engine(&self, engine: &mut B::Engine) {
        self.inner.execute_engine(engine)
    }

    fn release_engine(&self, engine: B::Engine) {
        self.inner.release_engine(engine);
        self.release(InstanceKind::Engine);
    }

    fn prepare_transpose(
        &self,
        channel: &B::Channel,
        src: &B::Engine,
        dst: &B::Engine,
    ) -> Result<B::Transpose, AcceleratorError> {
        self.attempt(InstanceKind::Transpose)?;
        self.record(
            InstanceKind::Transpose,
            self.inner.prepare_transpose(channel, src, dst),
        )
    }

    fn execute_transpose(&self, transpose: &mut B::Transpose, src: &B::Engine, dst: &mut B::Engine) {
        self.inner.execute_transpose(transpose, src, dst)
    }

    fn release_transpose(&self, transpose: B::Transpose) {
        self.inner.release_transpose(transpose);
        self.release(InstanceKind::Transpose);
    }
}
