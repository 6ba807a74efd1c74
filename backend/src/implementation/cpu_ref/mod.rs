//! Software reference accelerator.
//!
//! Mirrors the resource model of a memory-constrained transform accelerator:
//! engines own padded input/output regions charged against a fixed budget,
//! transposes carry a small control block, and only a limited number of
//! channels may be open at once.

mod config;
mod fft;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub use config::*;
pub use fft::*;

use crate::{
    AcceleratorError, Backend,
    layouts::{Direction, Geometry, Sample},
};

/// Bytes charged for each transpose instance.
pub const TRANSPOSE_CONTROL_BYTES: usize = 4096;

pub struct CpuRef {
    config: CpuRefConfig,
    open_channels: AtomicUsize,
    allocated_bytes: AtomicUsize,
    next_channel_id: AtomicU64,
}

pub struct CpuRefChannel {
    id: u64,
}

pub struct CpuRefEngine {
    channel_id: u64,
    geometry: Geometry,
    table: FftTable,
    input: Vec<Sample>,
    output: Vec<Sample>,
    bytes: usize,
}

pub struct CpuRefTranspose {
    channel_id: u64,
}

impl Default for CpuRef {
    fn default() -> Self {
        Self::with_valid_config(CpuRefConfig::default())
    }
}

impl CpuRef {
    /// Fails with [ConfigError::Invalid] unless `config` passes [CpuRefConfig::validate].
    pub fn new(config: CpuRefConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: CpuRefConfig) -> Self {
        Self {
            config,
            open_channels: AtomicUsize::new(0),
            allocated_bytes: AtomicUsize::new(0),
            next_channel_id: AtomicU64::new(0),
        }
    }

    /// Bytes currently held by live engines and transposes.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes.load(Ordering::Acquire)
    }

    pub fn open_channels(&self) -> usize {
        self.open_channels.load(Ordering::Acquire)
    }

    fn reserve(&self, bytes: usize) -> Result<(), AcceleratorError> {
        let budget: usize = self.config.memory_budget_bytes;
        self.allocated_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_add(bytes).filter(|total| *total <= budget)
            })
            .map(|_| ())
            .map_err(|current| AcceleratorError::ResourceExhausted {
                requested_bytes: bytes,
                available_bytes: budget.saturating_sub(current),
            })
    }

    fn unreserve(&self, bytes: usize) {
        self.allocated_bytes.fetch_sub(bytes, Ordering::AcqRel);
    }
}

impl Backend for CpuRef {
    type Channel = CpuRefChannel;
    type Engine = CpuRefEngine;
    type Transpose = CpuRefTranspose;

    fn name(&self) -> &'static str {
        "cpu-ref"
    }

    fn open_channel(&self) -> Result<CpuRefChannel, AcceleratorError> {
        let max: usize = self.config.max_channels;
        self.open_channels
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |open| (open < max).then_some(open + 1))
            .map_err(|open| AcceleratorError::ChannelUnavailable {
                reason: format!("{open} of {max} channels already open"),
            })?;
        Ok(CpuRefChannel {
            id: self.next_channel_id.fetch_add(1, Ordering::Relaxed),
        })
    }

    fn close_channel(&self, _channel: CpuRefChannel) {
        self.open_channels.fetch_sub(1, Ordering::AcqRel);
    }

    fn prepare_engine(
        &self,
        channel: &CpuRefChannel,
        log2_len: u32,
        direction: Direction,
        rows: usize,
    ) -> Result<CpuRefEngine, AcceleratorError> {
        self.config.check_log2(log2_len)?;
        let len: usize = 1 << log2_len;
        let geometry: Geometry = Geometry {
            log2_len,
            rows,
            step: self.config.step_for(len),
            direction,
        };
        let (region, bytes) = geometry
            .region_len()
            .and_then(|region| Some((region, region.checked_mul(2 * size_of::<Sample>())?)))
            .ok_or(AcceleratorError::ResourceExhausted {
                requested_bytes: usize::MAX,
                available_bytes: self.config.memory_budget_bytes.saturating_sub(self.allocated_bytes()),
            })?;
        self.reserve(bytes)?;
        Ok(CpuRefEngine {
            channel_id: channel.id,
            geometry,
            table: FftTable::new(log2_len, direction),
            input: vec![Sample::ZERO; region],
            output: vec![Sample::ZERO; region],
            bytes,
        })
    }

    fn engine_geometry(&self, engine: &CpuRefEngine) -> Geometry {
        engine.geometry
    }

    fn engine_input<'a>(&self, engine: &'a mut CpuRefEngine) -> &'a mut [Sample] {
        &mut engine.input
    }

    fn engine_output<'a>(&self, engine: &'a CpuRefEngine) -> &'a [Sample] {
        &engine.output
    }

    fn execute_engine(&self, engine: &mut CpuRefEngine) {
        let CpuRefEngine {
            geometry,
            table,
            input,
            output,
            ..
        } = engine;
        let len: usize = geometry.len();
        input
            .chunks_exact(geometry.step)
            .zip(output.chunks_exact_mut(geometry.step))
            .for_each(|(src, dst)| {
                let row: &mut [Sample] = &mut dst[..len];
                row.copy_from_slice(&src[..len]);
                table.execute(row);
            });
    }

    fn release_engine(&self, engine: CpuRefEngine) {
        self.unreserve(engine.bytes);
    }

    fn prepare_transpose(
        &self,
        channel: &CpuRefChannel,
        src: &CpuRefEngine,
        dst: &CpuRefEngine,
    ) -> Result<CpuRefTranspose, AcceleratorError> {
        debug_assert_eq!(src.channel_id, channel.id, "source engine bound to another channel");
        debug_assert_eq!(dst.channel_id, channel.id, "destination engine bound to another channel");
        self.reserve(TRANSPOSE_CONTROL_BYTES)?;
        Ok(CpuRefTranspose { channel_id: channel.id })
    }

    fn execute_transpose(&self, transpose: &mut CpuRefTranspose, src: &CpuRefEngine, dst: &mut CpuRefEngine) {
        debug_assert_eq!(src.channel_id, transpose.channel_id);
        debug_assert_eq!(dst.channel_id, transpose.channel_id);
        let (gs, gd) = (src.geometry, dst.geometry);
        let len: usize = gs.len();
        src.output
            .chunks_exact(gs.step)
            .take(gs.rows)
            .enumerate()
            .for_each(|(r, row)| {
                row[..len]
                    .iter()
                    .enumerate()
                    .for_each(|(c, s)| dst.input[c * gd.step + r] = *s);
            });
    }

    fn release_transpose(&self, _transpose: CpuRefTranspose) {
        self.unreserve(TRANSPOSE_CONTROL_BYTES);
    }
}
