//! Transform entry points.
//!
//! Every call opens its own channel, acquires its engines, loads the host
//! input, executes, stores the result and releases everything, in that order.
//! Host buffers are validated before the channel is opened. On error the
//! output buffer is left untouched.

use backend::{Backend, Channel, Direction, RowsMut, RowsRef};

use crate::{
    FftError, Orientation, Pipeline, Shape,
    marshal::{load_complex, load_real, store_complex, store_real},
    pipeline::{DriverState, enter},
};

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), FftError> {
    if expected != actual {
        return Err(FftError::LengthMismatch { what, expected, actual });
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Passes {
    One,
    Two,
}

fn run<B, L, S>(backend: &B, shape: Shape, passes: Passes, direction: Direction, load: L, store: S) -> Result<(), FftError>
where
    B: Backend,
    L: FnOnce(&mut RowsMut<'_>),
    S: FnOnce(RowsRef<'_>),
{
    enter(DriverState::Idle);
    let channel: Channel<'_, B> = Channel::open(backend)?;
    enter(DriverState::ChannelOpen);

    let mut pipeline: Pipeline<'_, B> = match passes {
        Passes::One => Pipeline::single(&channel, shape.log2_cols(), direction, shape.rows())?,
        Passes::Two => Pipeline::two_pass(&channel, shape, direction)?,
    };

    load(&mut pipeline.first_mut().input_rows());
    enter(DriverState::DataLoaded);

    pipeline.execute();
    enter(DriverState::Executed);

    store(pipeline.last().output_rows());
    enter(DriverState::DataStored);

    pipeline.release();
    channel.close();
    enter(DriverState::Released);
    Ok(())
}

/// Forward transform of each row of a real `rows x width` matrix.
///
/// `input` holds `rows * width` reals, `output` receives `rows * width`
/// interleaved complex values. `width` must be a power of two.
pub fn fft1d<B: Backend>(backend: &B, rows: usize, width: usize, input: &[f32], output: &mut [f32]) -> Result<(), FftError> {
    let shape: Shape = Shape::new_1d(rows, width)?;
    check_len("input", shape.area(), input.len())?;
    check_len("output", shape.complex_len(), output.len())?;
    tracing::debug!(rows, width, "fft1d");
    run(
        backend,
        shape,
        Passes::One,
        Direction::Forward,
        |dst| load_real(dst, input),
        |src| store_complex(src, output, Orientation::RowMajor, 1.0),
    )
}

/// Forward transform of each row of an interleaved complex `rows x width` matrix.
pub fn fft1d_complex<B: Backend>(
    backend: &B,
    rows: usize,
    width: usize,
    input: &[f32],
    output: &mut [f32],
) -> Result<(), FftError> {
    let shape: Shape = Shape::new_1d(rows, width)?;
    check_len("input", shape.complex_len(), input.len())?;
    check_len("output", shape.complex_len(), output.len())?;
    tracing::debug!(rows, width, "fft1d_complex");
    run(
        backend,
        shape,
        Passes::One,
        Direction::Forward,
        |dst| load_complex(dst, input, 1.0),
        |src| store_complex(src, output, Orientation::RowMajor, 1.0),
    )
}

/// Inverse transform of each row of an interleaved complex `rows x width`
/// matrix, keeping the real part.
///
/// The input is divided by `width` as it is loaded, so `ifft1d(fft1d(x)) == x`.
pub fn ifft1d<B: Backend>(backend: &B, rows: usize, width: usize, input: &[f32], output: &mut [f32]) -> Result<(), FftError> {
    let shape: Shape = Shape::new_1d(rows, width)?;
    check_len("input", shape.complex_len(), input.len())?;
    check_len("output", shape.area(), output.len())?;
    tracing::debug!(rows, width, "ifft1d");
    let divisor: f32 = width as f32;
    run(
        backend,
        shape,
        Passes::One,
        Direction::Inverse,
        |dst| load_complex(dst, input, divisor),
        |src| store_real(src, output, Orientation::RowMajor, 1.0),
    )
}

/// 2D forward transform of a real `rows x cols` matrix into `rows * cols`
/// interleaved complex values, in the input's orientation.
pub fn fft2d<B: Backend>(backend: &B, rows: usize, cols: usize, input: &[f32], output: &mut [f32]) -> Result<(), FftError> {
    let shape: Shape = Shape::new_2d(rows, cols)?;
    check_len("input", shape.area(), input.len())?;
    check_len("output", shape.complex_len(), output.len())?;
    tracing::debug!(rows, cols, "fft2d");
    run(
        backend,
        shape,
        Passes::Two,
        Direction::Forward,
        |dst| load_real(dst, input),
        |src| store_complex(src, output, Orientation::Transposed, 1.0),
    )
}

/// 2D inverse transform of an interleaved complex `rows x cols` matrix,
/// keeping the real part.
///
/// Normalised by `rows * cols` when the result is stored, so
/// `ifft2d(fft2d(x)) == x`.
pub fn ifft2d<B: Backend>(backend: &B, rows: usize, cols: usize, input: &[f32], output: &mut [f32]) -> Result<(), FftError> {
    let shape: Shape = Shape::new_2d(rows, cols)?;
    check_len("input", shape.complex_len(), input.len())?;
    check_len("output", shape.area(), output.len())?;
    tracing::debug!(rows, cols, "ifft2d");
    let divisor: f32 = shape.area() as f32;
    run(
        backend,
        shape,
        Passes::Two,
        Direction::Inverse,
        |dst| load_complex(dst, input, 1.0),
        |src| store_real(src, output, Orientation::Transposed, divisor),
    )
}

/// Like [ifft2d] but keeps both parts of the result.
pub fn ifft2d_complex<B: Backend>(
    backend: &B,
    rows: usize,
    cols: usize,
    input: &[f32],
    output: &mut [f32],
) -> Result<(), FftError> {
    let shape: Shape = Shape::new_2d(rows, cols)?;
    check_len("input", shape.complex_len(), input.len())?;
    check_len("output", shape.complex_len(), output.len())?;
    tracing::debug!(rows, cols, "ifft2d_complex");
    let divisor: f32 = shape.area() as f32;
    run(
        backend,
        shape,
        Passes::Two,
        Direction::Inverse,
        |dst| load_complex(dst, input, 1.0),
        |src| store_complex(src, output, Orientation::Transposed, divisor),
    )
}

/// [fft2d] of an `n x n` matrix.
pub fn fft2d_square<B: Backend>(backend: &B, n: usize, input: &[f32], output: &mut [f32]) -> Result<(), FftError> {
    fft2d(backend, n, n, input, output)
}

/// [ifft2d] of an `n x n` matrix.
pub fn ifft2d_square<B: Backend>(backend: &B, n: usize, input: &[f32], output: &mut [f32]) -> Result<(), FftError> {
    ifft2d(backend, n, n, input, output)
}
