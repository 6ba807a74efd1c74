use std::f64::consts::PI;

use backend::{Backend, CpuRef, InstanceKind, Instrumented};
use sampling::{distributions::Pattern, source::Source};

use crate::{FftError, fft1d, fft1d_complex, fft2d, ifft1d, ifft2d, ifft2d_complex, status};

/// Reference 2D DFT in f64 of a real `rows x cols` matrix, interleaved output.
pub(crate) fn naive_dft2d(rows: usize, cols: usize, x: &[f32]) -> Vec<f64> {
    let mut out: Vec<f64> = vec![0.0; 2 * rows * cols];
    (0..rows).for_each(|u| {
        (0..cols).for_each(|v| {
            let (mut re, mut im) = (0f64, 0f64);
            (0..rows).for_each(|r| {
                (0..cols).for_each(|c| {
                    let a: f64 = -2.0 * PI * (((u * r) % rows) as f64 / rows as f64 + ((v * c) % cols) as f64 / cols as f64);
                    let xv: f64 = x[r * cols + c] as f64;
                    re += xv * a.cos();
                    im += xv * a.sin();
                })
            });
            out[2 * (u * cols + v)] = re;
            out[2 * (u * cols + v) + 1] = im;
        })
    });
    out
}

pub(crate) fn max_abs(x: &[f32]) -> f32 {
    x.iter().fold(0f32, |m, v| m.max(v.abs()))
}

pub(crate) fn assert_close(have: &[f32], want: &[f32], tol: f32, what: &str) {
    assert_eq!(have.len(), want.len(), "{what}: length");
    have.iter().zip(want.iter()).enumerate().for_each(|(i, (a, b))| {
        assert!((a - b).abs() <= tol, "{what}[{i}]: {a} != {b} (tol={tol})");
    });
}

pub fn test_fft2d_matches_dft<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([0u8; 32]);
    for (rows, cols) in [(2, 2), (2, 4), (4, 2), (8, 4), (4, 16), (16, 16)] {
        let x: Vec<f32> = Pattern::uniform(-1.0, 1.0).matrix(&mut source, rows, cols);
        let mut y: Vec<f32> = vec![0.0; 2 * rows * cols];
        fft2d(backend, rows, cols, &x, &mut y).unwrap();
        let want: Vec<f32> = naive_dft2d(rows, cols, &x).iter().map(|v| *v as f32).collect();
        let tol: f32 = 1e-5 * (rows * cols) as f32 + 1e-4;
        assert_close(&y, &want, tol, &format!("fft2d {rows}x{cols}"));
    }
}

pub fn test_roundtrip_2d<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([1u8; 32]);
    for (rows, cols) in [(2, 2), (2, 8), (8, 2), (4, 4), (32, 8), (64, 64)] {
        let x: Vec<f32> = Pattern::normal(0.0, 10.0).matrix(&mut source, rows, cols);
        let mut y: Vec<f32> = vec![0.0; 2 * rows * cols];
        let mut z: Vec<f32> = vec![0.0; rows * cols];
        fft2d(backend, rows, cols, &x, &mut y).unwrap();
        ifft2d(backend, rows, cols, &y, &mut z).unwrap();
        let tol: f32 = 1e-4 * max_abs(&x) + 1e-5;
        assert_close(&z, &x, tol, &format!("ifft2d(fft2d) {rows}x{cols}"));
    }
}

/// A 2x4 matrix with distinct cells comes back in its original orientation,
/// and the spectrum is not transposed either.
pub fn test_orientation_2x4<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([0u8; 32]);
    let (rows, cols) = (2, 4);
    let x: Vec<f32> = Pattern::Ramp.matrix(&mut source, rows, cols);

    let mut y: Vec<f32> = vec![0.0; 2 * rows * cols];
    fft2d(backend, rows, cols, &x, &mut y).unwrap();

    // DC = 36; row frequency 1: (1+2+3+4) - (5+6+7+8) = -16; column frequency 2: alternating sum over both rows = -4
    assert!((y[0] - 36.0).abs() < 1e-4 && y[1].abs() < 1e-4, "DC {} {}", y[0], y[1]);
    assert!((y[2 * (cols)] + 16.0).abs() < 1e-4, "(1,0) {}", y[2 * cols]);
    assert!((y[2 * 2] + 4.0).abs() < 1e-4, "(0,2) {}", y[4]);

    let mut z: Vec<f32> = vec![0.0; rows * cols];
    ifft2d(backend, rows, cols, &y, &mut z).unwrap();
    assert_close(&z, &x, 1e-5 * 8.0, "2x4 orientation");
}

/// All-ones input has a single DC component equal to the cell count, and
/// inverting that spectrum gives back ones, not a scaled copy.
pub fn test_normalization_all_ones<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([0u8; 32]);
    for n in [2usize, 4, 16] {
        let x: Vec<f32> = Pattern::Constant(1.0).matrix(&mut source, n, n);
        let mut y: Vec<f32> = vec![0.0; 2 * n * n];
        fft2d(backend, n, n, &x, &mut y).unwrap();
        assert!((y[0] - (n * n) as f32).abs() < 1e-4, "DC {}", y[0]);
        assert!(y[1..].iter().all(|v| v.abs() < 1e-4), "non-DC energy");

        let mut z: Vec<f32> = vec![0.0; n * n];
        ifft2d(backend, n, n, &y, &mut z).unwrap();
        assert_close(&z, &x, 1e-5, &format!("ones {n}x{n}"));
    }
}

pub fn test_fft1d_matches_dft<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([2u8; 32]);
    for (rows, width) in [(1, 2), (3, 8), (5, 32)] {
        let x: Vec<f32> = Pattern::uniform(-4.0, 4.0).matrix(&mut source, rows, width);
        let mut y: Vec<f32> = vec![0.0; 2 * rows * width];
        fft1d(backend, rows, width, &x, &mut y).unwrap();
        (0..rows).for_each(|r| {
            let want: Vec<f32> = naive_dft2d(1, width, &x[r * width..(r + 1) * width])
                .iter()
                .map(|v| *v as f32)
                .collect();
            let have: &[f32] = &y[2 * r * width..2 * (r + 1) * width];
            assert_close(have, &want, 1e-5 * 4.0 * width as f32 + 1e-4, &format!("fft1d row {r}"));
        });
    }
}

/// The inverse divides by the row width at load time, so a forward/inverse
/// pair is the identity.
pub fn test_roundtrip_1d<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([3u8; 32]);
    for (rows, width) in [(1, 2), (2, 4), (7, 64), (1, 1024)] {
        let x: Vec<f32> = Pattern::normal(1.0, 3.0).matrix(&mut source, rows, width);
        let mut y: Vec<f32> = vec![0.0; 2 * rows * width];
        let mut z: Vec<f32> = vec![0.0; rows * width];
        fft1d(backend, rows, width, &x, &mut y).unwrap();
        ifft1d(backend, rows, width, &y, &mut z).unwrap();
        assert_close(&z, &x, 1e-4 * max_abs(&x) + 1e-5, &format!("ifft1d(fft1d) {rows}x{width}"));
    }
}

/// fft2d equals fft1d over the rows followed by fft1d over the rows of the
/// transposed intermediate.
pub fn test_consistency_1d_2d<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([4u8; 32]);
    for (rows, cols) in [(2, 4), (4, 2), (8, 16)] {
        let x: Vec<f32> = Pattern::uniform(-1.0, 1.0).matrix(&mut source, rows, cols);

        let mut a: Vec<f32> = vec![0.0; 2 * rows * cols];
        fft1d(backend, rows, cols, &x, &mut a).unwrap();

        // host transpose: at[c][r] = a[r][c]
        let mut at: Vec<f32> = vec![0.0; 2 * rows * cols];
        (0..rows).for_each(|r| {
            (0..cols).for_each(|c| {
                at[2 * (c * rows + r)] = a[2 * (r * cols + c)];
                at[2 * (c * rows + r) + 1] = a[2 * (r * cols + c) + 1];
            })
        });

        let mut b: Vec<f32> = vec![0.0; 2 * rows * cols];
        fft1d_complex(backend, cols, rows, &at, &mut b).unwrap();

        let mut y: Vec<f32> = vec![0.0; 2 * rows * cols];
        fft2d(backend, rows, cols, &x, &mut y).unwrap();

        let tol: f32 = 1e-5 * (rows * cols) as f32 + 1e-4;
        (0..rows).for_each(|r| {
            (0..cols).for_each(|c| {
                let (yi, bi) = (2 * (r * cols + c), 2 * (c * rows + r));
                assert!(
                    (y[yi] - b[bi]).abs() <= tol && (y[yi + 1] - b[bi + 1]).abs() <= tol,
                    "{rows}x{cols} ({r},{c}): ({}, {}) != ({}, {})",
                    y[yi],
                    y[yi + 1],
                    b[bi],
                    b[bi + 1]
                );
            })
        });
    }
}

pub fn test_ifft2d_complex_keeps_imaginary<B: Backend>(backend: &B) {
    let mut source: Source = Source::new([5u8; 32]);
    let (rows, cols) = (4, 8);
    let x: Vec<f32> = Pattern::uniform(-2.0, 2.0).matrix(&mut source, rows, cols);
    let mut y: Vec<f32> = vec![0.0; 2 * rows * cols];
    fft2d(backend, rows, cols, &x, &mut y).unwrap();

    let mut z: Vec<f32> = vec![0.0; 2 * rows * cols];
    ifft2d_complex(backend, rows, cols, &y, &mut z).unwrap();
    (0..rows * cols).for_each(|i| {
        assert!((z[2 * i] - x[i]).abs() < 1e-4, "re[{i}] {} != {}", z[2 * i], x[i]);
        assert!(z[2 * i + 1].abs() < 1e-4, "im[{i}] {}", z[2 * i + 1]);
    });
}

pub fn test_invalid_input_leaves_output_untouched<B: Backend>(backend: &B) {
    let x: Vec<f32> = vec![1.0; 12];
    let mut y: Vec<f32> = vec![-7.0; 24];

    let r: Result<(), FftError> = fft2d(backend, 3, 4, &x, &mut y);
    assert_eq!(r, Err(FftError::InvalidShape { rows: 3, cols: 4 }));
    assert_eq!(status(&r), -2);

    let r: Result<(), FftError> = fft2d(backend, 2, 4, &x, &mut y);
    assert_eq!(
        r,
        Err(FftError::LengthMismatch {
            what: "input",
            expected: 8,
            actual: 12
        })
    );
    assert_eq!(status(&r), -7);

    let r: Result<(), FftError> = ifft1d(backend, 2, 4, &x, &mut y);
    assert!(matches!(r, Err(FftError::LengthMismatch { what: "input", .. })));

    let r: Result<(), FftError> = fft1d(backend, 3, 4, &x, &mut y[..23]);
    assert!(matches!(r, Err(FftError::LengthMismatch { what: "output", .. })));

    assert!(y.iter().all(|v| *v == -7.0));
}

/// Injects a failure at each acquisition of a 2D pipeline and checks every
/// instance acquired before it was released, the error surfaced, and the output
/// was not written.
pub fn test_cleanup_at_each_stage<B: Backend>(backend: &Instrumented<B>) {
    let (rows, cols) = (4, 8);
    let x: Vec<f32> = vec![1.0; rows * cols];

    // (failing kind, nth attempt, engines acquired before failing, expected status)
    let cases: [(InstanceKind, usize, i64, i32); 4] = [
        (InstanceKind::Channel, 0, 0, -1),
        (InstanceKind::Engine, 0, 0, -3),
        (InstanceKind::Engine, 1, 1, -3),
        (InstanceKind::Transpose, 0, 2, -3),
    ];

    for (kind, nth, engines, code) in cases {
        backend.reset();
        backend.fail_at(kind, nth);
        let mut y: Vec<f32> = vec![-7.0; 2 * rows * cols];
        let r: Result<(), FftError> = fft2d(backend, rows, cols, &x, &mut y);
        assert_eq!(status(&r), code, "{kind:?} #{nth}: {r:?}");

        assert_eq!(backend.acquired(InstanceKind::Engine), engines, "{kind:?} #{nth}");
        assert_eq!(backend.released(InstanceKind::Engine), engines, "{kind:?} #{nth}");
        assert_eq!(backend.acquired(InstanceKind::Transpose), 0, "{kind:?} #{nth}");
        assert_eq!(backend.released(InstanceKind::Transpose), 0, "{kind:?} #{nth}");
        assert_eq!(backend.live_total(), 0, "{kind:?} #{nth}: leaked instances");
        assert!(y.iter().all(|v| *v == -7.0), "{kind:?} #{nth}: output written");
    }

    backend.reset();
    let mut y: Vec<f32> = vec![0.0; 2 * rows * cols];
    fft2d(backend, rows, cols, &x, &mut y).unwrap();
    assert_eq!(backend.acquired(InstanceKind::Engine), 2);
    assert_eq!(backend.acquired(InstanceKind::Transpose), 1);
    assert_eq!(backend.acquired(InstanceKind::Channel), 1);
    assert_eq!(backend.live_total(), 0);
}

/// 1D entry points acquire exactly one engine and never a transpose.
pub fn test_1d_uses_single_engine<B: Backend>(backend: &Instrumented<B>) {
    backend.reset();
    let x: Vec<f32> = vec![0.5; 3 * 16];
    let mut y: Vec<f32> = vec![0.0; 2 * 3 * 16];
    let mut z: Vec<f32> = vec![0.0; 3 * 16];
    fft1d(backend, 3, 16, &x, &mut y).unwrap();
    ifft1d(backend, 3, 16, &y, &mut z).unwrap();
    assert_eq!(backend.acquired(InstanceKind::Engine), 2);
    assert_eq!(backend.acquired(InstanceKind::Transpose), 0);
    assert_eq!(backend.live_total(), 0);

    backend.reset();
    backend.fail_at(InstanceKind::Engine, 0);
    let r: Result<(), FftError> = fft1d(backend, 3, 16, &x, &mut y);
    assert_eq!(status(&r), -3);
    assert_eq!(backend.live_total(), 0);
}

/// The 1D inverse divides by the row width only, the 2D inverse by every cell.
pub fn test_normalization_points<B: Backend>(backend: &B) {
    let (rows, cols) = (2usize, 4usize);
    // unit DC term in row 0, everything else zero
    let mut spectrum: Vec<f32> = vec![0.0; 2 * rows * cols];
    spectrum[0] = 1.0;

    let mut z1: Vec<f32> = vec![0.0; rows * cols];
    ifft1d(backend, rows, cols, &spectrum, &mut z1).unwrap();
    let mut want1: Vec<f32> = vec![0.0; rows * cols];
    want1[..cols].fill(1.0 / cols as f32);
    assert_close(&z1, &want1, 1e-6, "ifft1d");

    let mut z2: Vec<f32> = vec![0.0; rows * cols];
    ifft2d(backend, rows, cols, &spectrum, &mut z2).unwrap();
    assert_close(&z2, &vec![1.0 / (rows * cols) as f32; rows * cols], 1e-6, "ifft2d");
}

/// Builds a fresh reference accelerator wrapped for accounting.
pub(crate) fn instrumented_cpu_ref() -> Instrumented<CpuRef> {
    Instrumented::new(CpuRef::default())
}
