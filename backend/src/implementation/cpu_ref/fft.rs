use std::f64::consts::PI;

use itertools::izip;

use crate::layouts::{Direction, Sample};

/// Precomputed twiddles and bit-reversal permutation for an in-place radix-2
/// transform of length `2^log2_len`.
///
/// Forward uses the kernel `exp(-2πi jk/n)`, inverse `exp(+2πi jk/n)`. Neither
/// direction is normalised.
pub struct FftTable {
    log2_len: u32,
    omg: Vec<Sample>,
    rev: Vec<usize>,
}

impl FftTable {
    pub fn new(log2_len: u32, direction: Direction) -> Self {
        let n: usize = 1 << log2_len;
        let sign: f64 = match direction {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        };
        let omg: Vec<Sample> = (0..n / 2)
            .map(|k| {
                let angle: f64 = sign * 2.0 * PI * (k as f64) / (n as f64);
                Sample::new(angle.cos() as f32, angle.sin() as f32)
            })
            .collect();
        let rev: Vec<usize> = (0..n).map(|i| rev_bits(i, log2_len)).collect();
        Self { log2_len, omg, rev }
    }

    #[inline]
    pub fn len(&self) -> usize {
        1 << self.log2_len
    }

    /// Transforms `data` in place. `data.len()` must equal the table length.
    pub fn execute(&self, data: &mut [Sample]) {
        let n: usize = self.len();
        assert_eq!(data.len(), n, "row of {} samples for a table of {n}", data.len());

        self.rev.iter().enumerate().for_each(|(i, &j)| {
            if i < j {
                data.swap(i, j);
            }
        });

        let mut half: usize = 1;
        while half < n {
            let stride: usize = n / (half << 1);
            data.chunks_exact_mut(half << 1).for_each(|block| {
                let (lo, hi) = block.split_at_mut(half);
                izip!(lo.iter_mut(), hi.iter_mut(), self.omg.iter().step_by(stride)).for_each(|(a, b, w)| {
                    cplx_twiddle(a, b, *w);
                });
            });
            half <<= 1;
        }
    }
}

#[inline(always)]
fn rev_bits(x: usize, bits: u32) -> usize {
    (x as u32).reverse_bits().checked_shr(u32::BITS - bits).unwrap_or(0) as usize
}

#[inline(always)]
fn cplx_twiddle(a: &mut Sample, b: &mut Sample, omg: Sample) {
    let dr: f32 = b.re * omg.re - b.im * omg.im;
    let di: f32 = b.re * omg.im + b.im * omg.re;
    b.re = a.re - dr;
    b.im = a.im - di;
    a.re += dr;
    a.im += di;
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::{FftTable, rev_bits};
    use crate::layouts::{Direction, Sample};

    fn naive_dft(x: &[Sample], sign: f64) -> Vec<Sample> {
        let n: usize = x.len();
        (0..n)
            .map(|k| {
                let (mut re, mut im) = (0f64, 0f64);
                x.iter().enumerate().for_each(|(j, s)| {
                    let a: f64 = sign * 2.0 * PI * ((j * k) % n) as f64 / n as f64;
                    re += s.re as f64 * a.cos() - s.im as f64 * a.sin();
                    im += s.re as f64 * a.sin() + s.im as f64 * a.cos();
                });
                Sample::new(re as f32, im as f32)
            })
            .collect()
    }

    #[test]
    fn rev_bits_small() {
        assert_eq!(rev_bits(0, 0), 0);
        assert_eq!(rev_bits(1, 1), 1);
        assert_eq!(rev_bits(1, 3), 4);
        assert_eq!(rev_bits(6, 3), 3);
    }

    #[test]
    fn matches_naive_dft() {
        for log2_len in 0..8u32 {
            let n: usize = 1 << log2_len;
            let x: Vec<Sample> = (0..n)
                .map(|i| Sample::new((i as f32 * 0.37).sin(), (i as f32 * 0.11).cos()))
                .collect();
            for (direction, sign) in [(Direction::Forward, -1.0), (Direction::Inverse, 1.0)] {
                let mut y: Vec<Sample> = x.clone();
                FftTable::new(log2_len, direction).execute(&mut y);
                let want: Vec<Sample> = naive_dft(&x, sign);
                y.iter().zip(want.iter()).for_each(|(a, b)| {
                    assert!(
                        (a.re - b.re).abs() < 1e-3 && (a.im - b.im).abs() < 1e-3,
                        "n={n} {direction:?}: {a:?} != {b:?}"
                    );
                });
            }
        }
    }

    #[test]
    fn impulse_gives_flat_spectrum() {
        let mut x: Vec<Sample> = vec![Sample::ZERO; 16];
        x[0] = Sample::new(1.0, 0.0);
        FftTable::new(4, Direction::Forward).execute(&mut x);
        assert!(x.iter().all(|s| (s.re - 1.0).abs() < 1e-6 && s.im.abs() < 1e-6));
    }
}
