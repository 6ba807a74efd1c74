use rand_distr::{Distribution, Normal, Uniform};

use crate::source::Source;

/// Fill patterns for host test matrices.
pub enum Pattern {
    Uniform(Uniform<f32>),
    Normal(Normal<f32>),
    /// Every cell holds the same value.
    Constant(f32),
    /// Cell `i` holds `i + 1`, so every cell is distinct.
    Ramp,
}

impl Pattern {
    /// Uniform in `[min, max)`. Falls back to `Constant(min)` on an empty range.
    pub fn uniform(min: f32, max: f32) -> Self {
        match Uniform::new(min, max) {
            Ok(u) => Pattern::Uniform(u),
            Err(_) => Pattern::Constant(min),
        }
    }

    /// Gaussian with the given mean and deviation. Falls back to `Constant(mean)` if `std` is invalid.
    pub fn normal(mean: f32, std: f32) -> Self {
        match Normal::new(mean, std) {
            Ok(n) => Pattern::Normal(n),
            Err(_) => Pattern::Constant(mean),
        }
    }

    pub fn fill(&self, source: &mut Source, data: &mut [f32]) {
        match self {
            Pattern::Uniform(d) => data.iter_mut().for_each(|x| *x = d.sample(source)),
            Pattern::Normal(d) => data.iter_mut().for_each(|x| *x = d.sample(source)),
            Pattern::Constant(c) => data.fill(*c),
            Pattern::Ramp => data.iter_mut().enumerate().for_each(|(i, x)| *x = (i + 1) as f32),
        }
    }

    /// Allocates and fills a `rows x cols` row-major matrix.
    pub fn matrix(&self, source: &mut Source, rows: usize, cols: usize) -> Vec<f32> {
        let mut data: Vec<f32> = vec![0.0; rows * cols];
        self.fill(source, &mut data);
        data
    }
}
