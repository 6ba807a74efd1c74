use crate::layouts::Sample;

/// Read-only view over `rows` rows of `len` samples spaced `step` apart.
#[derive(Debug, Clone, Copy)]
pub struct RowsRef<'a> {
    data: &'a [Sample],
    len: usize,
    rows: usize,
    step: usize,
}

/// Mutable counterpart of [RowsRef].
#[derive(Debug)]
pub struct RowsMut<'a> {
    data: &'a mut [Sample],
    len: usize,
    rows: usize,
    step: usize,
}

impl<'a> RowsRef<'a> {
    pub fn new(data: &'a [Sample], len: usize, rows: usize, step: usize) -> Self {
        assert!(step >= len, "step={step} < len={len}");
        assert!(
            data.len() >= step * rows,
            "region of {} samples too small for {rows} rows of step {step}",
            data.len()
        );
        Self { data, len, rows, step }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn row(&self, r: usize) -> &'a [Sample] {
        assert!(r < self.rows, "row {r} out of {}", self.rows);
        let start: usize = r * self.step;
        &self.data[start..start + self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [Sample]> + 'a {
        let len: usize = self.len;
        self.data
            .chunks(self.step)
            .take(self.rows)
            .map(move |chunk| &chunk[..len])
    }
}

impl<'a> RowsMut<'a> {
    pub fn new(data: &'a mut [Sample], len: usize, rows: usize, step: usize) -> Self {
        assert!(step >= len, "step={step} < len={len}");
        assert!(
            data.len() >= step * rows,
            "region of {} samples too small for {rows} rows of step {step}",
            data.len()
        );
        Self { data, len, rows, step }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn row_mut(&mut self, r: usize) -> &mut [Sample] {
        assert!(r < self.rows, "row {r} out of {}", self.rows);
        let start: usize = r * self.step;
        &mut self.data[start..start + self.len]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut [Sample]> {
        let len: usize = self.len;
        self.data
            .chunks_mut(self.step)
            .take(self.rows)
            .map(move |chunk| &mut chunk[..len])
    }
}
