use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("row {row} holds {found} values, expected {expected}")]
pub struct RowWidthError {
    pub row: usize,
    pub found: usize,
    pub expected: usize,
}

/// Raw measurements of one run: one row per trial, one value per requested
/// metric column, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleMatrix {
    width: usize,
    rows: Vec<Vec<f64>>,
}

impl SampleMatrix {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(width: usize, rows: Vec<Vec<f64>>) -> Result<Self, RowWidthError> {
        let mut matrix = Self::with_capacity(width, rows.len());
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    pub fn with_capacity(width: usize, trials: usize) -> Self {
        Self {
            width,
            rows: Vec::with_capacity(trials),
        }
    }

    pub fn push_row(&mut self, row: Vec<f64>) -> Result<(), RowWidthError> {
        if row.len() != self.width {
            return Err(RowWidthError {
                row: self.rows.len(),
                found: row.len(),
                expected: self.width,
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Number of trials.
    pub fn trials(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one matrix column across all trials, in trial order.
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.width {
            return None;
        }
        Some(self.rows.iter().map(|row| row[index]).collect())
    }
}
