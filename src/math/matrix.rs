use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{check_labels, Error, Result};

/// Dense row-major matrix of `f64`.
///
/// Bias vectors are stored as `1 × n` row matrices so they can be broadcast
/// over a batch with [`Matrix::add_row`]. Every operation that depends on the
/// shapes of two operands returns [`Error::ShapeMismatch`] instead of
/// panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from rows of equal length. An empty `data` gives a
    /// `0 × 0` matrix.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(Error::ShapeMismatch {
                op: "from_data",
                left: (i, row.len()),
                right: (0, cols),
            });
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data,
        })
    }

    /// A `1 × n` matrix holding `values`.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values],
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Both uniforms lie in (0, 1] so ln() never sees zero.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Independent draws from N(0, 1), each multiplied by `std`.
    pub fn randn<R: Rng + ?Sized>(rows: usize, cols: usize, std: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = Matrix::sample_standard_normal(rng) * std;
            }
        }
        res
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(self.mismatch("matmul", rhs));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for (out_row, lhs_row) in res.data.iter_mut().zip(self.data.iter()) {
            for (k, &a) in lhs_row.iter().enumerate() {
                for (out, &b) in out_row.iter_mut().zip(rhs.data[k].iter()) {
                    *out += a * b;
                }
            }
        }

        Ok(res)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Adds the `1 × cols` row vector `row` to every row of `self`.
    pub fn add_row(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(self.mismatch("add_row", row));
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|r| r.iter().zip(bias.iter()).map(|(a, b)| a + b).collect())
                .collect(),
        })
    }

    /// `self += alpha * rhs`, in place.
    pub fn add_scaled_assign(&mut self, rhs: &Matrix, alpha: f64) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch("add_scaled_assign", rhs));
        }
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, &r) in row.iter_mut().zip(rhs_row.iter()) {
                *x += alpha * r;
            }
        }
        Ok(())
    }

    /// Subtracts `col[i]` from every entry of row `i`.
    pub fn sub_col(&self, col: &[f64]) -> Result<Matrix> {
        self.zip_col("sub_col", col, |x, c| x - c)
    }

    /// Divides every entry of row `i` by `col[i]`.
    pub fn div_col(&self, col: &[f64]) -> Result<Matrix> {
        self.zip_col("div_col", col, |x, c| x / c)
    }

    /// `n × num_classes` indicator matrix with a single 1 per row at the label.
    pub fn one_hot(labels: &[usize], num_classes: usize) -> Result<Matrix> {
        check_labels(labels, num_classes)?;
        let mut res = Matrix::zeros(labels.len(), num_classes);
        for (row, &label) in res.data.iter_mut().zip(labels.iter()) {
            row[label] = 1.0;
        }
        Ok(res)
    }

    /// Sums over the row axis, giving a `1 × cols` row vector.
    pub fn column_sums(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (s, &x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        Matrix::row_vector(sums)
    }

    /// Largest entry of each row. Rows of a zero-column matrix give `-inf`.
    pub fn row_max(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.data.iter().map(|row| row.iter().sum()).collect()
    }

    /// Index of the largest entry of each row; ties go to the lowest index.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data
            .iter()
            .map(|row| {
                let mut best = 0;
                for (j, &x) in row.iter().enumerate() {
                    if x > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    /// Sum of squared entries.
    pub fn sum_squares(&self) -> f64 {
        self.data.iter().flatten().map(|x| x * x).sum()
    }

    /// New matrix made of the rows at `indices`, in that order.
    /// Callers guarantee every index is below `self.rows`.
    pub(crate) fn select_rows(&self, indices: &[usize]) -> Matrix {
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data: indices.iter().map(|&i| self.data[i].clone()).collect(),
        }
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(a, b)| a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect())
                .collect(),
        })
    }

    fn zip_col<F>(&self, op: &'static str, col: &[f64], f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if col.len() != self.rows {
            return Err(Error::ShapeMismatch {
                op,
                left: self.shape(),
                right: (col.len(), 1),
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(col.iter())
                .map(|(row, &c)| row.iter().map(|&x| f(x, c)).collect())
                .collect(),
        })
    }

    fn mismatch(&self, op: &'static str, rhs: &Matrix) -> Error {
        Error::ShapeMismatch {
            op,
            left: self.shape(),
            right: rhs.shape(),
        }
    }
}
