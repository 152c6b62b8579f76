use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Dense row-major matrix of `f64`.
///
/// The shape is fixed when the matrix is built; every operation below either
/// returns a new matrix or mutates entries in place without reshaping.
#[derive(Debug, Clone, PartialEq)]
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

    /// Samples every entry independently from N(0, 1).
    pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| rng.sample::<f64, _>(StandardNormal)).collect())
            .collect();

        Matrix { rows, cols, data }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, Vec::len),
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_data(
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        )
    }

    /// `self · v`, with `v` read as a column vector of length `cols`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "Matrices are of incorrect sizes");

        self.data
            .iter()
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// `selfᵗ · v` without materialising the transpose; `v` has length `rows`.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.rows, v.len(), "Matrices are of incorrect sizes");

        let mut res = vec![0.0; self.cols];
        for (row, &scale) in self.data.iter().zip(v) {
            for (acc, w) in res.iter_mut().zip(row) {
                *acc += w * scale;
            }
        }

        res
    }

    /// Outer product `u · vᵗ`, shape `(u.len(), v.len())`.
    pub fn outer(u: &[f64], v: &[f64]) -> Matrix {
        Matrix {
            rows: u.len(),
            cols: v.len(),
            data: u
                .iter()
                .map(|&a| v.iter().map(|&b| a * b).collect())
                .collect(),
        }
    }

    /// `self += alpha * rhs`, entrywise.
    pub fn scaled_add(&mut self, alpha: f64, rhs: &Matrix) {
        assert_eq!(self.shape(), rhs.shape(), "Matrices are of incorrect sizes");

        for (row, rhs_row) in self.data.iter_mut().zip(&rhs.data) {
            for (x, y) in row.iter_mut().zip(rhs_row) {
                *x += alpha * y;
            }
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl AddAssign<&Matrix> for Matrix {
    fn add_assign(&mut self, rhs: &Matrix) {
        self.scaled_add(1.0, rhs);
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.data {
            let cells: Vec<String> = row.iter().map(|x| format!("{x:.4}")).collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn mul_vec_matches_hand_computation() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(m.mul_vec(&[1.0, 0.0, -1.0]), vec![-2.0, -2.0]);
        assert_eq!(m.transpose_mul_vec(&[1.0, 1.0]), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn outer_product_shape_and_entries() {
        let m = Matrix::outer(&[1.0, 2.0], &[3.0, 4.0, 5.0]);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 2), 10.0);
        assert_eq!(m.get(0, 0), 3.0);
    }

    #[test]
    fn scaled_add_and_add_assign() {
        let mut a = Matrix::from_data(vec![vec![1.0, 1.0]]);
        let b = Matrix::from_data(vec![vec![2.0, 4.0]]);
        a.scaled_add(-0.5, &b);
        assert_eq!(a.data, vec![vec![0.0, -1.0]]);
        a += &b;
        assert_eq!(a.data, vec![vec![2.0, 3.0]]);
        assert_eq!((a + b).data, vec![vec![4.0, 7.0]]);
    }

    #[test]
    fn standard_normal_is_reproducible_under_a_seed() {
        let a = Matrix::standard_normal(3, 4, &mut StdRng::seed_from_u64(7));
        let b = Matrix::standard_normal(3, 4, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.shape(), (3, 4));
    }

    #[test]
    #[should_panic(expected = "incorrect sizes")]
    fn mismatched_shapes_panic() {
        let mut a = Matrix::zeros(2, 2);
        a += &Matrix::zeros(2, 3);
    }
}
