use std::ops::Add;

use super::{BiasVector, WeightMatrix};

/// Per-layer partial derivatives of the cost, for one example or summed over
/// many. Shapes mirror the live parameters they were computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub weights: Vec<WeightMatrix>,
    pub biases: Vec<BiasVector>,
}

impl Gradient {
    /// An all-zero gradient shaped like the given parameters.
    pub fn zeros_like(weights: &[WeightMatrix], biases: &[BiasVector]) -> Self {
        Self {
            weights: weights.iter().map(WeightMatrix::zero).collect(),
            biases: biases.iter().map(BiasVector::zero).collect(),
        }
    }

    /// Adds `other` into `self`, layer by layer.
    pub fn accumulate(&mut self, other: &Gradient) {
        for (acc, w) in self.weights.iter_mut().zip(&other.weights) {
            acc.add_assign(w);
        }
        for (acc, b) in self.biases.iter_mut().zip(&other.biases) {
            acc.add_assign(b);
        }
    }

    pub fn layers(&self) -> usize {
        self.weights.len()
    }
}

impl Add for Gradient {
    type Output = Gradient;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.accumulate(&rhs);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Matrix;

    #[test]
    fn accumulate_sums_layerwise() {
        let w = vec![WeightMatrix::from_matrix(Matrix::from_data(vec![vec![1.0, 2.0]]))];
        let b = vec![BiasVector::from_vec(vec![3.0])];

        let mut acc = Gradient::zeros_like(&w, &b);
        let g = Gradient { weights: w, biases: b };
        acc.accumulate(&g);
        acc.accumulate(&g);

        assert_eq!(acc.weights[0].matrix.data, vec![vec![2.0, 4.0]]);
        assert_eq!(acc.biases[0].vector, vec![6.0]);
        assert_eq!((acc + g).biases[0].vector, vec![9.0]);
    }
}
