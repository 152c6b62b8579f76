use rand::Rng;

use crate::error::{NnError, Result};
use crate::math::Matrix;

/// The weights of one layer transition, shape `(output_size, input_size)`.
///
/// Row `neuron` holds the incoming weights of that neuron in the next layer;
/// column `prev_neuron` indexes the neuron of the previous layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    pub matrix: Matrix,
}

impl WeightMatrix {
    /// Entries drawn independently from N(0, 1).
    pub fn random<R: Rng + ?Sized>(output_size: usize, input_size: usize, rng: &mut R) -> Self {
        Self {
            matrix: Matrix::standard_normal(output_size, input_size, rng),
        }
    }

    pub fn from_matrix(matrix: Matrix) -> Self {
        Self { matrix }
    }

    pub fn output_size(&self) -> usize {
        self.matrix.rows
    }

    pub fn input_size(&self) -> usize {
        self.matrix.cols
    }

    /// Same shape, every entry `0.0`. Used to seed gradient accumulators.
    pub fn zero(&self) -> Self {
        Self {
            matrix: Matrix::zeros(self.matrix.rows, self.matrix.cols),
        }
    }

    /// Deep copy with the single entry at `(neuron, prev_neuron)` moved by `epsilon`.
    pub fn copy_with_neuron_perturbed(
        &self,
        epsilon: f64,
        neuron: usize,
        prev_neuron: usize,
    ) -> Result<Self> {
        if neuron >= self.output_size() {
            return Err(NnError::IndexOutOfRange {
                what: "neuron",
                index: neuron,
                len: self.output_size(),
            });
        }
        if prev_neuron >= self.input_size() {
            return Err(NnError::IndexOutOfRange {
                what: "previous layer neuron",
                index: prev_neuron,
                len: self.input_size(),
            });
        }

        let mut copy = self.clone();
        let entry = copy.matrix.get(neuron, prev_neuron);
        copy.matrix.set(neuron, prev_neuron, entry + epsilon);
        Ok(copy)
    }

    pub fn add_assign(&mut self, other: &WeightMatrix) {
        self.matrix += &other.matrix;
    }

    /// `self -= rate * gradient`.
    pub fn descend(&mut self, rate: f64, gradient: &WeightMatrix) {
        self.matrix.scaled_add(-rate, &gradient.matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample() -> WeightMatrix {
        WeightMatrix::random(3, 4, &mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn zero_keeps_shape_and_clears_entries() {
        let w = sample();
        let z = w.zero();
        assert_eq!(z.matrix.shape(), (3, 4));
        assert!(z.matrix.data.iter().flatten().all(|&x| x == 0.0));
    }

    #[test]
    fn copy_is_independent() {
        let w = sample();
        let mut c = w.clone();
        c.matrix.set(0, 0, 42.0);
        assert_ne!(w.matrix.get(0, 0), 42.0);
    }

    #[test]
    fn perturbation_touches_exactly_one_entry() {
        let w = sample();
        let p = w.copy_with_neuron_perturbed(0.25, 2, 1).unwrap();

        for row in 0..3 {
            for col in 0..4 {
                let (a, b) = (w.matrix.get(row, col), p.matrix.get(row, col));
                if (row, col) == (2, 1) {
                    assert_eq!(b, a + 0.25);
                } else {
                    assert_eq!(a.to_bits(), b.to_bits());
                }
            }
        }
    }

    #[test]
    fn perturbation_out_of_range() {
        let w = sample();
        assert!(matches!(
            w.copy_with_neuron_perturbed(0.1, 3, 0),
            Err(NnError::IndexOutOfRange { what: "neuron", index: 3, len: 3 })
        ));
        assert!(matches!(
            w.copy_with_neuron_perturbed(0.1, 0, 4),
            Err(NnError::IndexOutOfRange { index: 4, len: 4, .. })
        ));
    }
}
