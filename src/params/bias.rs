use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{NnError, Result};
use crate::math::vector;

/// The biases of one layer transition, one entry per output neuron.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasVector {
    pub vector: Vec<f64>,
}

impl BiasVector {
    /// Entries drawn independently from N(0, 1).
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        Self {
            vector: (0..size).map(|_| rng.sample::<f64, _>(StandardNormal)).collect(),
        }
    }

    pub fn from_vec(vector: Vec<f64>) -> Self {
        Self { vector }
    }

    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    pub fn zero(&self) -> Self {
        Self {
            vector: vec![0.0; self.vector.len()],
        }
    }

    /// Deep copy with entry `neuron` moved by `epsilon`.
    pub fn copy_with_neuron_perturbed(&self, epsilon: f64, neuron: usize) -> Result<Self> {
        if neuron >= self.len() {
            return Err(NnError::IndexOutOfRange {
                what: "neuron",
                index: neuron,
                len: self.len(),
            });
        }

        let mut copy = self.clone();
        copy.vector[neuron] += epsilon;
        Ok(copy)
    }

    pub fn add_assign(&mut self, other: &BiasVector) {
        vector::scaled_add(&mut self.vector, 1.0, &other.vector);
    }

    /// `self -= rate * gradient`.
    pub fn descend(&mut self, rate: f64, gradient: &BiasVector) {
        vector::scaled_add(&mut self.vector, -rate, &gradient.vector);
    }
}
