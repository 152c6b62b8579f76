//! Linearly separable stand-in for a digit dataset, for tests and for running
//! the trainer without MNIST files on disk.

use rand::{seq::index, Rng};

use super::LabeledData;

/// One sparse binary pattern per class: `active` of the `dim` pixels lit.
pub fn digit_prototypes<R: Rng + ?Sized>(
    n_classes: usize,
    dim: usize,
    active: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    (0..n_classes)
        .map(|_| {
            let mut pattern = vec![0.0; dim];
            for i in index::sample(rng, dim, active.min(dim)) {
                pattern[i] = 1.0;
            }
            pattern
        })
        .collect()
}

/// `count` examples cycling through the classes of `prototypes`. Each pixel
/// is replaced by uniform noise with probability `noise`.
pub fn synthetic_digits<R: Rng + ?Sized>(
    prototypes: &[Vec<f64>],
    count: usize,
    noise: f64,
    rng: &mut R,
) -> Vec<LabeledData> {
    let n_classes = prototypes.len();
    if n_classes == 0 {
        return Vec::new();
    }

    (0..count)
        .map(|i| {
            let class = i % n_classes;
            let input = prototypes[class]
                .iter()
                .map(|&px| if rng.gen_bool(noise) { rng.gen::<f64>() } else { px })
                .collect();
            LabeledData::with_class(input, class, n_classes)
        })
        .collect()
}
