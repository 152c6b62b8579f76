use rand::{seq::SliceRandom, Rng};

use crate::error::{NnError, Result};

/// Contiguous batches of `batch_size` items; the last one may be shorter.
pub fn split_batches<T>(items: &[T], batch_size: usize) -> Result<Vec<&[T]>> {
    if batch_size == 0 {
        return Err(NnError::InvalidConfiguration(
            "mini-batch size must be at least 1".to_owned(),
        ));
    }
    Ok(items.chunks(batch_size).collect())
}

/// Uniform in-place shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
