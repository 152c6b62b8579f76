use crate::error::{NnError, Result};

/// Index of the `n`-th layer transition counted from the end: `n = 1` is the
/// last transition, `n = total` the first.
pub fn layer_from_end(n: usize, total: usize) -> Result<usize> {
    if n == 0 || n > total {
        return Err(NnError::IndexOutOfRange {
            what: "layer from end",
            index: n,
            len: total,
        });
    }
    Ok(total - n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_back_from_the_last_layer() {
        assert_eq!(layer_from_end(1, 10).unwrap(), 9);
        assert_eq!(layer_from_end(10, 10).unwrap(), 0);
        assert_eq!(layer_from_end(9, 10).unwrap(), 1);
    }

    #[test]
    fn rejects_zero_and_overflow() {
        assert!(layer_from_end(0, 3).is_err());
        assert!(matches!(
            layer_from_end(4, 3),
            Err(NnError::IndexOutOfRange { index: 4, len: 3, .. })
        ));
    }
}
