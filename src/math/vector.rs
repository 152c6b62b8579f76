//! Elementwise helpers over dense vectors stored as plain slices.

pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "Vectors are of incorrect sizes");
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "Vectors are of incorrect sizes");
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Hadamard product.
pub fn hadamard(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "Vectors are of incorrect sizes");
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

/// `a += alpha * b` in place.
pub fn scaled_add(a: &mut [f64], alpha: f64, b: &[f64]) {
    assert_eq!(a.len(), b.len(), "Vectors are of incorrect sizes");
    for (x, y) in a.iter_mut().zip(b) {
        *x += alpha * y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementwise_ops() {
        assert_eq!(add(&[1.0, 2.0], &[3.0, 4.0]), vec![4.0, 6.0]);
        assert_eq!(sub(&[1.0, 2.0], &[3.0, 4.0]), vec![-2.0, -2.0]);
        assert_eq!(hadamard(&[1.0, 2.0], &[3.0, 4.0]), vec![3.0, 8.0]);

        let mut a = vec![1.0, 1.0];
        scaled_add(&mut a, 2.0, &[0.5, -1.0]);
        assert_eq!(a, vec![2.0, -1.0]);
    }
}
