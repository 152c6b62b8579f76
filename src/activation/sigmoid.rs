/// Logistic sigmoid, σ(z) = 1 / (1 + e^-z).
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// σ'(z) expressed through an activation that has already been squashed,
/// so σ is not evaluated a second time: σ'(z) = a·(1 − a) with a = σ(z).
pub fn sigmoid_prime_from_activation(a: f64) -> f64 {
    a * (1.0 - a)
}

/// Applies [`sigmoid`] to every entry.
pub fn activate(weighted_input: &[f64]) -> Vec<f64> {
    weighted_input.iter().map(|&z| sigmoid(z)).collect()
}

/// σ'(z) for every entry, reading `a = σ(z)` from `activation`.
pub fn activate_prime(activation: &[f64]) -> Vec<f64> {
    activation.iter().map(|&a| sigmoid_prime_from_activation(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_known_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.9999);
        assert!(sigmoid(-10.0) < 0.0001);
    }

    #[test]
    fn derivative_from_activation_matches_finite_difference() {
        let z = 0.3;
        let h = 1e-6;
        let numeric = (sigmoid(z + h) - sigmoid(z - h)) / (2.0 * h);
        let analytic = sigmoid_prime_from_activation(sigmoid(z));
        assert!((numeric - analytic).abs() < 1e-9);
    }
}
