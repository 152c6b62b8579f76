/// One training example: an input vector and the target the network should
/// produce for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledData {
    pub input: Vec<f64>,
    pub label: Vec<f64>,
}

impl LabeledData {
    pub fn new(input: Vec<f64>, label: Vec<f64>) -> Self {
        Self { input, label }
    }

    /// Builds an example whose label is the one-hot encoding of `class`.
    pub fn with_class(input: Vec<f64>, class: usize, n_classes: usize) -> Self {
        Self {
            input,
            label: one_hot(class, n_classes),
        }
    }
}

/// A vector of `n_classes` zeros with a single `1.0` at `class`.
pub fn one_hot(class: usize, n_classes: usize) -> Vec<f64> {
    let mut v = vec![0.0; n_classes];
    if let Some(slot) = v.get_mut(class) {
        *slot = 1.0;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_encoding() {
        assert_eq!(one_hot(2, 4), vec![0.0, 0.0, 1.0, 0.0]);
        let d = LabeledData::with_class(vec![0.5], 0, 2);
        assert_eq!(d.label, vec![1.0, 0.0]);
    }
}
