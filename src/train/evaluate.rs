use crate::data::LabeledData;
use crate::error::Result;
use crate::network::NeuralNetwork;

/// Index of the maximum element in a slice; 0 for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Fraction of examples whose predicted argmax equals the label argmax.
pub fn success_rate(network: &NeuralNetwork, data: &[LabeledData]) -> Result<f64> {
    if data.is_empty() {
        return Ok(0.0);
    }

    let mut correct = 0usize;
    for example in data {
        let output = network.predict(&example.input)?;
        if argmax(&output) == argmax(&example.label) {
            correct += 1;
        }
    }

    Ok(correct as f64 / data.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_the_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
