use log::debug;

use super::Trace;
use crate::data::LabeledData;
use crate::error::{NnError, Result};
use crate::math::Matrix;
use crate::network::NeuralNetwork;
use crate::params::{BiasVector, WeightMatrix};

pub const DEFAULT_EPSILON: f64 = 1e-4;
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Quadratic cost of one prediction: ½·Σ(label − prediction)².
pub fn cost(prediction: &[f64], label: &[f64]) -> f64 {
    0.5 * prediction
        .iter()
        .zip(label)
        .map(|(p, y)| (y - p).powi(2))
        .sum::<f64>()
}

/// `true` iff `a == b` exactly or they are at most `delta` apart.
pub fn compare(a: f64, b: f64, delta: f64) -> bool {
    a == b || (a - b).abs() <= delta
}

/// Finite-difference oracle for the analytic gradients of one layer.
///
/// Every weight and bias of the layer is nudged by `±epsilon` on a private
/// copy of the network, so checking one layer costs two forward passes per
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientChecker {
    pub epsilon: f64,
    pub tolerance: f64,
}

impl Default for GradientChecker {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GradientChecker {
    /// `epsilon` must be finite and positive. A `tolerance` of `0.0` accepts
    /// exact matches only.
    pub fn new(epsilon: f64, tolerance: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(NnError::InvalidConfiguration(format!(
                "finite-difference epsilon must be finite and positive, got {epsilon}"
            )));
        }
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(NnError::InvalidConfiguration(format!(
                "gradient check tolerance must be non-negative, got {tolerance}"
            )));
        }
        Ok(Self { epsilon, tolerance })
    }

    /// Central-difference estimate of the weight and bias gradients of
    /// transition `layer` for a single example.
    pub fn numeric_gradient(
        &self,
        network: &NeuralNetwork,
        layer: usize,
        data: &LabeledData,
    ) -> Result<(WeightMatrix, BiasVector)> {
        let eps = self.epsilon;
        let estimate = |plus: &NeuralNetwork, minus: &NeuralNetwork| -> Result<f64> {
            let c_plus = cost(&plus.predict(&data.input)?, &data.label);
            let c_minus = cost(&minus.predict(&data.input)?, &data.label);
            Ok((c_plus - c_minus) / (2.0 * eps))
        };

        let weights = network.weights().get(layer).ok_or(NnError::IndexOutOfRange {
            what: "layer",
            index: layer,
            len: network.weights().len(),
        })?;
        let mut weight_grad = weights.zero();
        for neuron in 0..weights.output_size() {
            for prev_neuron in 0..weights.input_size() {
                let plus = network.copy_with_weight_perturbed(eps, layer, neuron, prev_neuron)?;
                let minus = network.copy_with_weight_perturbed(-eps, layer, neuron, prev_neuron)?;
                weight_grad.matrix.set(neuron, prev_neuron, estimate(&plus, &minus)?);
            }
        }

        let mut bias_grad = network.biases()[layer].zero();
        for neuron in 0..bias_grad.len() {
            let plus = network.copy_with_bias_perturbed(eps, layer, neuron)?;
            let minus = network.copy_with_bias_perturbed(-eps, layer, neuron)?;
            bias_grad.vector[neuron] = estimate(&plus, &minus)?;
        }

        Ok((weight_grad, bias_grad))
    }

    /// Fails with [`NnError::GradientCheckFailure`] on the first entry where
    /// the analytic gradient strays from the numeric estimate.
    pub fn check_layer(
        &self,
        network: &NeuralNetwork,
        layer: usize,
        data: &LabeledData,
        analytic_weights: &WeightMatrix,
        analytic_biases: &BiasVector,
        trace: &Trace,
    ) -> Result<()> {
        let (numeric_weights, numeric_biases) = self.numeric_gradient(network, layer, data)?;

        self.check_close_enough(
            layer,
            &numeric_weights.matrix,
            &analytic_weights.matrix,
            &trace.with("weights"),
        )?;
        self.check_close_enough(
            layer,
            &as_column(&numeric_biases),
            &as_column(analytic_biases),
            &trace.with("biases"),
        )?;

        debug!("gradient check passed: {trace}");
        Ok(())
    }

    fn check_close_enough(
        &self,
        layer: usize,
        expected: &Matrix,
        actual: &Matrix,
        trace: &Trace,
    ) -> Result<()> {
        if expected.rows != actual.rows {
            return Err(NnError::ShapeMismatch {
                what: "gradient rows",
                expected: expected.rows,
                got: actual.rows,
            });
        }
        if expected.cols != actual.cols {
            return Err(NnError::ShapeMismatch {
                what: "gradient columns",
                expected: expected.cols,
                got: actual.cols,
            });
        }

        for row in 0..expected.rows {
            for col in 0..expected.cols {
                let exp = expected.get(row, col);
                let act = actual.get(row, col);
                if !compare(act, exp, self.tolerance) {
                    return Err(NnError::GradientCheckFailure {
                        layer,
                        row,
                        col,
                        expected: exp,
                        actual: act,
                        trace: trace
                            .with(format!("row: {row}"))
                            .with(format!("col: {col}"))
                            .to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn as_column(bias: &BiasVector) -> Matrix {
    Matrix::from_data(bias.vector.iter().map(|&b| vec![b]).collect())
}
