use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::activation::sigmoid::{activate, activate_prime};
use crate::data::LabeledData;
use crate::error::{NnError, Result};
use crate::gradcheck::{GradientChecker, Trace};
use crate::math::{vector, Matrix};
use crate::network::config::{validate_layer_sizes, validate_learning_rate};
use crate::network::index::layer_from_end;
use crate::params::{BiasVector, Gradient, WeightMatrix};
use crate::train::{train_config::TrainConfig, train_loop};

/// Everything a forward pass produces that backpropagation needs.
///
/// For `n` layer transitions, `activations` has `n + 1` entries (the raw
/// input first) and `weighted_inputs` has `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: Vec<Vec<f64>>,
    pub weighted_inputs: Vec<Vec<f64>>,
}

impl ForwardPass {
    pub fn output(&self) -> &[f64] {
        self.activations.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A fully connected feed-forward network with sigmoid activations.
///
/// Transition `i` maps layer `i` to layer `i + 1` through `weights[i]` and
/// `biases[i]`. Parameters only change through [`NeuralNetwork::apply_gradient`];
/// every other operation reads them.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    weights: Vec<WeightMatrix>,
    biases: Vec<BiasVector>,
    learning_rate: f64,
    gradient_checking: bool,
    checker: GradientChecker,
}

impl NeuralNetwork {
    /// Builds a network with N(0, 1) weights and biases drawn from entropy.
    pub fn new(layer_sizes: &[usize], learning_rate: f64) -> Result<NeuralNetwork> {
        Self::with_rng(layer_sizes, learning_rate, &mut StdRng::from_entropy())
    }

    /// Builds a network with N(0, 1) weights and biases drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<NeuralNetwork> {
        validate_layer_sizes(layer_sizes)?;
        validate_learning_rate(learning_rate)?;

        let weights = layer_sizes
            .windows(2)
            .map(|pair| WeightMatrix::random(pair[1], pair[0], rng))
            .collect();
        let biases = layer_sizes[1..]
            .iter()
            .map(|&size| BiasVector::random(size, rng))
            .collect();

        Self::from_parameters(weights, biases, learning_rate)
    }

    /// Wraps existing parameters, checking that consecutive shapes chain.
    pub fn from_parameters(
        weights: Vec<WeightMatrix>,
        biases: Vec<BiasVector>,
        learning_rate: f64,
    ) -> Result<NeuralNetwork> {
        validate_learning_rate(learning_rate)?;

        if weights.len() < 2 {
            return Err(NnError::InvalidConfiguration(format!(
                "at least 3 layers are required, got {}",
                weights.len() + 1
            )));
        }
        if weights.len() != biases.len() {
            return Err(NnError::InvalidConfiguration(format!(
                "{} weight matrices but {} bias vectors",
                weights.len(),
                biases.len()
            )));
        }
        if weights[0].input_size() == 0 {
            return Err(NnError::InvalidConfiguration(
                "input layer must have at least one neuron".to_owned(),
            ));
        }
        for (i, (w, b)) in weights.iter().zip(&biases).enumerate() {
            if w.output_size() == 0 {
                return Err(NnError::InvalidConfiguration(format!(
                    "layer transition {i}: output layer has no neurons"
                )));
            }
            let (rows, cols) = w.matrix.shape();
            if w.matrix.data.len() != rows || w.matrix.data.iter().any(|row| row.len() != cols) {
                return Err(NnError::InvalidConfiguration(format!(
                    "layer transition {i}: weight rows are not all {cols} wide"
                )));
            }
            if w.output_size() != b.len() {
                return Err(NnError::InvalidConfiguration(format!(
                    "layer transition {i}: weights have {} rows but biases have {} entries",
                    w.output_size(),
                    b.len()
                )));
            }
            if i > 0 && w.input_size() != biases[i - 1].len() {
                return Err(NnError::InvalidConfiguration(format!(
                    "layer transition {i}: weights take {} inputs but the previous layer has {}",
                    w.input_size(),
                    biases[i - 1].len()
                )));
            }
        }

        Ok(NeuralNetwork {
            weights,
            biases,
            learning_rate,
            gradient_checking: false,
            checker: GradientChecker::default(),
        })
    }

    pub fn with_gradient_checking(mut self, enabled: bool) -> Self {
        self.gradient_checking = enabled;
        self
    }

    /// Replaces the default finite-difference settings.
    pub fn with_gradient_checker(mut self, checker: GradientChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Number of layers, input and output included.
    pub fn layer_count(&self) -> usize {
        self.weights.len() + 1
    }

    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.biases.iter().map(BiasVector::len))
            .collect()
    }

    pub fn input_size(&self) -> usize {
        self.weights[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.biases[self.biases.len() - 1].len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn gradient_checking(&self) -> bool {
        self.gradient_checking
    }

    pub fn weights(&self) -> &[WeightMatrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[BiasVector] {
        &self.biases
    }

    /// Output activation for `input`.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut pass = self.feed_forward(input)?;
        Ok(pass.activations.pop().unwrap_or_default())
    }

    /// Runs the input through every layer, keeping all weighted inputs and
    /// activations.
    pub fn feed_forward(&self, input: &[f64]) -> Result<ForwardPass> {
        if input.len() != self.input_size() {
            return Err(NnError::ShapeMismatch {
                what: "input vector",
                expected: self.input_size(),
                got: input.len(),
            });
        }

        let mut activations = Vec::with_capacity(self.layer_count());
        let mut weighted_inputs = Vec::with_capacity(self.weights.len());
        activations.push(input.to_vec());

        for (weight, bias) in self.weights.iter().zip(&self.biases) {
            let previous = &activations[activations.len() - 1];
            let weighted_input = vector::add(&weight.matrix.mul_vec(previous), &bias.vector);
            activations.push(activate(&weighted_input));
            weighted_inputs.push(weighted_input);
        }

        Ok(ForwardPass {
            activations,
            weighted_inputs,
        })
    }

    /// Gradient of the quadratic cost for a single example.
    pub fn backpropagate(&self, data: &LabeledData) -> Result<Gradient> {
        self.backpropagate_traced(data, &Trace::root())
    }

    /// [`NeuralNetwork::backpropagate`], labelling gradient-check failures
    /// with `trace`.
    pub fn backpropagate_traced(&self, data: &LabeledData, trace: &Trace) -> Result<Gradient> {
        let pass = self.feed_forward(&data.input)?;
        if data.label.len() != self.output_size() {
            return Err(NnError::ShapeMismatch {
                what: "label vector",
                expected: self.output_size(),
                got: data.label.len(),
            });
        }

        let transitions = self.weights.len();
        let activations = &pass.activations;
        let mut weight_grads = Vec::with_capacity(transitions);
        let mut bias_grads = Vec::with_capacity(transitions);

        // δ_L = (a_L − y) ⊙ σ'(z_L)
        let mut delta = vector::hadamard(
            &vector::sub(pass.output(), &data.label),
            &activate_prime(pass.output()),
        );

        for n in 1..=transitions {
            let layer = layer_from_end(n, transitions)?;
            if n > 1 {
                // δ_l = (W_{l+1}ᵗ · δ_{l+1}) ⊙ σ'(z_l)
                let upstream = self.weights[layer + 1].matrix.transpose_mul_vec(&delta);
                delta = vector::hadamard(&upstream, &activate_prime(&activations[layer + 1]));
            }

            let weight_grad = WeightMatrix::from_matrix(Matrix::outer(&delta, &activations[layer]));
            let bias_grad = BiasVector::from_vec(delta.clone());

            if self.gradient_checking {
                self.checker.check_layer(
                    self,
                    layer,
                    data,
                    &weight_grad,
                    &bias_grad,
                    &trace.with(format!("layer: {layer}")),
                )?;
            }

            weight_grads.push(weight_grad);
            bias_grads.push(bias_grad);
        }

        weight_grads.reverse();
        bias_grads.reverse();

        Ok(Gradient {
            weights: weight_grads,
            biases: bias_grads,
        })
    }

    /// Independent copy with one weight of transition `layer` moved by `epsilon`.
    pub fn copy_with_weight_perturbed(
        &self,
        epsilon: f64,
        layer: usize,
        neuron: usize,
        prev_neuron: usize,
    ) -> Result<NeuralNetwork> {
        self.check_layer_index(layer)?;

        let mut copy = self.clone();
        copy.weights[layer] =
            self.weights[layer].copy_with_neuron_perturbed(epsilon, neuron, prev_neuron)?;
        copy.gradient_checking = false;
        Ok(copy)
    }

    /// Independent copy with one bias of transition `layer` moved by `epsilon`.
    pub fn copy_with_bias_perturbed(
        &self,
        epsilon: f64,
        layer: usize,
        neuron: usize,
    ) -> Result<NeuralNetwork> {
        self.check_layer_index(layer)?;

        let mut copy = self.clone();
        copy.biases[layer] = self.biases[layer].copy_with_neuron_perturbed(epsilon, neuron)?;
        copy.gradient_checking = false;
        Ok(copy)
    }

    /// One SGD step: `param -= (learning_rate / batch_size) * summed_gradient`.
    pub fn apply_gradient(&mut self, summed: &Gradient, batch_size: usize) {
        if batch_size == 0 {
            return;
        }

        let rate = self.learning_rate / batch_size as f64;
        for (w, gw) in self.weights.iter_mut().zip(&summed.weights) {
            w.descend(rate, gw);
        }
        for (b, gb) in self.biases.iter_mut().zip(&summed.biases) {
            b.descend(rate, gb);
        }
    }

    /// Mini-batch gradient descent with default reducer settings and an
    /// entropy-seeded shuffle. `each_epoch` receives the 1-based epoch index.
    pub fn train<F>(
        &mut self,
        training_data: &mut [LabeledData],
        epochs: usize,
        mini_batch_size: usize,
        each_epoch: F,
    ) -> Result<()>
    where
        F: FnMut(usize),
    {
        let config = TrainConfig::new(epochs, mini_batch_size);
        self.train_with_config(training_data, &config, each_epoch)
    }

    pub fn train_with_config<F>(
        &mut self,
        training_data: &mut [LabeledData],
        config: &TrainConfig,
        each_epoch: F,
    ) -> Result<()>
    where
        F: FnMut(usize),
    {
        let mut rng = config.rng();
        train_loop(self, training_data, config, &mut rng, each_epoch)
    }

    fn check_layer_index(&self, layer: usize) -> Result<()> {
        if layer >= self.weights.len() {
            return Err(NnError::IndexOutOfRange {
                what: "layer",
                index: layer,
                len: self.weights.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "biases =")?;
        for b in &self.biases {
            writeln!(f, "{:?}", b.vector)?;
        }
        writeln!(f, "weights =")?;
        for w in &self.weights {
            write!(f, "{}", w.matrix)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::sigmoid;

    fn seeded(sizes: &[usize], seed: u64) -> NeuralNetwork {
        NeuralNetwork::with_rng(sizes, 1.0, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn rejects_fewer_than_three_layers() {
        assert!(matches!(
            NeuralNetwork::new(&[784, 10], 3.0),
            Err(NnError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn shapes_chain_from_layer_sizes() {
        let net = seeded(&[4, 6, 3, 2], 0);
        assert_eq!(net.layer_count(), 4);
        assert_eq!(net.layer_sizes(), vec![4, 6, 3, 2]);
        assert_eq!(net.weights()[0].matrix.shape(), (6, 4));
        assert_eq!(net.weights()[2].matrix.shape(), (2, 3));
        assert_eq!(net.biases()[1].len(), 3);
    }

    #[test]
    fn from_parameters_rejects_broken_chain() {
        let mut rng = StdRng::seed_from_u64(0);
        let weights = vec![
            WeightMatrix::random(3, 2, &mut rng),
            WeightMatrix::random(1, 4, &mut rng),
        ];
        let biases = vec![BiasVector::random(3, &mut rng), BiasVector::random(1, &mut rng)];
        assert!(matches!(
            NeuralNetwork::from_parameters(weights, biases, 1.0),
            Err(NnError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn from_parameters_rejects_ragged_weights() {
        let mut rng = StdRng::seed_from_u64(0);
        let ragged = WeightMatrix::from_matrix(Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]));
        let weights = vec![ragged, WeightMatrix::random(1, 2, &mut rng)];
        let biases = vec![BiasVector::random(2, &mut rng), BiasVector::random(1, &mut rng)];
        assert!(matches!(
            NeuralNetwork::from_parameters(weights, biases, 1.0),
            Err(NnError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn from_parameters_rejects_empty_layers() {
        let hollow = NeuralNetwork::from_parameters(
            vec![
                WeightMatrix::from_matrix(Matrix::zeros(0, 2)),
                WeightMatrix::from_matrix(Matrix::zeros(1, 0)),
            ],
            vec![BiasVector::from_vec(vec![]), BiasVector::from_vec(vec![0.0])],
            1.0,
        );
        assert!(matches!(hollow, Err(NnError::InvalidConfiguration(_))));

        let no_input = NeuralNetwork::from_parameters(
            vec![
                WeightMatrix::from_matrix(Matrix::zeros(2, 0)),
                WeightMatrix::from_matrix(Matrix::zeros(1, 2)),
            ],
            vec![BiasVector::from_vec(vec![0.0; 2]), BiasVector::from_vec(vec![0.0])],
            1.0,
        );
        assert!(matches!(no_input, Err(NnError::InvalidConfiguration(_))));
    }

    #[test]
    fn predict_stays_in_sigmoid_range() {
        for (seed, sizes) in [(1, vec![2, 3, 1]), (2, vec![5, 8, 8, 4]), (3, vec![10, 2, 7])] {
            let net = seeded(&sizes, seed);
            let input: Vec<f64> = (0..sizes[0]).map(|i| i as f64 * 0.1 - 0.2).collect();
            let out = net.predict(&input).unwrap();
            assert_eq!(out.len(), *sizes.last().unwrap());
            assert!(out.iter().all(|&a| a > 0.0 && a < 1.0));
        }
    }

    #[test]
    fn forward_pass_keeps_every_layer() {
        let net = seeded(&[2, 3, 1], 4);
        let pass = net.feed_forward(&[0.5, -0.5]).unwrap();
        assert_eq!(pass.activations.len(), 3);
        assert_eq!(pass.weighted_inputs.len(), 2);
        assert_eq!(pass.activations[0], vec![0.5, -0.5]);
        for (z, a) in pass.weighted_inputs.iter().zip(&pass.activations[1..]) {
            let squashed: Vec<f64> = z.iter().map(|&z| sigmoid(z)).collect();
            assert_eq!(&squashed, a);
        }
    }

    #[test]
    fn wrong_input_length_is_a_shape_mismatch() {
        let net = seeded(&[2, 3, 1], 0);
        assert!(matches!(
            net.predict(&[1.0]),
            Err(NnError::ShapeMismatch { expected: 2, got: 1, .. })
        ));
        let data = LabeledData::new(vec![1.0, 0.0], vec![1.0, 0.0]);
        assert!(matches!(
            net.backpropagate(&data),
            Err(NnError::ShapeMismatch { what: "label vector", .. })
        ));
    }

    #[test]
    fn gradient_shapes_match_parameters() {
        let net = seeded(&[3, 4, 2], 9);
        let g = net
            .backpropagate(&LabeledData::new(vec![0.1, 0.2, 0.3], vec![0.0, 1.0]))
            .unwrap();
        for (gw, w) in g.weights.iter().zip(net.weights()) {
            assert_eq!(gw.matrix.shape(), w.matrix.shape());
        }
        for (gb, b) in g.biases.iter().zip(net.biases()) {
            assert_eq!(gb.len(), b.len());
        }
    }

    #[test]
    fn backprop_passes_its_own_gradient_check() {
        let net = seeded(&[2, 3, 1], 21).with_gradient_checking(true);
        let data = LabeledData::new(vec![0.7, -0.3], vec![1.0]);
        assert!(net.backpropagate(&data).is_ok());
    }

    #[test]
    fn perturbed_copies_leave_original_alone() {
        let net = seeded(&[2, 3, 1], 5);
        let copy = net.copy_with_weight_perturbed(0.5, 1, 0, 2).unwrap();
        assert_eq!(
            copy.weights()[1].matrix.get(0, 2),
            net.weights()[1].matrix.get(0, 2) + 0.5
        );
        assert_eq!(copy.weights()[0], net.weights()[0]);
        assert_eq!(copy.biases(), net.biases());

        assert!(matches!(
            net.copy_with_bias_perturbed(0.5, 2, 0),
            Err(NnError::IndexOutOfRange { what: "layer", .. })
        ));
    }

    #[test]
    fn apply_gradient_scales_by_learning_rate_over_batch() {
        let mut net = seeded(&[2, 2, 1], 8);
        let before = net.clone();
        let mut g = Gradient::zeros_like(net.weights(), net.biases());
        g.biases[1].vector[0] = 4.0;

        net.apply_gradient(&g, 2);

        let expected = before.biases()[1].vector[0] - 1.0 / 2.0 * 4.0;
        assert_eq!(net.biases()[1].vector[0], expected);
        assert_eq!(net.weights(), before.weights());
    }
}
