//! The masked autoencoder network.

use rand::rngs::StdRng;
use rand::Rng;

use super::functional::{relu_matrix, sigmoid};
use super::loss::{l2_penalty, BCEWithLogitsLoss};
use super::masked_linear::MaskedLinear;
use crate::error::{EnmascararError, Result};
use crate::masks::MaskSet;
use crate::primitives::{Matrix, Vector};

/// Masked autoencoder for distribution estimation.
///
/// A plain MLP over binary vectors whose weight matrices are gated by a
/// fixed [`MaskSet`], making output *d* a function of strictly
/// earlier-ordered inputs only. The outputs are unnormalized logits; each
/// one, through a sigmoid, is the conditional probability of its input
/// dimension given the dimensions before it in the ordering.
///
/// The mask set is consulted once at construction; each layer keeps its
/// own copy and no mask is ever mutated afterwards.
///
/// # Example
///
/// ```
/// use enmascarar::masks::{MaskGenerator, OrderingMode};
/// use enmascarar::nn::Made;
/// use enmascarar::primitives::Matrix;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let masks = MaskGenerator::new(3, vec![4])
///     .with_seed(1)
///     .with_ordering(OrderingMode::Natural)
///     .generate()
///     .unwrap();
/// let mut rng = StdRng::seed_from_u64(1);
/// let model = Made::new(3, vec![4], &masks, &mut rng).unwrap();
///
/// let x = Matrix::from_vec(2, 3, vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0]).unwrap();
/// let logits = model.forward(&x).unwrap();
/// assert_eq!(logits.shape(), (2, 3));
/// ```
#[derive(Debug)]
pub struct Made {
    /// Hidden layers in order, then the output layer.
    layers: Vec<MaskedLinear>,
    nin: usize,
    hidden_sizes: Vec<usize>,
    ordering: Vec<usize>,
}

impl Made {
    /// Builds the network for a previously generated mask set, drawing
    /// initial weights from the caller's RNG.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::DimensionMismatch`] when the mask set
    /// does not match `(nin, hidden_sizes)`.
    pub fn new(
        nin: usize,
        hidden_sizes: Vec<usize>,
        masks: &MaskSet,
        rng: &mut StdRng,
    ) -> Result<Self> {
        if masks.len() != hidden_sizes.len() + 1 || masks.nin() != nin {
            return Err(EnmascararError::DimensionMismatch {
                expected: format!("{} masks for nin = {}", hidden_sizes.len() + 1, nin),
                actual: format!("{} masks for nin = {}", masks.len(), masks.nin()),
            });
        }

        let mut widths = Vec::with_capacity(hidden_sizes.len() + 2);
        widths.push(nin);
        widths.extend_from_slice(&hidden_sizes);
        widths.push(nin);

        let mut layers = Vec::with_capacity(masks.len());
        for l in 0..masks.len() {
            layers.push(MaskedLinear::new(
                widths[l],
                widths[l + 1],
                masks.mask(l).clone(),
                rng,
            )?);
        }

        Ok(Self {
            layers,
            nin,
            hidden_sizes,
            ordering: masks.ordering().to_vec(),
        })
    }

    /// Forward pass to logits: ReLU after every hidden affine, nothing
    /// after the final masked affine.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::DimensionMismatch`] when the batch width
    /// is not `nin`.
    pub fn forward(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (output, hidden) = self
            .layers
            .split_last()
            .expect("a network always has its output layer");
        let mut a = x.clone();
        for layer in hidden {
            a = relu_matrix(&layer.forward(&a)?);
        }
        output.forward(&a)
    }

    /// Mean binary cross-entropy of the batch plus the L2 weight penalty,
    /// together with the gradient for every trainable parameter, flattened
    /// in [`parameters`](Made::parameters) order.
    ///
    /// The data gradient of a masked weight entry is identically zero; the
    /// L2 term still decays it like any other raw parameter.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::DimensionMismatch`] when the batch width
    /// is not `nin`.
    pub fn loss_and_grad(&self, x: &Matrix<f32>, l2_coeff: f32) -> Result<(f32, Vector<f32>)> {
        let n_layers = self.layers.len();

        // Forward with cached pre- and post-activation values.
        let mut activations: Vec<Matrix<f32>> = Vec::with_capacity(n_layers);
        let mut pre: Vec<Matrix<f32>> = Vec::with_capacity(n_layers - 1);
        activations.push(x.clone());
        for layer in &self.layers[..n_layers - 1] {
            let z = layer.forward(activations.last().expect("activations start with x"))?;
            activations.push(relu_matrix(&z));
            pre.push(z);
        }
        let logits = self.layers[n_layers - 1]
            .forward(activations.last().expect("activations start with x"))?;

        let criterion = BCEWithLogitsLoss::new();
        let weights: Vec<&Matrix<f32>> = self.layers.iter().map(MaskedLinear::weight).collect();
        let loss = criterion.forward(&logits, x) + l2_penalty(l2_coeff, &weights);

        // Backward, output layer first.
        let mut delta = criterion.grad(&logits, x);
        let mut rev_grads: Vec<(Matrix<f32>, Vector<f32>)> = Vec::with_capacity(n_layers);
        for idx in (0..n_layers).rev() {
            let layer = &self.layers[idx];
            let a_prev = &activations[idx];

            let dw_raw = delta
                .transpose()
                .matmul(a_prev)
                .expect("delta and activation batch sizes agree");
            let dw = Matrix::from_fn(layer.out_features(), layer.in_features(), |o, i| {
                let data_grad = if layer.mask().get(i, o) {
                    dw_raw.get(o, i)
                } else {
                    0.0
                };
                data_grad + l2_coeff * layer.weight().get(o, i)
            });
            let db = delta.column_sums();
            rev_grads.push((dw, db));

            if idx > 0 {
                let da = delta
                    .matmul(&layer.effective_weight())
                    .expect("delta width equals layer output width");
                let z = &pre[idx - 1];
                delta = Matrix::from_fn(da.n_rows(), da.n_cols(), |b, u| {
                    if z.get(b, u) > 0.0 {
                        da.get(b, u)
                    } else {
                        0.0
                    }
                });
            }
        }

        let mut flat = Vec::with_capacity(self.num_params());
        for (dw, db) in rev_grads.iter().rev() {
            flat.extend_from_slice(dw.as_slice());
            flat.extend_from_slice(db.as_slice());
        }
        Ok((loss, Vector::from_vec(flat)))
    }

    /// Draws `n` samples from the learned distribution by sequentially
    /// sampling each dimension in ordering-rank order, conditioning every
    /// draw on the dimensions already sampled.
    ///
    /// # Errors
    ///
    /// Propagates forward-pass shape errors (cannot occur for a well
    /// constructed network).
    pub fn sample(&self, n: usize, rng: &mut StdRng) -> Result<Matrix<f32>> {
        let mut x = Matrix::zeros(n, self.nin);
        for rank in 0..self.nin {
            let d = self
                .ordering
                .iter()
                .position(|&r| r == rank)
                .expect("ordering is a permutation of 0..nin");
            let logits = self.forward(&x)?;
            for row in 0..n {
                let p = sigmoid(logits.get(row, d));
                let bit = if rng.gen::<f32>() < p { 1.0 } else { 0.0 };
                x.set(row, d, bit);
            }
        }
        Ok(x)
    }

    /// All trainable parameters as one flat vector: per layer, weight
    /// row-major then bias, layers in forward order.
    #[must_use]
    pub fn parameters(&self) -> Vector<f32> {
        let mut buf = Vec::with_capacity(self.num_params());
        for layer in &self.layers {
            layer.params_into(&mut buf);
        }
        Vector::from_vec(buf)
    }

    /// Overwrites all trainable parameters from a flat vector laid out as
    /// [`parameters`](Made::parameters) produces.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::DimensionMismatch`] on a length
    /// disagreement.
    pub fn set_parameters(&mut self, params: &Vector<f32>) -> Result<()> {
        if params.len() != self.num_params() {
            return Err(EnmascararError::DimensionMismatch {
                expected: format!("{} parameters", self.num_params()),
                actual: format!("{} parameters", params.len()),
            });
        }
        let mut offset = 0;
        for layer in &mut self.layers {
            offset = layer.load_params(params.as_slice(), offset);
        }
        Ok(())
    }

    /// Total trainable parameter count.
    #[must_use]
    pub fn num_params(&self) -> usize {
        self.layers.iter().map(MaskedLinear::num_params).sum()
    }

    /// Input (and output) dimensionality.
    #[must_use]
    pub fn nin(&self) -> usize {
        self.nin
    }

    /// Hidden layer widths.
    #[must_use]
    pub fn hidden_sizes(&self) -> &[usize] {
        &self.hidden_sizes
    }

    /// The autoregressive ordering the network was masked with.
    #[must_use]
    pub fn ordering(&self) -> &[usize] {
        &self.ordering
    }

    /// The layers in forward order (hidden layers, then output).
    #[must_use]
    pub fn layers(&self) -> &[MaskedLinear] {
        &self.layers
    }
}
