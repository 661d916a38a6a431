//! Training loop for the masked autoencoder.
//!
//! One [`MaskSet`](crate::masks::MaskSet) is generated per run from the
//! configured seed and held fixed for the network's entire lifetime; only
//! weights and biases move. Progress is reported on the console every
//! `log_every` epochs.
//!
//! # Example
//!
//! ```
//! use enmascarar::data::BinaryDataset;
//! use enmascarar::primitives::Matrix;
//! use enmascarar::train::{TrainConfig, Trainer};
//!
//! let data = Matrix::from_fn(32, 4, |i, j| ((i + j) % 2) as f32);
//! let dataset = BinaryDataset::from_matrix(data).unwrap();
//!
//! let config = TrainConfig {
//!     hidden_sizes: vec![8],
//!     epochs: 3,
//!     batch_size: 8,
//!     ..TrainConfig::default()
//! };
//! let trainer = Trainer::new(config).with_verbose(false);
//! let (model, report) = trainer.fit(&dataset, None).unwrap();
//!
//! assert_eq!(report.train_losses.len(), 3);
//! assert_eq!(model.nin(), 4);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::BinaryDataset;
use crate::error::{EnmascararError, Result};
use crate::masks::{MaskGenerator, OrderingMode};
use crate::nn::loss::l2_penalty;
use crate::nn::{BCEWithLogitsLoss, Made, Reduction};
use crate::optim::Adam;
use crate::primitives::Matrix;

/// Hyperparameters for one training run.
///
/// All fields have serde defaults, so a partial config file is enough:
///
/// ```
/// use enmascarar::train::TrainConfig;
///
/// let config: TrainConfig = serde_json::from_str(r#"{"epochs": 5}"#).unwrap();
/// assert_eq!(config.epochs, 5);
/// assert_eq!(config.hidden_sizes, vec![500]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Hidden layer widths; empty for a direct input-to-output model.
    pub hidden_sizes: Vec<usize>,
    /// Seed for mask generation, weight init, and epoch shuffling.
    pub seed: u64,
    /// Natural (identity) ordering instead of a random permutation.
    pub natural_ordering: bool,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Adam step size.
    pub learning_rate: f32,
    /// L2 penalty coefficient on weight matrices.
    pub l2_coeff: f32,
    /// Number of passes over the training set.
    pub epochs: usize,
    /// Console/held-out evaluation cadence, in epochs.
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            hidden_sizes: vec![500],
            seed: 42,
            natural_ordering: false,
            batch_size: 100,
            learning_rate: 1e-3,
            l2_coeff: 1e-4,
            epochs: 100,
            log_every: 10,
        }
    }
}

impl TrainConfig {
    /// Checks every hyperparameter range.
    ///
    /// # Errors
    ///
    /// Returns [`EnmascararError::InvalidHyperparameter`] naming the
    /// offending field.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "0", ">= 1"));
        }
        if self.epochs == 0 {
            return Err(invalid("epochs", "0", ">= 1"));
        }
        if self.log_every == 0 {
            return Err(invalid("log_every", "0", ">= 1"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(invalid(
                "learning_rate",
                &self.learning_rate.to_string(),
                "> 0",
            ));
        }
        if !(self.l2_coeff >= 0.0 && self.l2_coeff.is_finite()) {
            return Err(invalid("l2_coeff", &self.l2_coeff.to_string(), ">= 0"));
        }
        Ok(())
    }

    /// The ordering mode implied by `natural_ordering`.
    #[must_use]
    pub fn ordering_mode(&self) -> OrderingMode {
        if self.natural_ordering {
            OrderingMode::Natural
        } else {
            OrderingMode::Random
        }
    }
}

fn invalid(param: &str, value: &str, constraint: &str) -> EnmascararError {
    EnmascararError::InvalidHyperparameter {
        param: param.to_string(),
        value: value.to_string(),
        constraint: constraint.to_string(),
    }
}

/// Losses recorded during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainReport {
    /// Mean per-batch training loss, one entry per epoch.
    pub train_losses: Vec<f32>,
    /// Held-out loss at every logging point, as (epoch, loss).
    pub valid_losses: Vec<(usize, f32)>,
}

/// Drives one training run from a [`TrainConfig`].
pub struct Trainer {
    config: TrainConfig,
    verbose: bool,
}

impl Trainer {
    /// Creates a trainer; console reporting is on by default.
    #[must_use]
    pub fn new(config: TrainConfig) -> Self {
        Self {
            config,
            verbose: true,
        }
    }

    /// Enables or disables console reporting.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The configuration this trainer runs with.
    #[must_use]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Trains a fresh model on `train`, optionally tracking a held-out
    /// loss on `valid`, and returns the model with its loss history.
    ///
    /// # Errors
    ///
    /// Configuration errors surface before any work; a non-finite loss
    /// aborts the run with [`EnmascararError::ConvergenceFailure`].
    pub fn fit(
        &self,
        train: &BinaryDataset,
        valid: Option<&BinaryDataset>,
    ) -> Result<(Made, TrainReport)> {
        self.config.validate()?;
        let nin = train.n_dims();

        // Generated once from the configured seed; never regenerated
        // mid-run.
        let masks = MaskGenerator::new(nin, self.config.hidden_sizes.clone())
            .with_seed(self.config.seed)
            .with_ordering(self.config.ordering_mode())
            .generate()?;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut model = Made::new(nin, self.config.hidden_sizes.clone(), &masks, &mut rng)?;
        let mut optimizer = Adam::new(self.config.learning_rate);
        let mut params = model.parameters();

        if self.verbose {
            println!(
                "training MADE: {} dims, hidden {:?}, {} parameters, mask density {:.3}, {} ordering",
                nin,
                self.config.hidden_sizes,
                model.num_params(),
                masks.density(),
                self.config.ordering_mode(),
            );
        }

        let mut report = TrainReport::default();
        for epoch in 1..=self.config.epochs {
            let indices = train.shuffled_indices(&mut rng);
            let mut epoch_loss = 0.0f32;
            let mut n_batches = 0usize;

            for chunk in indices.chunks(self.config.batch_size) {
                let batch = train.gather_rows(chunk);
                let (loss, grads) = model.loss_and_grad(&batch, self.config.l2_coeff)?;
                if !loss.is_finite() {
                    return Err(EnmascararError::ConvergenceFailure { epoch, loss });
                }
                optimizer.step(&mut params, &grads);
                model.set_parameters(&params)?;
                epoch_loss += loss;
                n_batches += 1;
            }

            let mean_train = epoch_loss / n_batches as f32;
            report.train_losses.push(mean_train);

            if epoch % self.config.log_every == 0 || epoch == self.config.epochs {
                if let Some(valid) = valid {
                    let valid_loss = self.evaluate(&model, valid)?;
                    report.valid_losses.push((epoch, valid_loss));
                    if self.verbose {
                        println!(
                            "epoch {epoch:>4} | train loss {mean_train:.4} | valid loss {valid_loss:.4}"
                        );
                    }
                } else if self.verbose {
                    println!("epoch {epoch:>4} | train loss {mean_train:.4}");
                }
            }
        }

        Ok((model, report))
    }

    /// Mean per-element loss of `model` on `data` (including the L2
    /// term), with no gradient work.
    ///
    /// # Errors
    ///
    /// Propagates shape mismatches between the model and the dataset.
    pub fn evaluate(&self, model: &Made, data: &BinaryDataset) -> Result<f32> {
        let criterion = BCEWithLogitsLoss::with_reduction(Reduction::Sum);
        let mut total = 0.0f32;
        for batch in data.batches(self.config.batch_size) {
            let logits = model.forward(&batch)?;
            total += criterion.forward(&logits, &batch);
        }
        let mean = total / (data.n_samples() * data.n_dims()) as f32;
        let weights: Vec<&Matrix<f32>> = model
            .layers()
            .iter()
            .map(|layer| layer.weight())
            .collect();
        Ok(mean + l2_penalty(self.config.l2_coeff, &weights))
    }
}
