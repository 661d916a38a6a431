//! End-to-end training scenarios on small synthetic datasets.

use std::io::Write;

use enmascarar::prelude::*;

/// Rows are either all-ones or all-zeros: every dimension after the first
/// in the ordering is perfectly predictable from its predecessors.
fn stripes_dataset(n_samples: usize, n_dims: usize) -> BinaryDataset {
    let data = Matrix::from_fn(n_samples, n_dims, |i, _| (i % 2) as f32);
    BinaryDataset::from_matrix(data).expect("binary values")
}

fn quick_config() -> TrainConfig {
    TrainConfig {
        hidden_sizes: vec![16],
        seed: 42,
        natural_ordering: true,
        batch_size: 16,
        learning_rate: 0.01,
        l2_coeff: 1e-4,
        epochs: 30,
        log_every: 10,
    }
}

#[test]
fn training_reduces_loss_on_learnable_data() {
    let dataset = stripes_dataset(64, 6);
    let trainer = Trainer::new(quick_config()).with_verbose(false);

    let (_, report) = trainer.fit(&dataset, None).expect("training succeeds");

    assert_eq!(report.train_losses.len(), 30);
    assert!(report.train_losses.iter().all(|l| l.is_finite()));
    let first = report.train_losses[0];
    let last = *report.train_losses.last().expect("non-empty history");
    assert!(last < first, "loss did not decrease: {first} -> {last}");
}

#[test]
fn held_out_loss_is_tracked_at_logging_cadence() {
    let dataset = stripes_dataset(64, 6);
    let (train, valid) = dataset.split(0.25, 3).expect("valid split");
    let trainer = Trainer::new(quick_config()).with_verbose(false);

    let (model, report) = trainer.fit(&train, Some(&valid)).expect("training succeeds");

    // Epochs 10, 20, 30.
    assert_eq!(report.valid_losses.len(), 3);
    assert!(report.valid_losses.iter().all(|(_, l)| l.is_finite()));
    let direct = trainer.evaluate(&model, &valid).expect("evaluable");
    assert!(direct.is_finite());
}

#[test]
fn trained_model_remains_autoregressive() {
    // Training moves only unmasked weights, so the structural guarantee
    // must survive any number of updates.
    let dataset = stripes_dataset(32, 5);
    let trainer = Trainer::new(TrainConfig {
        hidden_sizes: vec![8, 8],
        epochs: 10,
        batch_size: 8,
        natural_ordering: true,
        ..quick_config()
    })
    .with_verbose(false);
    let (model, _) = trainer.fit(&dataset, None).expect("training succeeds");

    let x = Matrix::from_fn(1, 5, |_, j| (j % 2) as f32);
    let base = model.forward(&x).expect("valid batch");
    for d in 0..5 {
        let mut flipped = x.clone();
        flipped.set(0, d, 1.0 - x.get(0, d));
        let out = model.forward(&flipped).expect("valid batch");
        for j in 0..=d {
            assert_eq!(
                base.get(0, j),
                out.get(0, j),
                "output {j} depends on input {d}"
            );
        }
    }
}

#[test]
fn trained_model_samples_binary_vectors() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let dataset = stripes_dataset(64, 6);
    let trainer = Trainer::new(quick_config()).with_verbose(false);
    let (model, _) = trainer.fit(&dataset, None).expect("training succeeds");

    let mut rng = StdRng::seed_from_u64(0);
    let samples = model.sample(10, &mut rng).expect("well constructed network");
    assert_eq!(samples.shape(), (10, 6));
    assert!(samples.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
}

#[test]
fn amat_file_to_trained_model() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    for i in 0..24 {
        let bit = i % 2;
        writeln!(file, "{bit} {bit} {bit} {bit}").expect("write");
    }

    let dataset = BinaryDataset::from_amat(file.path()).expect("well formed file");
    assert_eq!(dataset.n_samples(), 24);
    assert_eq!(dataset.n_dims(), 4);

    let (train, valid) = dataset.split(0.25, 1).expect("valid split");
    let trainer = Trainer::new(TrainConfig {
        hidden_sizes: vec![8],
        epochs: 5,
        batch_size: 6,
        log_every: 5,
        ..quick_config()
    })
    .with_verbose(false);
    let (_, report) = trainer.fit(&train, Some(&valid)).expect("training succeeds");
    assert_eq!(report.train_losses.len(), 5);
    assert_eq!(report.valid_losses.len(), 1);
}

#[test]
fn nan_learning_rate_is_rejected_before_training() {
    let dataset = stripes_dataset(8, 3);
    let config = TrainConfig {
        learning_rate: f32::NAN,
        ..quick_config()
    };
    let err = Trainer::new(config)
        .with_verbose(false)
        .fit(&dataset, None)
        .expect_err("invalid config");
    assert!(matches!(err, EnmascararError::InvalidHyperparameter { .. }));
}

#[test]
fn dataset_too_narrow_for_masks_is_rejected() {
    // A single input dimension has no valid strict ordering pair.
    let data = Matrix::from_fn(8, 1, |i, _| (i % 2) as f32);
    let dataset = BinaryDataset::from_matrix(data).expect("binary values");
    let err = Trainer::new(quick_config())
        .with_verbose(false)
        .fit(&dataset, None)
        .expect_err("nin = 1 violates the generator precondition");
    assert!(matches!(err, EnmascararError::InvalidDimension { .. }));
}
