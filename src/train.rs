use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::Result;
use crate::features::{self, FEATURE_COLUMNS};
use crate::model::{Mlp, OUTPUTS, TrainMetrics, TrainedModel};
use crate::player::PlayerRecord;
use crate::scaling::Scaler;
use crate::targets::{self, TargetConfig};

const IMPROVEMENT_EPS: f64 = 1e-6;

/// Training hyperparameters. Defaults mirror the production fit: 100
/// epochs of mini-batch Adam at 5e-3 with an 80/20 split and learning-rate
/// halving on validation plateau.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub weight_decay: f64,
    pub hidden_sizes: Vec<usize>,
    pub validation_split: f64,
    /// Seed for the train/validation shuffle and per-epoch batch order.
    pub split_seed: u64,
    /// Seed for weight initialization.
    pub init_seed: u64,
    pub target: TargetConfig,
    /// Epochs without validation improvement before the learning rate drops.
    pub plateau_patience: usize,
    pub plateau_factor: f64,
    pub min_learning_rate: f64,
    /// Multiplier applied to model outputs at inference time; stored in the
    /// artifact so inference always matches the training-time setting.
    pub output_uplift: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch_size: 32,
            learning_rate: 5e-3,
            weight_decay: 1e-5,
            hidden_sizes: vec![64, 32],
            validation_split: 0.2,
            split_seed: 42,
            init_seed: 42,
            target: TargetConfig::default(),
            plateau_patience: 10,
            plateau_factor: 0.5,
            min_learning_rate: 1e-5,
            output_uplift: 1.0,
        }
    }
}

/// One-shot blocking fit: build features, synthesize targets, split, run
/// the epoch loop, return the fitted bundle. Empty input fails fast with
/// `DataUnavailable` before any fitting starts. No retry, no resume.
pub fn train(records: &[PlayerRecord], config: &TrainConfig) -> Result<TrainedModel> {
    let matrix = features::build_matrix(records)?;
    let target_rows = targets::synthesize_targets(records, &config.target);

    let columns = FEATURE_COLUMNS.len();
    let scaler = Scaler::fit(&matrix, columns);
    let scaled = scaler.transform_matrix(&matrix);

    let mut rng = StdRng::seed_from_u64(config.split_seed);
    let mut order: Vec<usize> = (0..scaled.len()).collect();
    order.shuffle(&mut rng);

    let val_len = ((scaled.len() as f64) * config.validation_split).round() as usize;
    let val_len = val_len.min(scaled.len().saturating_sub(1));
    let (val_idx, train_idx) = order.split_at(val_len);
    let mut train_idx: Vec<usize> = train_idx.to_vec();
    // Tiny rosters get no holdout; validation then reads the train set.
    let val_idx: Vec<usize> = if val_idx.is_empty() {
        train_idx.clone()
    } else {
        val_idx.to_vec()
    };

    let mut mlp = Mlp::new(columns, &config.hidden_sizes, config.init_seed);
    let mut adam = AdamState::new(&mlp);
    let mut lr = config.learning_rate;
    let batch_size = config.batch_size.max(1);

    let mut best_val = f64::INFINITY;
    let mut stale_epochs = 0usize;
    let mut train_loss = f64::INFINITY;
    let mut val_loss = f64::INFINITY;

    info!(
        samples = scaled.len(),
        train = train_idx.len(),
        val = val_idx.len(),
        columns,
        "training forecast model"
    );

    for epoch in 0..config.epochs {
        train_idx.shuffle(&mut rng);

        for batch in train_idx.chunks(batch_size) {
            let mut grads = Grads::zeros(&mlp);
            for &i in batch {
                accumulate_gradients(&mlp, &scaled[i], &target_rows[i], &mut grads);
            }
            grads.scale(1.0 / batch.len() as f64);
            adam.step(&mut mlp, &grads, lr, config.weight_decay);
        }

        train_loss = mse(&mlp, &scaled, &target_rows, &train_idx);
        val_loss = mse(&mlp, &scaled, &target_rows, &val_idx);

        if epoch % 20 == 0 {
            info!(epoch, train_loss, val_loss, lr, "epoch");
        }

        if val_loss + IMPROVEMENT_EPS < best_val {
            best_val = val_loss;
            stale_epochs = 0;
        } else {
            stale_epochs += 1;
            if stale_epochs >= config.plateau_patience {
                let next = (lr * config.plateau_factor).max(config.min_learning_rate);
                if next < lr {
                    debug!(epoch, from = lr, to = next, "validation plateau, reducing lr");
                }
                lr = next;
                stale_epochs = 0;
            }
        }
    }

    info!(train_loss, val_loss, "training complete");

    Ok(TrainedModel {
        mlp,
        scaler,
        feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        output_uplift: config.output_uplift,
        metrics: TrainMetrics {
            train_loss,
            val_loss,
            train_samples: train_idx.len(),
            val_samples: val_idx.len(),
            epochs_run: config.epochs,
        },
    })
}

/// Per-parameter gradient accumulator shaped like the network.
struct Grads {
    weights: Vec<Vec<Vec<f64>>>,
    biases: Vec<Vec<f64>>,
}

impl Grads {
    fn zeros(mlp: &Mlp) -> Self {
        Self {
            weights: mlp
                .layers
                .iter()
                .map(|l| vec![vec![0.0; l.input_size()]; l.output_size()])
                .collect(),
            biases: mlp.layers.iter().map(|l| vec![0.0; l.output_size()]).collect(),
        }
    }

    fn scale(&mut self, factor: f64) {
        for layer in &mut self.weights {
            for row in layer {
                for g in row {
                    *g *= factor;
                }
            }
        }
        for layer in &mut self.biases {
            for g in layer {
                *g *= factor;
            }
        }
    }
}

/// Backpropagate one sample's squared-error gradient into `grads`.
fn accumulate_gradients(mlp: &Mlp, input: &[f64], target: &[f64; OUTPUTS], grads: &mut Grads) {
    let activations = mlp.forward_cached(input);
    let output = activations.last().expect("output activations");

    // d(mean squared error)/d(output).
    let mut delta: Vec<f64> = output
        .iter()
        .zip(target.iter())
        .map(|(yhat, y)| 2.0 * (yhat - y) / OUTPUTS as f64)
        .collect();

    for l in (0..mlp.layers.len()).rev() {
        let layer = &mlp.layers[l];
        let prev_act = &activations[l];

        for (j, d) in delta.iter().enumerate() {
            grads.biases[l][j] += d;
            for (i, a) in prev_act.iter().enumerate() {
                grads.weights[l][j][i] += d * a;
            }
        }

        if l > 0 {
            let mut prev_delta = vec![0.0; prev_act.len()];
            for (j, d) in delta.iter().enumerate() {
                for (i, w) in layer.weights[j].iter().enumerate() {
                    prev_delta[i] += d * w;
                }
            }
            // ReLU gate on the hidden activation that produced prev_act.
            for (pd, a) in prev_delta.iter_mut().zip(prev_act.iter()) {
                if *a <= 0.0 {
                    *pd = 0.0;
                }
            }
            delta = prev_delta;
        }
    }
}

fn mse(mlp: &Mlp, inputs: &[Vec<f64>], targets: &[[f64; OUTPUTS]], idx: &[usize]) -> f64 {
    if idx.is_empty() {
        return f64::INFINITY;
    }
    let mut sum = 0.0;
    for &i in idx {
        let out = mlp.forward(&inputs[i]);
        for (yhat, y) in out.iter().zip(targets[i].iter()) {
            let d = yhat - y;
            sum += d * d;
        }
    }
    sum / (idx.len() * OUTPUTS) as f64
}

/// Adam with decoupled weight decay. First/second moment buffers mirror
/// the network shape.
struct AdamState {
    m: Grads,
    v: Grads,
    t: u64,
}

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

impl AdamState {
    fn new(mlp: &Mlp) -> Self {
        Self {
            m: Grads::zeros(mlp),
            v: Grads::zeros(mlp),
            t: 0,
        }
    }

    fn step(&mut self, mlp: &mut Mlp, grads: &Grads, lr: f64, weight_decay: f64) {
        self.t += 1;
        let bc1 = 1.0 - BETA1.powi(self.t as i32);
        let bc2 = 1.0 - BETA2.powi(self.t as i32);

        for (l, layer) in mlp.layers.iter_mut().enumerate() {
            update_params(
                &mut layer.biases,
                &grads.biases[l],
                &mut self.m.biases[l],
                &mut self.v.biases[l],
                lr,
                0.0,
                bc1,
                bc2,
            );
            for (j, row) in layer.weights.iter_mut().enumerate() {
                update_params(
                    row,
                    &grads.weights[l][j],
                    &mut self.m.weights[l][j],
                    &mut self.v.weights[l][j],
                    lr,
                    weight_decay,
                    bc1,
                    bc2,
                );
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn update_params(
    params: &mut [f64],
    grads: &[f64],
    m: &mut [f64],
    v: &mut [f64],
    lr: f64,
    weight_decay: f64,
    bc1: f64,
    bc2: f64,
) {
    for i in 0..params.len() {
        let g = grads[i];
        m[i] = BETA1 * m[i] + (1.0 - BETA1) * g;
        v[i] = BETA2 * v[i] + (1.0 - BETA2) * g * g;
        let m_hat = m[i] / bc1;
        let v_hat = v[i] / bc2;
        params[i] -= lr * (m_hat / (v_hat.sqrt() + ADAM_EPS) + weight_decay * params[i]);
    }
}
