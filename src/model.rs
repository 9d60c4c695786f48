use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::features;
use crate::player::PlayerRecord;
use crate::scaling::Scaler;

/// Predicted statistics per player: points, assists, rebounds per game.
pub const OUTPUTS: usize = 3;

/// One dense layer: `weights[out][in]` plus a bias per output unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl Layer {
    pub fn input_size(&self) -> usize {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.weights.len()
    }
}

/// Feed-forward regressor: ReLU hidden layers, linear 3-wide output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mlp {
    pub layers: Vec<Layer>,
}

impl Mlp {
    /// Seeded init, uniform in `±1/sqrt(fan_in)`. The same seed and shape
    /// always produce the same starting weights.
    pub fn new(input_size: usize, hidden_sizes: &[usize], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        sizes.push(input_size);
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(OUTPUTS);

        let layers = sizes
            .windows(2)
            .map(|w| {
                let (fan_in, fan_out) = (w[0], w[1]);
                let limit = 1.0 / (fan_in.max(1) as f64).sqrt();
                let weights = (0..fan_out)
                    .map(|_| (0..fan_in).map(|_| rng.gen_range(-limit..limit)).collect())
                    .collect();
                Layer {
                    weights,
                    biases: vec![0.0; fan_out],
                }
            })
            .collect();

        Self { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(Layer::input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(Layer::output_size).unwrap_or(0)
    }

    pub fn forward(&self, input: &[f64]) -> [f64; OUTPUTS] {
        let activations = self.forward_cached(input);
        let last = activations.last().expect("mlp has at least one layer");
        let mut out = [0.0; OUTPUTS];
        for (o, v) in out.iter_mut().zip(last.iter()) {
            *o = *v;
        }
        out
    }

    /// Forward pass keeping every layer's post-activation output (index 0
    /// is the input itself). The trainer backpropagates through this.
    pub(crate) fn forward_cached(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());
        let n_layers = self.layers.len();
        for (idx, layer) in self.layers.iter().enumerate() {
            let prev = activations.last().expect("non-empty activations");
            let hidden = idx + 1 < n_layers;
            let mut next = Vec::with_capacity(layer.output_size());
            for (row, bias) in layer.weights.iter().zip(&layer.biases) {
                let mut z = *bias;
                for (w, a) in row.iter().zip(prev.iter()) {
                    z += w * a;
                }
                next.push(if hidden { z.max(0.0) } else { z });
            }
            activations.push(next);
        }
        activations
    }
}

/// Loss and sample bookkeeping captured at the end of a training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainMetrics {
    pub train_loss: f64,
    pub val_loss: f64,
    pub train_samples: usize,
    pub val_samples: usize,
    pub epochs_run: usize,
}

/// A fitted model bundled with everything inference needs: the scaling
/// transform and the exact ordered feature column list from training time.
/// The three travel together; `artifact` persists and validates the bundle.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub mlp: Mlp,
    pub scaler: Scaler,
    pub feature_columns: Vec<String>,
    pub output_uplift: f64,
    pub metrics: TrainMetrics,
}

impl TrainedModel {
    /// Predict from an already-built raw (unscaled) feature vector.
    pub fn predict_vector(&self, raw: &[f64]) -> [f64; OUTPUTS] {
        let scaled = self.scaler.transform(raw);
        let mut out = self.mlp.forward(&scaled);
        for v in &mut out {
            *v *= self.output_uplift;
        }
        out
    }

    pub fn predict_record(&self, record: &PlayerRecord) -> [f64; OUTPUTS] {
        let raw = features::build_vector_columns(record, &self.feature_columns);
        self.predict_vector(&raw)
    }

    /// One batch pass over a roster, in roster order.
    pub fn predict_batch(&self, records: &[PlayerRecord]) -> Result<Vec<[f64; OUTPUTS]>> {
        if records.is_empty() {
            return Err(ForecastError::DataUnavailable);
        }
        Ok(records.iter().map(|r| self.predict_record(r)).collect())
    }
}
