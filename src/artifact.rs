use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ForecastError, Result};
use crate::model::{Layer, Mlp, OUTPUTS, TrainMetrics, TrainedModel};
use crate::scaling::Scaler;

pub const ARTIFACT_VERSION: u32 = 1;

/// Persisted model bundle. Parameters, the fitted scaler and the exact
/// feature column list are one unit: loading any of them against a
/// mismatched sibling is an error, never a silent misprediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub generated_at: String,
    pub feature_columns: Vec<String>,
    pub scaler: Scaler,
    pub layers: Vec<Layer>,
    pub output_uplift: f64,
    #[serde(default)]
    pub metrics: TrainMetrics,
}

impl ModelArtifact {
    pub fn from_model(model: &TrainedModel) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            feature_columns: model.feature_columns.clone(),
            scaler: model.scaler.clone(),
            layers: model.mlp.layers.clone(),
            output_uplift: model.output_uplift,
            metrics: model.metrics.clone(),
        }
    }

    /// Validate internal consistency and rebuild the runtime model.
    pub fn into_model(self) -> Result<TrainedModel> {
        if self.version != ARTIFACT_VERSION {
            return Err(mismatch(format!(
                "unsupported artifact version {} (expected {})",
                self.version, ARTIFACT_VERSION
            )));
        }
        if self.feature_columns.is_empty() {
            return Err(mismatch("empty feature column list".into()));
        }
        if self.layers.is_empty() {
            return Err(mismatch("artifact contains no layers".into()));
        }

        let columns = self.feature_columns.len();
        if self.scaler.len() != columns || self.scaler.stds.len() != columns {
            return Err(mismatch(format!(
                "scaler length {} does not match {} feature columns",
                self.scaler.len(),
                columns
            )));
        }

        let first_input = self.layers[0].input_size();
        if first_input != columns {
            return Err(mismatch(format!(
                "first layer expects {first_input} inputs but the column list has {columns}"
            )));
        }
        for (idx, pair) in self.layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(mismatch(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    idx,
                    pair[0].output_size(),
                    idx + 1,
                    pair[1].input_size()
                )));
            }
        }
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.biases.len() != layer.output_size() {
                return Err(mismatch(format!("layer {idx} bias length mismatch")));
            }
            let width = layer.input_size();
            if layer.weights.iter().any(|row| row.len() != width) {
                return Err(mismatch(format!("layer {idx} has ragged weight rows")));
            }
        }
        let last_out = self.layers.last().map(Layer::output_size).unwrap_or(0);
        if last_out != OUTPUTS {
            return Err(mismatch(format!(
                "final layer produces {last_out} outputs (expected {OUTPUTS})"
            )));
        }

        Ok(TrainedModel {
            mlp: Mlp {
                layers: self.layers,
            },
            scaler: self.scaler,
            feature_columns: self.feature_columns,
            output_uplift: self.output_uplift,
            metrics: self.metrics,
        })
    }
}

/// Write the bundle as JSON via tmp + rename so a concurrent reader never
/// sees a half-written file.
pub fn save_model(model: &TrainedModel, path: &Path) -> Result<()> {
    let artifact = ModelArtifact::from_model(model);
    let raw = serde_json::to_string(&artifact)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), "model artifact written");
    Ok(())
}

pub fn load_model(path: &Path) -> Result<TrainedModel> {
    let raw = fs::read_to_string(path)?;
    let artifact: ModelArtifact = serde_json::from_str(&raw)?;
    let model = artifact.into_model()?;
    info!(path = %path.display(), columns = model.feature_columns.len(), "model artifact loaded");
    Ok(model)
}

fn mismatch(reason: String) -> ForecastError {
    ForecastError::ArtifactMismatch { reason }
}
