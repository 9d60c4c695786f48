use thiserror::Error;

/// Error type for every fallible operation in the forecasting core.
///
/// Failures surface to the immediate caller; nothing is swallowed and
/// logged. Each query is independent, so none of these are fatal to a
/// process embedding the service.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// No player records are loaded where at least one is required.
    #[error("no player records available")]
    DataUnavailable,

    /// A prediction or ranking was requested before `train()` or
    /// `load_artifact()` succeeded.
    #[error("model not trained; call train() or load_artifact() first")]
    ModelNotTrained,

    /// Fuzzy name lookup found no case-insensitive substring match.
    #[error("player not found: {query:?}")]
    PlayerNotFound { query: String },

    /// A persisted model bundle is internally inconsistent (column list,
    /// scaler, or layer shapes disagree).
    #[error("model artifact mismatch: {reason}")]
    ArtifactMismatch { reason: String },

    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
