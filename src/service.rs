use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ForecastError, Result};
use crate::model::TrainedModel;
use crate::player::{PlayerId, PlayerRecord};
use crate::rank::{self, BreakoutEntry, Stat, StatLeader, pct_change};
use crate::report::ForecastReport;
use crate::train::{self, TrainConfig};
use crate::{artifact, rank::StatChange};

/// Service-level knobs; training hyperparameters live in `TrainConfig`.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub train: TrainConfig,
    pub default_top_n: usize,
    pub breakout_threshold_pct: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            train: TrainConfig::default(),
            default_top_n: 10,
            breakout_threshold_pct: 5.0,
        }
    }
}

/// A single player's forecast, shaped for serving. Values round to one
/// decimal the way the reporting layer displays them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerForecast {
    pub id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: String,
    pub age: Option<f64>,
    pub ppg: StatChange,
    pub apg: StatChange,
    pub rpg: StatChange,
}

/// Owns the roster and the trained model. Lifecycle is explicit:
/// construct, load players, then train or load an artifact before any
/// query. Queries on an untrained service fail with `ModelNotTrained`;
/// nothing here trains implicitly. `&mut self` on the mutating calls keeps
/// one trainer at a time per instance.
#[derive(Debug, Default)]
pub struct ForecastService {
    config: ServiceConfig,
    players: Vec<PlayerRecord>,
    model: Option<TrainedModel>,
}

impl ForecastService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            players: Vec::new(),
            model: None,
        }
    }

    /// Replace the roster. The previous record set is discarded whole; a
    /// model trained against the old roster stays valid for prediction
    /// (its column list travels with it) but rankings now reflect the new
    /// players.
    pub fn load_players(&mut self, players: Vec<PlayerRecord>) {
        info!(players = players.len(), "roster loaded");
        self.players = players;
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Blocking one-shot training over the loaded roster.
    pub fn train(&mut self) -> Result<()> {
        let model = train::train(&self.players, &self.config.train)?;
        self.model = Some(model);
        Ok(())
    }

    pub fn save_artifact(&self, path: &Path) -> Result<()> {
        let model = self.model.as_ref().ok_or(ForecastError::ModelNotTrained)?;
        artifact::save_model(model, path)
    }

    pub fn load_artifact(&mut self, path: &Path) -> Result<()> {
        self.model = Some(artifact::load_model(path)?);
        Ok(())
    }

    /// Top `n` leaderboard for one statistic over the whole roster.
    pub fn top_performers(&self, stat: Stat, n: usize) -> Result<Vec<StatLeader>> {
        let predictions = self.predict_all()?;
        Ok(rank::top_n(&self.players, &predictions, stat, n))
    }

    /// Players whose forecast beats recent output by more than
    /// `threshold_pct` in at least one statistic.
    pub fn breakout_players(&self, threshold_pct: f64, n: usize) -> Result<Vec<BreakoutEntry>> {
        let predictions = self.predict_all()?;
        Ok(rank::breakouts(&self.players, &predictions, threshold_pct, n))
    }

    /// Primary lookup by stable id.
    pub fn player_forecast_by_id(&self, id: PlayerId) -> Result<PlayerForecast> {
        let record = self
            .players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ForecastError::PlayerNotFound {
                query: format!("id {}", id.0),
            })?;
        self.forecast_for(record)
    }

    /// Secondary, explicitly fuzzy lookup: first case-insensitive
    /// substring match in roster order.
    pub fn player_forecast(&self, query: &str) -> Result<PlayerForecast> {
        let record = self
            .players
            .iter()
            .find(|p| p.name_matches(query))
            .ok_or_else(|| ForecastError::PlayerNotFound {
                query: query.to_string(),
            })?;
        self.forecast_for(record)
    }

    /// Full report: leaders for all three stats plus breakout candidates,
    /// using the configured defaults.
    pub fn generate_report(&self) -> Result<ForecastReport> {
        let n = self.config.default_top_n;
        let threshold = self.config.breakout_threshold_pct;
        Ok(ForecastReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            players: self.players.len(),
            breakout_threshold_pct: threshold,
            top_scorers: self.top_performers(Stat::Points, n)?,
            top_assists: self.top_performers(Stat::Assists, n)?,
            top_rebounders: self.top_performers(Stat::Rebounds, n)?,
            breakouts: self.breakout_players(threshold, n)?,
        })
    }

    fn predict_all(&self) -> Result<Vec<[f64; 3]>> {
        let model = self.model.as_ref().ok_or(ForecastError::ModelNotTrained)?;
        if self.players.is_empty() {
            return Err(ForecastError::DataUnavailable);
        }
        model.predict_batch(&self.players)
    }

    fn forecast_for(&self, record: &PlayerRecord) -> Result<PlayerForecast> {
        let model = self.model.as_ref().ok_or(ForecastError::ModelNotTrained)?;
        let predicted = model.predict_record(record);
        let current = [
            record.ppg_last.unwrap_or(0.0),
            record.apg_last.unwrap_or(0.0),
            record.rpg_last.unwrap_or(0.0),
        ];
        let change = |i: usize| StatChange {
            current: round1(current[i]),
            predicted: round1(predicted[i]),
            pct_change: round1(pct_change(current[i], predicted[i])),
        };
        Ok(PlayerForecast {
            id: record.id,
            name: record.name.clone(),
            team: record.team.clone(),
            position: record.position.clone(),
            age: record.age,
            ppg: change(0),
            apg: change(1),
            rpg: change(2),
        })
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
