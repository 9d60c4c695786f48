use serde::{Deserialize, Serialize};

use crate::rank::{BreakoutEntry, StatLeader};

/// Serializable forecast summary for the serving/reporting layer:
/// leaderboards for each statistic plus breakout candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub generated_at: String,
    pub players: usize,
    pub breakout_threshold_pct: f64,
    pub top_scorers: Vec<StatLeader>,
    pub top_assists: Vec<StatLeader>,
    pub top_rebounders: Vec<StatLeader>,
    pub breakouts: Vec<BreakoutEntry>,
}

impl ForecastReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
