use crate::error::{ForecastError, Result};
use crate::player::PlayerRecord;

/// Ordered model input columns. The order is part of the trained-model
/// contract: an artifact records the exact list it was fitted against and
/// inference must replay it unchanged.
pub const FEATURE_COLUMNS: [&str; 38] = [
    "height_in",
    "weight_lb",
    "age",
    "ppg_last",
    "apg_last",
    "rpg_last",
    "spg_last",
    "bpg_last",
    "tov_last",
    "fg_pct_last",
    "fg3_pct_last",
    "ft_pct_last",
    "min_last",
    "games_played_last",
    "ppg_prev",
    "apg_prev",
    "rpg_prev",
    "spg_prev",
    "bpg_prev",
    "tov_prev",
    "fg_pct_prev",
    "fg3_pct_prev",
    "ft_pct_prev",
    "min_prev",
    "games_played_prev",
    "ppg_last_10",
    "apg_last_10",
    "rpg_last_10",
    "fg_pct_last_10",
    "ppg_trend",
    "apg_trend",
    "rpg_trend",
    "ppg_std",
    "apg_std",
    "rpg_std",
    "consistency_score",
    "age_category",
    "age_improvement_factor",
];

/// Ordinal age bucket used as a model feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBucket {
    Rookie,
    Prime,
    Peak,
    Decline,
}

impl AgeBucket {
    /// Missing age defaults to the prime bucket, matching the median-fill
    /// behavior at the acquisition boundary.
    pub fn from_age(age: Option<f64>) -> Self {
        match age {
            Some(a) if a.is_finite() && a <= 23.0 => AgeBucket::Rookie,
            Some(a) if a.is_finite() && a <= 29.0 => AgeBucket::Prime,
            Some(a) if a.is_finite() && a <= 35.0 => AgeBucket::Peak,
            Some(a) if a.is_finite() => AgeBucket::Decline,
            _ => AgeBucket::Prime,
        }
    }

    pub fn ordinal(self) -> f64 {
        match self {
            AgeBucket::Rookie => 0.0,
            AgeBucket::Prime => 1.0,
            AgeBucket::Peak => 2.0,
            AgeBucket::Decline => 3.0,
        }
    }

    /// Scale applied to synthetic next-season noise: young players get more
    /// upside, older players decline.
    pub fn improvement_factor(self) -> f64 {
        match self {
            AgeBucket::Rookie => 1.2,
            AgeBucket::Prime => 1.0,
            AgeBucket::Peak => 0.8,
            AgeBucket::Decline => 0.6,
        }
    }
}

/// Fixed-order numeric vector for one record. Deterministic: identical
/// record fields always produce an identical vector. Missing or non-finite
/// fields impute to zero; nothing here errors.
pub fn build_vector(record: &PlayerRecord) -> Vec<f64> {
    FEATURE_COLUMNS
        .iter()
        .map(|col| feature_value(record, col))
        .collect()
}

/// Vector replaying an explicit column list, used at inference time so a
/// loaded artifact drives the exact order it was trained with.
pub fn build_vector_columns(record: &PlayerRecord, columns: &[String]) -> Vec<f64> {
    columns
        .iter()
        .map(|col| feature_value(record, col))
        .collect()
}

/// Vectors for a full roster. An empty roster is the one hard failure:
/// training or prediction over nothing is reported, not defaulted.
pub fn build_matrix(records: &[PlayerRecord]) -> Result<Vec<Vec<f64>>> {
    if records.is_empty() {
        return Err(ForecastError::DataUnavailable);
    }
    Ok(records.iter().map(build_vector).collect())
}

fn feature_value(r: &PlayerRecord, column: &str) -> f64 {
    let bucket = AgeBucket::from_age(r.age);
    match column {
        "height_in" => num(r.height_in),
        "weight_lb" => num(r.weight_lb),
        "age" => num(r.age),
        "ppg_last" => num(r.ppg_last),
        "apg_last" => num(r.apg_last),
        "rpg_last" => num(r.rpg_last),
        "spg_last" => num(r.spg_last),
        "bpg_last" => num(r.bpg_last),
        "tov_last" => num(r.tov_last),
        "fg_pct_last" => num(r.fg_pct_last),
        "fg3_pct_last" => num(r.fg3_pct_last),
        "ft_pct_last" => num(r.ft_pct_last),
        "min_last" => num(r.min_last),
        "games_played_last" => num(r.games_played_last),
        "ppg_prev" => num(r.ppg_prev),
        "apg_prev" => num(r.apg_prev),
        "rpg_prev" => num(r.rpg_prev),
        "spg_prev" => num(r.spg_prev),
        "bpg_prev" => num(r.bpg_prev),
        "tov_prev" => num(r.tov_prev),
        "fg_pct_prev" => num(r.fg_pct_prev),
        "fg3_pct_prev" => num(r.fg3_pct_prev),
        "ft_pct_prev" => num(r.ft_pct_prev),
        "min_prev" => num(r.min_prev),
        "games_played_prev" => num(r.games_played_prev),
        "ppg_last_10" => num(r.ppg_last_10),
        "apg_last_10" => num(r.apg_last_10),
        "rpg_last_10" => num(r.rpg_last_10),
        "fg_pct_last_10" => num(r.fg_pct_last_10),
        "ppg_trend" => num(r.ppg_trend),
        "apg_trend" => num(r.apg_trend),
        "rpg_trend" => num(r.rpg_trend),
        "ppg_std" => num(r.ppg_std),
        "apg_std" => num(r.apg_std),
        "rpg_std" => num(r.rpg_std),
        "consistency_score" => num(r.consistency_score),
        "age_category" => bucket.ordinal(),
        "age_improvement_factor" => bucket.improvement_factor(),
        _ => 0.0,
    }
}

fn num(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
