use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::player::PlayerRecord;

/// One game's box-score line for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameLog {
    pub date: NaiveDate,
    pub pts: f64,
    pub ast: f64,
    pub reb: f64,
    #[serde(default)]
    pub stl: f64,
    #[serde(default)]
    pub blk: f64,
    #[serde(default)]
    pub tov: f64,
    #[serde(default)]
    pub fg_pct: f64,
    #[serde(default)]
    pub fg3_pct: f64,
    #[serde(default)]
    pub ft_pct: f64,
    #[serde(default)]
    pub min: f64,
}

/// Rolling and variability features over a player's combined game logs.
/// Fields stay `None` when the sample is too small to be meaningful:
/// last-10 averages need at least 10 games, trends at least 20, standard
/// deviations more than 5.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedStats {
    pub ppg_last_10: Option<f64>,
    pub apg_last_10: Option<f64>,
    pub rpg_last_10: Option<f64>,
    pub fg_pct_last_10: Option<f64>,
    pub ppg_trend: Option<f64>,
    pub apg_trend: Option<f64>,
    pub rpg_trend: Option<f64>,
    pub ppg_std: Option<f64>,
    pub apg_std: Option<f64>,
    pub rpg_std: Option<f64>,
    pub consistency_score: Option<f64>,
}

/// Plain per-game season averages over a slice of logs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonAverages {
    pub ppg: f64,
    pub apg: f64,
    pub rpg: f64,
    pub spg: f64,
    pub bpg: f64,
    pub tov: f64,
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub min: f64,
    pub games_played: f64,
}

pub fn derive_stats(logs: &[GameLog]) -> DerivedStats {
    let mut sorted: Vec<&GameLog> = logs.iter().collect();
    sorted.sort_by_key(|g| g.date);

    let mut out = DerivedStats::default();

    if sorted.len() >= 10 {
        let last10 = &sorted[sorted.len() - 10..];
        out.ppg_last_10 = Some(mean(last10.iter().map(|g| g.pts)));
        out.apg_last_10 = Some(mean(last10.iter().map(|g| g.ast)));
        out.rpg_last_10 = Some(mean(last10.iter().map(|g| g.reb)));
        out.fg_pct_last_10 = Some(mean(last10.iter().map(|g| g.fg_pct)));
    }

    if sorted.len() >= 20 {
        let half = sorted.len() / 2;
        let (first, second) = (&sorted[..half], &sorted[sorted.len() - half..]);
        out.ppg_trend = Some(mean(second.iter().map(|g| g.pts)) - mean(first.iter().map(|g| g.pts)));
        out.apg_trend = Some(mean(second.iter().map(|g| g.ast)) - mean(first.iter().map(|g| g.ast)));
        out.rpg_trend = Some(mean(second.iter().map(|g| g.reb)) - mean(first.iter().map(|g| g.reb)));
    }

    if sorted.len() > 5 {
        let ppg_std = std_dev(sorted.iter().map(|g| g.pts), sorted.len());
        out.ppg_std = Some(ppg_std);
        out.apg_std = Some(std_dev(sorted.iter().map(|g| g.ast), sorted.len()));
        out.rpg_std = Some(std_dev(sorted.iter().map(|g| g.reb), sorted.len()));
        // Inverse of scoring variability; 1.0 means identical output every night.
        out.consistency_score = Some(1.0 / (1.0 + ppg_std));
    }

    out
}

pub fn season_averages(logs: &[GameLog]) -> SeasonAverages {
    if logs.is_empty() {
        return SeasonAverages::default();
    }
    SeasonAverages {
        ppg: mean(logs.iter().map(|g| g.pts)),
        apg: mean(logs.iter().map(|g| g.ast)),
        rpg: mean(logs.iter().map(|g| g.reb)),
        spg: mean(logs.iter().map(|g| g.stl)),
        bpg: mean(logs.iter().map(|g| g.blk)),
        tov: mean(logs.iter().map(|g| g.tov)),
        fg_pct: mean(logs.iter().map(|g| g.fg_pct)),
        fg3_pct: mean(logs.iter().map(|g| g.fg3_pct)),
        ft_pct: mean(logs.iter().map(|g| g.ft_pct)),
        min: mean(logs.iter().map(|g| g.min)),
        games_played: logs.len() as f64,
    }
}

/// Fill a record's season and derived fields from two seasons of logs.
/// `last` is the most recent season; `prev` may be empty for rookies.
pub fn apply_logs(record: &mut PlayerRecord, last: &[GameLog], prev: &[GameLog]) {
    if !last.is_empty() {
        let s = season_averages(last);
        record.ppg_last = Some(s.ppg);
        record.apg_last = Some(s.apg);
        record.rpg_last = Some(s.rpg);
        record.spg_last = Some(s.spg);
        record.bpg_last = Some(s.bpg);
        record.tov_last = Some(s.tov);
        record.fg_pct_last = Some(s.fg_pct);
        record.fg3_pct_last = Some(s.fg3_pct);
        record.ft_pct_last = Some(s.ft_pct);
        record.min_last = Some(s.min);
        record.games_played_last = Some(s.games_played);
    }
    if !prev.is_empty() {
        let s = season_averages(prev);
        record.ppg_prev = Some(s.ppg);
        record.apg_prev = Some(s.apg);
        record.rpg_prev = Some(s.rpg);
        record.spg_prev = Some(s.spg);
        record.bpg_prev = Some(s.bpg);
        record.tov_prev = Some(s.tov);
        record.fg_pct_prev = Some(s.fg_pct);
        record.fg3_pct_prev = Some(s.fg3_pct);
        record.ft_pct_prev = Some(s.ft_pct);
        record.min_prev = Some(s.min);
        record.games_played_prev = Some(s.games_played);
    }

    let mut combined: Vec<GameLog> = prev.to_vec();
    combined.extend_from_slice(last);
    let derived = derive_stats(&combined);
    record.ppg_last_10 = derived.ppg_last_10;
    record.apg_last_10 = derived.apg_last_10;
    record.rpg_last_10 = derived.rpg_last_10;
    record.fg_pct_last_10 = derived.fg_pct_last_10;
    record.ppg_trend = derived.ppg_trend;
    record.apg_trend = derived.apg_trend;
    record.rpg_trend = derived.rpg_trend;
    record.ppg_std = derived.ppg_std;
    record.apg_std = derived.apg_std;
    record.rpg_std = derived.rpg_std;
    record.consistency_score = derived.consistency_score;
}

/// Parse a feet-inches height string like `"6-7"` into total inches.
pub fn parse_height(raw: &str) -> Option<f64> {
    let (feet, inches) = raw.trim().split_once('-')?;
    let feet: f64 = feet.trim().parse().ok()?;
    let inches: f64 = inches.trim().parse().ok()?;
    if feet < 0.0 || inches < 0.0 {
        return None;
    }
    Some(feet * 12.0 + inches)
}

/// Whole-year age on `as_of` for a `YYYY-MM-DD` birth date.
pub fn age_on(birth_date: &str, as_of: NaiveDate) -> Option<f64> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;
    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    if years < 0 { None } else { Some(years as f64) }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn std_dev(values: impl Iterator<Item = f64> + Clone, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let m = mean(values.clone());
    let var = values.map(|v| (v - m) * (v - m)).sum::<f64>() / n as f64;
    var.sqrt()
}
