use serde::{Deserialize, Serialize};

use crate::model::OUTPUTS;
use crate::player::{PlayerId, PlayerRecord};

/// The three forecast statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stat {
    Points,
    Assists,
    Rebounds,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Points, Stat::Assists, Stat::Rebounds];

    /// Index into a prediction triple.
    pub fn index(self) -> usize {
        match self {
            Stat::Points => 0,
            Stat::Assists => 1,
            Stat::Rebounds => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stat::Points => "PPG",
            Stat::Assists => "APG",
            Stat::Rebounds => "RPG",
        }
    }

    fn current(self, record: &PlayerRecord) -> f64 {
        match self {
            Stat::Points => record.ppg_last.unwrap_or(0.0),
            Stat::Assists => record.apg_last.unwrap_or(0.0),
            Stat::Rebounds => record.rpg_last.unwrap_or(0.0),
        }
    }
}

/// One row of a top-N leaderboard for a single statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLeader {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    pub position: String,
    pub age: Option<f64>,
    pub predicted: f64,
}

/// Per-stat detail inside a breakout row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatChange {
    pub current: f64,
    pub predicted: f64,
    pub pct_change: f64,
}

/// A player whose forecast beats their recent output by more than the
/// threshold in at least one statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakoutEntry {
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub team: String,
    pub ppg: StatChange,
    pub apg: StatChange,
    pub rpg: StatChange,
    /// Primary ranking key: summed absolute stat increases.
    pub total_stat_increase: f64,
    /// Display-only percentage sum, clipped to ±1000.
    pub total_improvement_pct: f64,
}

/// Percentage change with the division-by-zero policy: a zero (or
/// negative) baseline is defined as 0% rather than NaN/inf.
pub fn pct_change(last: f64, predicted: f64) -> f64 {
    if last > 0.0 {
        (predicted - last) / last * 100.0
    } else {
        0.0
    }
}

/// Top `n` players by predicted value of `stat`, descending. Ties keep
/// roster order; result length is `min(n, players)`.
pub fn top_n(
    records: &[PlayerRecord],
    predictions: &[[f64; OUTPUTS]],
    stat: Stat,
    n: usize,
) -> Vec<StatLeader> {
    let mut order: Vec<usize> = (0..records.len().min(predictions.len())).collect();
    order.sort_by(|&a, &b| {
        predictions[b][stat.index()]
            .partial_cmp(&predictions[a][stat.index()])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    order
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(pos, i)| StatLeader {
            rank: pos + 1,
            player_id: records[i].id,
            name: records[i].name.clone(),
            team: records[i].team.clone(),
            position: records[i].position.clone(),
            age: records[i].age,
            predicted: predictions[i][stat.index()],
        })
        .collect()
}

/// Breakout candidates: any stat's percentage change strictly above
/// `threshold_pct` qualifies. Ranked by summed absolute increase,
/// descending, truncated to `top_n`.
pub fn breakouts(
    records: &[PlayerRecord],
    predictions: &[[f64; OUTPUTS]],
    threshold_pct: f64,
    top_n: usize,
) -> Vec<BreakoutEntry> {
    let mut entries: Vec<BreakoutEntry> = Vec::new();

    for (i, record) in records.iter().enumerate().take(predictions.len()) {
        let changes: Vec<StatChange> = Stat::ALL
            .iter()
            .map(|stat| {
                let current = stat.current(record);
                let predicted = predictions[i][stat.index()];
                StatChange {
                    current,
                    predicted,
                    pct_change: pct_change(current, predicted),
                }
            })
            .collect();

        if !changes.iter().any(|c| c.pct_change > threshold_pct) {
            continue;
        }

        let total_stat_increase: f64 = changes.iter().map(|c| c.predicted - c.current).sum();
        let total_improvement_pct = changes
            .iter()
            .map(|c| c.pct_change)
            .sum::<f64>()
            .clamp(-1000.0, 1000.0);

        entries.push(BreakoutEntry {
            rank: 0,
            player_id: record.id,
            name: record.name.clone(),
            team: record.team.clone(),
            ppg: changes[0],
            apg: changes[1],
            rpg: changes[2],
            total_stat_increase,
            total_improvement_pct,
        });
    }

    entries.sort_by(|a, b| {
        b.total_stat_increase
            .partial_cmp(&a.total_stat_increase)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(top_n);
    for (pos, entry) in entries.iter_mut().enumerate() {
        entry.rank = pos + 1;
    }
    entries
}
