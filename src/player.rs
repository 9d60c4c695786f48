use serde::{Deserialize, Serialize};

/// Stable numeric identity for a player. Name lookup remains available as
/// an explicitly fuzzy secondary query on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Canonical per-player record as produced by the data-acquisition
/// boundary. One schema, lower-snake field names, validated on
/// deserialization; consumers never have to guess casing.
///
/// Every statistic is optional. The feature builder imputes zero for
/// anything absent, so a sparse record is usable, just uninformative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub height_in: Option<f64>,
    #[serde(default)]
    pub weight_lb: Option<f64>,

    // Most recent season, per game.
    #[serde(default)]
    pub ppg_last: Option<f64>,
    #[serde(default)]
    pub apg_last: Option<f64>,
    #[serde(default)]
    pub rpg_last: Option<f64>,
    #[serde(default)]
    pub spg_last: Option<f64>,
    #[serde(default)]
    pub bpg_last: Option<f64>,
    #[serde(default)]
    pub tov_last: Option<f64>,
    #[serde(default)]
    pub fg_pct_last: Option<f64>,
    #[serde(default)]
    pub fg3_pct_last: Option<f64>,
    #[serde(default)]
    pub ft_pct_last: Option<f64>,
    #[serde(default)]
    pub min_last: Option<f64>,
    #[serde(default)]
    pub games_played_last: Option<f64>,

    // Season before that.
    #[serde(default)]
    pub ppg_prev: Option<f64>,
    #[serde(default)]
    pub apg_prev: Option<f64>,
    #[serde(default)]
    pub rpg_prev: Option<f64>,
    #[serde(default)]
    pub spg_prev: Option<f64>,
    #[serde(default)]
    pub bpg_prev: Option<f64>,
    #[serde(default)]
    pub tov_prev: Option<f64>,
    #[serde(default)]
    pub fg_pct_prev: Option<f64>,
    #[serde(default)]
    pub fg3_pct_prev: Option<f64>,
    #[serde(default)]
    pub ft_pct_prev: Option<f64>,
    #[serde(default)]
    pub min_prev: Option<f64>,
    #[serde(default)]
    pub games_played_prev: Option<f64>,

    // Rolling / derived, from game logs.
    #[serde(default)]
    pub ppg_last_10: Option<f64>,
    #[serde(default)]
    pub apg_last_10: Option<f64>,
    #[serde(default)]
    pub rpg_last_10: Option<f64>,
    #[serde(default)]
    pub fg_pct_last_10: Option<f64>,
    #[serde(default)]
    pub ppg_trend: Option<f64>,
    #[serde(default)]
    pub apg_trend: Option<f64>,
    #[serde(default)]
    pub rpg_trend: Option<f64>,
    #[serde(default)]
    pub ppg_std: Option<f64>,
    #[serde(default)]
    pub apg_std: Option<f64>,
    #[serde(default)]
    pub rpg_std: Option<f64>,
    #[serde(default)]
    pub consistency_score: Option<f64>,
}

impl PlayerRecord {
    /// Minimal record with identity only; every stat absent.
    pub fn bare(id: u32, name: &str) -> Self {
        Self {
            id: PlayerId(id),
            name: name.to_string(),
            team: String::new(),
            position: String::new(),
            age: None,
            height_in: None,
            weight_lb: None,
            ppg_last: None,
            apg_last: None,
            rpg_last: None,
            spg_last: None,
            bpg_last: None,
            tov_last: None,
            fg_pct_last: None,
            fg3_pct_last: None,
            ft_pct_last: None,
            min_last: None,
            games_played_last: None,
            ppg_prev: None,
            apg_prev: None,
            rpg_prev: None,
            spg_prev: None,
            bpg_prev: None,
            tov_prev: None,
            fg_pct_prev: None,
            fg3_pct_prev: None,
            ft_pct_prev: None,
            min_prev: None,
            games_played_prev: None,
            ppg_last_10: None,
            apg_last_10: None,
            rpg_last_10: None,
            fg_pct_last_10: None,
            ppg_trend: None,
            apg_trend: None,
            rpg_trend: None,
            ppg_std: None,
            apg_std: None,
            rpg_std: None,
            consistency_score: None,
        }
    }

    /// Case-insensitive substring match on the player name.
    pub fn name_matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        !q.is_empty() && self.name.to_lowercase().contains(&q)
    }
}

/// Parse a roster from its JSON array form.
pub fn parse_roster_json(raw: &str) -> crate::error::Result<Vec<PlayerRecord>> {
    let records: Vec<PlayerRecord> = serde_json::from_str(raw)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_record_deserializes_with_defaults() {
        let raw = r#"[{"id": 7, "name": "Test Player", "ppg_last": 21.5}]"#;
        let roster = parse_roster_json(raw).expect("sparse record should parse");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, PlayerId(7));
        assert_eq!(roster[0].ppg_last, Some(21.5));
        assert!(roster[0].apg_last.is_none());
        assert!(roster[0].team.is_empty());
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let rec = PlayerRecord::bare(1, "LeBron James");
        assert!(rec.name_matches("lebron"));
        assert!(rec.name_matches("JAMES"));
        assert!(!rec.name_matches("curry"));
        assert!(!rec.name_matches("  "));
    }
}
