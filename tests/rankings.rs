use std::fs;
use std::path::PathBuf;

use courtcast::player::parse_roster_json;
use courtcast::service::{ForecastService, ServiceConfig};
use courtcast::{ForecastError, PlayerId, Stat};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn trained_service() -> ForecastService {
    let roster = parse_roster_json(&read_fixture("roster_small.json")).expect("fixture parses");
    let mut config = ServiceConfig::default();
    config.train.epochs = 15;
    config.train.hidden_sizes = vec![8];
    let mut svc = ForecastService::new(config);
    svc.load_players(roster);
    svc.train().expect("fixture roster should train");
    svc
}

#[test]
fn fixture_roster_parses_with_sparse_fields() {
    let roster = parse_roster_json(&read_fixture("roster_small.json")).expect("fixture parses");
    assert_eq!(roster.len(), 6);

    // Ruben Castile carries only the core averages; everything else is None.
    let sparse = roster
        .iter()
        .find(|p| p.id == PlayerId(105))
        .expect("sparse player present");
    assert_eq!(sparse.ppg_last, Some(14.2));
    assert!(sparse.ppg_prev.is_none());
    assert!(sparse.consistency_score.is_none());
    assert!(sparse.height_in.is_none());
}

#[test]
fn leaderboards_are_ranked_and_sorted() {
    let svc = trained_service();
    for stat in Stat::ALL {
        let leaders = svc.top_performers(stat, 4).expect("leaders");
        assert_eq!(leaders.len(), 4);
        for (pos, row) in leaders.iter().enumerate() {
            assert_eq!(row.rank, pos + 1);
            assert!(row.predicted.is_finite());
        }
        for pair in leaders.windows(2) {
            assert!(pair[0].predicted >= pair[1].predicted);
        }
    }
}

#[test]
fn top_n_larger_than_roster_returns_everyone() {
    let svc = trained_service();
    let leaders = svc.top_performers(Stat::Rebounds, 50).expect("leaders");
    assert_eq!(leaders.len(), 6);
}

#[test]
fn breakouts_respect_the_threshold() {
    let svc = trained_service();
    let threshold = 5.0;
    let rows = svc.breakout_players(threshold, 10).expect("breakouts");
    for row in &rows {
        assert!(
            row.ppg.pct_change > threshold
                || row.apg.pct_change > threshold
                || row.rpg.pct_change > threshold,
            "{} qualified without beating the threshold",
            row.name
        );
    }
    for pair in rows.windows(2) {
        assert!(pair[0].total_stat_increase >= pair[1].total_stat_increase);
    }
}

#[test]
fn lookup_by_name_fragment_and_by_id() {
    let svc = trained_service();

    let by_name = svc.player_forecast("okafor").expect("fragment hit");
    assert_eq!(by_name.id, PlayerId(104));
    assert_eq!(by_name.team, "ORL");
    assert!(by_name.ppg.predicted.is_finite());

    let by_id = svc.player_forecast_by_id(PlayerId(106)).expect("id hit");
    assert_eq!(by_id.name, "Pete Varga");

    assert!(matches!(
        svc.player_forecast("jordan"),
        Err(ForecastError::PlayerNotFound { .. })
    ));
}

#[test]
fn sparse_record_still_gets_a_finite_forecast() {
    let svc = trained_service();
    let forecast = svc.player_forecast_by_id(PlayerId(105)).expect("forecast");
    for change in [forecast.ppg, forecast.apg, forecast.rpg] {
        assert!(change.current.is_finite());
        assert!(change.predicted.is_finite());
        assert!(change.pct_change.is_finite());
    }
}

#[test]
fn report_covers_roster_and_serializes() {
    let svc = trained_service();
    let report = svc.generate_report().expect("report");
    assert_eq!(report.players, 6);
    assert_eq!(report.top_scorers.len(), 6);
    assert_eq!(report.top_assists.len(), 6);
    assert_eq!(report.top_rebounders.len(), 6);

    let raw = report.to_json_pretty().expect("serializes");
    assert!(raw.contains("top_rebounders"));
    assert!(raw.contains("breakout_threshold_pct"));
}
