use std::fs;
use std::path::PathBuf;

use courtcast::player::parse_roster_json;
use courtcast::train::{self, TrainConfig};
use courtcast::{ForecastError, PlayerRecord};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_roster() -> Vec<PlayerRecord> {
    parse_roster_json(&read_fixture("roster_small.json")).expect("fixture parses")
}

fn quick_config() -> TrainConfig {
    TrainConfig {
        epochs: 15,
        hidden_sizes: vec![8],
        ..TrainConfig::default()
    }
}

#[test]
fn same_seeds_give_bitwise_identical_fits() {
    let roster = fixture_roster();
    let cfg = quick_config();
    let a = train::train(&roster, &cfg).expect("train a");
    let b = train::train(&roster, &cfg).expect("train b");

    for rec in &roster {
        let pa = a.predict_record(rec);
        let pb = b.predict_record(rec);
        for (x, y) in pa.iter().zip(pb.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
    assert_eq!(a.metrics.train_loss, b.metrics.train_loss);
    assert_eq!(a.metrics.val_loss, b.metrics.val_loss);
}

#[test]
fn changing_the_init_seed_changes_predictions() {
    let roster = fixture_roster();
    let a = train::train(&roster, &quick_config()).expect("train a");
    let mut other = quick_config();
    other.init_seed = 7;
    let b = train::train(&roster, &other).expect("train b");

    let pa = a.predict_record(&roster[0]);
    let pb = b.predict_record(&roster[0]);
    assert_ne!(pa, pb);
}

#[test]
fn metrics_reflect_the_split_and_epochs() {
    let roster = fixture_roster();
    let cfg = quick_config();
    let model = train::train(&roster, &cfg).expect("train");

    // 6 records at a 0.2 split: one held out, five trained on.
    assert_eq!(model.metrics.val_samples, 1);
    assert_eq!(model.metrics.train_samples, 5);
    assert_eq!(model.metrics.epochs_run, 15);
    assert!(model.metrics.train_loss.is_finite());
    assert!(model.metrics.val_loss.is_finite());
}

#[test]
fn output_uplift_scales_predictions_linearly() {
    let roster = fixture_roster();
    let base = train::train(&roster, &quick_config()).expect("train base");
    let mut cfg = quick_config();
    cfg.output_uplift = 1.05;
    let lifted = train::train(&roster, &cfg).expect("train lifted");

    for rec in &roster {
        let plain = base.predict_record(rec);
        let up = lifted.predict_record(rec);
        for (p, u) in plain.iter().zip(up.iter()) {
            assert!((u - p * 1.05).abs() < 1e-9);
        }
    }
}

#[test]
fn empty_roster_is_rejected_before_fitting() {
    let err = train::train(&[], &quick_config()).unwrap_err();
    assert!(matches!(err, ForecastError::DataUnavailable));
}
